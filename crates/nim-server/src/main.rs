//! Nim server entry point.
//!
//! Usage: `nim-server <host> <port>`

mod cli;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use nim::NimServer;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            // Bad usage is reported, not treated as a failure.
            eprintln!("{e}");
            return Ok(());
        }
    };

    nim::logging::init(args.verbose).context("failed to initialize logging")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Nim server");

    let bind_addr = args.bind_addr();
    let server = NimServer::builder()
        .bind(&bind_addr)
        .build()
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    server.run().await?;
    Ok(())
}
