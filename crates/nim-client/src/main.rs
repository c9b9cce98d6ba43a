//! Nim terminal client.
//!
//! Usage: `nim-client <serverhost> <serverport> <clienthost> <clientport> <playername>`

mod cli;
mod command;
mod view;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use nim::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::Args;
use crate::command::{Command, HELP};
use crate::view::GameView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            eprintln!("{e}");
            return Ok(());
        }
    };

    nim::logging::init(args.verbose).context("failed to initialize logging")?;

    let server = nim::transport::resolve(&args.server_host, args.server_port).await?;
    let (session, notes) = RemoteSession::connect(&args.client_addr(), server)
        .await
        .with_context(|| format!("failed to bind {}", args.client_addr()))?;
    let local = session.local_addr()?;
    tracing::debug!(%server, %local, "connected");

    session
        .join(&args.player_name)
        .await
        .context("failed to reach server")?;
    println!("{HELP}");

    play(&session, notes).await
}

/// Runs until either side quits.
async fn play(
    session: &RemoteSession,
    mut notes: tokio::sync::mpsc::UnboundedReceiver<ServerMessage>,
) -> anyhow::Result<()> {
    let mut view = GameView::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            note = notes.recv() => {
                let Some(msg) = note else {
                    anyhow::bail!("lost connection to server");
                };
                if view.apply(&msg) {
                    println!("Your partner left. Goodbye.");
                    session.quit().await?;
                    return Ok(());
                }
                print!("{}", view.render());
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    session.quit().await?;
                    return Ok(());
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Take { heap, count })) => {
                        match view.check_take(heap, count) {
                            Ok(()) => session.take(heap, count).await?,
                            Err(e) => println!("{e}"),
                        }
                    }
                    Ok(Some(Command::NewGame)) => match view.check_new_game() {
                        Ok(()) => session.new_game().await?,
                        Err(e) => println!("{e}"),
                    },
                    Ok(Some(Command::Quit)) => {
                        session.quit().await?;
                        return Ok(());
                    }
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}
