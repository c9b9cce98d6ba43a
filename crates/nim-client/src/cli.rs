//! Command-line arguments for the client.

use clap::Parser;

/// Terminal client for a Nim server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server host name or IP address
    pub server_host: String,

    /// Server UDP port
    pub server_port: u16,

    /// Host name or IP address to receive on
    pub client_host: String,

    /// UDP port to receive on
    pub client_port: u16,

    /// Your player name (no whitespace)
    pub player_name: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the local `host:port` to bind.
    pub fn client_addr(&self) -> String {
        format!("{}:{}", self.client_host, self.client_port)
    }
}
