//! Command-line arguments for the server.

use clap::Parser;

/// Nim game server.
///
/// Listens for players on one UDP socket and pairs them two at a time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Host name or IP address to listen on
    pub host: String,

    /// UDP port to listen on
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns `host:port` ready for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_host_and_port() {
        let args = Args::try_parse_from(["nim-server", "localhost", "7070"]).unwrap();
        assert_eq!(args.bind_addr(), "localhost:7070");
        assert!(!args.verbose);
    }

    #[test]
    fn test_verbose_flag() {
        let args =
            Args::try_parse_from(["nim-server", "-v", "0.0.0.0", "9000"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_wrong_argument_count_is_an_error() {
        assert!(Args::try_parse_from(["nim-server", "localhost"]).is_err());
        assert!(Args::try_parse_from(["nim-server", "a", "1", "extra"]).is_err());
    }

    #[test]
    fn test_port_must_be_numeric() {
        assert!(Args::try_parse_from(["nim-server", "localhost", "http"]).is_err());
    }
}
