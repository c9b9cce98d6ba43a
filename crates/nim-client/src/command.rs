//! Parsing of the lines a player types.

use nim::game::HEAP_COUNT;

/// One thing the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Take { heap: u8, count: u8 },
    NewGame,
    Quit,
    Help,
}

/// Why a typed line or a move was refused locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type `help` for the list")]
    Unknown(String),

    #[error("usage: take <heap> <count>")]
    BadTake,

    #[error("there is no heap {0}, heaps are 0 to {max}", max = HEAP_COUNT - 1)]
    NoSuchHeap(u8),

    #[error("heap {heap} has {remaining} left, take between 1 and {remaining}")]
    BadCount { heap: u8, remaining: u8 },

    #[error("it's not your turn")]
    NotYourTurn,

    #[error("wait for a partner first")]
    NoPartner,
}

/// Shown for `help`.
pub const HELP: &str = "\
commands:
  take <heap> <count>   remove <count> markers from heap <heap>
  new                   start a new game
  quit                  leave
  help                  show this list";

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "take" | "t" => {
                let heap = words.next().and_then(|w| w.parse().ok());
                let count = words.next().and_then(|w| w.parse().ok());
                match (heap, count, words.next()) {
                    (Some(heap), Some(count), None) => Command::Take { heap, count },
                    _ => return Err(CommandError::BadTake),
                }
            }
            "new" | "n" => Command::NewGame,
            "quit" | "q" | "exit" => Command::Quit,
            "help" | "h" | "?" => Command::Help,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_take() {
        assert_eq!(
            Command::parse("take 2 5"),
            Ok(Some(Command::Take { heap: 2, count: 5 }))
        );
        assert_eq!(
            Command::parse("  T 0 1 "),
            Ok(Some(Command::Take { heap: 0, count: 1 }))
        );
    }

    #[test]
    fn test_parse_take_needs_two_numbers() {
        assert_eq!(Command::parse("take 2"), Err(CommandError::BadTake));
        assert_eq!(Command::parse("take x 1"), Err(CommandError::BadTake));
        assert_eq!(Command::parse("take 1 2 3"), Err(CommandError::BadTake));
        assert_eq!(Command::parse("take 1 300"), Err(CommandError::BadTake));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("new"), Ok(Some(Command::NewGame)));
        assert_eq!(Command::parse("QUIT"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse("?"), Ok(Some(Command::Help)));
    }

    #[test]
    fn test_blank_line_is_nothing() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
