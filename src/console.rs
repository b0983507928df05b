//! Operator commands read from stdin, one per line.
//!
//! | Input          | Command           |
//! |----------------|-------------------|
//! | `s`, `save`    | [`Command::Save`]  |
//! | `c`, `clear`   | [`Command::Clear`] |
//! | `q`, `quit`    | [`Command::Quit`]  |

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Append the gesture sequence to the output file
    Save,
    /// Reset the gesture sequence
    Clear,
    Quit,
}

/// Parse one input line, case-insensitively
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "save" => Some(Command::Save),
        "c" | "clear" => Some(Command::Clear),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Send every recognized line of `reader` to `commands`
///
/// Stops at end of input, on a read error, after `quit`, or once the
/// receiver is dropped.
pub fn forward_commands<R: BufRead>(reader: R, commands: mpsc::Sender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parse_command(&line) else {
            warn!("Unknown command {:?} (expected save, clear or quit)", line.trim());
            continue;
        };

        if commands.blocking_send(command).is_err() || command == Command::Quit {
            break;
        }
    }
    debug!("Console input closed");
}

/// Read stdin on a dedicated thread so a pending read never blocks shutdown
pub fn spawn_stdin_reader(commands: mpsc::Sender<Command>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("s"), Some(Command::Save));
        assert_eq!(parse_command("save"), Some(Command::Save));
        assert_eq!(parse_command("  Clear \r"), Some(Command::Clear));
        assert_eq!(parse_command("c"), Some(Command::Clear));
        assert_eq!(parse_command("QUIT"), Some(Command::Quit));
        assert_eq!(parse_command("q"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("saved"), None);
        assert_eq!(parse_command("hello"), None);
    }

    #[test]
    fn test_forward_skips_unknown_lines() {
        let (tx, mut rx) = mpsc::channel(8);
        forward_commands(Cursor::new("save\n\nbogus\nclear\n"), tx);

        assert_eq!(rx.try_recv(), Ok(Command::Save));
        assert_eq!(rx.try_recv(), Ok(Command::Clear));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_stops_after_quit() {
        let (tx, mut rx) = mpsc::channel(8);
        forward_commands(Cursor::new("q\nsave\n"), tx);

        assert_eq!(rx.try_recv(), Ok(Command::Quit));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        forward_commands(Cursor::new("save\nclear\n"), tx);
    }
}
