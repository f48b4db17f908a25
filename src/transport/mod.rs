//! Line-oriented player transport.
//!
//! Players talk to the engine one line at a time. Inbound lines read
//! `name: text`; outbound lines are `[all] text` for announcements and
//! `[@name] text` for private notices. [`stdio`] runs this over any async
//! reader/writer pair, stdin/stdout in the CLI.

pub mod stdio;

pub use stdio::{LineReader, StdioConfig, feed_utterances, write_notices};

use std::collections::HashMap;
use std::str::FromStr;

use crate::engine::Notice;
use crate::model::{Game, PlayerId};

/// Default maximum inbound line length in bytes (4 KB).
pub const DEFAULT_MAX_LINE_SIZE: usize = 4 * 1024;

/// Default buffer size for the stdio transport (8 KB).
pub const DEFAULT_STDIO_BUFFER_SIZE: usize = 8 * 1024;

/// Maps the names players type to their ids.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_name: HashMap<String, PlayerId>,
}

impl Roster {
    /// Indexes every player in `game` by name.
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        Self {
            by_name: game
                .players()
                .map(|p| (p.name().to_owned(), p.id()))
                .collect(),
        }
    }

    /// Finds the player called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<PlayerId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Splits an inbound `name: text` line.
///
/// Both halves are trimmed. Returns `None` without a `:` or with an empty
/// name; the text may be empty.
#[must_use]
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (name, text) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, text.trim()))
}

/// Renders an outbound notice as one line, without the newline.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Announcement(text) => format!("[all] {text}"),
        Notice::Private { player, text } => format!("[@{}] {text}", player.name()),
    }
}

/// Truncates and strips control characters from untrusted input before logging.
fn sanitize_for_log(input: &str, max_len: usize) -> String {
    input
        .chars()
        .take(max_len)
        .map(|c| {
            if c.is_control() && c != '\t' {
                '\u{FFFD}'
            } else {
                c
            }
        })
        .collect()
}

/// Reads an environment variable, parsing it to type `T`, or returns the default.
///
/// Logs a warning if the variable is set but cannot be parsed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %v, "invalid env var value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordList;

    #[test]
    fn parse_line_splits_on_first_colon() {
        assert_eq!(parse_line("Ace: hello there"), Some(("Ace", "hello there")));
        assert_eq!(parse_line("  Bee :time: 10:30 "), Some(("Bee", "time: 10:30")));
        assert_eq!(parse_line("Cee:"), Some(("Cee", "")));
    }

    #[test]
    fn parse_line_rejects_missing_name() {
        assert_eq!(parse_line("no separator"), None);
        assert_eq!(parse_line("  : orphan text"), None);
    }

    #[test]
    fn roster_indexes_names() {
        let words = WordList::new(["w"]).unwrap();
        let game = Game::new(1, [(PlayerId(4), "Ace"), (PlayerId(9), "Bee")], words);
        let roster = Roster::from_game(&game);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.lookup("Bee"), Some(PlayerId(9)));
        assert_eq!(roster.lookup("bee"), None);
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\u{1b}[31mb\tc", 100), "a\u{FFFD}[31mb\tc");
        assert_eq!(sanitize_for_log("abcdef", 3), "abc");
    }

    #[test]
    fn env_or_default() {
        let result: usize = env_or("KILLWORD_TEST_NONEXISTENT_VAR_12345", 42);
        assert_eq!(result, 42);
    }
}
