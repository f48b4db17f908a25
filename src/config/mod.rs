//! Game configuration
//!
//! YAML game files: the roster, where kill words come from, how long
//! attacks take, and optional message overrides.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, parse};
pub use schema::{AttackDelay, GameConfig, GameMetadata, PlayerEntry};
pub use validation::{ValidationResult, check, validate};

use crate::error::{KillwordError, WordListError};
use crate::model::Game;
use crate::words::WordList;

impl GameConfig {
    /// Builds the shuffled word list from inline `words` and `words_file`.
    ///
    /// # Errors
    ///
    /// Returns a [`WordListError`] if the word file cannot be read or no
    /// words remain.
    pub fn word_list(&self) -> Result<WordList, WordListError> {
        let from_file = match &self.words_file {
            Some(path) => std::fs::read_to_string(path)?,
            None => String::new(),
        };
        let words = self
            .words
            .iter()
            .map(String::as_str)
            .chain(from_file.split_whitespace())
            .map(str::to_owned);
        WordList::shuffled(words, &mut rand::rng())
    }

    /// Builds a fresh, unstarted game from this configuration.
    ///
    /// # Errors
    ///
    /// See [`GameConfig::word_list`].
    pub fn build_game(&self) -> Result<Game, KillwordError> {
        let words = self.word_list()?;
        let roster = self.players.iter().map(|p| (p.id, p.name.clone()));
        Ok(Game::new(self.game.id, roster, words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerId;
    use std::path::Path;

    #[test]
    fn build_game_from_inline_words() {
        let yaml = "game: { id: 7 }\nplayers:\n  - { id: 1, name: Ace }\n  - { id: 2, name: Bee }\nwords: [apple, banana]\n";
        let config = parse(yaml, Path::new("inline.yaml")).unwrap();
        let game = config.build_game().unwrap();
        assert_eq!(game.id(), 7);
        assert_eq!(game.len(), 2);
        assert_eq!(game.player(PlayerId(2)).unwrap().name(), "Bee");
    }

    #[test]
    fn word_list_merges_inline_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "cherry\ndate  elder\n").unwrap();

        let mut config =
            parse("players: [{ id: 1, name: Ace }]\nwords: [apple]\n", Path::new("x.yaml"))
                .unwrap();
        config.words_file = Some(words);
        assert_eq!(config.word_list().unwrap().len(), 4);
    }

    #[test]
    fn missing_word_file_is_io_error() {
        let mut config =
            parse("players: [{ id: 1, name: Ace }]\n", Path::new("x.yaml")).unwrap();
        config.words_file = Some("/definitely/not/here.txt".into());
        let err = config.build_game().unwrap_err();
        assert!(matches!(
            err,
            KillwordError::WordList(WordListError::Io { .. })
        ));
    }
}
