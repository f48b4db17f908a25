//! Configuration validation
//!
//! Semantic checks on a parsed [`GameConfig`]. [`check`] collects every
//! problem so `killword validate` can report them all at once; [`validate`]
//! stops at the first.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::schema::GameConfig;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that prevent the game from running.
    pub errors: Vec<ConfigError>,
}

impl ValidationResult {
    /// Returns `true` if validation passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates `config`, returning the first problem found.
///
/// # Errors
///
/// Returns the first [`ConfigError`] that [`check`] reports.
pub fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    check(config).errors.into_iter().next().map_or(Ok(()), Err)
}

/// Runs every check on `config`.
#[must_use]
pub fn check(config: &GameConfig) -> ValidationResult {
    let mut errors = Vec::new();
    check_roster(config, &mut errors);
    check_words(config, &mut errors);
    if let Err(e) = config.attack_delay.bounds() {
        errors.push(e);
    }
    ValidationResult { errors }
}

fn check_roster(config: &GameConfig, errors: &mut Vec<ConfigError>) {
    if config.players.is_empty() {
        errors.push(ConfigError::EmptyRoster);
        return;
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for (i, entry) in config.players.iter().enumerate() {
        if !ids.insert(entry.id) {
            errors.push(ConfigError::DuplicatePlayer(entry.id));
        }

        let field = format!("players[{i}].name");
        let name = entry.name.trim();
        if name.is_empty() {
            errors.push(ConfigError::Invalid {
                field,
                message: "name must not be empty".to_owned(),
            });
        } else if name.contains(':') {
            // Names are the prefix of a `name: text` input line.
            errors.push(ConfigError::Invalid {
                field,
                message: format!("name '{name}' must not contain ':'"),
            });
        } else if name != entry.name {
            errors.push(ConfigError::Invalid {
                field,
                message: format!("name '{}' has surrounding whitespace", entry.name),
            });
        } else if !names.insert(name) {
            errors.push(ConfigError::Invalid {
                field,
                message: format!("name '{name}' is used by more than one player"),
            });
        }
    }
}

fn check_words(config: &GameConfig, errors: &mut Vec<ConfigError>) {
    if config.words.is_empty() && config.words_file.is_none() {
        errors.push(ConfigError::NoWords);
        return;
    }

    // Utterances match by substring, so no word may sit inside another.
    let mut accepted: Vec<(usize, &str)> = Vec::new();
    for (i, word) in config.words.iter().enumerate() {
        let field = format!("words[{i}]");
        if word.trim().is_empty() {
            errors.push(ConfigError::Invalid {
                field,
                message: "kill word must not be blank".to_owned(),
            });
        } else if let Some((j, _)) = accepted.iter().find(|(_, w)| *w == word.as_str()) {
            errors.push(ConfigError::Invalid {
                field,
                message: format!("'{word}' repeats words[{j}]"),
            });
        } else if let Some((j, other)) = accepted
            .iter()
            .find(|(_, w)| w.contains(word.as_str()) || word.contains(*w))
        {
            errors.push(ConfigError::Invalid {
                field,
                message: format!("'{word}' overlaps '{other}' (words[{j}])"),
            });
        } else {
            accepted.push((i, word.as_str()));
        }
    }

    if config.words_file.is_none() && config.words.len() < config.players.len() {
        errors.push(ConfigError::Invalid {
            field: "words".to_owned(),
            message: format!(
                "{} kill words for {} players; every player needs a distinct word",
                config.words.len(),
                config.players.len()
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AttackDelay, GameMetadata, PlayerEntry};
    use crate::model::PlayerId;

    fn entry(id: u64, name: &str) -> PlayerEntry {
        PlayerEntry {
            id: PlayerId(id),
            name: name.to_owned(),
        }
    }

    fn config(players: Vec<PlayerEntry>) -> GameConfig {
        GameConfig {
            game: GameMetadata::default(),
            players,
            words: ["apple", "banana", "cherry", "damson"]
                .map(str::to_owned)
                .to_vec(),
            words_file: None,
            attack_delay: AttackDelay::default(),
            lang: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        let cfg = config(vec![entry(1, "Ace"), entry(2, "Bee")]);
        assert!(check(&cfg).is_valid());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn empty_roster() {
        let cfg = config(vec![]);
        assert!(matches!(validate(&cfg), Err(ConfigError::EmptyRoster)));
    }

    #[test]
    fn duplicate_ids_and_names() {
        let cfg = config(vec![entry(1, "Ace"), entry(1, "Bee"), entry(2, "Ace")]);
        let result = check(&cfg);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            ConfigError::DuplicatePlayer(PlayerId(1))
        ));
        assert!(matches!(
            result.errors[1],
            ConfigError::Invalid { ref field, .. } if field == "players[2].name"
        ));
    }

    #[test]
    fn names_with_separator_or_padding_rejected() {
        let cfg = config(vec![entry(1, "Ace: the"), entry(2, " Bee"), entry(3, "  ")]);
        let result = check(&cfg);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn words_required() {
        let mut cfg = config(vec![entry(1, "Ace")]);
        cfg.words.clear();
        assert!(matches!(validate(&cfg), Err(ConfigError::NoWords)));

        cfg.words_file = Some("words.txt".into());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn blank_word_rejected() {
        let mut cfg = config(vec![entry(1, "Ace")]);
        cfg.words.push("   ".to_owned());
        let result = check(&cfg);
        assert!(matches!(
            result.errors[0],
            ConfigError::Invalid { ref field, .. } if field == "words[4]"
        ));
    }

    #[test]
    fn repeated_and_overlapping_words_rejected() {
        let mut cfg = config(vec![entry(1, "Ace")]);
        cfg.words = ["pear", "apple", "pear", "pineapple"].map(str::to_owned).to_vec();
        let result = check(&cfg);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            ConfigError::Invalid { ref field, ref message }
                if field == "words[2]" && message.contains("words[0]")
        ));
        assert!(matches!(
            result.errors[1],
            ConfigError::Invalid { ref field, ref message }
                if field == "words[3]" && message.contains("apple")
        ));
    }

    #[test]
    fn fewer_inline_words_than_players_rejected() {
        let mut cfg = config(vec![entry(1, "Ace"), entry(2, "Bee")]);
        cfg.words = vec!["apple".to_owned()];
        assert!(matches!(
            validate(&cfg),
            Err(ConfigError::Invalid { ref field, .. }) if field == "words"
        ));

        // A word file may supply the rest.
        cfg.words_file = Some("words.txt".into());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn all_problems_collected() {
        let mut cfg = config(vec![]);
        cfg.words.clear();
        cfg.attack_delay = AttackDelay::Fixed {
            fixed: "later".to_owned(),
        };
        assert_eq!(check(&cfg).errors.len(), 3);
    }
}
