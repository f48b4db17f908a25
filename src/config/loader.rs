//! Configuration loading
//!
//! Reads a game file, expands environment references in the raw text,
//! parses it with `serde_yaml`, and resolves `words_file` against the
//! config file's directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::schema::GameConfig;
use super::validation::validate;

/// Loads, resolves, and validates a game configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read,
/// [`ConfigError::Parse`] on malformed YAML, and any validation error
/// from [`validate`].
pub fn load(path: &Path) -> Result<GameConfig, ConfigError> {
    let config = load_unvalidated(path)?;
    validate(&config)?;
    Ok(config)
}

/// Loads and resolves a configuration file without validating it.
///
/// # Errors
///
/// As [`load`], minus validation errors.
pub fn load_unvalidated(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse(&raw, path)?;
    if let Some(words_file) = config.words_file.take() {
        config.words_file = Some(resolve_relative(path, words_file));
    }
    tracing::debug!(config = %path.display(), players = config.players.len(), "configuration loaded");
    Ok(config)
}

/// Parses configuration text. `source` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on malformed YAML and
/// [`ConfigError::EnvVarNotSet`] for an unset `${VAR:?message}`.
pub fn parse(raw: &str, source: &Path) -> Result<GameConfig, ConfigError> {
    let expanded = substitute_env(raw, source)?;
    serde_yaml::from_str(&expanded).map_err(|e| ConfigError::Parse {
        path: source.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

fn resolve_relative(config_path: &Path, file: PathBuf) -> PathBuf {
    if file.is_absolute() {
        return file;
    }
    config_path
        .parent()
        .map_or_else(|| file.clone(), |dir| dir.join(&file))
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Expands environment references in raw YAML before parsing.
///
/// - `${VAR}` expands to the value, or to nothing (with a warning) if unset
/// - `${VAR:-default}` expands to `default` if unset
/// - `${VAR:?message}` fails if unset
/// - `$$` is a literal `$`
fn substitute_env(raw: &str, source: &Path) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(body) = after.strip_prefix('{') {
            let end = body.find('}').ok_or_else(|| ConfigError::Parse {
                path: source.to_path_buf(),
                line: Some(raw[..raw.len() - rest.len() + pos].matches('\n').count() + 1),
                message: "unclosed environment variable reference".to_owned(),
            })?;
            out.push_str(&expand_reference(&body[..end], source)?);
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn expand_reference(spec: &str, source: &Path) -> Result<String, ConfigError> {
    let (var, fallback) = match spec.split_once(':') {
        Some((var, modifier)) => (var, Some(modifier)),
        None => (spec, None),
    };
    if let Ok(value) = std::env::var(var) {
        return Ok(value);
    }
    if let Some(default) = fallback.and_then(|m| m.strip_prefix('-')) {
        return Ok(default.to_owned());
    }
    match fallback.and_then(|m| m.strip_prefix('?')) {
        Some(message) => Err(ConfigError::EnvVarNotSet {
            var: var.to_owned(),
            message: message.to_owned(),
        }),
        None => {
            tracing::warn!(
                var,
                config = %source.display(),
                "environment variable is not set, using empty string"
            );
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::model::PlayerId;

    fn src() -> &'static Path {
        Path::new("test.yaml")
    }

    #[test]
    fn env_substitution_simple() {
        let expected = std::env::var("PATH").unwrap_or_default();
        let out = substitute_env("path: ${PATH}", src()).unwrap();
        assert_eq!(out, format!("path: {expected}"));
    }

    #[test]
    fn env_substitution_default() {
        let out = substitute_env("delay: ${KILLWORD_TEST_UNSET_A:-5s}", src()).unwrap();
        assert_eq!(out, "delay: 5s");
    }

    #[test]
    fn env_substitution_required_missing() {
        let err = substitute_env("x: ${KILLWORD_TEST_UNSET_B:?set me}", src()).unwrap_err();
        assert!(
            matches!(err, ConfigError::EnvVarNotSet { ref var, ref message }
                if var == "KILLWORD_TEST_UNSET_B" && message == "set me")
        );
    }

    #[test]
    fn env_substitution_escaped_and_bare_dollar() {
        let out = substitute_env("a: $$HOME\nb: cost $5", src()).unwrap();
        assert_eq!(out, "a: $HOME\nb: cost $5");
    }

    #[test]
    fn env_substitution_unclosed() {
        let err = substitute_env("a: 1\nb: ${NOPE", src()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: Some(2), .. }));
    }

    #[test]
    fn parse_error_reports_line() {
        let err = parse("players:\n  - id: [\n", src()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: Some(_), .. }));
    }

    #[test]
    fn load_resolves_words_file_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "players:\n  - {{ id: 1, name: Ace }}\n  - {{ id: 2, name: Bee }}\nwords_file: words.txt"
        )
        .unwrap();
        std::fs::write(dir.path().join("words.txt"), "apple banana").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.words_file, Some(dir.path().join("words.txt")));
        assert_eq!(config.players[1].id, PlayerId(2));
    }

    #[test]
    fn load_missing_file() {
        let err = load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
