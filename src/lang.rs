//! Localised message templates.
//!
//! Templates use `{}` placeholders filled positionally by [`Lang::fmt`].
//! The engine only decides which template applies and what goes into it.

use serde::{Deserialize, Serialize};

/// The full set of player-facing strings.
///
/// Deserialising a partial set fills the gaps from [`Lang::en`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Lang {
    /// Error returned when a game is already running.
    pub in_progress: String,
    /// Public: the game has started.
    pub game_start: String,
    /// Public: the game has ended.
    pub game_end: String,
    /// Public: `{}` is the sole survivor.
    pub winner: String,
    /// Public: `{}` is the list of survivors.
    pub survivors: String,
    /// Public: `{}` has been eliminated.
    pub eliminated: String,
    /// Private: alive with no target.
    pub status_alive: String,
    /// Private: you are dead.
    pub status_dead: String,
    /// Private: target name `{}` and kill word `{}`.
    pub status_target: String,
    /// Private: your delayed attack landed.
    pub attack_success: String,
    /// Private: your counter landed.
    pub counter_success: String,
}

impl Lang {
    /// English templates.
    #[must_use]
    pub fn en() -> Self {
        Self {
            in_progress: "Game already in progress".to_owned(),
            game_start: "The game has begun.".to_owned(),
            game_end: "The game has ended.".to_owned(),
            winner: "{} wins.".to_owned(),
            survivors: "Surviving this time: {}.".to_owned(),
            eliminated: "{} has been assassinated.".to_owned(),
            status_alive: "You are alive.".to_owned(),
            status_dead: "You have been assassinated.".to_owned(),
            status_target: "Your target is {}. Your KillWord is {}.".to_owned(),
            attack_success: "Your attack was successful.".to_owned(),
            counter_success: "Your counterattack was successful.".to_owned(),
        }
    }

    /// Substitutes `args` into the `{}` placeholders of `template`, in order.
    ///
    /// Surplus placeholders are left as-is; surplus arguments are dropped.
    #[must_use]
    pub fn fmt(template: &str, args: &[&str]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(arg),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::en()
    }
}
