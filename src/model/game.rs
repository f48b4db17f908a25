//! Game arena and the target ring.
//!
//! Players live in an arena keyed by [`PlayerId`]; `target` and
//! `assigned_by` are ids into it, so the cyclic graph never owns itself.
//! Every mutation goes through [`Game::assign_target`] or
//! [`Game::eliminate`], which keep the two edges inverse to each other.

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::ModelError;
use crate::words::PhraseSource;

use super::player::{Player, PlayerId};

/// Outcome of a successful resolution query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    /// The eliminated player, as it stands after the cascade.
    pub victim: Player,
    /// The assigner that inherited the victim's target, if still alive.
    pub successor: Option<PlayerId>,
}

/// One game: a fixed roster, their target ring, and the phrase source
/// that feeds new contracts.
pub struct Game {
    id: u64,
    players: IndexMap<PlayerId, Player>,
    phrases: Box<dyn PhraseSource>,
}

impl Game {
    /// Creates a game over `roster`. A repeated id replaces the earlier
    /// entry's name.
    pub fn new<I, S>(id: u64, roster: I, phrases: impl PhraseSource + 'static) -> Self
    where
        I: IntoIterator<Item = (PlayerId, S)>,
        S: Into<String>,
    {
        let players = roster
            .into_iter()
            .map(|(pid, name)| (pid, Player::new(pid, name)))
            .collect();
        Self {
            id,
            players,
            phrases: Box::new(phrases),
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Looks up a player, alive or dead.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// All players, alive and dead.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Number of players in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of players still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.alive).count()
    }

    /// Names of the surviving players, in roster order.
    #[must_use]
    pub fn alive_names(&self) -> Vec<String> {
        self.players
            .values()
            .filter(|p| p.alive)
            .map(|p| p.name.clone())
            .collect()
    }

    fn is_alive(&self, id: PlayerId) -> bool {
        self.players.get(&id).is_some_and(|p| p.alive)
    }

    /// Builds the initial ring from a random permutation of the roster.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if any player is already dead, i.e. the
    /// game has been played before.
    pub fn start(&mut self) -> Result<(), ModelError> {
        self.start_with_rng(&mut rand::rng())
    }

    /// [`Game::start`] with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// See [`Game::start`].
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), ModelError> {
        let mut order: Vec<PlayerId> = self.players.keys().copied().collect();
        order.shuffle(rng);

        // A lone player has nobody to hunt.
        if let [only] = order.as_slice() {
            return self.assign_target(*only, None);
        }

        for (i, &pid) in order.iter().enumerate() {
            let next = order[(i + 1) % order.len()];
            self.assign_target(pid, Some(next))?;
        }
        debug!(game = self.id, players = order.len(), "target ring assigned");
        Ok(())
    }

    /// Points `player` at `target`, drawing a fresh kill word, or clears
    /// the player's target and word when `target` is `None`.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is unknown or dead.
    pub fn assign_target(
        &mut self,
        player: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<(), ModelError> {
        let current = self
            .players
            .get(&player)
            .ok_or(ModelError::UnknownPlayer(player))?;
        if !current.alive {
            return Err(ModelError::PlayerDead(player));
        }
        let previous = current.target;

        if let Some(t) = target {
            let tp = self.players.get(&t).ok_or(ModelError::UnknownPlayer(t))?;
            if !tp.alive {
                return Err(ModelError::TargetDead { player, target: t });
            }
        }

        if let Some(prev) = previous {
            if let Some(pp) = self.players.get_mut(&prev) {
                if pp.assigned_by == Some(player) {
                    pp.assigned_by = None;
                }
            }
        }

        let phrase = if target.is_some() {
            self.phrases.next_phrase()
        } else {
            String::new()
        };

        if let Some(p) = self.players.get_mut(&player) {
            p.target = target;
            p.phrase = phrase;
        }
        if let Some(tp) = target.and_then(|t| self.players.get_mut(&t)) {
            tp.assigned_by = Some(player);
        }
        Ok(())
    }

    /// Marks `id` dead and hands its target to whoever held the contract
    /// on it, closing the ring over the survivors.
    ///
    /// When the dead player's target is the contract holder itself (the
    /// last two players) the holder is left without a target. Returns the
    /// holder that inherited the contract, if one is still alive.
    ///
    /// # Errors
    ///
    /// Fails if the player is unknown or already dead.
    pub fn eliminate(&mut self, id: PlayerId) -> Result<Option<PlayerId>, ModelError> {
        let victim = self
            .players
            .get_mut(&id)
            .ok_or(ModelError::UnknownPlayer(id))?;
        if !victim.alive {
            return Err(ModelError::PlayerDead(id));
        }
        victim.alive = false;
        victim.phrase.clear();
        let holder = victim.assigned_by.take();
        let next = victim.target.take();

        if let Some(np) = next.and_then(|n| self.players.get_mut(&n)) {
            if np.assigned_by == Some(id) {
                np.assigned_by = None;
            }
        }

        let Some(holder) = holder.filter(|&h| self.is_alive(h)) else {
            return Ok(None);
        };
        let inherited = next.filter(|&n| n != holder && self.is_alive(n));
        self.assign_target(holder, inherited)?;
        debug!(game = self.id, victim = %id, %holder, "contract reassigned");
        Ok(Some(holder))
    }

    fn eliminate_resolved(&mut self, victim: PlayerId) -> Option<Elimination> {
        match self.eliminate(victim) {
            Ok(successor) => Some(Elimination {
                victim: self.players.get(&victim)?.clone(),
                successor,
            }),
            Err(e) => {
                debug!(error = %e, "elimination rejected");
                None
            }
        }
    }

    /// `victim` said their assigner's kill word.
    ///
    /// Takes effect only while the victim is alive and their assigner is
    /// too; otherwise returns `None`.
    pub fn resolve_assassination(&mut self, victim: PlayerId) -> Option<Elimination> {
        let holder = self
            .players
            .get(&victim)
            .filter(|p| p.alive)?
            .assigned_by?;
        if !self.is_alive(holder) {
            return None;
        }
        self.eliminate_resolved(victim)
    }

    /// `attacker`'s delayed strike on `victim` lands.
    ///
    /// Takes effect only while both are alive and `victim` is still the
    /// attacker's target.
    pub fn resolve_attack(&mut self, attacker: PlayerId, victim: PlayerId) -> Option<Elimination> {
        let a = self.players.get(&attacker).filter(|p| p.alive)?;
        if a.target != Some(victim) || !self.is_alive(victim) {
            return None;
        }
        self.eliminate_resolved(victim)
    }

    /// `counter_actor` turned `attacker`'s strike around.
    ///
    /// Takes effect only while both are alive and `attacker` still holds
    /// the contract on the counter actor.
    pub fn resolve_counter(
        &mut self,
        counter_actor: PlayerId,
        attacker: PlayerId,
    ) -> Option<Elimination> {
        let c = self.players.get(&counter_actor).filter(|p| p.alive)?;
        if c.assigned_by != Some(attacker) || !self.is_alive(attacker) {
            return None;
        }
        self.eliminate_resolved(attacker)
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("players", &self.players.len())
            .field("alive", &self.alive_count())
            .finish_non_exhaustive()
    }
}
