//! The game loop.
//!
//! [`GameEngine::run`] is the only code path that mutates a [`Game`] once
//! it is handed over. Utterances and timer completions reach it through
//! two channels multiplexed with `tokio::select!`; timer tasks never touch
//! game state, they only post a completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::error::EngineError;
use crate::lang::Lang;
use crate::model::{Elimination, Game, Player, PlayerId};
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics::{self, EliminationCause};

use super::delay::DelayProvider;
use super::notifier::Notifier;
use super::tracker::PendingAttacks;

/// Lifecycle of a [`GameEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No game has been run yet.
    Idle,
    /// A game loop is active.
    Running,
    /// The last game finished; the engine can run another.
    Ended,
}

/// Options for constructing a [`GameEngine`].
pub struct EngineOptions {
    /// Player-facing templates.
    pub lang: Lang,
    /// Where announcements and private notices go.
    pub notifier: Arc<dyn Notifier>,
    /// How long each attack waits before it resolves.
    pub delay: Arc<dyn DelayProvider>,
    /// Optional JSONL event sink.
    pub events: Option<EventEmitter>,
}

/// How a game ended.
#[derive(Debug)]
pub struct GameReport {
    /// The game in its final state.
    pub game: Game,
    /// Names of the players still alive.
    pub survivors: Vec<String>,
    /// Whether the loop was stopped by [`GameEngine::quit`].
    pub quit: bool,
}

struct Utterance {
    from: PlayerId,
    text: String,
    ack: oneshot::Sender<()>,
}

/// Loop-bound events. `generation` ties each to the run that produced it
/// so nothing left over from a finished game leaks into the next one.
#[derive(Debug, Clone, Copy)]
enum Action {
    Quit { generation: u64 },
    AttackResolved { generation: u64 },
}

/// State owned by one run of the loop.
struct Run {
    game: Game,
    attacks: PendingAttacks,
    remaining: usize,
    generation: u64,
    quit: bool,
    /// Fires once the most recently spawned attack timer has posted its
    /// completion.
    last_timer: Option<oneshot::Receiver<()>>,
}

/// Runs games one at a time.
///
/// Share it behind an `Arc`: one task calls [`run`](Self::run) while
/// transports call [`submit`](Self::submit) concurrently.
pub struct GameEngine {
    lang: Lang,
    notifier: Arc<dyn Notifier>,
    delay: Arc<dyn DelayProvider>,
    events: Option<EventEmitter>,
    /// Odd while a game runs. The value during a run is that run's
    /// generation; it only ever grows, so generations never repeat.
    epoch: AtomicU64,
    started: watch::Sender<bool>,
    talk_tx: mpsc::Sender<Utterance>,
    talk_rx: Mutex<mpsc::Receiver<Utterance>>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: Mutex<mpsc::UnboundedReceiver<Action>>,
}

/// Moves the epoch back to even when a run finishes, errors, or is dropped.
struct RunningGuard<'a>(&'a AtomicU64);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

const fn is_running(epoch: u64) -> bool {
    epoch % 2 == 1
}

impl GameEngine {
    #[must_use]
    pub fn new(opts: EngineOptions) -> Self {
        let (talk_tx, talk_rx) = mpsc::channel(1);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            lang: opts.lang,
            notifier: opts.notifier,
            delay: opts.delay,
            events: opts.events,
            epoch: AtomicU64::new(0),
            started: watch::Sender::new(false),
            talk_tx,
            talk_rx: Mutex::new(talk_rx),
            action_tx,
            action_rx: Mutex::new(action_rx),
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        let epoch = self.epoch.load(Ordering::SeqCst);
        if is_running(epoch) {
            EngineState::Running
        } else if epoch == 0 {
            EngineState::Idle
        } else {
            EngineState::Ended
        }
    }

    /// Hands an utterance to the running game.
    ///
    /// Returns once the loop has taken it, so each caller has at most one
    /// utterance in flight. With no game running this waits for the next
    /// one to start.
    pub async fn submit(&self, from: PlayerId, text: impl Into<String>) {
        let (ack, accepted) = oneshot::channel();
        let utterance = Utterance {
            from,
            text: text.into(),
            ack,
        };
        if self.talk_tx.send(utterance).await.is_ok() {
            let _ = accepted.await;
        }
    }

    /// Resolves once a game has started on this engine, immediately if
    /// one already has.
    pub async fn wait_started(&self) {
        let mut started = self.started.subscribe();
        let _ = started.wait_for(|s| *s).await;
    }

    /// Stops the running game at the next loop turn. Does nothing when
    /// no game is running.
    pub fn quit(&self) {
        let generation = self.epoch.load(Ordering::SeqCst);
        if is_running(generation) {
            let _ = self.action_tx.send(Action::Quit { generation });
        }
    }

    /// Plays `game` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameInProgress`] if another game is running
    /// on this engine, and [`EngineError::Model`] if the game cannot be
    /// started (it has been played before).
    pub async fn run(&self, mut game: Game) -> Result<GameReport, EngineError> {
        let idle = self.epoch.load(Ordering::SeqCst);
        if is_running(idle)
            || self
                .epoch
                .compare_exchange(idle, idle + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            return Err(EngineError::GameInProgress(self.lang.in_progress.clone()));
        }
        let _guard = RunningGuard(&self.epoch);
        let generation = idle + 1;
        self.started.send_replace(true);

        let mut talk_rx = self.talk_rx.lock().await;
        let mut action_rx = self.action_rx.lock().await;

        self.notifier.announce(&self.lang.game_start).await;
        game.start()?;
        for player in game.players() {
            self.notify_status(&game, player).await;
        }

        let remaining = game.alive_count();
        info!(game = game.id(), players = remaining, "game started");
        metrics::record_game_started();
        metrics::set_players_alive(remaining);
        self.emit(Event::GameStarted {
            timestamp: Utc::now(),
            game_id: game.id(),
            players: game.len(),
        });

        let mut run = Run {
            game,
            attacks: PendingAttacks::new(),
            remaining,
            generation,
            quit: false,
            last_timer: None,
        };

        while run.remaining > 1 {
            tokio::select! {
                Some(utterance) = talk_rx.recv() => {
                    // A caller that gave up waiting never handed this over.
                    if utterance.ack.send(()).is_err() {
                        debug!(player = %utterance.from, "submitter gone, dropping utterance");
                        continue;
                    }
                    self.on_utterance(&mut run, utterance.from, &utterance.text).await;
                }
                Some(action) = action_rx.recv() => {
                    self.on_action(&mut run, action).await;
                }
                else => break,
            }
        }

        self.finish(run).await
    }

    async fn on_utterance(&self, run: &mut Run, from: PlayerId, text: &str) {
        let Some(speaker) = run.game.player(from).filter(|p| p.is_alive()) else {
            debug!(player = %from, "utterance from unknown or dead player ignored");
            return;
        };
        let own_phrase = speaker.phrase().to_owned();
        let target = speaker.target();
        let holder_phrase = speaker
            .assigned_by()
            .and_then(|h| run.game.player(h))
            .filter(|h| h.is_alive())
            .map(|h| h.phrase().to_owned());

        if holder_phrase.is_some_and(|p| !p.is_empty() && text.contains(&p)) {
            match run.game.resolve_assassination(from) {
                Some(elimination) => {
                    self.eliminated(run, elimination, EliminationCause::Assassination)
                        .await;
                }
                None => metrics::record_stale_action(),
            }
            return;
        }

        if own_phrase.is_empty() || !text.contains(&own_phrase) {
            return;
        }

        if run.attacks.scan_for_retaliation(from) {
            info!(player = %from, "attack countered");
            metrics::record_counter();
            self.emit(Event::AttackCountered {
                timestamp: Utc::now(),
                victim: from,
            });
        } else if let Some(victim) = target {
            info!(attacker = %from, %victim, "attack launched");
            run.attacks.push(from, victim);
            self.spawn_attack_timer(run);
            metrics::record_attack();
            self.emit(Event::AttackLaunched {
                timestamp: Utc::now(),
                attacker: from,
                victim,
            });
        }
    }

    /// Each timer waits out its own delay and then for the previous timer,
    /// so completions arrive in push order and line up with the FIFO pop.
    /// An attack never resolves before its own window closes, whatever the
    /// provider hands out.
    fn spawn_attack_timer(&self, run: &mut Run) {
        let delay = Arc::clone(&self.delay);
        let tx = self.action_tx.clone();
        let generation = run.generation;
        let (fired_tx, fired_rx) = oneshot::channel();
        let previous = run.last_timer.replace(fired_rx);
        tokio::spawn(async move {
            let wait = delay.delay().await;
            tokio::time::sleep(wait).await;
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let _ = tx.send(Action::AttackResolved { generation });
            let _ = fired_tx.send(());
        });
    }

    async fn on_action(&self, run: &mut Run, action: Action) {
        match action {
            Action::Quit { generation } if generation == run.generation => {
                info!(game = run.game.id(), "quit requested");
                run.quit = true;
                run.remaining = 0;
            }
            Action::AttackResolved { generation } if generation == run.generation => {
                let Some(attack) = run.attacks.pop() else {
                    debug!("attack timer fired with no pending attack");
                    return;
                };
                if attack.retaliated {
                    match run.game.resolve_counter(attack.victim, attack.attacker) {
                        Some(elimination) => {
                            if let Some(victim) = run.game.player(attack.victim) {
                                self.notifier
                                    .notify(victim, &self.lang.counter_success)
                                    .await;
                            }
                            self.eliminated(run, elimination, EliminationCause::Counter)
                                .await;
                        }
                        None => {
                            debug!(attacker = %attack.attacker, victim = %attack.victim, "stale counter dropped");
                            metrics::record_stale_action();
                        }
                    }
                } else {
                    match run.game.resolve_attack(attack.attacker, attack.victim) {
                        Some(elimination) => {
                            if let Some(attacker) = run.game.player(attack.attacker) {
                                self.notifier
                                    .notify(attacker, &self.lang.attack_success)
                                    .await;
                            }
                            self.eliminated(run, elimination, EliminationCause::Attack)
                                .await;
                        }
                        None => {
                            debug!(attacker = %attack.attacker, victim = %attack.victim, "stale attack dropped");
                            metrics::record_stale_action();
                        }
                    }
                }
            }
            Action::Quit { .. } | Action::AttackResolved { .. } => {
                debug!(?action, "action from a previous game ignored");
            }
        }
    }

    /// Announces a death, brings the inheriting assigner up to date, and
    /// counts the player out.
    async fn eliminated(&self, run: &mut Run, elimination: Elimination, cause: EliminationCause) {
        let victim = &elimination.victim;
        info!(player = %victim.id(), name = victim.name(), cause = cause.as_str(), "player eliminated");

        self.notifier
            .announce(&Lang::fmt(&self.lang.eliminated, &[victim.name()]))
            .await;
        if let Some(successor) = elimination
            .successor
            .and_then(|s| run.game.player(s))
            .filter(|p| p.is_alive())
        {
            self.notify_status(&run.game, successor).await;
        }
        run.remaining = run.remaining.saturating_sub(1);

        metrics::record_elimination(cause);
        metrics::set_players_alive(run.remaining);
        self.emit(Event::PlayerEliminated {
            timestamp: Utc::now(),
            player: victim.id(),
            name: victim.name().to_owned(),
            cause,
            successor: elimination.successor,
        });
    }

    async fn finish(&self, run: Run) -> Result<GameReport, EngineError> {
        self.notifier.announce(&self.lang.game_end).await;

        let survivors = run.game.alive_names();
        if let [winner] = survivors.as_slice() {
            self.notifier
                .announce(&Lang::fmt(&self.lang.winner, &[winner.as_str()]))
                .await;
        } else {
            let names = survivors.join(", ");
            self.notifier
                .announce(&Lang::fmt(&self.lang.survivors, &[names.as_str()]))
                .await;
        }

        info!(game = run.game.id(), survivors = ?survivors, quit = run.quit, "game ended");
        self.emit(Event::GameEnded {
            timestamp: Utc::now(),
            game_id: run.game.id(),
            survivors: survivors.clone(),
            reason: if run.quit { "quit" } else { "last_standing" }.to_owned(),
        });

        Ok(GameReport {
            game: run.game,
            survivors,
            quit: run.quit,
        })
    }

    async fn notify_status(&self, game: &Game, player: &Player) {
        let text = self.status_text(game, player);
        self.notifier.notify(player, &text).await;
    }

    fn status_text(&self, game: &Game, player: &Player) -> String {
        if !player.is_alive() {
            return self.lang.status_dead.clone();
        }
        match player.target().and_then(|t| game.player(t)) {
            Some(target) => Lang::fmt(&self.lang.status_target, &[target.name(), player.phrase()]),
            None => self.lang.status_alive.clone(),
        }
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("state", &self.state())
            .field("games", &self.epoch.load(Ordering::Relaxed).div_ceil(2))
            .finish_non_exhaustive()
    }
}
