//! Shared integration-test harness: builds games with predictable names
//! and words, runs them on a [`GameEngine`], and tracks what each player
//! has been told.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use killword::engine::{
    ChannelNotifier, DelayProvider, EngineOptions, GameEngine, GameReport, Notice,
};
use killword::error::EngineError;
use killword::lang::Lang;
use killword::model::{Game, PlayerId};
use killword::observability::EventEmitter;
use killword::words::WordList;

/// Default timeout for waiting on a single notice.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Name of player `n`.
pub fn name(n: u64) -> String {
    format!("p{n}")
}

/// Inverse of [`name`].
pub fn id_of(name: &str) -> PlayerId {
    PlayerId(name.trim_start_matches('p').parse().expect("player name"))
}

/// A game of `n` players named `p1..pn` over words `kw00..kw63`.
///
/// All words have the same length, so none is a substring of another.
pub fn game(id: u64, n: u64) -> Game {
    let words = WordList::new((0..64).map(|i| format!("kw{i:02}"))).expect("words");
    Game::new(id, (1..=n).map(|i| (PlayerId(i), name(i))), words)
}

/// Path to a file under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A delay that returns only when the test says so.
pub struct TriggeredDelay {
    rx: Mutex<mpsc::UnboundedReceiver<()>>,
}

impl TriggeredDelay {
    /// Creates the delay and the handle that releases one waiting attack
    /// per message.
    pub fn new() -> (Self, mpsc::UnboundedSender<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx: Mutex::new(rx) }, tx)
    }
}

#[async_trait]
impl DelayProvider for TriggeredDelay {
    async fn delay(&self) -> Duration {
        let _ = self.rx.lock().await.recv().await;
        Duration::ZERO
    }
}

/// Hands out the given delays in call order, then zero.
pub struct ScriptedDelay(std::sync::Mutex<VecDeque<Duration>>);

impl ScriptedDelay {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self(std::sync::Mutex::new(delays.into_iter().collect()))
    }
}

#[async_trait]
impl DelayProvider for ScriptedDelay {
    async fn delay(&self) -> Duration {
        self.0
            .lock()
            .expect("delay script poisoned")
            .pop_front()
            .unwrap_or_default()
    }
}

/// Everything the players have been told so far.
pub struct Table {
    notices: mpsc::UnboundedReceiver<Notice>,
    /// Everything received, in order.
    pub log: Vec<Notice>,
    /// Player name to current target name.
    pub targets: HashMap<String, String>,
    /// Player name to current kill word.
    pub words: HashMap<String, String>,
}

impl Table {
    /// Receives the next notice and applies any status it carries.
    pub async fn next(&mut self) -> Notice {
        let notice = tokio::time::timeout(DEFAULT_TIMEOUT, self.notices.recv())
            .await
            .expect("timed out waiting for a notice")
            .expect("notice channel closed");
        if let Notice::Private { player, text } = &notice {
            let who = player.name().to_owned();
            if let Some((target, word)) = parse_status(text) {
                self.targets.insert(who.clone(), target);
                self.words.insert(who, word);
            } else if *text == Lang::en().status_alive || *text == Lang::en().status_dead {
                self.targets.remove(&who);
                self.words.remove(&who);
            }
        }
        self.log.push(notice.clone());
        notice
    }

    /// Applies every notice already queued without waiting for more.
    pub fn drain_pending(&mut self) -> Vec<Notice> {
        let mut drained = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            self.log.push(notice.clone());
            drained.push(notice);
        }
        drained
    }

    /// Receives until a notice matches `pred`.
    pub async fn wait_for(&mut self, pred: impl Fn(&Notice) -> bool) -> Notice {
        loop {
            let notice = self.next().await;
            if pred(&notice) {
                return notice;
            }
        }
    }

    /// Receives until the announcement `text`.
    pub async fn announcement(&mut self, text: &str) {
        self.wait_for(|n| matches!(n, Notice::Announcement(t) if t == text))
            .await;
    }

    /// Receives until `who` is privately told `text`.
    pub async fn private(&mut self, who: &str, text: &str) {
        self.wait_for(|n| {
            matches!(n, Notice::Private { player, text: t } if player.name() == who && t == text)
        })
        .await;
    }

    /// Receives until `who` gets any private notice; returns its text.
    pub async fn any_private(&mut self, who: &str) -> String {
        let notice = self
            .wait_for(|n| matches!(n, Notice::Private { player, .. } if player.name() == who))
            .await;
        match notice {
            Notice::Private { text, .. } => text,
            Notice::Announcement(text) => text,
        }
    }

    /// Receives the start announcement and one status per player.
    pub async fn ring(&mut self, players: usize) {
        self.announcement(&Lang::en().game_start).await;
        for _ in 0..players {
            self.wait_for(|n| matches!(n, Notice::Private { .. })).await;
        }
    }

    /// Who currently holds the contract on `name`.
    pub fn holder_of(&self, name: &str) -> String {
        self.targets
            .iter()
            .find(|(_, t)| t.as_str() == name)
            .map(|(h, _)| h.clone())
            .expect("no holder")
    }

    pub fn target_of(&self, name: &str) -> String {
        self.targets.get(name).cloned().expect("no target")
    }

    pub fn word_of(&self, name: &str) -> String {
        self.words.get(name).cloned().expect("no word")
    }

    /// Announcements received so far.
    pub fn announcements(&self) -> Vec<String> {
        self.log
            .iter()
            .filter_map(|n| match n {
                Notice::Announcement(t) => Some(t.clone()),
                Notice::Private { .. } => None,
            })
            .collect()
    }
}

/// Splits `"Your target is X. Your KillWord is Y."`.
pub fn parse_status(text: &str) -> Option<(String, String)> {
    let (target, word) = text
        .strip_prefix("Your target is ")?
        .strip_suffix('.')?
        .split_once(". Your KillWord is ")?;
    Some((target.to_owned(), word.to_owned()))
}

/// An engine with English templates and the given delay.
pub fn engine(delay: Arc<dyn DelayProvider>) -> (Arc<GameEngine>, Table) {
    engine_with_events(delay, None)
}

/// [`engine`] with an event sink.
pub fn engine_with_events(
    delay: Arc<dyn DelayProvider>,
    events: Option<EventEmitter>,
) -> (Arc<GameEngine>, Table) {
    let (notifier, notices) = ChannelNotifier::new();
    let engine = GameEngine::new(EngineOptions {
        lang: Lang::en(),
        notifier: Arc::new(notifier),
        delay,
        events,
    });
    let table = Table {
        notices,
        log: Vec::new(),
        targets: HashMap::new(),
        words: HashMap::new(),
    };
    (Arc::new(engine), table)
}

/// Runs `game` on a background task.
pub fn spawn_run(
    engine: &Arc<GameEngine>,
    game: Game,
) -> JoinHandle<Result<GameReport, EngineError>> {
    let engine = Arc::clone(engine);
    tokio::spawn(async move { engine.run(game).await })
}

/// Awaits a spawned run.
pub async fn finished(handle: JoinHandle<Result<GameReport, EngineError>>) -> GameReport {
    tokio::time::timeout(DEFAULT_TIMEOUT, handle)
        .await
        .expect("game did not finish")
        .expect("run task panicked")
        .expect("run failed")
}

/// Says `text` as player `who`.
pub async fn say(engine: &GameEngine, who: &str, text: &str) {
    tokio::time::timeout(DEFAULT_TIMEOUT, engine.submit(id_of(who), text))
        .await
        .expect("utterance not accepted");
}

/// `"{who} has been assassinated."`
pub fn eliminated(who: &str) -> String {
    Lang::fmt(&Lang::en().eliminated, &[who])
}

/// `"{who} wins."`
pub fn winner(who: &str) -> String {
    Lang::fmt(&Lang::en().winner, &[who])
}
