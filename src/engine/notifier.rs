//! Outbound messages from the engine.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::model::Player;

/// Delivers public announcements and private notices.
///
/// The engine awaits each call but treats delivery as fire-and-forget:
/// retries and backoff belong in the implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Broadcasts `text` to every participant.
    async fn announce(&self, text: &str);

    /// Sends `text` to `player` alone.
    async fn notify(&self, player: &Player, text: &str);
}

/// A message produced by [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Public announcement.
    Announcement(String),
    /// Private notice, with a snapshot of the recipient at send time.
    Private { player: Player, text: String },
}

/// Forwards every message into an unbounded channel.
///
/// Lets a transport drain notices at its own pace without ever blocking
/// the game loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver its notices arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn announce(&self, text: &str) {
        let _ = self.tx.send(Notice::Announcement(text.to_owned()));
    }

    async fn notify(&self, player: &Player, text: &str) {
        let _ = self.tx.send(Notice::Private {
            player: player.clone(),
            text: text.to_owned(),
        });
    }
}
