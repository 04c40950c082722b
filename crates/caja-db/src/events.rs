//! # Change Notifications
//!
//! Repositories announce successful writes on a broadcast channel so UI
//! layers can re-read and re-render. Consumers hold a receiver, repos hold
//! the sender; the core logic itself never subscribes, it always works on
//! snapshots passed in explicitly.
//!
//! A notification carries no payload: it only says "this store changed,
//! fetch a fresh snapshot". Slow receivers that lag past the channel
//! capacity miss events and simply refresh on the next one, which is safe
//! because every read is a full snapshot.

use tokio::sync::broadcast;

/// Which store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Products were inserted or stock changed.
    Inventory,
    /// Ledger rows were appended or deleted.
    Ledger,
}

/// Shared broadcast sender for change events.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    /// Creates a notifier with a small buffered channel.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        ChangeNotifier { sender }
    }

    /// Subscribes to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Announces a change. Having no subscribers is not an error.
    pub fn notify(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(ChangeEvent::Inventory);
        notifier.notify(ChangeEvent::Ledger);

        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::Inventory);
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::Ledger);
    }

    #[test]
    fn test_notify_without_subscribers_is_fine() {
        let notifier = ChangeNotifier::new();
        notifier.notify(ChangeEvent::Ledger);
    }
}
