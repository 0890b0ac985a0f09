//! Change feed.
//!
//! Every committed write publishes a coarse change event naming the scope
//! and record kind that moved. Subscribers re-list the affected
//! collection instead of applying deltas, so a lagged receiver that
//! missed events still converges on the next snapshot.

use tokio::sync::broadcast;

use crate::Scope;

const FEED_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
    Budget,
    Category,
    Membership,
    Invitation,
    Profile,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub scope: Scope,
    pub kind: RecordKind,
}

#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<Change>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.sender.subscribe()
    }

    /// Fire-and-forget: a feed with no subscribers drops the event.
    pub fn publish(&self, scope: Scope, kind: RecordKind) {
        let _ = self.sender.send(Change { scope, kind });
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let feed = ChangeFeed::new();
        let mut receiver = feed.subscribe();

        feed.publish(Scope::Personal("u-1".to_string()), RecordKind::Expense);
        let change = receiver.recv().await.unwrap();
        assert_eq!(change.kind, RecordKind::Expense);
        assert_eq!(change.scope, Scope::Personal("u-1".to_string()));
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let feed = ChangeFeed::new();
        feed.publish(Scope::Group("g-1".to_string()), RecordKind::Budget);
    }
}
