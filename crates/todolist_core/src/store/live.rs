//! Push-based live query primitives.
//!
//! A `SnapshotPublisher` re-publishes the full, ordered snapshot after every
//! mutation; each `LiveQuery` yields the snapshot it was opened with and then
//! every published one. Subscribers that fall behind skip ahead to a newer
//! full snapshot instead of receiving partial data.

use log::warn;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Retained snapshots per subscriber before it is considered lagging.
pub const SNAPSHOT_BUFFER: usize = 64;

pub type Snapshot<T> = Arc<Vec<T>>;

/// Fan-out side of a live query.
#[derive(Debug)]
pub struct SnapshotPublisher<T> {
    tx: broadcast::Sender<Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> SnapshotPublisher<T> {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(SNAPSHOT_BUFFER);
        Self { tx }
    }

    /// Returns whether publishing would reach anyone.
    pub fn has_subscribers(&self) -> bool {
        self.tx.receiver_count() > 0
    }

    /// Sends a snapshot to every subscriber. No subscribers is not an error.
    pub fn publish(&self, snapshot: Vec<T>) {
        let _ = self.tx.send(Arc::new(snapshot));
    }

    /// Opens a query seeded with `current`.
    ///
    /// Callers must hold the same lock that guards publication so no
    /// mutation falls between reading `current` and subscribing.
    pub fn subscribe(&self, current: Vec<T>) -> LiveQuery<T> {
        LiveQuery {
            initial: Some(Arc::new(current)),
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SnapshotPublisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber side of a live query.
#[derive(Debug)]
pub struct LiveQuery<T> {
    initial: Option<Snapshot<T>>,
    rx: broadcast::Receiver<Snapshot<T>>,
}

impl<T: Clone> LiveQuery<T> {
    /// Waits for the next full snapshot.
    ///
    /// Returns `None` once the owning store has been dropped.
    pub async fn next(&mut self) -> Option<Snapshot<T>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.rx.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("event=live_query module=store status=lagged skipped={skipped}");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the newest snapshot already available without waiting.
    pub fn try_latest(&mut self) -> Option<Snapshot<T>> {
        let mut latest = self.initial.take();
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => latest = Some(snapshot),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return latest,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotPublisher;

    #[tokio::test]
    async fn initial_snapshot_comes_first() {
        let publisher = SnapshotPublisher::new();
        let mut query = publisher.subscribe(vec![1, 2]);
        publisher.publish(vec![3]);

        assert_eq!(*query.next().await.unwrap(), vec![1, 2]);
        assert_eq!(*query.next().await.unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn query_ends_when_publisher_is_dropped() {
        let publisher = SnapshotPublisher::<u8>::new();
        let mut query = publisher.subscribe(Vec::new());
        drop(publisher);

        assert!(query.next().await.unwrap().is_empty());
        assert!(query.next().await.is_none());
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_newer_snapshot() {
        let publisher = SnapshotPublisher::new();
        let mut query = publisher.subscribe(Vec::new());
        for value in 0..(super::SNAPSHOT_BUFFER as u32 + 10) {
            publisher.publish(vec![value]);
        }

        query.next().await.unwrap();
        let next = query.next().await.unwrap();
        assert!(next[0] >= 10);
    }

    #[test]
    fn try_latest_returns_newest_pending_snapshot() {
        let publisher = SnapshotPublisher::new();
        let mut query = publisher.subscribe(vec![0]);
        publisher.publish(vec![1]);
        publisher.publish(vec![2]);

        assert_eq!(*query.try_latest().unwrap(), vec![2]);
        assert!(query.try_latest().is_none());
    }
}
