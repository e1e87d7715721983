//! Event feed for observing database activity.
//!
//! The feed distributes coarse notifications: data changed, a data
//! migration began, a data migration finished. Events carry no payload;
//! observers re-query for whatever detail they need.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strata_core::Database;
//!
//! let db = Database::open_in_memory()?;
//! let receiver = db.events().subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(event) = receiver.recv() {
//!         println!("database event: {:?}", event);
//!     }
//! });
//! ```

use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// A coarse database notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEvent {
    /// A write path committed successfully.
    DataChanged,
    /// A data migration is about to start.
    MigrationBegan,
    /// A data migration ended, whether it committed or rolled back.
    MigrationFinished,
}

/// Distributes [`DatabaseEvent`]s to subscribers.
///
/// Emission is fire-and-forget; subscribers whose receiver has been
/// dropped are pruned on the next emit. Thread-safe.
#[derive(Debug, Default)]
pub struct EventFeed {
    subscribers: RwLock<Vec<Sender<DatabaseEvent>>>,
}

impl EventFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that sees all future events. The receiver
    /// should be polled regularly to avoid unbounded channel growth.
    pub fn subscribe(&self) -> Receiver<DatabaseEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to all live subscribers.
    pub fn emit(&self, event: DatabaseEvent) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Number of live subscribers, as of the last emit.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
