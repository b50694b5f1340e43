//! Who is typing where.
//!
//! Typing events carry an expiry. Each entry schedules its own removal on a
//! tokio task; a cancel or a newer event for the same pair aborts the old
//! timer. Expired entries are also filtered on read so a tracker used outside
//! a runtime still behaves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::trace;

use flowinity_shared::{ChatId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typer {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub expires: DateTime<Utc>,
}

struct Entry {
    typer: Typer,
    timeout: Option<JoinHandle<()>>,
}

impl Entry {
    fn is(&self, chat_id: ChatId, user_id: UserId) -> bool {
        self.typer.chat_id == chat_id && self.typer.user_id == user_id
    }
}

#[derive(Default)]
pub struct TypingTracker {
    entries: Arc<Mutex<Vec<Entry>>>,
}

fn lock(entries: &Mutex<Vec<Entry>>) -> MutexGuard<'_, Vec<Entry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user_id` is typing in `chat_id` until `expires`.
    pub fn on_typing(&self, chat_id: ChatId, user_id: UserId, expires: DateTime<Utc>) {
        let mut entries = lock(&self.entries);
        remove_pair(&mut entries, chat_id, user_id);

        let delay = (expires - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let timeout = tokio::runtime::Handle::try_current().ok().map(|handle| {
            let entries = Arc::clone(&self.entries);
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                let mut entries = lock(&entries);
                // Only drop the entry this timer was scheduled for.
                entries.retain(|entry| !(entry.is(chat_id, user_id) && entry.typer.expires == expires));
                trace!(%chat_id, %user_id, "typer expired");
            })
        });

        entries.push(Entry {
            typer: Typer {
                chat_id,
                user_id,
                expires,
            },
            timeout,
        });
    }

    pub fn on_cancel(&self, chat_id: ChatId, user_id: UserId) {
        remove_pair(&mut lock(&self.entries), chat_id, user_id);
    }

    /// Live typers in a chat, in arrival order.
    pub fn for_chat(&self, chat_id: ChatId) -> Vec<Typer> {
        let now = Utc::now();
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.typer.chat_id == chat_id && entry.typer.expires > now)
            .map(|entry| entry.typer.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_pair(entries: &mut Vec<Entry>, chat_id: ChatId, user_id: UserId) {
    entries.retain(|entry| {
        if entry.is(chat_id, user_id) {
            if let Some(timeout) = &entry.timeout {
                timeout.abort();
            }
            false
        } else {
            true
        }
    });
}

impl Drop for TypingTracker {
    fn drop(&mut self) {
        for entry in lock(&self.entries).iter() {
            if let Some(timeout) = &entry.timeout {
                timeout.abort();
            }
        }
    }
}
