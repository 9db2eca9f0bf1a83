//! Per-session conversation contexts.
//!
//! Each session id maps to its own [`ConversationContext`] behind an async
//! mutex: turns on one session are strictly serialized, turns on different
//! sessions run independently. Sessions are created on first use, dropped
//! after `idle_ttl` without activity, and the least recently used session is
//! evicted when the store is full.
//!
//! A session whose context is still held by a request (running a turn or
//! queued on the lock) is never evicted. When every session is busy the store
//! grows past `max_sessions` until one goes idle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use carelens_core::models::conversation::ConversationContext;

pub type SharedContext = Arc<tokio::sync::Mutex<ConversationContext>>;

/// Longest accepted client-supplied session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

struct Entry {
    context: SharedContext,
    last_used: Timestamp,
}

impl Entry {
    /// Some request still holds a handle besides the store's own.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.context) > 1
    }
}

pub struct SessionStore {
    entries: Mutex<HashMap<String, Entry>>,
    window_size: usize,
    max_sessions: usize,
    idle_ttl: SignedDuration,
}

impl SessionStore {
    /// `window_size` must already be validated (>= 1).
    pub fn new(window_size: usize, max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window_size: window_size.max(1),
            max_sessions: max_sessions.max(1),
            idle_ttl: SignedDuration::try_from(idle_ttl).unwrap_or(SignedDuration::MAX),
        }
    }

    /// The context for `id`, created on first use. Marks the session active.
    pub fn acquire(&self, id: &str) -> SharedContext {
        self.acquire_at(id, Timestamp::now())
    }

    pub fn acquire_at(&self, id: &str, now: Timestamp) -> SharedContext {
        let mut entries = self.lock();

        if let Some(entry) = entries.get_mut(id) {
            entry.last_used = now;
            return Arc::clone(&entry.context);
        }

        if entries.len() >= self.max_sessions {
            let oldest = entries
                .iter()
                .filter(|(_, entry)| !entry.in_use())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                    info!(session_id = %key, "evicted least recently used session");
                }
                None => warn!(
                    sessions = entries.len(),
                    max_sessions = self.max_sessions,
                    "all sessions busy, exceeding session cap"
                ),
            }
        }

        let context = Arc::new(tokio::sync::Mutex::new(self.fresh_context()));
        entries.insert(
            id.to_string(),
            Entry {
                context: Arc::clone(&context),
                last_used: now,
            },
        );
        context
    }

    /// End a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Drop every session idle for longer than the TTL and not held by a
    /// request. Returns the count.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Timestamp::now())
    }

    pub fn evict_idle_at(&self, now: Timestamp) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| {
            entry.in_use() || now.duration_since(entry.last_used) <= self.idle_ttl
        });
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn fresh_context(&self) -> ConversationContext {
        ConversationContext::with_window(self.window_size).unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // The map holds no invariant a panicking holder could break.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client-supplied ids must be short and URL-safe.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Periodically evict idle sessions until the returned handle is aborted.
pub fn spawn_sweeper(store: Arc<SessionStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle();
            if evicted > 0 {
                info!(evicted, remaining = store.len(), "idle sessions swept");
            }
        }
    })
}
