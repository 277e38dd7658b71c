//! Tag-invalidated cache for rendered read payloads.
//!
//! Entries carry a set of tags; a write invalidates only the tags it
//! affects (e.g. `categories`, `navigation:admin_navigation`) instead of
//! flushing everything. Expired entries are dropped when they are read.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;

/// Tag attached to every cached category payload.
pub const CATEGORIES_TAG: &str = "categories";

/// Tag for navigation payloads rendered for `location`.
pub fn navigation_tag(location: &str) -> String {
    format!("navigation:{location}")
}

struct CacheEntry {
    value: Value,
    tags: HashSet<String>,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped on every invalidation of a tag.
    generations: HashMap<String, u64>,
}

impl CacheState {
    fn generation(&self, tag: &str) -> u64 {
        self.generations.get(tag).copied().unwrap_or(0)
    }
}

/// Tag generations observed before a payload was loaded from the database.
///
/// Take one with [`TaggedCache::ticket`] before the read and hand it to
/// [`TaggedCache::insert`]; the insert is dropped if any of its tags was
/// invalidated in between, since the payload may predate that write.
#[derive(Debug, Clone)]
pub struct CacheTicket {
    tags: Vec<(String, u64)>,
}

/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct TaggedCache {
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl TaggedCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Return a live entry, evicting it if it has expired.
    pub async fn get(&self, key: &str) -> Option<Value> {
        {
            let state = self.state.read().await;
            match state.entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut state = self.state.write().await;
        if state
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            state.entries.remove(key);
        }
        None
    }

    /// Record the current generation of `tags` ahead of a database read.
    pub async fn ticket(&self, tags: &[&str]) -> CacheTicket {
        let state = self.state.read().await;
        CacheTicket {
            tags: tags
                .iter()
                .map(|tag| (tag.to_string(), state.generation(tag)))
                .collect(),
        }
    }

    /// Store `value` under `key` with the ticket's tags, replacing any
    /// previous entry.
    ///
    /// Returns `false` without storing if one of the tags was invalidated
    /// after the ticket was taken.
    pub async fn insert(&self, key: impl Into<String>, ticket: CacheTicket, value: Value) -> bool {
        let mut state = self.state.write().await;
        if ticket
            .tags
            .iter()
            .any(|(tag, seen)| state.generation(tag) != *seen)
        {
            tracing::debug!("Stale cache payload discarded");
            return false;
        }

        let entry = CacheEntry {
            value,
            tags: ticket.tags.into_iter().map(|(tag, _)| tag).collect(),
            expires_at: Instant::now() + self.ttl,
        };
        state.entries.insert(key.into(), entry);
        true
    }

    /// Drop every entry carrying `tag`. Returns the number removed.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut state = self.state.write().await;
        *state.generations.entry(tag.to_string()).or_insert(0) += 1;

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.tags.contains(tag));
        let removed = before - state.entries.len();
        if removed > 0 {
            tracing::debug!(tag, removed, "Cache entries invalidated");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet read.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
