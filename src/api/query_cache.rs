//! Keyed response cache with per-entry stale times.
//!
//! Keys are segment lists (`["user", "current"]`, `["users", "1", "10"]`) so
//! a whole family can be invalidated by prefix.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub type QueryKey = Vec<String>;

/// Build a [`QueryKey`] from string-like segments.
pub fn query_key<I, S>(segments: I) -> QueryKey
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    segments.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    stored_at: DateTime<Utc>,
    stale_after: TimeDelta,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at < self.stale_after
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set<T: Serialize>(&mut self, key: QueryKey, value: &T, stale_time: TimeDelta) {
        self.set_at(key, value, stale_time, Utc::now());
    }

    pub fn set_at<T: Serialize>(
        &mut self,
        key: QueryKey,
        value: &T,
        stale_time: TimeDelta,
        now: DateTime<Utc>,
    ) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    CacheEntry {
                        value,
                        stored_at: now,
                        stale_after: stale_time,
                    },
                );
            }
            Err(e) => log::warn!("Not caching {:?}: {}", key, e),
        }
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &[String]) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at<T: DeserializeOwned>(&self, key: &[String], now: DateTime<Utc>) -> Option<T> {
        let entry = self.entries.get(key)?;
        if !entry.is_fresh(now) {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Drop every entry whose key starts with `prefix`. Returns how many went.
    pub fn invalidate(&mut self, prefix: &[String]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Invalidated {} cached queries under {:?}", removed, prefix);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
