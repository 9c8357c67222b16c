//! Countdown table embedded in the page's script content.
//!
//! Offer blocks reference their timer by key only; the durations live in a
//! `timeleft_cache = {...}` assignment inside one of the page's scripts,
//! which can sit anywhere in the document.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::document::Node;

const MARKER: &str = "timeleft_cache";
const ASSIGNMENT_PREFIX: &str = "timeleft_cache = ";

/// Timer key to remaining seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeCache(HashMap<String, i64>);

impl TimeCache {
    /// Raw value for `key`; missing keys read as 0.
    pub fn get(&self, key: &str) -> i64 {
        self.0.get(key).copied().unwrap_or_default()
    }

    /// Remaining time for `key`. Missing keys and negative values give a zero duration.
    pub fn remaining(&self, key: &str) -> Duration {
        Duration::from_secs(u64::try_from(self.get(key)).unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Text of the first script mentioning the cache, or an empty string.
pub fn find_time_cache_script<N: Node>(root: &N) -> String {
    root.find_all("script")
        .into_iter()
        .map(|script| script.text())
        .find(|text| text.contains(MARKER))
        .unwrap_or_default()
}

/// Decodes the script text into a [`TimeCache`]. Anything undecodable yields an empty cache.
pub fn parse_time_cache(script: &str) -> TimeCache {
    let script = script.trim();
    if script.is_empty() {
        return TimeCache::default();
    }

    let payload = script.strip_prefix(ASSIGNMENT_PREFIX).unwrap_or(script);
    let payload = payload.strip_suffix(';').unwrap_or(payload).trim_end();

    match serde_json::from_str::<HashMap<String, i64>>(payload) {
        Ok(map) => {
            debug!(entries = map.len(), "decoded time cache");
            TimeCache(map)
        }
        Err(e) => {
            warn!(error = %e, "failed to parse time cache");
            TimeCache::default()
        }
    }
}

/// Locates and decodes the page's time cache.
pub fn resolve<N: Node>(root: &N) -> TimeCache {
    parse_time_cache(&find_time_cache_script(root))
}
