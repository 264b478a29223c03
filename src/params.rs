//! URL query-parameter store.
//!
//! The query string is the single source of truth for list state: every view
//! reads its page, sort and filters from here, and every user intent is
//! written back here. Writes bump a revision counter so that a running
//! [`crate::engine::DataViewEngine`] can re-fetch.

use parking_lot::Mutex;
use tokio::sync::watch;
use url::form_urlencoded;

/// Ordered set of URL search parameters with change notification.
#[derive(Debug)]
pub struct QueryParamStore {
    pairs: Mutex<Vec<(String, String)>>,
    revision: watch::Sender<u64>,
}

impl Default for QueryParamStore {
    fn default() -> Self {
        Self::new("")
    }
}

impl QueryParamStore {
    /// Parses an urlencoded query string. A leading `?` is ignored.
    pub fn new(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let pairs = form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let (revision, _) = watch::channel(0);

        Self {
            pairs: Mutex::new(pairs),
            revision,
        }
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .lock()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }

    /// Writes a single parameter. `None` removes the key.
    pub fn set_param(&self, key: &str, value: Option<&str>) {
        self.set_params(&[(key, value)]);
    }

    /// Applies several writes with a single change notification.
    pub fn set_params(&self, updates: &[(&str, Option<&str>)]) {
        let changed = {
            let mut pairs = self.pairs.lock();
            let before = pairs.clone();
            for (key, value) in updates {
                apply_update(&mut pairs, key, *value);
            }
            *pairs != before
        };

        if changed {
            self.revision.send_modify(|revision| *revision += 1);
        }
    }

    /// Serializes the parameters back into an urlencoded query string.
    pub fn query_string(&self) -> String {
        let pairs = self.pairs.lock();
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish()
    }

    /// Subscribes to revision changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

fn apply_update(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    match value {
        Some(value) => match pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((key.to_string(), value.to_string())),
        },
        None => pairs.retain(|(k, _)| k != key),
    }
}
