//! Key-value store of named collections.

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Called with the new value of a key, or `None` when the key was removed.
pub type Listener = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

/// Wraps a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(Option<&Value>) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key` and notifies the key's subscribers.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`. Returns whether anything was removed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    fn subscribe(&self, key: &str, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Listener registry shared by the store implementations.
#[derive(Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    listeners: RwLock<HashMap<SubscriptionId, (String, Listener)>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, key: &str, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self.listeners.write().unwrap();
        listeners.insert(id, (key.to_string(), listener));
        debug!(key, ?id, "Subscribed");
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write().unwrap();
        listeners.remove(&id).is_some()
    }

    /// Invokes every listener registered for `key`.
    ///
    /// Listeners are cloned out first so none of them runs under the lock.
    pub fn notify(&self, key: &str, value: Option<&Value>) {
        let matching: Vec<Listener> = {
            let listeners = self.listeners.read().unwrap();
            listeners
                .values()
                .filter(|(k, _)| k == key)
                .map(|(_, l)| Arc::clone(l))
                .collect()
        };
        if !matching.is_empty() {
            debug!(key, count = matching.len(), "Notifying subscribers");
        }
        for callback in matching {
            callback(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_notify_only_matching_key() {
        let subscribers = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        subscribers.add(
            "accounts",
            listener(move |v| sink.lock().unwrap().push(v.cloned())),
        );

        subscribers.notify("transactions", Some(&json!([1])));
        subscribers.notify("accounts", Some(&json!([2])));
        subscribers.notify("accounts", None);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![Some(json!([2])), None]);
    }

    #[test]
    fn test_remove_subscription() {
        let subscribers = Subscribers::new();
        let calls = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&calls);
        let id = subscribers.add(
            "accounts",
            listener(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(subscribers.remove(id));
        assert!(!subscribers.remove(id));
        subscribers.notify("accounts", None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
