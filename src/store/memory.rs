use crate::core::store::{Listener, Store, SubscriptionId, Subscribers};
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store with no persistence, used by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<String, Value>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let map = self.inner.read().unwrap();
        let value = map.get(key).cloned();
        debug!(key, hit = value.is_some(), "Store GET");
        Ok(value)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        {
            let mut map = self.inner.write().unwrap();
            map.insert(key.to_string(), value.clone());
        }
        debug!(key, "Store SET");
        self.subscribers.notify(key, Some(&value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let removed = {
            let mut map = self.inner.write().unwrap();
            map.remove(key).is_some()
        };
        debug!(key, removed, "Store REMOVE");
        if removed {
            self.subscribers.notify(key, None);
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let map = self.inner.read().unwrap();
        Ok(map.keys().cloned().collect())
    }

    fn subscribe(&self, key: &str, listener: Listener) -> SubscriptionId {
        self.subscribers.add(key, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::listener;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_memory_store_get_set() {
        let store = MemoryStore::new();

        // Initially, store is empty
        assert!(store.get("accounts").unwrap().is_none());

        store.set("accounts", json!([{"id": "a1"}])).unwrap();
        assert_eq!(store.get("accounts").unwrap(), Some(json!([{"id": "a1"}])));

        // Overwrite replaces the whole value
        store.set("accounts", json!([])).unwrap();
        assert_eq!(store.get("accounts").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_memory_store_remove_and_keys() {
        let store = MemoryStore::new();
        store.set("transactions", json!([])).unwrap();
        store.set("accounts", json!([])).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["accounts", "transactions"]);
        assert!(store.remove("accounts").unwrap());
        assert!(!store.remove("accounts").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["transactions"]);
    }

    #[test]
    fn test_memory_store_subscribe() {
        let store = MemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = store.subscribe(
            "accounts",
            listener(move |v| sink.lock().unwrap().push(v.cloned())),
        );

        store.set("accounts", json!([1])).unwrap();
        store.set("other", json!([2])).unwrap();
        store.remove("accounts").unwrap();
        // Nothing to remove, no notification
        store.remove("accounts").unwrap();

        assert!(store.unsubscribe(id));
        store.set("accounts", json!([3])).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![Some(json!([1])), None]);
    }
}
