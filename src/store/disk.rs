use crate::core::store::{Listener, Store, SubscriptionId, Subscribers};
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "collections";

/// Durable store backed by a fjall keyspace. Values are stored as JSON.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    subscribers: Subscribers,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create store directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open collections partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
            subscribers: Subscribers::new(),
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist store")
    }
}

impl Store for DiskStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(bytes) = self.partition.get(key)? else {
            debug!(key, "Store MISS");
            return Ok(None);
        };
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt value stored under key: {key}"))?;
        debug!(key, "Store HIT");
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.partition.insert(key, serde_json::to_vec(&value)?)?;
        self.persist()?;
        debug!(key, "Store SET");
        self.subscribers.notify(key, Some(&value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        if !self.partition.contains_key(key)? {
            return Ok(false);
        }
        self.partition.remove(key)?;
        self.persist()?;
        debug!(key, "Store REMOVE");
        self.subscribers.notify(key, None);
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for item in self.partition.iter() {
            let (key, _) = item?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    fn subscribe(&self, key: &str, listener: Listener) -> SubscriptionId {
        self.subscribers.add(key, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}
