//! Typed access to the collections held in a [`Store`].
//!
//! Reads return normalized snapshots. The planners never write back; the
//! only writer is [`Repository::import`].

use crate::core::model::{Account, Goal, Opportunity, Transaction};
use crate::core::normalize::{RawAccount, RawGoal, RawOpportunity, RawTransaction};
use crate::core::store::{Listener, Store, SubscriptionId};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ACCOUNTS_KEY: &str = "accounts";
pub const TRANSACTIONS_KEY: &str = "transactions";
pub const OPPORTUNITIES_KEY: &str = "invest.opportunities";
pub const GOALS_KEY: &str = "ai.goals";
pub const IMPORTED_AT_KEY: &str = "meta.imported_at";

/// Collections loaded from an import file. Absent collections are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct ImportBundle {
    #[serde(default)]
    pub accounts: Option<Vec<Value>>,
    #[serde(default)]
    pub transactions: Option<Vec<Value>>,
    #[serde(default)]
    pub opportunities: Option<Vec<Value>>,
    #[serde(default)]
    pub goals: Option<Vec<Value>>,
}

impl ImportBundle {
    /// Parses YAML or JSON (JSON is a subset of YAML).
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse import bundle")
    }
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn Store>,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reads a list collection, skipping elements that do not fit `R`.
    fn read_list<R, T>(&self, key: &str) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        let items = match self.store.get(key)? {
            None => {
                debug!(key, "Collection not found, using empty list");
                return Ok(Vec::new());
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                warn!(key, kind = %value_kind(&other), "Collection is not a list, ignoring");
                return Ok(Vec::new());
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<R>(item) {
                Ok(raw) => Some(T::from(raw)),
                Err(e) => {
                    warn!(key, index, error = %e, "Skipping malformed record");
                    None
                }
            })
            .collect::<Vec<T>>();
        debug!(key, count = records.len(), "Loaded collection");
        Ok(records)
    }

    pub fn accounts(&self) -> Result<Vec<Account>> {
        self.read_list::<RawAccount, _>(ACCOUNTS_KEY)
    }

    pub fn opportunities(&self) -> Result<Vec<Opportunity>> {
        self.read_list::<RawOpportunity, _>(OPPORTUNITIES_KEY)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.read_list::<RawTransaction, _>(TRANSACTIONS_KEY)
    }

    pub fn goals(&self) -> Result<Vec<Goal>> {
        self.read_list::<RawGoal, _>(GOALS_KEY)
    }

    pub fn imported_at(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(IMPORTED_AT_KEY)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn replace_collection(&self, key: &str, items: Vec<Value>) -> Result<()> {
        self.store
            .set(key, Value::Array(items))
            .with_context(|| format!("Failed to write collection: {key}"))
    }

    /// Writes every collection present in `bundle`. Returns `(key, count)` per
    /// collection written.
    pub fn import(&self, bundle: ImportBundle) -> Result<Vec<(&'static str, usize)>> {
        let collections = [
            (ACCOUNTS_KEY, bundle.accounts),
            (TRANSACTIONS_KEY, bundle.transactions),
            (OPPORTUNITIES_KEY, bundle.opportunities),
            (GOALS_KEY, bundle.goals),
        ];

        let mut written = Vec::new();
        for (key, items) in collections {
            if let Some(items) = items {
                let count = items.len();
                self.replace_collection(key, items)?;
                written.push((key, count));
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        self.store.set(IMPORTED_AT_KEY, Value::String(now))?;
        info!(collections = written.len(), "Import complete");
        Ok(written)
    }

    /// Registers `listener` for changes to the collection under `key`.
    pub fn on_change(&self, key: &str, listener: Listener) -> SubscriptionId {
        self.store.subscribe(key, listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
