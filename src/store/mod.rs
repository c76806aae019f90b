pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::Store;
use anyhow::Result;
use disk::DiskStore;
use std::sync::Arc;
use tracing::debug;

/// Opens the durable store under the configured data directory.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    let path = config.default_data_path()?.join("store");
    debug!("Opening store at {}", path.display());
    Ok(Arc::new(DiskStore::open(&path)?))
}
