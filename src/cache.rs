use crate::error::LoadError;
use crate::process::load_sales_csv;
use crate::table::SalesTable;
use sha2::{Digest, Sha256};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Hex SHA-256 of an upload, used as its cache key.
pub fn content_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Parsed tables keyed by the content of the file they came from.
///
/// Re-uploading identical bytes skips parsing. Failed loads are not stored.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<String, Arc<SalesTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, bytes: &[u8]) -> Result<Arc<SalesTable>, LoadError> {
        let key = content_key(bytes);
        if let Some(table) = self.tables.get(&key) {
            debug!(key = %key, "table cache hit");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_sales_csv(bytes)?);
        debug!(key = %key, rows = table.num_rows(), "table cache miss; loaded");
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn get(&self, key: &str) -> Option<Arc<SalesTable>> {
        self.tables.get(key).cloned()
    }

    /// Drop the entry for `key`; true if one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.tables.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
