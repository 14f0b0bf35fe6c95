use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::{CsvQueryError, Result};
use crate::table::LoadedTable;

/// Holds the single active table.
///
/// Loading replaces the whole table in one swap. Readers take an `Arc`
/// snapshot and keep working on it even if a new table is loaded meanwhile,
/// so a search never sees a mix of two tables.
#[derive(Debug, Default)]
pub struct TableHolder {
    slot: RwLock<Option<Arc<LoadedTable>>>,
}

impl TableHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held table (or clear it with `None`), returning the previous one.
    pub fn set(&self, table: Option<LoadedTable>) -> Option<Arc<LoadedTable>> {
        let next = table.map(Arc::new);
        // The slot only ever holds a complete handle, so a poisoned lock is still usable.
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }

    /// Snapshot of the current table.
    pub fn get(&self) -> Option<Arc<LoadedTable>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load(&self, table: LoadedTable) -> Option<Arc<LoadedTable>> {
        info!(
            source = %table.source().display(),
            rows = table.table().len(),
            "table loaded"
        );
        self.set(Some(table))
    }

    pub fn clear(&self) -> Option<Arc<LoadedTable>> {
        let previous = self.set(None);
        if let Some(prev) = &previous {
            info!(source = %prev.source().display(), "table unloaded");
        }
        previous
    }

    /// Snapshot of the current table, or [`CsvQueryError::NoTableLoaded`].
    pub fn require(&self) -> Result<Arc<LoadedTable>> {
        self.get().ok_or(CsvQueryError::NoTableLoaded)
    }
}
