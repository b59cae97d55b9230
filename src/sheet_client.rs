use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;

use crate::error::SheetError;
use crate::gviz;
use crate::sheet_source::TableSource;
use crate::table::Table;

/// Session-scoped table store.
///
/// Each table name owns one cell. The first caller fills it; callers that
/// arrive while that fetch is running block on the same cell instead of
/// issuing their own request. A failed fetch leaves the cell empty so the
/// next caller retries. Entries are never refreshed for the life of the client.
pub struct SheetClient {
    source: Arc<dyn TableSource>,
    tables: Mutex<HashMap<String, Arc<OnceCell<Table>>>>,
}

impl SheetClient {
    pub fn new(source: Arc<dyn TableSource>) -> Self {
        Self {
            source,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, table: &str) -> Result<Table, SheetError> {
        let cell = {
            let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entry(table.to_string()).or_default().clone()
        };

        cell.get_or_try_init(|| {
            let raw = self.source.fetch_raw(table)?;
            let rows = gviz::parse_response(table, &raw)?;
            Ok(Arc::new(rows))
        })
        .cloned()
    }

    pub fn is_cached(&self, table: &str) -> bool {
        let guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(table).is_some_and(|cell| cell.get().is_some())
    }

    pub fn cached_tables(&self) -> Vec<String> {
        let guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names = guard
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}
