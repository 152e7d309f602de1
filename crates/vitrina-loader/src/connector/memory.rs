use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use vitrina_core::ProductRecord;

use super::SheetConnector;
use crate::error::LoaderError;
use crate::types::{records_to_rows, RawRow};

type TableKey = (String, Option<String>);

/// In-process spreadsheets. Counts reads so callers can observe caching.
#[derive(Debug, Default)]
pub struct MemorySheetConnector {
    tables: Mutex<HashMap<TableKey, Vec<RawRow>>>,
    reads: AtomicUsize,
}

impl MemorySheetConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a worksheet.
    #[must_use]
    pub fn with_table(self, spreadsheet: &str, worksheet: Option<&str>, rows: Vec<RawRow>) -> Self {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(spreadsheet, worksheet), rows);
        self
    }

    /// Number of `read` calls served so far, including failed ones.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

fn key(spreadsheet: &str, worksheet: Option<&str>) -> TableKey {
    (spreadsheet.to_owned(), worksheet.map(str::to_owned))
}

impl SheetConnector for MemorySheetConnector {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> Result<Vec<RawRow>, LoaderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key(spreadsheet, worksheet))
            .cloned()
            .ok_or_else(|| LoaderError::NotFound {
                url: format!("memory://{spreadsheet}/{}", worksheet.unwrap_or_default()),
            })
    }

    async fn update(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
        records: &[ProductRecord],
    ) -> Result<(), LoaderError> {
        let rows = records_to_rows(records);
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key(spreadsheet, worksheet), rows);
        Ok(())
    }
}
