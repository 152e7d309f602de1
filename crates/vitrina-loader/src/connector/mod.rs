//! Spreadsheet connectors: named tabular sources that can be read and,
//! for some backends, written back from the admin editor.

mod directory;
mod google;
mod memory;

use std::future::Future;

use vitrina_core::ProductRecord;

use crate::error::LoaderError;
use crate::types::RawRow;

pub use directory::CsvDirectoryConnector;
pub use google::{extract_spreadsheet_id, GoogleSheetsConnector};
pub use memory::MemorySheetConnector;

/// A connection to a family of spreadsheets.
///
/// `spreadsheet` names the document; `worksheet` optionally selects a tab
/// within it. Rows are returned with column names as they appear in the
/// sheet; the loader normalizes them.
pub trait SheetConnector: Send + Sync {
    /// Short backend name for logs and errors.
    fn name(&self) -> &'static str;

    /// Reads every row of the selected worksheet.
    fn read(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> impl Future<Output = Result<Vec<RawRow>, LoaderError>> + Send;

    /// Replaces the contents of the selected worksheet with `records`.
    fn update(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
        records: &[ProductRecord],
    ) -> impl Future<Output = Result<(), LoaderError>> + Send;
}
