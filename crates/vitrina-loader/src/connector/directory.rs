use std::path::{Path, PathBuf};

use vitrina_core::ProductRecord;

use super::SheetConnector;
use crate::csv_export::{decode_body, parse_csv, write_csv};
use crate::error::LoaderError;
use crate::types::RawRow;

/// Spreadsheets stored as CSV files under a root directory.
///
/// `spreadsheet` maps to `<root>/<spreadsheet>.csv`; with a worksheet it maps
/// to `<root>/<spreadsheet>/<worksheet>.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectoryConnector {
    root: PathBuf,
}

impl CsvDirectoryConnector {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the file backing a spreadsheet/worksheet pair.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidSource`] if either name is empty or
    /// would escape the root directory.
    pub fn path_for(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> Result<PathBuf, LoaderError> {
        let spreadsheet = validate_segment(spreadsheet)?;
        match worksheet.map(str::trim).filter(|w| !w.is_empty()) {
            Some(sheet) => {
                let sheet = validate_segment(sheet)?;
                Ok(self.root.join(spreadsheet).join(format!("{sheet}.csv")))
            }
            None => Ok(self.root.join(format!("{spreadsheet}.csv"))),
        }
    }
}

fn validate_segment(name: &str) -> Result<&str, LoaderError> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(LoaderError::InvalidSource {
            reason: format!("invalid sheet name \"{name}\""),
        });
    }
    Ok(name)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> LoaderError + '_ {
    move |source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl SheetConnector for CsvDirectoryConnector {
    fn name(&self) -> &'static str {
        "csv-directory"
    }

    async fn read(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> Result<Vec<RawRow>, LoaderError> {
        let path = self.path_for(spreadsheet, worksheet)?;
        let bytes = tokio::fs::read(&path).await.map_err(io_err(&path))?;
        parse_csv(&decode_body(&bytes), &path.display().to_string())
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// concurrent reader sees either the old or the new sheet.
    async fn update(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
        records: &[ProductRecord],
    ) -> Result<(), LoaderError> {
        let path = self.path_for(spreadsheet, worksheet)?;
        let body = write_csv(records, &path.display().to_string())?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_err(parent))?;
        }
        let tmp = path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, body).await.map_err(io_err(&tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(io_err(&path))?;

        tracing::info!(path = %path.display(), records = records.len(), "catalog sheet written");
        Ok(())
    }
}
