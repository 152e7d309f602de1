use std::sync::LazyLock;

use regex::Regex;
use vitrina_core::ProductRecord;

use super::SheetConnector;
use crate::client::CsvExportClient;
use crate::error::LoaderError;
use crate::types::RawRow;

static SPREADSHEET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid spreadsheet id regex")
});

const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// Accepts either a bare spreadsheet id or a full share/edit URL and returns
/// the id.
#[must_use]
pub fn extract_spreadsheet_id(spreadsheet: &str) -> &str {
    let spreadsheet = spreadsheet.trim();
    SPREADSHEET_ID_RE
        .captures(spreadsheet)
        .and_then(|c| c.get(1))
        .map_or(spreadsheet, |m| m.as_str())
}

/// Reads shared Google spreadsheets through their public CSV export.
///
/// Writes need an authenticated API session, which this connector does not
/// hold, so [`SheetConnector::update`] always fails with
/// [`LoaderError::Unsupported`].
#[derive(Debug, Clone)]
pub struct GoogleSheetsConnector {
    client: CsvExportClient,
    base_url: String,
}

impl GoogleSheetsConnector {
    #[must_use]
    pub fn new(client: CsvExportClient) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Points the connector at another host, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(client: CsvExportClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Builds the `gviz` CSV export URL for a spreadsheet and optional tab.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidSource`] if the id is empty or the
    /// resulting URL cannot be parsed.
    pub fn export_url(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> Result<String, LoaderError> {
        let id = extract_spreadsheet_id(spreadsheet);
        if id.is_empty() {
            return Err(LoaderError::InvalidSource {
                reason: "spreadsheet id is empty".to_owned(),
            });
        }

        let raw = format!("{}/spreadsheets/d/{id}/gviz/tq", self.base_url);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| LoaderError::InvalidSource {
            reason: format!("invalid export URL {raw}: {e}"),
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("tqx", "out:csv");
            if let Some(sheet) = worksheet.map(str::trim).filter(|s| !s.is_empty()) {
                query.append_pair("sheet", sheet);
            }
        }
        Ok(url.to_string())
    }
}

impl SheetConnector for GoogleSheetsConnector {
    fn name(&self) -> &'static str {
        "google-sheets"
    }

    async fn read(
        &self,
        spreadsheet: &str,
        worksheet: Option<&str>,
    ) -> Result<Vec<RawRow>, LoaderError> {
        let url = self.export_url(spreadsheet, worksheet)?;
        self.client.fetch_rows(&url).await
    }

    async fn update(
        &self,
        _spreadsheet: &str,
        _worksheet: Option<&str>,
        _records: &[ProductRecord],
    ) -> Result<(), LoaderError> {
        Err(LoaderError::Unsupported {
            operation: "update",
            connector: self.name(),
        })
    }
}
