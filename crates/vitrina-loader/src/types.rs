use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};
use vitrina_core::ProductRecord;

/// One row of tabular source data, keyed by column name as it appears in
/// the source. Values are strings for CSV sources and may be numbers for
/// literal or in-memory rows.
pub type RawRow = BTreeMap<String, Value>;

/// Converts typed records back into raw rows keyed by wire column name.
#[must_use]
pub fn records_to_rows(records: &[ProductRecord]) -> Vec<RawRow> {
    records
        .iter()
        .filter_map(|r| match serde_json::to_value(r) {
            Ok(Value::Object(map)) => Some(map.into_iter().collect::<RawRow>()),
            _ => None,
        })
        .collect()
}

/// Identifies exactly one tabular catalog source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDescriptor {
    /// Rows supplied in memory.
    Literal(Vec<RawRow>),
    /// A spreadsheet read through a [`crate::SheetConnector`].
    Sheet {
        spreadsheet: String,
        worksheet: Option<String>,
    },
    /// A published delimited-text export.
    CsvUrl(String),
}

impl SourceDescriptor {
    /// Builds a literal source from already-typed records.
    #[must_use]
    pub fn from_records(records: &[ProductRecord]) -> Self {
        Self::Literal(records_to_rows(records))
    }

    #[must_use]
    pub fn sheet(spreadsheet: impl Into<String>, worksheet: Option<&str>) -> Self {
        Self::Sheet {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.map(str::to_owned),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Sheet { .. } => "sheet",
            Self::CsvUrl(_) => "csv",
        }
    }

    /// Key under which a load of this source is memoized.
    ///
    /// Literal sources are keyed by a SHA-256 of their rows so that two
    /// identical literal lists share an entry.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Literal(rows) => {
                // BTreeMap keys serialize in sorted order, so this is stable.
                let encoded = serde_json::to_string(rows).unwrap_or_default();
                format!("literal:{:x}", Sha256::digest(encoded.as_bytes()))
            }
            Self::Sheet {
                spreadsheet,
                worksheet,
            } => format!("sheet:{spreadsheet}#{}", worksheet.as_deref().unwrap_or("")),
            Self::CsvUrl(url) => format!("csv:{url}"),
        }
    }
}

/// Result of a catalog load. Both variants carry usable records.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Records read and normalized from the source.
    Loaded(Vec<ProductRecord>),
    /// The source failed; `records` is the configured fallback catalog.
    Fallback {
        records: Vec<ProductRecord>,
        reason: String,
    },
}

impl LoadOutcome {
    #[must_use]
    pub fn records(&self) -> &[ProductRecord] {
        match self {
            Self::Loaded(records) | Self::Fallback { records, .. } => records,
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ProductRecord> {
        match self {
            Self::Loaded(records) | Self::Fallback { records, .. } => records,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}
