use std::time::Duration;

use vitrina_core::{default_catalog, ImagePolicy, ProductRecord, PLACEHOLDER_IMAGE_URL};

use crate::cache::LoadCache;
use crate::client::CsvExportClient;
use crate::connector::{GoogleSheetsConnector, SheetConnector};
use crate::error::LoaderError;
use crate::normalize::{normalize_keys, normalize_rows, NAME_FIELD};
use crate::types::{records_to_rows, LoadOutcome, RawRow, SourceDescriptor};

/// Loader behaviour that does not depend on the source.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// How long a load is remembered. `None` or zero disables memoization.
    pub ttl: Option<Duration>,
    /// Records served when a source fails. Empty means an empty catalog.
    pub fallback: Vec<ProductRecord>,
    pub image_policy: ImagePolicy,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(600)),
            fallback: default_catalog(),
            image_policy: ImagePolicy::Placeholder(PLACEHOLDER_IMAGE_URL.to_owned()),
        }
    }
}

/// Loads the catalog from a [`SourceDescriptor`] and never fails: source
/// errors turn into [`LoadOutcome::Fallback`].
pub struct InventoryLoader<C: SheetConnector = GoogleSheetsConnector> {
    fetcher: CsvExportClient,
    connector: C,
    ttl: Option<Duration>,
    fallback: Vec<ProductRecord>,
    image_policy: ImagePolicy,
    cache: LoadCache,
}

impl<C: SheetConnector> InventoryLoader<C> {
    /// The fallback catalog goes through the same normalization as source
    /// rows, so nameless entries are dropped and the image policy applies.
    pub fn new(fetcher: CsvExportClient, connector: C, options: LoaderOptions) -> Self {
        let fallback = normalize_rows(records_to_rows(&options.fallback), &options.image_policy);
        Self {
            fetcher,
            connector,
            ttl: options.ttl.filter(|ttl| !ttl.is_zero()),
            fallback,
            image_policy: options.image_policy,
            cache: LoadCache::default(),
        }
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    #[must_use]
    pub fn fallback(&self) -> &[ProductRecord] {
        &self.fallback
    }

    /// Loads and normalizes the catalog for `source`.
    ///
    /// Within the TTL, repeated calls for the same source return the
    /// remembered outcome, fallback included, without touching the source.
    pub async fn load(&self, source: &SourceDescriptor) -> LoadOutcome {
        let key = source.cache_key();
        if let Some(ttl) = self.ttl {
            if let Some(hit) = self.cache.get(&key, ttl) {
                tracing::debug!(
                    source = source.kind(),
                    fallback = hit.is_fallback(),
                    "catalog cache hit"
                );
                return hit;
            }
        }

        let outcome = match self.fetch_records(source).await {
            Ok(records) => {
                tracing::info!(
                    source = source.kind(),
                    records = records.len(),
                    "catalog loaded"
                );
                LoadOutcome::Loaded(records)
            }
            Err(e) => {
                tracing::warn!(
                    source = source.kind(),
                    connector = self.connector.name(),
                    error = %e,
                    fallback_records = self.fallback.len(),
                    "catalog source unavailable, serving fallback"
                );
                LoadOutcome::Fallback {
                    records: self.fallback.clone(),
                    reason: e.to_string(),
                }
            }
        };

        if self.ttl.is_some() {
            self.cache.insert(key, outcome.clone());
        }
        outcome
    }

    /// Like [`Self::load`], discarding whether the fallback was used.
    pub async fn load_records(&self, source: &SourceDescriptor) -> Vec<ProductRecord> {
        self.load(source).await.into_records()
    }

    /// Writes `records` back to a sheet source and forgets its cached load.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::Unsupported`] for literal and CSV sources, or when the
    ///   connector cannot write.
    /// - Any connector error.
    pub async fn update(
        &self,
        source: &SourceDescriptor,
        records: &[ProductRecord],
    ) -> Result<(), LoaderError> {
        match source {
            SourceDescriptor::Sheet {
                spreadsheet,
                worksheet,
            } => {
                self.connector
                    .update(spreadsheet, worksheet.as_deref(), records)
                    .await?;
                self.invalidate(source);
                Ok(())
            }
            SourceDescriptor::Literal(_) => Err(LoaderError::Unsupported {
                operation: "update",
                connector: "literal",
            }),
            SourceDescriptor::CsvUrl(_) => Err(LoaderError::Unsupported {
                operation: "update",
                connector: "csv-export",
            }),
        }
    }

    /// Forgets the remembered load for `source`.
    pub fn invalidate(&self, source: &SourceDescriptor) {
        self.cache.invalidate(&source.cache_key());
    }

    /// Forgets every remembered load.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn fetch_records(
        &self,
        source: &SourceDescriptor,
    ) -> Result<Vec<ProductRecord>, LoaderError> {
        let rows = match source {
            SourceDescriptor::Literal(rows) => {
                let rows = rows.iter().cloned().map(normalize_keys).collect();
                require_name_column(rows, "literal rows")?
            }
            SourceDescriptor::Sheet {
                spreadsheet,
                worksheet,
            } => {
                let rows = self
                    .connector
                    .read(spreadsheet, worksheet.as_deref())
                    .await?;
                let context = format!("{} sheet {spreadsheet}", self.connector.name());
                require_name_column(rows.into_iter().map(normalize_keys).collect(), &context)?
            }
            // `parse_csv` already rejects a header without a name column.
            SourceDescriptor::CsvUrl(url) => self.fetcher.fetch_rows(url).await?,
        };
        Ok(normalize_rows(rows, &self.image_policy))
    }
}

/// Fails when rows exist but none of them carries a name column, the
/// row-map equivalent of a CSV header without one. An empty table passes.
fn require_name_column(rows: Vec<RawRow>, context: &str) -> Result<Vec<RawRow>, LoaderError> {
    if !rows.is_empty() && !rows.iter().any(|row| row.contains_key(NAME_FIELD)) {
        return Err(LoaderError::MissingColumn {
            column: NAME_FIELD.to_owned(),
            context: context.to_owned(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
