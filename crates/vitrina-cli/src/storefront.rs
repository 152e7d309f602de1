//! Wires `AppConfig` into a loader and the source it should read.

use std::path::Path;
use std::time::Duration;

use vitrina_core::{AppConfig, CatalogSourceConfig, FallbackMode, ProductRecord};
use vitrina_loader::{
    CsvDirectoryConnector, CsvExportClient, GoogleSheetsConnector, InventoryLoader, LoadOutcome,
    LoaderError, LoaderOptions, SourceDescriptor,
};

/// The loader's connector type depends on configuration, so both variants
/// are carried behind one enum.
pub(crate) enum StoreLoader {
    Google(InventoryLoader<GoogleSheetsConnector>),
    Directory(InventoryLoader<CsvDirectoryConnector>),
}

impl StoreLoader {
    pub(crate) async fn load(&self, source: &SourceDescriptor) -> LoadOutcome {
        match self {
            Self::Google(loader) => loader.load(source).await,
            Self::Directory(loader) => loader.load(source).await,
        }
    }

    pub(crate) async fn update(
        &self,
        source: &SourceDescriptor,
        records: &[ProductRecord],
    ) -> Result<(), LoaderError> {
        match self {
            Self::Google(loader) => loader.update(source, records).await,
            Self::Directory(loader) => loader.update(source, records).await,
        }
    }
}

pub(crate) struct Storefront {
    pub(crate) loader: StoreLoader,
    pub(crate) source: SourceDescriptor,
}

impl Storefront {
    /// Builds the loader and source descriptor for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog file cannot be read or the
    /// HTTP client cannot be built.
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let base = base_catalog(config.catalog_path.as_deref())?;
        let source = source_descriptor(&config.source, &base);
        let options = LoaderOptions {
            ttl: Some(Duration::from_secs(config.cache_ttl_secs)),
            fallback: fallback_records(config.fallback, base),
            image_policy: config.image_policy.clone(),
        };

        let client = CsvExportClient::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        let loader = match &config.source {
            CatalogSourceConfig::Sheet { dir: Some(dir), .. } => StoreLoader::Directory(
                InventoryLoader::new(client, CsvDirectoryConnector::new(dir), options),
            ),
            _ => StoreLoader::Google(InventoryLoader::new(
                client.clone(),
                GoogleSheetsConnector::new(client),
                options,
            )),
        };

        tracing::debug!(source = source.kind(), "storefront configured");
        Ok(Self { loader, source })
    }

    pub(crate) async fn load(&self) -> LoadOutcome {
        self.loader.load(&self.source).await
    }
}

/// The catalog from `path`, or the built-in one when no path is configured.
pub(crate) fn base_catalog(path: Option<&Path>) -> anyhow::Result<Vec<ProductRecord>> {
    match path {
        Some(path) => {
            let file = vitrina_core::load_catalog(path)?;
            tracing::info!(path = %path.display(), products = file.products.len(), "loaded catalog file");
            Ok(file.products)
        }
        None => Ok(vitrina_core::default_catalog()),
    }
}

pub(crate) fn fallback_records(mode: FallbackMode, base: Vec<ProductRecord>) -> Vec<ProductRecord> {
    match mode {
        FallbackMode::DefaultCatalog => base,
        FallbackMode::Empty => Vec::new(),
    }
}

pub(crate) fn source_descriptor(
    source: &CatalogSourceConfig,
    base: &[ProductRecord],
) -> SourceDescriptor {
    match source {
        CatalogSourceConfig::Default => SourceDescriptor::from_records(base),
        CatalogSourceConfig::CsvUrl(url) => SourceDescriptor::CsvUrl(url.clone()),
        CatalogSourceConfig::Sheet {
            spreadsheet,
            worksheet,
            ..
        } => SourceDescriptor::sheet(spreadsheet.as_str(), worksheet.as_deref()),
    }
}
