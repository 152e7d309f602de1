use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSourceConfig {
    /// The configured default catalog, served as a literal source.
    Default,
    /// A published CSV export.
    CsvUrl(String),
    /// A spreadsheet read through a sheet connector. When `dir` is set the
    /// spreadsheet is a local CSV file under that directory.
    Sheet {
        spreadsheet: String,
        worksheet: Option<String>,
        dir: Option<PathBuf>,
    },
}

/// What the loader returns when a source cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    DefaultCatalog,
    Empty,
}

/// Whether the loader fills empty image fields itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePolicy {
    /// Empty or absent images become the given URL.
    Placeholder(String),
    /// Empty images stay empty; the display layer substitutes.
    KeepEmpty,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub store_name: String,
    pub source: CatalogSourceConfig,
    pub catalog_path: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub fallback: FallbackMode,
    pub image_policy: ImagePolicy,
    pub placeholder_image_url: String,
    pub thumbnail_width: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("store_name", &self.store_name)
            .field("source", &self.source)
            .field("catalog_path", &self.catalog_path)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("fallback", &self.fallback)
            .field("image_policy", &self.image_policy)
            .field("placeholder_image_url", &self.placeholder_image_url)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
