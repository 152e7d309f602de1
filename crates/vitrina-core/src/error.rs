use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invoice requires a customer name")]
    MissingCustomer,

    #[error("invoice has no items")]
    EmptyInvoice,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("admin editing is locked for this session")]
    AdminLocked,

    #[error("no product with id \"{0}\" in the catalog")]
    NotFound(String),

    #[error("product name must be non-empty")]
    EmptyName,

    #[error("cart index {index} out of range (cart has {len} items)")]
    CartIndex { index: usize, len: usize },
}
