use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV parse error for {context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("source not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("expected CSV from {url} but got content type \"{content_type}\"")]
    UnexpectedContent { url: String, content_type: String },

    #[error("required column \"{column}\" missing from {context}")]
    MissingColumn { column: String, context: String },

    #[error("invalid source: {reason}")]
    InvalidSource { reason: String },

    #[error("{operation} is not supported by the {connector} connector")]
    Unsupported {
        operation: &'static str,
        connector: &'static str,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
