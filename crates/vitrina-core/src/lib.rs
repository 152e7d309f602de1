pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod invoice;
pub mod products;
pub mod session;

pub use app_config::{AppConfig, CatalogSourceConfig, Environment, FallbackMode, ImagePolicy};
pub use catalog::{default_catalog, load_catalog, parse_catalog, CatalogFile, PLACEHOLDER_IMAGE_URL};
pub use config::{
    load_app_config, load_app_config_from_env, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_BASE_MS,
};
pub use error::{ConfigError, CoreError, SessionError};
pub use invoice::{format_price, Invoice, InvoiceLine};
pub use products::{format_numeric_id, ProductRecord};
pub use session::{AdminCredentials, AdminState, Cart, ProductEdit, Session};
