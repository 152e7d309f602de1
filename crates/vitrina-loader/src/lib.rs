//! Catalog loading for the storefront: fetch product rows from a literal
//! list, a sheet connector or a published CSV export, normalize them into
//! [`vitrina_core::ProductRecord`]s and fall back to a configured catalog
//! when the source cannot be read.

mod cache;
pub mod client;
pub mod connector;
pub mod csv_export;
pub mod drive;
pub mod error;
pub mod loader;
pub mod normalize;
mod retry;
pub mod types;

pub use client::CsvExportClient;
pub use connector::{
    CsvDirectoryConnector, GoogleSheetsConnector, MemorySheetConnector, SheetConnector,
};
pub use drive::{display_image_url, drive_thumbnail_url, DEFAULT_THUMBNAIL_WIDTH};
pub use error::LoaderError;
pub use loader::{InventoryLoader, LoaderOptions};
pub use normalize::{normalize_row, normalize_rows};
pub use types::{LoadOutcome, RawRow, SourceDescriptor};
