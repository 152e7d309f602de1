//! `catalog` and `thumbnail` command handlers.

use vitrina_core::{format_price, AppConfig, ProductRecord};
use vitrina_loader::{display_image_url, drive_thumbnail_url};

use crate::storefront::Storefront;

/// Load the configured catalog and print it with display-ready image URLs.
///
/// A fallback load is reported on stderr and still printed.
pub(crate) async fn run_catalog(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let storefront = Storefront::from_config(config)?;
    let outcome = storefront.load().await;
    if let Some(reason) = outcome.fallback_reason() {
        eprintln!("warning: catalog source unavailable ({reason}); showing fallback catalog");
    }

    let records = display_records(
        outcome.records(),
        &config.placeholder_image_url,
        config.thumbnail_width,
    );
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for line in table_lines(&records) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn run_thumbnail(url: &str, width: u32) {
    println!("{}", drive_thumbnail_url(url, width));
}

/// Copies of `records` whose `img` is ready to embed.
pub(crate) fn display_records(
    records: &[ProductRecord],
    placeholder: &str,
    width: u32,
) -> Vec<ProductRecord> {
    records
        .iter()
        .map(|r| ProductRecord {
            img: display_image_url(r, placeholder, width),
            ..r.clone()
        })
        .collect()
}

pub(crate) fn table_lines(records: &[ProductRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["(catalog is empty)".to_owned()];
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{:<6} {:<30} {:>10}  {}",
                r.id,
                r.name,
                format_price(r.price),
                r.img
            )
        })
        .collect()
}
