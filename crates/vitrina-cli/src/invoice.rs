//! `invoice` command handler.

use std::path::Path;

use anyhow::Context;
use vitrina_core::{AppConfig, Invoice, ProductRecord, Session};

use crate::storefront::Storefront;

pub(crate) async fn run_invoice(
    config: &AppConfig,
    customer: &str,
    item_ids: &[String],
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let storefront = Storefront::from_config(config)?;
    let outcome = storefront.load().await;
    if let Some(reason) = outcome.fallback_reason() {
        tracing::warn!(%reason, "invoicing against fallback catalog");
    }

    let mut session = Session::new();
    for product in resolve_items(outcome.records(), item_ids)? {
        session.cart.add(product);
    }

    let today = chrono::Local::now().date_naive();
    let invoice = Invoice::new(&config.store_name, customer, today, session.cart.items())?;
    let text = invoice.render_text();

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(invoice.file_name())
            } else {
                path.to_path_buf()
            };
            tokio::fs::write(&path, &text)
                .await
                .with_context(|| format!("failed to write invoice to {}", path.display()))?;
            tracing::info!(
                session = %session.id(),
                path = %path.display(),
                lines = invoice.lines.len(),
                "invoice written"
            );
            println!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Looks up each id in `catalog`, in order. Repeated ids add repeated items.
pub(crate) fn resolve_items<'a>(
    catalog: &'a [ProductRecord],
    ids: &[String],
) -> anyhow::Result<Vec<&'a ProductRecord>> {
    ids.iter()
        .map(|id| {
            let id = id.trim();
            catalog
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow::anyhow!("product '{id}' not found in catalog"))
        })
        .collect()
}
