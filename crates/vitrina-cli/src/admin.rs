//! `admin` command handlers.

use vitrina_core::{AdminCredentials, AppConfig, ProductEdit, Session};

use crate::storefront::Storefront;

/// Unlock an admin session, apply `edit` to product `id` and write the
/// catalog back to the configured sheet.
///
/// # Errors
///
/// Fails if no admin password is configured or the given one is wrong, if
/// the source could not be read (editing the fallback would overwrite the
/// sheet with it), if the edit is rejected, or if the write-back fails.
pub(crate) async fn run_admin_edit(
    config: &AppConfig,
    password: &str,
    id: &str,
    edit: ProductEdit,
) -> anyhow::Result<()> {
    if edit.is_empty() {
        anyhow::bail!("nothing to edit: pass at least one of --new-id, --name, --price, --img");
    }

    let credentials = AdminCredentials::from_config(config.admin_password.as_deref());
    if !credentials.is_enabled() {
        anyhow::bail!("admin editing is disabled: VITRINA_ADMIN_PASSWORD is not set");
    }

    let mut session = Session::new();
    session.toggle_admin_panel();
    if !session.unlock(password, &credentials) {
        tracing::warn!(session = %session.id(), "admin unlock rejected");
        anyhow::bail!("incorrect admin password");
    }

    let storefront = Storefront::from_config(config)?;
    let outcome = storefront.load().await;
    if let Some(reason) = outcome.fallback_reason() {
        anyhow::bail!("catalog source unavailable, refusing to edit: {reason}");
    }

    let mut records = outcome.into_records();
    session.edit_product(&mut records, id, edit)?;
    storefront.loader.update(&storefront.source, &records).await?;
    session.lock();

    tracing::info!(session = %session.id(), product = id, "product updated");
    println!("updated product {id}");
    Ok(())
}
