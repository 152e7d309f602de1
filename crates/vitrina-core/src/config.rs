use std::path::PathBuf;

use crate::app_config::{AppConfig, CatalogSourceConfig, Environment, FallbackMode, ImagePolicy};
use crate::catalog::PLACEHOLDER_IMAGE_URL;
use crate::ConfigError;

/// Extra attempts per catalog download. Zero keeps a failing source to a
/// single request per load; the cache TTL paces the next attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 0;

pub const DEFAULT_RETRY_BACKOFF_BASE_MS: u64 = 500;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the catalog source is ambiguous.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the catalog source is ambiguous.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("VITRINA_ENV", "development"))?;
    let log_level = or_default("VITRINA_LOG_LEVEL", "info");
    let store_name = or_default("VITRINA_STORE_NAME", "ZE");

    let source = parse_source(
        optional("VITRINA_CSV_URL"),
        optional("VITRINA_SHEET_ID"),
        optional("VITRINA_SHEET_NAME"),
        optional("VITRINA_SHEET_DIR").map(PathBuf::from),
    )?;

    let catalog_path = optional("VITRINA_CATALOG_PATH").map(PathBuf::from);
    let cache_ttl_secs = parse_u64("VITRINA_CACHE_TTL_SECS", "600")?;
    let fallback = parse_fallback(&or_default("VITRINA_FALLBACK", "default"))?;

    let placeholder_image_url = or_default("VITRINA_PLACEHOLDER_IMAGE_URL", PLACEHOLDER_IMAGE_URL);
    let image_policy = parse_image_policy(
        &or_default("VITRINA_IMAGE_POLICY", "placeholder"),
        &placeholder_image_url,
    )?;

    let thumbnail_width = parse_u32("VITRINA_THUMBNAIL_WIDTH", "1000")?;
    if thumbnail_width == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VITRINA_THUMBNAIL_WIDTH".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("VITRINA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VITRINA_USER_AGENT", "vitrina/0.1 (catalog-loader)");
    let max_retries = parse_u32("VITRINA_MAX_RETRIES", &DEFAULT_MAX_RETRIES.to_string())?;
    let retry_backoff_base_ms = parse_u64(
        "VITRINA_RETRY_BACKOFF_BASE_MS",
        &DEFAULT_RETRY_BACKOFF_BASE_MS.to_string(),
    )?;
    let admin_password = optional("VITRINA_ADMIN_PASSWORD");

    Ok(AppConfig {
        env,
        log_level,
        store_name,
        source,
        catalog_path,
        cache_ttl_secs,
        fallback,
        image_policy,
        placeholder_image_url,
        thumbnail_width,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        admin_password,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINA_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_fallback(s: &str) -> Result<FallbackMode, ConfigError> {
    match s {
        "default" => Ok(FallbackMode::DefaultCatalog),
        "empty" => Ok(FallbackMode::Empty),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINA_FALLBACK".to_string(),
            reason: format!("expected 'default' or 'empty', got '{other}'"),
        }),
    }
}

fn parse_image_policy(s: &str, placeholder: &str) -> Result<ImagePolicy, ConfigError> {
    match s {
        "placeholder" => Ok(ImagePolicy::Placeholder(placeholder.to_string())),
        "keep-empty" => Ok(ImagePolicy::KeepEmpty),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINA_IMAGE_POLICY".to_string(),
            reason: format!("expected 'placeholder' or 'keep-empty', got '{other}'"),
        }),
    }
}

/// Resolves the catalog source. At most one of the CSV URL and the sheet id
/// may be set; neither means the default catalog.
fn parse_source(
    csv_url: Option<String>,
    sheet_id: Option<String>,
    sheet_name: Option<String>,
    sheet_dir: Option<PathBuf>,
) -> Result<CatalogSourceConfig, ConfigError> {
    match (csv_url, sheet_id) {
        (Some(_), Some(_)) => Err(ConfigError::Validation(
            "VITRINA_CSV_URL and VITRINA_SHEET_ID are mutually exclusive".to_string(),
        )),
        (Some(url), None) => {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidEnvVar {
                    var: "VITRINA_CSV_URL".to_string(),
                    reason: "must be an http(s) URL".to_string(),
                });
            }
            Ok(CatalogSourceConfig::CsvUrl(url))
        }
        (None, Some(spreadsheet)) => Ok(CatalogSourceConfig::Sheet {
            spreadsheet,
            worksheet: sheet_name,
            dir: sheet_dir,
        }),
        (None, None) => Ok(CatalogSourceConfig::Default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
