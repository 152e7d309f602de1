//! Normalization from raw source rows to [`vitrina_core::ProductRecord`].
//!
//! Every field except the name has a default: a row is dropped only when
//! its name is empty or absent.

use serde_json::Value;
use vitrina_core::{format_numeric_id, ImagePolicy, ProductRecord};

use crate::types::RawRow;

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "nombre";
pub const PRICE_FIELD: &str = "precio";
pub const IMAGE_FIELD: &str = "img";

/// Lower-cased column names accepted for each canonical field.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("name", NAME_FIELD),
    ("producto", NAME_FIELD),
    ("price", PRICE_FIELD),
    ("image", IMAGE_FIELD),
    ("imagen", IMAGE_FIELD),
    ("image_url", IMAGE_FIELD),
    ("code", ID_FIELD),
    ("codigo", ID_FIELD),
    ("código", ID_FIELD),
];

/// Trims and lower-cases a column name, then maps known aliases onto the
/// canonical field names.
#[must_use]
pub fn canonical_key(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| (*canonical).to_owned())
}

/// Rewrites every key of `row` through [`canonical_key`].
///
/// When two columns collapse onto the same key, the first non-empty value wins.
#[must_use]
pub fn normalize_keys(row: RawRow) -> RawRow {
    let mut out = RawRow::new();
    for (key, value) in row {
        let key = canonical_key(&key);
        match out.get(&key) {
            Some(existing) if !is_blank(existing) => {}
            _ => {
                out.insert(key, value);
            }
        }
    }
    out
}

/// Coerces a price cell to `f64`. Absent, blank, non-numeric and
/// non-finite values become `0.0`.
#[must_use]
pub fn coerce_price(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            let s = s.strip_prefix('$').unwrap_or(s).trim();
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}

/// Coerces a text cell to a trimmed string. Numbers render without a
/// trailing `.0`; null and blank cells are `None`.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_numeric_id)?,
        },
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Normalizes a single row whose keys are already canonical.
///
/// Returns `None` when the row has no name.
#[must_use]
pub fn normalize_row(row: &RawRow, image_policy: &ImagePolicy) -> Option<ProductRecord> {
    let name = coerce_text(row.get(NAME_FIELD))?;
    let id = coerce_text(row.get(ID_FIELD)).unwrap_or_default();
    let price = coerce_price(row.get(PRICE_FIELD));
    let img = match (coerce_text(row.get(IMAGE_FIELD)), image_policy) {
        (Some(img), _) => img,
        (None, ImagePolicy::Placeholder(placeholder)) => placeholder.clone(),
        (None, ImagePolicy::KeepEmpty) => String::new(),
    };

    Some(ProductRecord {
        id,
        name,
        price,
        img,
    })
}

/// Normalizes keys and values of every row, preserving order and dropping
/// rows without a name.
#[must_use]
pub fn normalize_rows(rows: Vec<RawRow>, image_policy: &ImagePolicy) -> Vec<ProductRecord> {
    let total = rows.len();
    let records: Vec<ProductRecord> = rows
        .into_iter()
        .map(normalize_keys)
        .filter_map(|row| normalize_row(&row, image_policy))
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "dropped catalog rows without a name");
    }
    records
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
