use serde::{Deserialize, Deserializer, Serialize};

/// A catalog product, normalized for display, cart and invoicing.
///
/// Field names on the wire follow the storefront spreadsheet columns
/// (`id,nombre,precio,img`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product code as written in the source, e.g. `"001"`. Numeric ids are
    /// kept as their decimal string. Empty when the source has none.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", default)]
    pub price: f64,
    /// Image URL. May be empty, or a drive share link that still needs
    /// rewriting before it can be embedded.
    #[serde(default)]
    pub img: String,
}

impl ProductRecord {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        img: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            img: img.into(),
        }
    }

    /// Returns `true` if the record carries an image URL.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.img.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s.trim().to_owned(),
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => format_numeric_id(f),
    })
}

/// Renders a numeric id without a trailing `.0` when it is integral.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_numeric_id(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
