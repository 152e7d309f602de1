use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::products::ProductRecord;
use crate::ConfigError;

/// Image shown for products that have no image of their own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// The built-in catalog used when no catalog file is configured and a
/// remote source cannot be read.
#[must_use]
pub fn default_catalog() -> Vec<ProductRecord> {
    vec![
        ProductRecord::new("001", "Imán Souvenir", 12000.0, PLACEHOLDER_IMAGE_URL),
        ProductRecord::new("002", "Corte Láser", 35000.0, PLACEHOLDER_IMAGE_URL),
        ProductRecord::new("003", "Molde 3D", 25000.0, PLACEHOLDER_IMAGE_URL),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<ProductRecord>,
}

/// Load and validate a default catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for product in &catalog.products {
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product '{}' has an empty name",
                product.id
            )));
        }

        if !product.price.is_finite() || product.price < 0.0 {
            return Err(ConfigError::Validation(format!(
                "product '{}' has invalid price {}",
                product.name, product.price
            )));
        }

        if !product.id.is_empty() && !seen_ids.insert(product.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: '{}'",
                product.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_catalog_has_three_named_products() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|p| !p.name.is_empty()));
        assert_eq!(catalog[0].id, "001");
        assert!((catalog[1].price - 35000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_catalog_accepts_numeric_ids() {
        let yaml = r"
products:
  - id: 10
    nombre: Llavero
    precio: 5000
  - id: '011'
    nombre: Placa
    precio: 8000.5
    img: https://example.com/placa.png
";
        let catalog = parse_catalog(yaml).unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.products[0].id, "10");
        assert_eq!(catalog.products[0].img, "");
        assert_eq!(catalog.products[1].id, "011");
    }

    #[test]
    fn parse_catalog_rejects_empty_name() {
        let yaml = "products:\n  - id: '1'\n    nombre: '  '\n    precio: 1\n";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("empty name")));
    }

    #[test]
    fn parse_catalog_rejects_duplicate_ids() {
        let yaml = "products:\n  - {id: '1', nombre: A, precio: 1}\n  - {id: '1', nombre: B, precio: 2}\n";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn parse_catalog_rejects_negative_price() {
        let yaml = "products:\n  - {id: '1', nombre: A, precio: -3}\n";
        assert!(matches!(
            parse_catalog(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn parse_catalog_reports_malformed_yaml() {
        let err = parse_catalog("products: [").unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileParse(_)));
    }

    #[test]
    fn load_catalog_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "products:\n  - {{id: 'a', nombre: Taza, precio: 100}}").unwrap();
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.products[0].name, "Taza");
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
    }
}
