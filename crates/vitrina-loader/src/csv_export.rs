//! Reading and writing the delimited-text catalog format
//! (`id,nombre,precio,img`, header row required).

use serde_json::Value;
use vitrina_core::ProductRecord;

use crate::error::LoaderError;
use crate::normalize::{canonical_key, NAME_FIELD};
use crate::types::RawRow;

/// Decodes a downloaded body. Invalid UTF-8 is replaced rather than
/// rejected, and a leading byte-order mark is dropped.
#[must_use]
pub fn decode_body(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(text.as_ref()).to_owned()
}

/// Parses CSV text into rows keyed by canonical column name.
///
/// Short rows leave trailing columns absent; extra cells beyond the header
/// are ignored; rows with only blank cells are skipped.
///
/// # Errors
///
/// - [`LoaderError::MissingColumn`] if no header maps to the name column
///   (this includes an empty body).
/// - [`LoaderError::Csv`] on malformed CSV.
pub fn parse_csv(body: &str, context: &str) -> Result<Vec<RawRow>, LoaderError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let csv_err = |source: csv::Error| LoaderError::Csv {
        context: context.to_owned(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(canonical_key)
        .collect();

    if !headers.iter().any(|h| h == NAME_FIELD) {
        return Err(LoaderError::MissingColumn {
            column: NAME_FIELD.to_owned(),
            context: context.to_owned(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            // Aliased headers can collide; the first non-blank cell wins.
            match row.get(header) {
                Some(Value::String(existing)) if !existing.is_empty() => {}
                _ => {
                    row.insert(header.clone(), Value::String(cell.to_owned()));
                }
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Serializes records as CSV with the canonical header.
///
/// # Errors
///
/// Returns [`LoaderError::Csv`] if a record cannot be written.
pub fn write_csv(records: &[ProductRecord], context: &str) -> Result<String, LoaderError> {
    let csv_err = |source: csv::Error| LoaderError::Csv {
        context: context.to_owned(),
        source,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    // An empty catalog still gets a header so it reads back cleanly.
    if records.is_empty() {
        writer
            .write_record(["id", "nombre", "precio", "img"])
            .map_err(csv_err)?;
    }
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    let bytes = writer.into_inner().map_err(|e| LoaderError::Csv {
        context: context.to_owned(),
        source: csv::Error::from(e.into_error()),
    })?;
    Ok(decode_body(&bytes))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_csv_reads_header_and_rows() {
        let body = "id,nombre,precio,img\n1,A,12000,\n2,B,5000,https://x/b.png\n";
        let rows = parse_csv(body, "test").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["nombre"], json!("A"));
        assert_eq!(rows[0]["img"], json!(""));
        assert_eq!(rows[1]["img"], json!("https://x/b.png"));
    }

    #[test]
    fn parse_csv_normalizes_headers_and_strips_bom() {
        let body = "\u{feff} ID , Nombre ,PRECIO\n7,Taza,10\n";
        let rows = parse_csv(body, "test").unwrap();
        assert_eq!(rows[0]["id"], json!("7"));
        assert_eq!(rows[0]["precio"], json!("10"));
    }

    #[test]
    fn parse_csv_handles_quoted_commas() {
        let body = "id,nombre,precio\n1,\"Molde, 3D\",\"25000\"\n";
        let rows = parse_csv(body, "test").unwrap();
        assert_eq!(rows[0]["nombre"], json!("Molde, 3D"));
    }

    #[test]
    fn parse_csv_tolerates_short_rows_and_skips_blank_lines() {
        let body = "id,nombre,precio,img\n1,A\n,,,\n2,B,3,\n";
        let rows = parse_csv(body, "test").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].get("precio").is_none());
    }

    #[test]
    fn parse_csv_aliased_headers_keep_first_non_blank_cell() {
        let body = "id,nombre,name,precio\n1,A,,5\n2,,B,6\n3,C,D,7\n";
        let rows = parse_csv(body, "test").unwrap();
        assert_eq!(rows[0]["nombre"], json!("A"));
        assert_eq!(rows[1]["nombre"], json!("B"));
        assert_eq!(rows[2]["nombre"], json!("C"));
    }

    #[test]
    fn parse_csv_requires_name_column() {
        let err = parse_csv("id,precio\n1,2\n", "sheet").unwrap_err();
        assert!(
            matches!(err, LoaderError::MissingColumn { ref column, ref context } if column == "nombre" && context == "sheet")
        );
    }

    #[test]
    fn parse_csv_empty_body_is_missing_column() {
        assert!(matches!(
            parse_csv("", "empty"),
            Err(LoaderError::MissingColumn { .. })
        ));
    }

    #[test]
    fn decode_body_replaces_invalid_utf8() {
        let decoded = decode_body(b"\xef\xbb\xbfid,nombre\n1,Im\xe1n\n");
        assert!(decoded.starts_with("id,nombre"));
        assert!(decoded.contains('\u{fffd}'));
    }

    #[test]
    fn write_csv_emits_canonical_header() {
        let records = vec![ProductRecord::new("001", "Imán", 12000.0, "")];
        let text = write_csv(&records, "test").unwrap();
        assert!(text.starts_with("id,nombre,precio,img\n"));
        let rows = parse_csv(&text, "test").unwrap();
        assert_eq!(rows[0]["nombre"], json!("Imán"));
    }

    #[test]
    fn write_csv_empty_catalog_has_header_only() {
        let text = write_csv(&[], "test").unwrap();
        assert_eq!(text, "id,nombre,precio,img\n");
        assert!(parse_csv(&text, "test").unwrap().is_empty());
    }
}
