use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::products::ProductRecord;

const ID_COL: usize = 8;
const NAME_COL: usize = 36;
const PRICE_COL: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Sales invoice built from the items in a cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub store_name: String,
    pub customer: String,
    pub date: NaiveDate,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
}

impl Invoice {
    /// Builds an invoice with one line per item, in cart order.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MissingCustomer`] if `customer` is blank.
    /// - [`CoreError::EmptyInvoice`] if `items` is empty.
    pub fn new(
        store_name: &str,
        customer: &str,
        date: NaiveDate,
        items: &[ProductRecord],
    ) -> Result<Self, CoreError> {
        let customer = customer.trim();
        if customer.is_empty() {
            return Err(CoreError::MissingCustomer);
        }
        if items.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        let lines: Vec<InvoiceLine> = items
            .iter()
            .map(|item| InvoiceLine {
                id: item.id.clone(),
                name: item.name.clone(),
                price: if item.price.is_finite() { item.price } else { 0.0 },
            })
            .collect();
        let total = lines.iter().map(|l| l.price).sum();

        Ok(Self {
            store_name: store_name.to_owned(),
            customer: customer.to_owned(),
            date,
            lines,
            total,
        })
    }

    /// Suggested download name, e.g. `Factura_ZE_Ana Gómez.txt`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let customer: String = self
            .customer
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
            .collect();
        format!("Factura_{}_{}.txt", self.store_name, customer)
    }

    /// Plain-text rendering: header, line table and total.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(ID_COL + NAME_COL + PRICE_COL + 4);

        writeln!(f, "FACTURA DE VENTA - {}", self.store_name)?;
        writeln!(f, "Fecha: {}", self.date.format("%Y-%m-%d"))?;
        writeln!(f, "Cliente: {}", self.customer)?;
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "| {:<ID_COL$}| {:<NAME_COL$}| {:>PRICE_COL$}|",
            "Cod.", "Concepto", "Precio"
        )?;
        writeln!(f, "{rule}")?;
        for line in &self.lines {
            writeln!(
                f,
                "| {:<ID_COL$}| {:<NAME_COL$}| {:>PRICE_COL$}|",
                truncate(&line.id, ID_COL),
                truncate(&line.name, NAME_COL),
                format_price(line.price)
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "  {:<label$}{:>PRICE_COL$}",
            "TOTAL A PAGAR",
            format_price(self.total),
            label = ID_COL + NAME_COL + 3
        )
    }
}

/// Formats a price as `$12000` when integral, `$12.50` otherwise.
#[must_use]
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${price:.0}")
    } else {
        format!("${price:.2}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn items() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("001", "Imán Souvenir", 12000.0, ""),
            ProductRecord::new("003", "Molde 3D", 25000.0, ""),
            ProductRecord::new("001", "Imán Souvenir", 12000.0, ""),
        ]
    }

    #[test]
    fn new_sums_total_in_cart_order() {
        let invoice = Invoice::new("ZE", "Ana", date(), &items()).unwrap();
        assert_eq!(invoice.lines.len(), 3);
        assert_eq!(invoice.lines[1].id, "003");
        assert!((invoice.total - 49000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_requires_customer() {
        let err = Invoice::new("ZE", "   ", date(), &items()).unwrap_err();
        assert!(matches!(err, CoreError::MissingCustomer));
    }

    #[test]
    fn new_requires_items() {
        let err = Invoice::new("ZE", "Ana", date(), &[]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInvoice));
    }

    #[test]
    fn non_finite_price_counts_as_zero() {
        let items = vec![
            ProductRecord::new("1", "A", f64::NAN, ""),
            ProductRecord::new("2", "B", 10.0, ""),
        ];
        let invoice = Invoice::new("ZE", "Ana", date(), &items).unwrap();
        assert!((invoice.total - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn render_text_contains_header_lines_and_total() {
        let invoice = Invoice::new("ZE", "Ana Gómez", date(), &items()).unwrap();
        let text = invoice.render_text();
        assert!(text.starts_with("FACTURA DE VENTA - ZE\n"));
        assert!(text.contains("Fecha: 2026-03-14"));
        assert!(text.contains("Cliente: Ana Gómez"));
        assert!(text.contains("Cod."));
        assert!(text.contains("Molde 3D"));
        assert!(text.contains("TOTAL A PAGAR"));
        assert!(text.contains("$49000"));
    }

    #[test]
    fn display_matches_render_text_line_for_line() {
        let invoice = Invoice::new("ZE", "Ana", date(), &items()).unwrap();
        let text = format!("{invoice}");
        assert_eq!(text, invoice.render_text());
        // header (3) + blank + rule + column titles + rule + 3 lines + rule + total
        assert_eq!(text.lines().count(), 12);
        assert!(text.ends_with('\n'));
        assert!(text.lines().last().is_some_and(|l| l.trim_end().ends_with("$49000")));
    }

    #[test]
    fn file_name_strips_path_characters() {
        let invoice = Invoice::new("ZE", "Ana/Gómez", date(), &items()).unwrap();
        assert_eq!(invoice.file_name(), "Factura_ZE_AnaGómez.txt");
    }

    #[test]
    fn format_price_integral_and_fractional() {
        assert_eq!(format_price(12000.0), "$12000");
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(0.0), "$0");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
