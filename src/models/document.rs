use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DocumentStatus, DocumentType};
use crate::core::{default_quantity, lenient, round2, today};

/// Factura o cotización.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub doc_type: DocumentType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub prefix: String,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub number: u64,
    #[serde(default = "today", deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::text")]
    pub client: String,
    #[serde(default)]
    pub lines: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub discount_pct: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub tax_pct: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, deserialize_with = "lenient::text")]
    pub payment_method: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub payment_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub desc: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(default = "default_quantity", deserialize_with = "lenient::quantity")]
    pub qty: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: f64, qty: f64) -> Self {
        LineItem {
            name: name.into(),
            desc: String::new(),
            price,
            qty,
        }
    }

    pub fn amount(&self) -> f64 {
        self.price * self.qty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Subtotal -> descuento -> impuesto -> total.
///
/// Cada paso se redondea a 2 decimales antes de alimentar el siguiente; el
/// total puede diferir en un centavo del redondeo único al final.
pub fn calculate(lines: &[LineItem], discount_pct: f64, tax_pct: f64) -> DocumentTotals {
    let subtotal = round2(lines.iter().fold(0.0, |acc, line| acc + line.amount()));
    let discount_amount = round2(subtotal * (discount_pct / 100.0));
    let base = round2(subtotal - discount_amount);
    let tax_amount = round2(base * (tax_pct / 100.0));

    DocumentTotals {
        subtotal,
        discount_amount,
        tax_amount,
        total: round2(base + tax_amount),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Document {
    /// Documento vacío con número ya asignado.
    pub fn blank(doc_type: DocumentType, prefix: String, number: u64, tax_pct: f64) -> Self {
        Document {
            id: new_id(),
            doc_type,
            prefix,
            number,
            date: today(),
            client: String::new(),
            lines: Vec::new(),
            discount_pct: 0.0,
            tax_pct,
            notes: String::new(),
            status: DocumentStatus::Draft,
            payment_method: String::new(),
            payment_ref: String::new(),
            updated_at: None,
        }
    }

    pub fn totals(&self) -> DocumentTotals {
        calculate(&self.lines, self.discount_pct, self.tax_pct)
    }

    /// Número visible, por ejemplo `FAC-12`.
    pub fn display_number(&self) -> String {
        format!("{}{}", self.prefix, self.number)
    }

    pub fn is_voided(&self) -> bool {
        self.status == DocumentStatus::Voided
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with(lines: Vec<LineItem>, discount_pct: f64, tax_pct: f64) -> Document {
        let mut doc = Document::blank(DocumentType::Invoice, "FAC-".into(), 1, tax_pct);
        doc.lines = lines;
        doc.discount_pct = discount_pct;
        doc
    }

    #[test]
    fn two_lines_with_discount_and_tax() {
        let doc = doc_with(
            vec![LineItem::new("Servicio", 50.0, 2.0), LineItem::new("Producto", 25.0, 1.0)],
            10.0,
            11.5,
        );

        let totals = doc.totals();
        assert_eq!(totals.subtotal, 125.0);
        assert_eq!(totals.discount_amount, 12.5);
        assert_eq!(totals.tax_amount, 12.94);
        assert_eq!(totals.total, 125.44);
    }

    #[test]
    fn rounding_happens_at_each_step() {
        // 1.00 con 12.5% de descuento: 0.125 -> 0.13, base 0.87.
        // Redondeando solo al final daría 0.88.
        let totals = calculate(&[LineItem::new("x", 1.0, 1.0)], 12.5, 0.0);
        assert_eq!(totals.discount_amount, 0.13);
        assert_eq!(totals.total, 0.87);
    }

    #[test]
    fn fractional_quantities_and_tax() {
        let totals = calculate(
            &[LineItem::new("a", 19.99, 3.0), LineItem::new("b", 4.5, 2.5)],
            0.0,
            7.0,
        );
        assert_eq!(totals.subtotal, 71.22);
        assert_eq!(totals.tax_amount, 4.99);
        assert_eq!(totals.total, 76.21);
    }

    #[test]
    fn empty_document_totals_zero() {
        let totals = calculate(&[], 50.0, 11.5);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn malformed_numbers_coerce_to_zero() {
        let doc: Document = serde_json::from_value(json!({
            "id": "d1",
            "type": "FAC",
            "number": "7",
            "date": "2026-01-15",
            "discountPct": "abc",
            "taxPct": "10,5",
            "lines": [
                { "name": "a", "price": "20", "qty": "" },
                { "name": "b", "price": null, "qty": 3 },
                { "name": "c", "price": 5 }
            ]
        }))
        .unwrap();

        assert_eq!(doc.number, 7);
        assert_eq!(doc.discount_pct, 0.0);
        assert_eq!(doc.tax_pct, 10.5);
        assert_eq!(doc.lines[0].qty, 1.0);
        assert_eq!(doc.lines[1].price, 0.0);
        assert_eq!(doc.lines[2].qty, 1.0);
        assert_eq!(doc.totals().subtotal, 25.0);
    }

    #[test]
    fn legacy_wire_format_round_trips_field_names() {
        let doc = doc_with(vec![LineItem::new("a", 1.0, 1.0)], 0.0, 0.0);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["type"], "FAC");
        assert_eq!(value["status"], "borrador");
        assert!(value.get("discountPct").is_some());
        assert!(value.get("paymentMethod").is_some());
        assert!(value.get("updatedAt").is_none());
        assert_eq!(doc.display_number(), "FAC-1");
    }
}
