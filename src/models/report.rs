use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Document, DocumentStatus, DocumentTotals, DocumentType};
use crate::core::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Xlsx,
}

/// Filtro de reporte. Los extremos del rango son inclusivos y opcionales.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
}

impl ReportFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        if doc.is_voided() {
            return false;
        }
        if self.from.is_some_and(|from| doc.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| doc.date > to) {
            return false;
        }
        self.doc_type.map_or(true, |t| doc.doc_type == t)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub number: String,
    pub date: NaiveDate,
    pub client: String,
    pub payment_method: String,
    pub status: DocumentStatus,
    #[serde(flatten)]
    pub totals: DocumentTotals,
}

impl From<&Document> for ReportRow {
    fn from(doc: &Document) -> Self {
        ReportRow {
            id: doc.id.clone(),
            doc_type: doc.doc_type,
            number: doc.display_number(),
            date: doc.date,
            client: doc.client.clone(),
            payment_method: doc.payment_method.clone(),
            status: doc.status,
            totals: doc.totals(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub count: usize,
    pub total: f64,
    pub by_type: BTreeMap<DocumentType, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

impl Report {
    /// Construye el reporte a partir de documentos ya ordenados.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>, filter: &ReportFilter) -> Self {
        let rows: Vec<ReportRow> = documents
            .into_iter()
            .filter(|doc| filter.matches(doc))
            .map(ReportRow::from)
            .collect();

        let mut summary = ReportSummary {
            count: rows.len(),
            ..Default::default()
        };
        for row in &rows {
            summary.total = round2(summary.total + row.totals.total);
            let by_type = summary.by_type.entry(row.doc_type).or_insert(0.0);
            *by_type = round2(*by_type + row.totals.total);
        }

        Report { rows, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn doc(doc_type: DocumentType, date: &str, price: f64, status: DocumentStatus) -> Document {
        let mut doc = Document::blank(doc_type, doc_type.default_prefix(), 1, 0.0);
        doc.date = date.parse().unwrap();
        doc.lines.push(LineItem::new("x", price, 1.0));
        doc.status = status;
        doc
    }

    #[test]
    fn voided_documents_are_excluded() {
        let docs = vec![
            doc(DocumentType::Invoice, "2026-03-01", 10.0, DocumentStatus::Final),
            doc(DocumentType::Invoice, "2026-03-02", 99.0, DocumentStatus::Voided),
        ];

        let report = Report::build(&docs, &ReportFilter::default());
        assert_eq!(report.summary.count, 1);
        assert_eq!(report.summary.total, 10.0);
    }

    #[test]
    fn range_is_inclusive_and_type_filter_applies() {
        let docs = vec![
            doc(DocumentType::Invoice, "2026-03-01", 10.0, DocumentStatus::Final),
            doc(DocumentType::Quote, "2026-03-15", 20.0, DocumentStatus::Draft),
            doc(DocumentType::Invoice, "2026-03-31", 30.0, DocumentStatus::Final),
            doc(DocumentType::Invoice, "2026-04-01", 40.0, DocumentStatus::Final),
        ];

        let filter = ReportFilter {
            from: Some("2026-03-01".parse().unwrap()),
            to: Some("2026-03-31".parse().unwrap()),
            doc_type: None,
        };
        let report = Report::build(&docs, &filter);
        assert_eq!(report.summary.count, 3);
        assert_eq!(report.summary.by_type[&DocumentType::Invoice], 40.0);
        assert_eq!(report.summary.by_type[&DocumentType::Quote], 20.0);

        let invoices_only = ReportFilter {
            doc_type: Some(DocumentType::Invoice),
            ..filter
        };
        assert_eq!(Report::build(&docs, &invoices_only).summary.total, 40.0);
    }
}
