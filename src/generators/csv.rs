use csv_async::AsyncWriter;

use super::REPORT_HEADERS;
use crate::core::{InvoicingError, InvoicingResult};
use crate::models::Report;

/// Exporta reportes a CSV. Los importes se escriben con punto decimal y dos
/// decimales, sin símbolo de moneda.
pub struct CsvGenerator;

impl CsvGenerator {
    pub fn new() -> Self {
        CsvGenerator
    }

    pub async fn generate(&self, report: &Report) -> InvoicingResult<Vec<u8>> {
        let mut writer = AsyncWriter::from_writer(Vec::new());
        writer.write_record(REPORT_HEADERS).await.map_err(csv_error)?;

        for row in &report.rows {
            let date = row.date.format("%Y-%m-%d").to_string();
            let subtotal = format!("{:.2}", row.totals.subtotal);
            let discount = format!("{:.2}", row.totals.discount_amount);
            let tax = format!("{:.2}", row.totals.tax_amount);
            let total = format!("{:.2}", row.totals.total);

            writer
                .write_record(&[
                    row.doc_type.code(),
                    row.number.as_str(),
                    date.as_str(),
                    row.client.as_str(),
                    row.payment_method.as_str(),
                    row.status.as_str(),
                    subtotal.as_str(),
                    discount.as_str(),
                    tax.as_str(),
                    total.as_str(),
                ])
                .await
                .map_err(csv_error)?;
        }

        writer.flush().await?;
        writer
            .into_inner()
            .await
            .map_err(|e| InvoicingError::Report(e.to_string()))
    }
}

impl Default for CsvGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(error: csv_async::Error) -> InvoicingError {
    InvoicingError::Report(error.to_string())
}
