use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

use super::REPORT_HEADERS;
use crate::core::{InvoicingError, InvoicingResult};
use crate::models::Report;

/// Exporta reportes a Excel.
pub struct ExcelGenerator;

impl ExcelGenerator {
    pub fn new() -> Self {
        ExcelGenerator
    }

    pub async fn generate(&self, report: Report) -> InvoicingResult<Vec<u8>> {
        // Trabajo de CPU: fuera del hilo del runtime
        tokio::task::spawn_blocking(move || Self::build_workbook(&report))
            .await
            .map_err(|e| InvoicingError::Report(e.to_string()))?
    }

    fn build_workbook(report: &Report) -> InvoicingResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Reporte")?;

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x4472C4))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin);
        let cell_format = Format::new().set_border(FormatBorder::Thin);
        let money_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_num_format("#,##0.00");
        let total_format = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_num_format("#,##0.00");

        for (col, header) in REPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, row) in report.rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            let date = row.date.format("%Y-%m-%d").to_string();
            let text_cells = [
                row.doc_type.code(),
                row.number.as_str(),
                date.as_str(),
                row.client.as_str(),
                row.payment_method.as_str(),
                row.status.as_str(),
            ];
            for (col, value) in text_cells.iter().enumerate() {
                worksheet.write_string_with_format(r, col as u16, *value, &cell_format)?;
            }

            let amounts = [
                row.totals.subtotal,
                row.totals.discount_amount,
                row.totals.tax_amount,
                row.totals.total,
            ];
            for (offset, amount) in amounts.iter().enumerate() {
                let col = (text_cells.len() + offset) as u16;
                worksheet.write_number_with_format(r, col, *amount, &money_format)?;
            }
        }

        let last_col = (REPORT_HEADERS.len() - 1) as u16;
        let total_row = (report.rows.len() + 1) as u32;
        worksheet.write_string_with_format(total_row, last_col - 1, "Total", &total_format)?;
        worksheet.write_number_with_format(total_row, last_col, report.summary.total, &total_format)?;

        worksheet.set_freeze_panes(1, 0)?;
        if !report.rows.is_empty() {
            worksheet.autofilter(0, 0, report.rows.len() as u32, last_col)?;
        }
        worksheet.set_column_width(3, 30)?;

        Ok(workbook.save_to_buffer()?)
    }
}

impl Default for ExcelGenerator {
    fn default() -> Self {
        Self::new()
    }
}
