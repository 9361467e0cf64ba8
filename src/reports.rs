use crate::core::{InvoicingError, InvoicingResult};
use crate::generators::{CsvGenerator, ExcelGenerator};
use crate::models::{Report, ReportFilter, ReportFormat};
use crate::storage::LocalStore;

/// Reporte exportado: bytes y tipo de contenido.
pub struct ReportExport {
    pub content_type: &'static str,
    pub filename: String,
    pub body: Vec<u8>,
}

pub async fn build(store: &LocalStore, filter: &ReportFilter) -> InvoicingResult<Report> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(InvoicingError::Validation(
                "La fecha inicial es posterior a la final".to_string(),
            ));
        }
    }

    let documents = store.documents_between(filter.from, filter.to).await?;
    Ok(Report::build(&documents, filter))
}

pub async fn export(report: Report, format: ReportFormat) -> InvoicingResult<ReportExport> {
    let stamp = chrono::Local::now().format("%Y%m%d");

    let export = match format {
        ReportFormat::Json => ReportExport {
            content_type: "application/json",
            filename: format!("reporte_{}.json", stamp),
            body: serde_json::to_vec(&report)?,
        },
        ReportFormat::Csv => ReportExport {
            content_type: "text/csv; charset=utf-8",
            filename: format!("reporte_{}.csv", stamp),
            body: CsvGenerator::new().generate(&report).await?,
        },
        ReportFormat::Xlsx => ReportExport {
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            filename: format!("reporte_{}.xlsx", stamp),
            body: ExcelGenerator::new().generate(report).await?,
        },
    };

    tracing::debug!(filename = %export.filename, bytes = export.body.len(), "Reporte exportado");
    Ok(export)
}
