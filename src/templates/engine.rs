use minijinja::{context, Environment};

use super::helpers;
use crate::core::InvoicingResult;
use crate::models::{Document, Settings};

const DOCUMENT_TEMPLATE: &str = "document.html";

/// Vista de impresión de documentos en HTML.
pub struct PrintRenderer {
    env: Environment<'static>,
}

impl PrintRenderer {
    pub fn new() -> InvoicingResult<Self> {
        let mut env = Environment::new();

        // Filtros
        env.add_filter("money", helpers::money_filter);
        env.add_filter("percentage", helpers::percentage_filter);
        env.add_filter("quantity", helpers::format_quantity);

        env.add_template(DOCUMENT_TEMPLATE, include_str!("document.html"))?;

        Ok(PrintRenderer { env })
    }

    /// Renderiza el documento. Con `auto_print` la página abre el diálogo de
    /// impresión del navegador al cargar.
    pub fn render_document(
        &self,
        doc: &Document,
        settings: &Settings,
        auto_print: bool,
    ) -> InvoicingResult<String> {
        let template = self.env.get_template(DOCUMENT_TEMPLATE)?;

        let business_name = if settings.business_name.is_empty() {
            "Oasis"
        } else {
            settings.business_name.as_str()
        };

        let rendered = template.render(context! {
            title => doc.doc_type.title(),
            number => doc.display_number(),
            date => helpers::format_date(doc.date, &settings.locale),
            doc => doc,
            totals => doc.totals(),
            business_name => business_name,
            logo => settings.logo_data_url.as_deref().unwrap_or(""),
            currency => &settings.currency,
            locale => &settings.locale,
            auto_print => auto_print,
        })?;

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, LineItem};

    fn sample() -> (Document, Settings) {
        let mut doc = Document::blank(DocumentType::Invoice, "FAC-".into(), 42, 11.5);
        doc.client = "Ana <Ruiz>".into();
        doc.date = "2026-03-09".parse().unwrap();
        doc.payment_method = "ATH Móvil".into();
        doc.payment_ref = "R-1".into();
        doc.lines.push(LineItem::new("Servicio básico", 50.0, 2.0));
        (doc, Settings::default())
    }

    #[test]
    fn renders_header_lines_and_totals() {
        let renderer = PrintRenderer::new().unwrap();
        let (doc, settings) = sample();

        let html = renderer.render_document(&doc, &settings, false).unwrap();
        assert!(html.contains("Factura FAC-42"));
        assert!(html.contains("09/03/2026"));
        assert!(html.contains("ATH Móvil"));
        assert!(html.contains("$100.00"));
        assert!(html.contains("$111.50"));
        assert!(html.contains("IVU (11.5%)"));
        assert!(!html.contains("print()"));
    }

    #[test]
    fn escapes_client_text() {
        let renderer = PrintRenderer::new().unwrap();
        let (doc, settings) = sample();

        let html = renderer.render_document(&doc, &settings, true).unwrap();
        assert!(html.contains("Ana &lt;Ruiz&gt;"));
        assert!(html.contains("print()"));
    }
}
