use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::InvoicingError;

/// Tipo de documento. En el almacén se guarda con el código corto
/// (`FAC` / `COT`) para seguir siendo compatible con los datos existentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "FAC", alias = "invoice")]
    Invoice,
    #[default]
    #[serde(rename = "COT", alias = "quote")]
    Quote,
}

impl DocumentType {
    pub const ALL: [DocumentType; 2] = [DocumentType::Invoice, DocumentType::Quote];

    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "FAC",
            DocumentType::Quote => "COT",
        }
    }

    /// Título impreso en el encabezado del documento.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Factura",
            DocumentType::Quote => "Cotización",
        }
    }

    pub fn default_prefix(&self) -> String {
        format!("{}-", self.code())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for DocumentType {
    type Err = InvoicingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fac" | "invoice" => Ok(DocumentType::Invoice),
            "cot" | "quote" => Ok(DocumentType::Quote),
            other => Err(InvoicingError::Validation(format!(
                "Tipo de documento desconocido: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    #[serde(rename = "borrador", alias = "draft")]
    Draft,
    #[serde(rename = "final")]
    Final,
    #[serde(rename = "anulado", alias = "voided")]
    Voided,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "borrador",
            DocumentStatus::Final => "final",
            DocumentStatus::Voided => "anulado",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = InvoicingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "borrador" | "draft" => Ok(DocumentStatus::Draft),
            "final" => Ok(DocumentStatus::Final),
            "anulado" | "voided" => Ok(DocumentStatus::Voided),
            other => Err(InvoicingError::Validation(format!(
                "Estado desconocido: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_accepts_codes_and_names() {
        assert_eq!("FAC".parse::<DocumentType>().unwrap(), DocumentType::Invoice);
        assert_eq!("quote".parse::<DocumentType>().unwrap(), DocumentType::Quote);
        assert!("recibo".parse::<DocumentType>().is_err());

        let parsed: DocumentType = serde_json::from_str("\"invoice\"").unwrap();
        assert_eq!(parsed, DocumentType::Invoice);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"FAC\"");
    }

    #[test]
    fn status_keeps_legacy_wire_values() {
        let status: DocumentStatus = serde_json::from_str("\"voided\"").unwrap();
        assert_eq!(status, DocumentStatus::Voided);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"anulado\"");
        assert_eq!(DocumentStatus::default(), DocumentStatus::Draft);
    }

    #[test]
    fn default_prefix_uses_code() {
        assert_eq!(DocumentType::Quote.default_prefix(), "COT-");
        assert_eq!(DocumentType::Invoice.title(), "Factura");
    }
}
