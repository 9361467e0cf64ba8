use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DocumentType;
use crate::core::lenient;

/// Configuración del negocio. Los prefijos y contadores se guardan aparte,
/// en la tabla de numeración, y se agregan aquí al leer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_business_name")]
    pub business_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_tax_percent", deserialize_with = "lenient::number")]
    pub tax_percent: f64,
    #[serde(default)]
    pub prefixes: BTreeMap<DocumentType, String>,
    #[serde(default)]
    pub counters: BTreeMap<DocumentType, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
}

fn default_business_name() -> String {
    "Oasis".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_locale() -> String {
    "es-PR".to_string()
}

fn default_tax_percent() -> f64 {
    11.5
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            business_name: default_business_name(),
            currency: default_currency(),
            locale: default_locale(),
            tax_percent: default_tax_percent(),
            prefixes: DocumentType::ALL
                .iter()
                .map(|t| (*t, t.default_prefix()))
                .collect(),
            counters: DocumentType::ALL.iter().map(|t| (*t, 1)).collect(),
            logo_data_url: None,
            pin_hash: None,
        }
    }
}

impl Settings {
    /// Copia sin el hash del PIN, para respuestas de la API.
    pub fn redacted(mut self) -> Self {
        self.pin_hash = None;
        self
    }

    pub fn has_pin(&self) -> bool {
        self.pin_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(name) = &patch.business_name {
            self.business_name = name.clone();
        }
        if let Some(currency) = &patch.currency {
            self.currency = currency.clone();
        }
        if let Some(locale) = &patch.locale {
            self.locale = locale.clone();
        }
        if let Some(tax) = patch.tax_percent {
            self.tax_percent = tax;
        }
        if let Some(logo) = &patch.logo_data_url {
            self.logo_data_url = if logo.is_empty() { None } else { Some(logo.clone()) };
        }
    }
}

/// Actualización parcial de la configuración.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub business_name: Option<String>,
    pub currency: Option<String>,
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::optional_number")]
    pub tax_percent: Option<f64>,
    pub logo_data_url: Option<String>,
    #[serde(default)]
    pub prefixes: BTreeMap<DocumentType, String>,
    #[serde(default)]
    pub counters: BTreeMap<DocumentType, serde_json::Value>,
}
