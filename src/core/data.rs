use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Redondea a 2 decimales, con empate hacia afuera del cero, sobre el valor
/// binario exacto del `f64` (igual que `toFixed(2)` en los datos heredados).
pub fn round2(value: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        // Fuera del rango de Decimal ya no hay centavos que redondear
        return if value.is_finite() { value } else { 0.0 };
    };

    exact
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse()
        .unwrap_or(0.0)
}

/// Convierte texto libre a número. Acepta coma decimal y lee el prefijo
/// numérico más largo ("12,5 kg" -> 12.5). Lo que no sea un número vale 0.
pub fn parse_number(raw: &str) -> f64 {
    let text = raw.trim_start().replacen(',', ".", 1);
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Coerción numérica de un valor JSON arbitrario.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_number(s),
        _ => 0.0,
    }
}

/// Valores vacíos, nulos o cero se tratan como "sin especificar".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Deserializadores tolerantes para campos que llegan desde formularios o
/// desde el almacén remoto con tipos inconsistentes.
pub mod lenient {
    use super::*;

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(to_number(&value))
    }

    /// Cantidad de una línea: vacía o cero cuenta como 1.
    pub fn quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if is_blank(&value) {
            Ok(1.0)
        } else {
            Ok(to_number(&value))
        }
    }

    pub fn counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let n = to_number(&value);
        Ok(if n > 0.0 { n.trunc() as u64 } else { 0 })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Fecha `YYYY-MM-DD`; también acepta un timestamp ISO. Vacía o
    /// inválida vale hoy.
    pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.trim().get(..10))
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .unwrap_or_else(today))
    }

    /// Número opcional: ausente o `null` queda como `None`.
    pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(|v| to_number(&v)))
    }
}

pub fn default_quantity() -> f64 {
    1.0
}
