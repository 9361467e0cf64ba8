use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    English,  // 1,234.56
    European, // 1.234,56
}

impl NumberFormat {
    pub fn for_locale(locale: &str) -> Self {
        let lang = locale.to_ascii_lowercase();
        let european = ["es-es", "de", "fr", "it", "pt", "nl", "es-ar", "es-co", "es-cl"]
            .iter()
            .any(|prefix| lang.starts_with(prefix));

        if european {
            NumberFormat::European
        } else {
            NumberFormat::English
        }
    }

    fn separators(&self) -> (char, char) {
        match self {
            NumberFormat::English => (',', '.'),
            NumberFormat::European => ('.', ','),
        }
    }
}

pub fn currency_symbol(currency: &str) -> &str {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "DOP" | "MXN" | "COP" | "ARS" | "CLP" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => currency,
    }
}

pub fn format_number_with_separators(num: f64, decimals: usize, format: NumberFormat) -> String {
    let (group, decimal_sep) = format.separators();
    let formatted = format!("{:.decimals$}", num.abs(), decimals = decimals);
    let mut parts = formatted.split('.');
    let integer = parts.next().unwrap_or("0");
    let decimal = parts.next();

    let mut grouped = String::new();
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(c);
    }

    let sign = if num < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match decimal {
        Some(decimal) => format!("{}{}{}{}", sign, grouped, decimal_sep, decimal),
        None => format!("{}{}", sign, grouped),
    }
}

/// Formatea un importe según moneda y configuración regional.
pub fn format_money(amount: f64, currency: &str, locale: &str) -> String {
    let format = NumberFormat::for_locale(locale);
    let symbol = currency_symbol(currency);
    let number = format_number_with_separators(amount.abs(), 2, format);
    let sign = if amount < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match format {
        NumberFormat::English if symbol.chars().count() == 1 => format!("{}{}{}", sign, symbol, number),
        NumberFormat::English => format!("{}{} {}", sign, symbol, number),
        NumberFormat::European => format!("{}{} {}", sign, number, symbol),
    }
}

/// Fecha corta según la configuración regional.
pub fn format_date(date: NaiveDate, locale: &str) -> String {
    let lang = locale.to_ascii_lowercase();
    let pattern = if lang == "en-us" {
        "%m/%d/%Y"
    } else if lang.starts_with("ja") || lang.starts_with("zh") || lang.starts_with("ko") {
        "%Y/%m/%d"
    } else {
        "%d/%m/%Y"
    };
    date.format(pattern).to_string()
}

/// Cantidades sin ceros sobrantes: 2 -> "2", 2.5 -> "2.5".
pub fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        let text = format!("{:.4}", qty);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// Filtros de minijinja

pub fn money_filter(value: f64, currency: Option<String>, locale: Option<String>) -> String {
    format_money(
        value,
        currency.as_deref().unwrap_or("USD"),
        locale.as_deref().unwrap_or("es-PR"),
    )
}

pub fn percentage_filter(value: f64) -> String {
    format_quantity(value) + "%"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_for_puerto_rico_and_spain() {
        assert_eq!(format_money(1234.5, "USD", "es-PR"), "$1,234.50");
        assert_eq!(format_money(1234.5, "EUR", "es-ES"), "1.234,50 €");
        assert_eq!(format_money(-3.0, "USD", "en-US"), "-$3.00");
        assert_eq!(format_money(12.0, "CHF", "en-US"), "CHF 12.00");
    }

    #[test]
    fn grouping_handles_short_and_long_numbers() {
        assert_eq!(format_number_with_separators(5.0, 2, NumberFormat::English), "5.00");
        assert_eq!(
            format_number_with_separators(1234567.891, 2, NumberFormat::English),
            "1,234,567.89"
        );
        assert_eq!(format_number_with_separators(999.0, 0, NumberFormat::European), "999");
    }

    #[test]
    fn dates_follow_locale() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(format_date(date, "es-PR"), "09/03/2026");
        assert_eq!(format_date(date, "en-US"), "03/09/2026");
    }

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(percentage_filter(11.5), "11.5%");
    }
}
