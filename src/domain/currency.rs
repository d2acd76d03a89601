// src/domain/currency.rs

//! Brazilian-real formatting for cards, sliders and detail pages.

/// One decimal with a comma when fractional, none otherwise.
fn compact(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}").replace('.', ",")
    }
}

/// pt-BR grouping: `1.234.567` and `,50` for cents when present.
fn pt_br_number(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let (int_part, frac_part) = (cents / 100, cents % 100);

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac_part == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{frac_part:02}")
    }
}

/// Marketing format: "R$ 500 mil", "R$ 1,2 milhão", "R$ 3 milhões".
pub fn format_currency(value: f64) -> String {
    if value == 0.0 {
        return "R$ 0".to_string();
    }
    let abs = value.abs();

    if abs >= 1_000_000.0 {
        let millions = value / 1_000_000.0;
        let unit = if millions.abs() == 1.0 {
            "milhão"
        } else {
            "milhões"
        };
        return format!("R$ {} {unit}", compact(millions));
    }
    if abs >= 1_000.0 {
        return format!("R$ {} mil", compact(value / 1_000.0));
    }
    format!("R$ {}", pt_br_number(value))
}

/// Slider labels: "R$ 1,2M", "R$ 500k".
pub fn format_currency_short(value: f64) -> String {
    if value == 0.0 {
        return "R$ 0".to_string();
    }
    let abs = value.abs();

    if abs >= 1_000_000.0 {
        return format!("R$ {}M", compact(value / 1_000_000.0));
    }
    if abs >= 1_000.0 {
        return format!("R$ {}k", compact(value / 1_000.0));
    }
    format!("R$ {}", compact(value))
}

/// Full amount without abbreviation: "R$ 1.200.000".
pub fn format_currency_full(value: f64) -> String {
    format!("R$ {}", pt_br_number(value))
}
