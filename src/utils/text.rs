use rust_decimal::Decimal;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase and strip diacritics: `"Medellín"` → `"medellin"`.
pub fn fold_diacritics(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Format an amount with thousand separators.
/// Whole amounts print without decimals: `13000` → `"$13,000"`, `12.5` → `"$12.50"`.
pub fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = if abs.fract().is_zero() {
        format!("{:.0}", abs.trunc())
    } else {
        format!("{abs:.2}")
    };
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next();

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    match dec_part {
        Some(dec) => format!("{sign}${with_commas}.{dec}"),
        None => format!("{sign}${with_commas}"),
    }
}
