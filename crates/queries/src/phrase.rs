// crates/queries/src/phrase.rs

use contavoz_core::TransactionKind;

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Portuguese name of the month component of an ISO `YYYY-MM-DD` string.
/// Returns `None` for malformed input or a month outside 1-12; callers must
/// not rely on any particular rendering in that case.
pub fn month_name(date: &str) -> Option<&'static str> {
    let month: usize = date.split('-').nth(1)?.parse().ok()?;
    MONTHS.get(month.checked_sub(1)?).copied()
}

/// Spoken currency phrase: "<reais> reais", plus " e <centavos> centavos"
/// when the fractional part is not zero, plus " de <tipo>s" when a
/// transaction kind is supplied. Non-finite or negative amounts are out of
/// contract.
pub fn format_currency(amount: f64, kind: Option<TransactionKind>) -> String {
    format_amount(amount, "reais", "centavos", kind.map(|k| k.plural()))
}

/// Spoken weight phrase with the same structure as [`format_currency`],
/// using kilos/gramas. The label is pluralized with a trailing "s".
pub fn format_weight(amount: f64, label: Option<&str>) -> String {
    let plural = label.map(|l| format!("{l}s"));
    format_amount(amount, "kilos", "gramas", plural.as_deref())
}

fn format_amount(amount: f64, whole_unit: &str, frac_unit: &str, suffix: Option<&str>) -> String {
    // Two-decimal rendering fixes the precision at the formatting boundary.
    let rendered = format!("{amount:.2}");
    let (whole, frac) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut phrase = format!("{whole} {whole_unit}");
    if frac != "00" {
        phrase.push_str(&format!(" e {frac} {frac_unit}"));
    }
    if let Some(suffix) = suffix {
        phrase.push_str(&format!(" de {suffix}"));
    }
    phrase
}
