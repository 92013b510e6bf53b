//! Display helpers for KPI values (Dutch-style separators).

/// Placeholder for a missing value.
pub(crate) const MISSING: &str = "\u{2014}";

/// Whole euros with `.` as thousands separator, e.g. `€1.234.567`.
pub(crate) fn fmt_eur(value: f64) -> String {
    if !value.is_finite() {
        return "€0".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}€{}", group_thousands(rounded.unsigned_abs()))
}

/// Fraction as a percentage with `,` as decimal separator, e.g. `0.125` → `12,5%`.
pub(crate) fn fmt_pct(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.digits$}%", value * 100.0).replace('.', ",")
}

/// Visitor counts, rounded to whole people.
pub(crate) fn fmt_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(rounded.unsigned_abs()))
}

/// Applies `f` to a present value, or renders [`MISSING`].
pub(crate) fn fmt_opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| MISSING.to_string(), f)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
