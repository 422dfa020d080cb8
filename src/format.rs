//! Label formatting for cards and charts.

/// Group the integer part with commas and keep up to three fraction digits,
/// trailing zeros dropped: `5489.5` → `5,489.5`, `31768` → `31,768`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `45` → `45%`, `45.5` → `45.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// Amount already in millions: `5489.5` → `$5,489.5M`.
pub fn format_millions(amount_millions: f64) -> String {
    format!("${}M", format_number(amount_millions))
}

/// Raw dollars shown in millions with one decimal: `760650238` → `$760.7M`.
pub fn format_dollars_as_millions(amount: f64) -> String {
    format!("${:.1}M", amount / 1_000_000.0)
}
