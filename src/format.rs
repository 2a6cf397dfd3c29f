use crate::store::Currency;

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(value: f64, currency: &Currency) -> String {
    let rounded = if value.is_finite() {
        value.round() as i64
    } else {
        0
    };
    format!("{}{}", currency.symbol, group_thousands(rounded))
}

pub fn format_currency_short(value: f64, currency: &Currency) -> String {
    if value >= 1_000_000.0 {
        format!("{}{:.1}M", currency.symbol, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{}{:.0}k", currency.symbol, value / 1_000.0)
    } else {
        format_currency(value, currency)
    }
}

pub fn format_pct(value: f64) -> String {
    format!("{value:.2}%")
}
