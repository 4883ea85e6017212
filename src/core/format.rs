//! Currency display helpers shared by the reconciler and the CLI.

use crate::core::constants::LOADING_PLACEHOLDER;
use crate::core::venture::Venture;

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount: `$11,132`, `-$100`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let magnitude = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${magnitude}")
    } else {
        format!("${magnitude}")
    }
}

/// Profit display: `+$200`, `-$100`, `+$0`.
pub fn format_signed_currency(value: f64) -> String {
    let rounded = value.round();
    if rounded >= 0.0 {
        format!("+{}", format_currency(rounded))
    } else {
        format_currency(rounded)
    }
}

/// Revenue cell for a venture. The crypto venture shows signed profit, or the
/// loading placeholder until a snapshot has been applied.
pub fn venture_revenue_display(venture: &Venture, crypto_ready: bool) -> String {
    match venture {
        Venture::Ordinary(v) => format_currency(v.revenue),
        Venture::Crypto(_) if !crypto_ready => LOADING_PLACEHOLDER.to_string(),
        Venture::Crypto(v) => format_signed_currency(v.revenue()),
    }
}
