use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Chilean pesos in integer units; CLP carries no decimal places.
pub type Money = i64;

/// Locale-aware formatting preferences for monetary display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub currency_symbol: String,
    pub grouping_separator: char,
}

/// Display conventions for Chilean pesos (`es-CL`).
pub static CLP_LOCALE: Lazy<LocaleConfig> = Lazy::new(|| LocaleConfig {
    language_tag: "es-CL".into(),
    currency_symbol: "$".into(),
    grouping_separator: '.',
});

impl Default for LocaleConfig {
    fn default() -> Self {
        CLP_LOCALE.clone()
    }
}

/// Formats an amount with the default Chilean locale.
pub fn format_clp(amount: Money) -> String {
    format_money(amount, &CLP_LOCALE)
}

pub fn format_money(amount: Money, locale: &LocaleConfig) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = group_digits(&digits, locale.grouping_separator);
    if amount < 0 {
        format!("-{}{}", locale.currency_symbol, grouped)
    } else {
        format!("{}{}", locale.currency_symbol, grouped)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// Rounds to two decimal places, the precision used for percentages.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Integer division with half-up rounding, used for even splits.
pub fn div_round(amount: Money, parts: u32) -> Money {
    (amount as f64 / f64::from(parts)).round() as Money
}
