//! Locale-aware rendering of decimal amounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use daybudget_core::round_for_display;
use daybudget_domain::CurrencyCode;

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    /// Picks separators for a handful of known language tags; everything else uses en-US.
    pub fn from_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator) = match tag {
            "de-DE" | "es-ES" | "it-IT" | "pt-BR" | "nl-NL" => (',', '.'),
            "fr-FR" | "ru-RU" | "pl-PL" | "uk-UA" => (',', ' '),
            "de-CH" => ('.', '\''),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
    pub screen_reader_mode: bool,
}

/// Renders `value` with the currency's precision (half-even) and locale separators.
pub fn format_number(locale: &LocaleConfig, value: Decimal, code: &CurrencyCode) -> String {
    let precision = code.minor_units() as usize;
    let rounded = round_for_display(value.abs(), code);
    let body = format!("{:.*}", precision, rounded);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut out = group_digits(int_part, locale.grouping_separator);
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let body = format_number(locale, amount, code);
    let negative = amount < Decimal::ZERO && !round_for_display(amount, code).is_zero();
    let formatted = match options.currency_display {
        CurrencyDisplay::Symbol => format!("{}{}", code.symbol(), body),
        CurrencyDisplay::Code => format!("{} {}", body, code.as_str()),
    };
    if options.screen_reader_mode {
        return if negative {
            format!("minus {formatted}")
        } else {
            formatted
        };
    }
    match (negative, options.negative_style) {
        (false, _) => formatted,
        (true, NegativeStyle::Sign) => format!("-{formatted}"),
        (true, NegativeStyle::Parentheses) => format!("({formatted})"),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}
