use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use daybudget_domain::{CurrencyCode, RestedBudgetDistributionMethod};

/// Stores user-configurable preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub distribution_method: RestedBudgetDistributionMethod,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub screen_reader_mode: bool,
    /// Write amounts as `12.50 USD` instead of `$12.50`.
    #[serde(default)]
    pub show_currency_code: bool,
    /// Write negative amounts as `($5.00)` instead of `-$5.00`.
    #[serde(default)]
    pub negative_parentheses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: CurrencyCode::default(),
            distribution_method: RestedBudgetDistributionMethod::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            screen_reader_mode: false,
            show_currency_code: false,
            negative_parentheses: false,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Base directory for daybudget data when no override is configured.
    pub fn default_base_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybudget")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "currency": "EUR" }"#).unwrap();
        assert_eq!(cfg.currency, CurrencyCode::new("EUR"));
        assert_eq!(cfg.distribution_method, RestedBudgetDistributionMethod::Ask);
        assert_eq!(cfg.locale, "en-US");
        assert!(cfg.ui_color_enabled);
        assert!(!cfg.show_currency_code);
        assert!(!cfg.negative_parentheses);
    }

    #[test]
    fn base_dir_is_named_after_the_app() {
        assert!(Config::default_base_dir().ends_with("daybudget"));
    }
}
