//! Shared traits, currency metadata, and enums for budgeting primitives.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest budget or single spend accepted, one trillion in any currency.
///
/// Keeps every sum and product the allowance arithmetic forms well inside
/// the range of [`Decimal`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Exposes a stable identifier for entities kept in the transaction log.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving decimal amounts.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// ISO 4217 style currency code. Unknown or custom codes fall back to two minor units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal places in the currency's smallest unit.
    pub fn minor_units(&self) -> u32 {
        match self.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
            "KWD" | "BHD" | "OMR" | "JOD" | "TND" => 3,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> String {
        match self.as_str() {
            "USD" => "$".into(),
            "EUR" => "€".into(),
            "GBP" => "£".into(),
            "JPY" => "¥".into(),
            "RUB" => "₽".into(),
            "AUD" => "A$".into(),
            _ => self.0.clone(),
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User preference deciding what happens to allowance left unspent when a new day starts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestedBudgetDistributionMethod {
    /// Ask the user every time there is something left over.
    #[default]
    Ask,
    /// Spread the leftover evenly across every remaining day.
    Rest,
    /// Add the whole leftover to today's allowance.
    AddToday,
    /// Set the leftover aside; it no longer feeds daily allowances.
    AddSavings,
}

impl RestedBudgetDistributionMethod {
    /// Returns the concrete distribution, or `None` when the user has to be asked.
    pub fn resolved(self) -> Option<Distribution> {
        match self {
            RestedBudgetDistributionMethod::Ask => None,
            RestedBudgetDistributionMethod::Rest => Some(Distribution::Rest),
            RestedBudgetDistributionMethod::AddToday => Some(Distribution::AddToday),
            RestedBudgetDistributionMethod::AddSavings => Some(Distribution::AddSavings),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ask" => Some(Self::Ask),
            "rest" => Some(Self::Rest),
            "add_today" | "today" => Some(Self::AddToday),
            "add_savings" | "savings" => Some(Self::AddSavings),
            _ => None,
        }
    }
}

impl fmt::Display for RestedBudgetDistributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RestedBudgetDistributionMethod::Ask => "ask",
            RestedBudgetDistributionMethod::Rest => "rest",
            RestedBudgetDistributionMethod::AddToday => "add-today",
            RestedBudgetDistributionMethod::AddSavings => "add-savings",
        };
        f.write_str(label)
    }
}

/// A concrete way of distributing a leftover, as chosen by preference or by the user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Distribution {
    Rest,
    AddToday,
    AddSavings,
}

impl From<Distribution> for RestedBudgetDistributionMethod {
    fn from(value: Distribution) -> Self {
        match value {
            Distribution::Rest => RestedBudgetDistributionMethod::Rest,
            Distribution::AddToday => RestedBudgetDistributionMethod::AddToday,
            Distribution::AddSavings => RestedBudgetDistributionMethod::AddSavings,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RestedBudgetDistributionMethod::from(*self).fmt(f)
    }
}
