//! The budgeting period: a total budget spread over a half-open range of days.

use std::fmt;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{CurrencyCode, MAX_AMOUNT};

/// A budget cycle covering `[start_date, finish_date)`.
///
/// Periods are never mutated in place: editing the budget or finishing early
/// produces a replacement value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl Period {
    pub fn new(
        budget: Decimal,
        start_date: NaiveDate,
        finish_date: NaiveDate,
        currency: CurrencyCode,
    ) -> Result<Self, PeriodError> {
        if finish_date <= start_date {
            return Err(PeriodError::InvalidRange);
        }
        if budget < Decimal::ZERO {
            return Err(PeriodError::NegativeBudget);
        }
        if budget > MAX_AMOUNT {
            return Err(PeriodError::BudgetTooLarge);
        }
        Ok(Self {
            budget,
            start_date,
            finish_date,
            currency,
        })
    }

    /// Number of days in the period.
    pub fn total_days(&self) -> i64 {
        (self.finish_date - self.start_date).num_days()
    }

    /// Days from `today` (inclusive) to the end of the period. Zero or negative once it is over.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.finish_date - today).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.finish_date
    }

    pub fn is_over(&self, today: NaiveDate) -> bool {
        today >= self.finish_date
    }

    /// Last calendar day that still belongs to the period.
    pub fn last_day(&self) -> NaiveDate {
        self.finish_date - Duration::days(1)
    }

    /// Returns a copy whose final day is `today`.
    pub fn finished_early(&self, today: NaiveDate) -> Self {
        let finish_date = (today + Duration::days(1)).max(self.start_date + Duration::days(1));
        Self {
            finish_date: finish_date.min(self.finish_date),
            ..self.clone()
        }
    }

    /// Returns a copy with a new budget and finish date, keeping the start date.
    pub fn with_budget(
        &self,
        budget: Decimal,
        finish_date: NaiveDate,
    ) -> Result<Self, PeriodError> {
        Self::new(budget, self.start_date, finish_date, self.currency.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`Period`] values.
pub enum PeriodError {
    InvalidRange,
    NegativeBudget,
    BudgetTooLarge,
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidRange => f.write_str("period finish date must be after start"),
            PeriodError::NegativeBudget => f.write_str("period budget must not be negative"),
            PeriodError::BudgetTooLarge => {
                write!(f, "period budget must not exceed {MAX_AMOUNT}")
            }
        }
    }
}

impl std::error::Error for PeriodError {}
