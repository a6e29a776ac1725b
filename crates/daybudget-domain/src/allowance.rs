//! Per-day allowance bookkeeping carried from one calendar day to the next.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// The allowance for the day the state was last recalculated on.
///
/// `spent` holds spending committed on earlier days; `spent_from_daily_budget`
/// holds what was spent on `last_recalc_date` itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyAllowanceState {
    pub daily_budget: Decimal,
    pub spent_from_daily_budget: Decimal,
    pub last_recalc_date: NaiveDate,
    #[serde(default)]
    pub spent: Decimal,
    #[serde(default)]
    pub saved: Decimal,
}

impl DailyAllowanceState {
    pub fn new(daily_budget: Decimal, last_recalc_date: NaiveDate) -> Self {
        Self {
            daily_budget,
            spent_from_daily_budget: Decimal::ZERO,
            last_recalc_date,
            spent: Decimal::ZERO,
            saved: Decimal::ZERO,
        }
    }

    /// What is still available from the current day's allowance. Negative when overspent.
    pub fn rest_of_daily_budget(&self) -> Decimal {
        self.daily_budget - self.spent_from_daily_budget
    }

    /// Everything spent in the period so far, today included.
    pub fn total_spent(&self) -> Decimal {
        self.spent + self.spent_from_daily_budget
    }

    /// Budget not yet spent or set aside.
    pub fn rest_budget(&self, period: &Period) -> Decimal {
        period.budget - self.spent - self.saved - self.spent_from_daily_budget
    }

    pub fn is_overspent_today(&self) -> bool {
        self.spent_from_daily_budget > self.daily_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CurrencyCode;
    use rust_decimal_macros::dec;

    #[test]
    fn derives_rest_amounts() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let finish = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let period = Period::new(dec!(300), start, finish, CurrencyCode::default()).unwrap();
        let mut state = DailyAllowanceState::new(dec!(30), start);
        state.spent_from_daily_budget = dec!(10);

        assert_eq!(state.rest_of_daily_budget(), dec!(20));
        assert_eq!(state.rest_budget(&period), dec!(290));
        assert!(!state.is_overspent_today());

        state.spent_from_daily_budget = dec!(45);
        assert!(state.is_overspent_today());
        assert_eq!(state.rest_of_daily_budget(), dec!(-15));
    }
}
