//! Keeps the allowance state in step with the SPENT entries of the log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use daybudget_domain::{DailyAllowanceState, MAX_AMOUNT};

use crate::CoreError;

pub struct SpendingService;

impl SpendingService {
    /// Books a spend dated `day` against the allowance.
    ///
    /// Spends on the current allowance day reduce today's allowance; backdated
    /// spends go straight to the committed total.
    pub fn record_spent(
        state: &mut DailyAllowanceState,
        value: Decimal,
        day: NaiveDate,
    ) -> Result<(), CoreError> {
        Self::validate_amount(value)?;
        match day.cmp(&state.last_recalc_date) {
            std::cmp::Ordering::Equal => {
                state.spent_from_daily_budget = add_checked(state.spent_from_daily_budget, value)?
            }
            std::cmp::Ordering::Less => state.spent = add_checked(state.spent, value)?,
            std::cmp::Ordering::Greater => {
                return Err(CoreError::InvalidOperation(format!(
                    "allowance has not been recalculated for {day} yet"
                )))
            }
        }
        debug!(%value, %day, "spend recorded");
        Ok(())
    }

    /// Reverses [`SpendingService::record_spent`].
    pub fn remove_spent(
        state: &mut DailyAllowanceState,
        value: Decimal,
        day: NaiveDate,
    ) -> Result<(), CoreError> {
        Self::validate_amount(value)?;
        match day.cmp(&state.last_recalc_date) {
            std::cmp::Ordering::Equal => state.spent_from_daily_budget -= value,
            std::cmp::Ordering::Less => state.spent -= value,
            std::cmp::Ordering::Greater => {
                return Err(CoreError::InvalidOperation(format!(
                    "no spending can exist on {day} yet"
                )))
            }
        }
        debug!(%value, %day, "spend removed");
        Ok(())
    }

    /// Replaces a spend of `old_value` with `new_value` on the same day.
    pub fn edit_spent(
        state: &mut DailyAllowanceState,
        old_value: Decimal,
        new_value: Decimal,
        day: NaiveDate,
    ) -> Result<(), CoreError> {
        Self::validate_amount(new_value)?;
        Self::remove_spent(state, old_value, day)?;
        Self::record_spent(state, new_value, day)
    }

    pub fn validate_amount(value: Decimal) -> Result<(), CoreError> {
        if value <= Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "amount must be positive, got {value}"
            )));
        }
        if value > MAX_AMOUNT {
            return Err(CoreError::Validation(format!(
                "amount must not exceed {MAX_AMOUNT}, got {value}"
            )));
        }
        Ok(())
    }
}

fn add_checked(total: Decimal, value: Decimal) -> Result<Decimal, CoreError> {
    total
        .checked_add(value)
        .ok_or_else(|| CoreError::Validation(format!("adding {value} overflows the spent total")))
}
