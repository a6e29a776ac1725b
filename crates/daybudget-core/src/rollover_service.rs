//! Day-to-day allowance recalculation.
//!
//! When a new calendar day starts, whatever was left of the previous
//! allowance (plus the allowance of any days the app was never opened on) is
//! redistributed according to the user's [`RestedBudgetDistributionMethod`].
//! All splits are floored to the currency's smallest unit, so the sum of the
//! remaining daily allowances never exceeds what is left of the budget.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use daybudget_domain::{
    CurrencyCode, DailyAllowanceState, Distribution, Period, RestedBudgetDistributionMethod,
};

use crate::money::split_per_day;

/// Result of opening the app on some day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The state was already recalculated for this day.
    SameDay,
    /// A new allowance was computed.
    Applied(RolloverReport),
    /// Something was left over and the preference is to ask the user.
    AwaitingChoice(PendingRollover),
}

impl RolloverOutcome {
    /// The state after the rollover, when one was applied.
    pub fn applied_state(&self) -> Option<&DailyAllowanceState> {
        match self {
            RolloverOutcome::Applied(report) => Some(&report.state),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverReport {
    pub state: DailyAllowanceState,
    pub leftover: Decimal,
    pub skipped_days: i64,
    pub distribution: Distribution,
}

/// A leftover waiting for the user to pick a [`Distribution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRollover {
    pub date: NaiveDate,
    pub leftover: Decimal,
    pub skipped_days: i64,
    pub days_left: i64,
}

/// What today's allowance would be under each distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverPreview {
    pub leftover: Decimal,
    pub days_left: i64,
    pub rest: Decimal,
    pub add_today: Decimal,
    pub add_savings: Decimal,
}

/// Stateless allowance arithmetic over [`Period`] and [`DailyAllowanceState`] values.
pub struct RolloverService;

impl RolloverService {
    /// `budget / max(days(finish, start), 1)`, floored to the currency's smallest unit.
    pub fn nominal_per_day(
        budget: Decimal,
        start_date: NaiveDate,
        finish_date: NaiveDate,
        currency: &CurrencyCode,
    ) -> Decimal {
        let days = (finish_date - start_date).num_days();
        split_per_day(budget, days, currency)
    }

    /// Nominal allowance of the whole period.
    pub fn period_nominal(period: &Period) -> Decimal {
        Self::nominal_per_day(
            period.budget,
            period.start_date,
            period.finish_date,
            &period.currency,
        )
    }

    /// Allowance state for a period that starts on `today`.
    pub fn initial_state(period: &Period, today: NaiveDate) -> DailyAllowanceState {
        let daily_budget =
            Self::nominal_per_day(period.budget, today, period.finish_date, &period.currency);
        DailyAllowanceState::new(daily_budget, today)
    }

    /// Whole days between the last recalculation and `today` on which the app was not opened.
    pub fn skipped_days(period: &Period, state: &DailyAllowanceState, today: NaiveDate) -> i64 {
        let until = today.min(period.finish_date);
        ((until - state.last_recalc_date).num_days() - 1).max(0)
    }

    /// Allowance left unspent on the last recalculated day plus the share of every skipped day.
    ///
    /// Negative when the last day was overspent by more than the skipped days cover.
    pub fn leftover(period: &Period, state: &DailyAllowanceState, today: NaiveDate) -> Decimal {
        let skipped = Self::skipped_days(period, state, today);
        let future_budget = period.budget - state.spent - state.saved - state.daily_budget;
        let covering_days = (period.finish_date - state.last_recalc_date).num_days() - 1;
        let future_per_day = split_per_day(future_budget, covering_days, &period.currency);
        state.rest_of_daily_budget() + future_per_day * Decimal::from(skipped)
    }

    /// Recalculates the allowance for `today`.
    ///
    /// Calling this again on the same day is a no-op. A leftover that is zero or
    /// negative never needs a choice and is spread evenly.
    pub fn rollover(
        period: &Period,
        previous: &DailyAllowanceState,
        today: NaiveDate,
        method: RestedBudgetDistributionMethod,
    ) -> RolloverOutcome {
        if today <= previous.last_recalc_date {
            return RolloverOutcome::SameDay;
        }

        let leftover = Self::leftover(period, previous, today);
        let skipped_days = Self::skipped_days(period, previous, today);
        let distribution = if leftover <= Decimal::ZERO {
            Some(Distribution::Rest)
        } else {
            method.resolved()
        };

        match distribution {
            Some(distribution) => {
                RolloverOutcome::Applied(Self::apply(period, previous, today, distribution))
            }
            None => RolloverOutcome::AwaitingChoice(PendingRollover {
                date: today,
                leftover,
                skipped_days,
                days_left: Self::days_left_clamped(period, today),
            }),
        }
    }

    /// Recalculates the allowance for `today` with an explicit distribution.
    pub fn apply(
        period: &Period,
        previous: &DailyAllowanceState,
        today: NaiveDate,
        distribution: Distribution,
    ) -> RolloverReport {
        let leftover = Self::leftover(period, previous, today);
        let skipped_days = Self::skipped_days(period, previous, today);
        let days_left = Self::days_left_clamped(period, today);
        let currency = &period.currency;

        let spent = previous.spent + previous.spent_from_daily_budget;
        let mut saved = previous.saved;
        let available = period.budget - spent - saved;

        // A negative leftover only ever spreads, whatever was chosen.
        let distribution = if leftover <= Decimal::ZERO {
            Distribution::Rest
        } else {
            distribution
        };

        let daily_budget = match distribution {
            Distribution::Rest => split_per_day(available, days_left, currency),
            Distribution::AddToday => {
                split_per_day(available - leftover, days_left, currency) + leftover
            }
            Distribution::AddSavings => {
                saved += leftover;
                split_per_day(available - leftover, days_left, currency)
            }
        };

        debug!(
            %today,
            %leftover,
            skipped_days,
            days_left,
            ?distribution,
            %daily_budget,
            "allowance rolled over"
        );

        RolloverReport {
            state: DailyAllowanceState {
                daily_budget,
                spent_from_daily_budget: Decimal::ZERO,
                last_recalc_date: today,
                spent,
                saved,
            },
            leftover,
            skipped_days,
            distribution,
        }
    }

    /// Allowances today would get under each concrete distribution.
    pub fn preview(period: &Period, state: &DailyAllowanceState, today: NaiveDate) -> RolloverPreview {
        let allowance = |distribution| Self::apply(period, state, today, distribution).state.daily_budget;
        RolloverPreview {
            leftover: Self::leftover(period, state, today),
            days_left: Self::days_left_clamped(period, today),
            rest: allowance(Distribution::Rest),
            add_today: allowance(Distribution::AddToday),
            add_savings: allowance(Distribution::AddSavings),
        }
    }

    /// Spreads everything still available evenly from `today`, keeping today's spending.
    ///
    /// Used after the period itself changed, where carrying a leftover makes no sense.
    pub fn recalculate(
        period: &Period,
        state: &DailyAllowanceState,
        today: NaiveDate,
    ) -> DailyAllowanceState {
        let mut next = state.clone();
        if today > state.last_recalc_date {
            next.spent += next.spent_from_daily_budget;
            next.spent_from_daily_budget = Decimal::ZERO;
            next.last_recalc_date = today;
        }
        let available = period.budget - next.spent - next.saved;
        next.daily_budget =
            split_per_day(available, Self::days_left_clamped(period, today), &period.currency);
        next
    }

    /// Days from `today` to the end of the period, never less than one.
    pub fn days_left_clamped(period: &Period, today: NaiveDate) -> i64 {
        period.days_left(today).max(1)
    }

    /// Nominal allowance of the remaining days, as if the rest of the budget were a fresh period.
    pub fn remaining_nominal(
        period: &Period,
        state: &DailyAllowanceState,
        today: NaiveDate,
    ) -> Decimal {
        let finish = period.finish_date.max(today);
        Self::nominal_per_day(
            period.budget - state.spent - state.saved,
            today,
            finish,
            &period.currency,
        )
    }
}
