//! End-of-period statistics built from the transaction log.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use daybudget_domain::{Amounted, Period, Transaction};

use crate::{money::round_for_display, rollover_service::RolloverService};

/// Total spending on a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySpending {
    pub date: NaiveDate,
    pub total: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStatistics {
    pub whole_budget: Decimal,
    pub total_spent: Decimal,
    pub rest: Decimal,
    pub saved: Decimal,
    pub total_days: i64,
    pub elapsed_days: i64,
    pub nominal_per_day: Decimal,
    pub average_per_day: Decimal,
    pub min_spent: Option<Transaction>,
    pub max_spent: Option<Transaction>,
    pub per_day: Vec<DaySpending>,
    pub overspending_days: Vec<DaySpending>,
}

impl PeriodStatistics {
    pub fn overspending_day_count(&self) -> usize {
        self.overspending_days.len()
    }

    pub fn spent_anything(&self) -> bool {
        !self.per_day.is_empty()
    }
}

pub struct StatisticsService;

impl StatisticsService {
    /// Summarizes the SPENT entries of `transactions` that fall inside `period`,
    /// counting days elapsed up to and including `today`.
    pub fn summarize(
        period: &Period,
        transactions: &[Transaction],
        saved: Decimal,
        today: NaiveDate,
    ) -> PeriodStatistics {
        let spends: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| txn.is_spent() && period.contains(txn.day()))
            .collect();

        let per_day = Self::spending_by_day(&spends);
        let nominal_per_day = RolloverService::period_nominal(period);
        let overspending_days = Self::overspending_days(&per_day, nominal_per_day);
        let total_spent: Decimal = spends.iter().map(|txn| txn.amount()).sum();

        let elapsed_until = today.succ_opt().unwrap_or(today).min(period.finish_date);
        let elapsed_days = (elapsed_until - period.start_date).num_days().max(1);
        let average_per_day = round_for_display(
            total_spent / Decimal::from(elapsed_days),
            &period.currency,
        );

        let min_spent = spends
            .iter()
            .min_by(|a, b| a.value.cmp(&b.value).then(b.date.cmp(&a.date)))
            .map(|txn| (*txn).clone());
        let max_spent = spends
            .iter()
            .max_by(|a, b| a.value.cmp(&b.value).then(b.date.cmp(&a.date)))
            .map(|txn| (*txn).clone());

        PeriodStatistics {
            whole_budget: period.budget,
            total_spent,
            rest: period.budget - total_spent - saved,
            saved,
            total_days: period.total_days(),
            elapsed_days,
            nominal_per_day,
            average_per_day,
            min_spent,
            max_spent,
            per_day,
            overspending_days,
        }
    }

    /// Days whose spending exceeds the nominal per-day allowance.
    ///
    /// Reporting only: the classification never feeds back into the allowance.
    pub fn overspending_days(per_day: &[DaySpending], nominal_per_day: Decimal) -> Vec<DaySpending> {
        per_day
            .iter()
            .filter(|day| day.total > nominal_per_day)
            .cloned()
            .collect()
    }

    fn spending_by_day(spends: &[&Transaction]) -> Vec<DaySpending> {
        let mut by_day: BTreeMap<NaiveDate, DaySpending> = BTreeMap::new();
        for txn in spends {
            let entry = by_day.entry(txn.day()).or_insert_with(|| DaySpending {
                date: txn.day(),
                total: Decimal::ZERO,
                transactions: 0,
            });
            entry.total += txn.value;
            entry.transactions += 1;
        }
        by_day.into_values().collect()
    }
}
