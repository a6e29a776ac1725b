use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    rollover_service::{RolloverOutcome, RolloverService},
    spending_service::SpendingService,
    statistics_service::StatisticsService,
};
use daybudget_domain::{
    CurrencyCode, DailyAllowanceState, Distribution, Period, RestedBudgetDistributionMethod,
    Transaction,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn open(
    period: &Period,
    state: &DailyAllowanceState,
    today: NaiveDate,
    method: RestedBudgetDistributionMethod,
) -> DailyAllowanceState {
    match RolloverService::rollover(period, state, today, method) {
        RolloverOutcome::Applied(report) => report.state,
        RolloverOutcome::SameDay => state.clone(),
        RolloverOutcome::AwaitingChoice(pending) => {
            panic!("unexpected pending choice: {pending:?}")
        }
    }
}

#[test]
fn allowances_never_overcommit_the_budget() {
    let period = Period::new(dec!(2000), day(1), day(31), CurrencyCode::default()).unwrap();
    let mut state = RolloverService::initial_state(&period, day(1));
    let spends = [dec!(12.34), dec!(40), dec!(0.99), dec!(77.10), dec!(5)];

    for (offset, today) in (1..=30).map(day).enumerate() {
        let method = match offset % 3 {
            0 => RestedBudgetDistributionMethod::Rest,
            1 => RestedBudgetDistributionMethod::AddToday,
            _ => RestedBudgetDistributionMethod::AddSavings,
        };
        state = open(&period, &state, today, method);

        let days_left = Decimal::from(RolloverService::days_left_clamped(&period, today));
        let available = period.budget - state.spent - state.saved;
        assert!(
            state.daily_budget <= available,
            "daily {} exceeds available {} on {today}",
            state.daily_budget,
            available
        );
        if matches!(method, RestedBudgetDistributionMethod::Rest) {
            assert!(state.daily_budget * days_left <= available);
        }

        let spend = spends[offset % spends.len()];
        SpendingService::record_spent(&mut state, spend, today).unwrap();
    }

    let total: Decimal = spends.iter().cycle().take(30).copied().sum();
    assert_eq!(state.total_spent(), total);
    assert_eq!(state.rest_budget(&period), period.budget - total - state.saved);
}

#[test]
fn rollover_is_idempotent_within_a_day() {
    let period = Period::new(dec!(300), day(1), day(11), CurrencyCode::default()).unwrap();
    let mut state = RolloverService::initial_state(&period, day(1));
    SpendingService::record_spent(&mut state, dec!(10), day(1)).unwrap();

    let first = open(&period, &state, day(2), RestedBudgetDistributionMethod::Rest);
    let second = open(&period, &first, day(2), RestedBudgetDistributionMethod::Rest);
    assert_eq!(first, second);
}

#[test]
fn ask_then_choose_matches_preference_path() {
    let period = Period::new(dec!(300), day(1), day(11), CurrencyCode::default()).unwrap();
    let mut state = RolloverService::initial_state(&period, day(1));
    SpendingService::record_spent(&mut state, dec!(10), day(1)).unwrap();

    let pending = match RolloverService::rollover(
        &period,
        &state,
        day(2),
        RestedBudgetDistributionMethod::Ask,
    ) {
        RolloverOutcome::AwaitingChoice(pending) => pending,
        other => panic!("expected pending choice, got {other:?}"),
    };
    let chosen = RolloverService::apply(&period, &state, pending.date, Distribution::AddToday);
    let preferred = open(&period, &state, day(2), RestedBudgetDistributionMethod::AddToday);
    assert_eq!(chosen.state, preferred);
    assert_eq!(chosen.state.daily_budget, dec!(50));
}

#[test]
fn statistics_agree_with_allowance_state() {
    let period = Period::new(dec!(300), day(1), day(11), CurrencyCode::default()).unwrap();
    let mut state = RolloverService::initial_state(&period, day(1));
    let mut log = Vec::new();

    for (d, value) in [(1, dec!(10)), (2, dec!(45)), (3, dec!(20))] {
        state = open(&period, &state, day(d), RestedBudgetDistributionMethod::AddSavings);
        SpendingService::record_spent(&mut state, value, day(d)).unwrap();
        log.push(Transaction::spent(value, day(d).and_hms_opt(13, 0, 0).unwrap(), ""));
    }

    let stats = StatisticsService::summarize(&period, &log, state.saved, day(3));
    assert_eq!(stats.total_spent, state.total_spent());
    assert_eq!(stats.rest, state.rest_budget(&period));
    assert_eq!(stats.overspending_days.len(), 1);
    assert_eq!(stats.overspending_days[0].date, day(2));
}
