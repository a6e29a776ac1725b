mod common;

use common::{date, move_to, session_on};
use daybudget::errors::DayBudgetError;
use daybudget_core::RolloverOutcome;
use daybudget_domain::{CurrencyCode, Distribution, RestedBudgetDistributionMethod, TransactionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn ten_day_period_with_daily_rollovers() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::AddToday);
    let state = session
        .start_period(dec!(300), date(2025, 5, 11), CurrencyCode::default())
        .unwrap();
    assert_eq!(state.daily_budget, dec!(30));

    session.spend(dec!(10), "breakfast").unwrap();
    assert_eq!(session.summary().unwrap().rest_today, dec!(20));

    move_to(&mut session, date(2025, 5, 2));
    match session.open_day().unwrap() {
        RolloverOutcome::Applied(report) => {
            assert_eq!(report.leftover, dec!(20));
            assert_eq!(report.distribution, Distribution::AddToday);
            assert_eq!(report.state.daily_budget, dec!(50));
        }
        other => panic!("expected an applied rollover, got {other:?}"),
    }
    assert_eq!(session.open_day().unwrap(), RolloverOutcome::SameDay);
}

#[test]
fn skipped_days_are_carried_into_the_leftover() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::Ask);
    session
        .start_period(dec!(300), date(2025, 5, 11), CurrencyCode::default())
        .unwrap();
    session.spend(dec!(10), "").unwrap();

    move_to(&mut session, date(2025, 5, 4));
    let pending = match session.open_day().unwrap() {
        RolloverOutcome::AwaitingChoice(pending) => pending,
        other => panic!("expected a pending choice, got {other:?}"),
    };
    assert_eq!(pending.skipped_days, 2);
    assert_eq!(pending.leftover, dec!(80));
    assert_eq!(pending.days_left, 7);

    let preview = session.preview().unwrap();
    assert_eq!(preview.add_today, dec!(110));
    assert_eq!(preview.rest, dec!(41.42));

    let report = session.choose_distribution(Distribution::AddSavings).unwrap();
    assert_eq!(report.state.saved, dec!(80));
    assert_eq!(report.state.daily_budget, dec!(30));
    assert_eq!(session.summary().unwrap().saved, dec!(80));
}

#[test]
fn overspending_never_prompts_and_shrinks_later_days() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::Ask);
    session
        .start_period(dec!(300), date(2025, 5, 11), CurrencyCode::default())
        .unwrap();
    session.spend(dec!(75), "concert").unwrap();
    assert!(session.summary().unwrap().rest_today < Decimal::ZERO);

    move_to(&mut session, date(2025, 5, 2));
    session.spend(dec!(1), "").unwrap();
    let summary = session.summary().unwrap();
    assert_eq!(summary.daily_budget, dec!(25));
    assert!(session.pending().is_none());

    let stats = session.statistics().unwrap();
    assert_eq!(stats.overspending_day_count(), 1);
    assert_eq!(stats.total_spent, dec!(76));
}

#[test]
fn transaction_log_tracks_every_change() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::Rest);
    session
        .start_period(dec!(100), date(2025, 5, 5), CurrencyCode::new("eur"))
        .unwrap();
    let id = session.spend(dec!(4), "tea").unwrap();
    session.edit_transaction(id, dec!(6), None).unwrap();
    move_to(&mut session, date(2025, 5, 2));
    session.open_day().unwrap();
    session.edit_period(dec!(120), date(2025, 5, 6)).unwrap();

    let kinds: Vec<TransactionType> = session.transactions().iter().map(|txn| txn.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionType::Income,
            TransactionType::SetDailyBudget,
            TransactionType::Spent,
            TransactionType::SetDailyBudget,
            TransactionType::SetDailyBudget,
        ]
    );
    let spend = session.find_transaction(&id.to_string()).unwrap();
    assert_eq!(spend.value, dec!(6));
    assert_eq!(spend.comment, "tea");
    // (120 - 6) / 4
    assert_eq!(session.state().unwrap().daily_budget, dec!(28.50));
}

#[test]
fn operations_need_a_period() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::Rest);
    assert!(matches!(session.summary(), Err(DayBudgetError::PeriodNotStarted)));
    assert!(matches!(session.open_day(), Err(DayBudgetError::PeriodNotStarted)));
    assert!(matches!(session.finish_early(), Err(DayBudgetError::PeriodNotStarted)));
}

#[test]
fn invalid_periods_are_rejected() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::Rest);
    let backwards = session.start_period(dec!(100), date(2025, 4, 30), CurrencyCode::default());
    assert!(matches!(backwards, Err(DayBudgetError::InvalidInput(_))));
    let negative = session.start_period(dec!(-5), date(2025, 5, 9), CurrencyCode::default());
    assert!(matches!(negative, Err(DayBudgetError::InvalidInput(_))));
    assert!(session.period().is_none());
}

#[test]
fn last_day_after_the_period_keeps_working() {
    let mut session = session_on(date(2025, 5, 1), RestedBudgetDistributionMethod::AddToday);
    session
        .start_period(dec!(50), date(2025, 5, 3), CurrencyCode::default())
        .unwrap();
    move_to(&mut session, date(2025, 5, 7));
    session.open_day().unwrap();

    let summary = session.summary().unwrap();
    assert!(summary.period_over);
    assert_eq!(summary.days_left, 0);
    assert_eq!(summary.daily_budget, dec!(50));
}

#[test]
fn spends_dated_before_the_period_are_refused() {
    let mut session = session_on(date(2025, 5, 10), RestedBudgetDistributionMethod::Rest);
    session
        .start_period(dec!(300), date(2025, 5, 20), CurrencyCode::default())
        .unwrap();
    move_to(&mut session, date(2025, 5, 9));

    let err = session.spend(dec!(10), "").unwrap_err();
    assert!(matches!(err, DayBudgetError::InvalidInput(_)));

    let summary = session.summary().unwrap();
    let stats = session.statistics().unwrap();
    assert_eq!(summary.rest_budget, dec!(300));
    assert_eq!(stats.rest, summary.rest_budget);
}

#[test]
fn oversized_amounts_are_refused_without_touching_the_state() {
    let mut session = session_on(date(2025, 6, 1), RestedBudgetDistributionMethod::Rest);
    let too_big = session.start_period(Decimal::MAX, date(2025, 6, 11), CurrencyCode::default());
    assert!(matches!(too_big, Err(DayBudgetError::InvalidInput(_))));

    session
        .start_period(dec!(300), date(2025, 6, 11), CurrencyCode::default())
        .unwrap();
    let err = session.spend(Decimal::MAX, "").unwrap_err();
    assert!(matches!(err, DayBudgetError::InvalidInput(_)));
    session.spend(dec!(1), "").unwrap();

    let summary = session.summary().unwrap();
    assert_eq!(summary.spent_today, dec!(1));
    assert_eq!(summary.rest_budget, dec!(299));
}
