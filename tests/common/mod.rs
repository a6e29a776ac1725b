#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use daybudget::session::BudgetSession;
use daybudget_core::FixedClock;
use daybudget_domain::RestedBudgetDistributionMethod;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory to use as `DAYBUDGET_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Session whose clock is pinned to `today`.
pub fn session_on(today: NaiveDate, method: RestedBudgetDistributionMethod) -> BudgetSession {
    BudgetSession::new(Box::new(FixedClock::at_date(today)), method)
}

/// Moves the session's clock to `today`.
pub fn move_to(session: &mut BudgetSession, today: NaiveDate) {
    session.set_clock(Box::new(FixedClock::at_date(today)));
}
