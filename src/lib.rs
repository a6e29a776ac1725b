#![doc(test(attr(deny(warnings))))]

//! daybudget turns a total budget and an end date into a daily spending
//! allowance, and keeps that allowance up to date as money is spent and days
//! pass.
//!
//! The arithmetic lives in `daybudget-core`; this crate adds the
//! [`session::BudgetSession`] that owns the running records, a shell over it,
//! and the ambient setup.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod session;
pub mod utils;

pub use daybudget_config as config;
pub use daybudget_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "daybudget tracing initialized");
    });
}
