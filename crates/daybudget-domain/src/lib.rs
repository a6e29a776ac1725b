//! daybudget-domain
//!
//! Pure domain models (Period, DailyAllowanceState, Transaction, currency and
//! distribution preferences). No I/O, no CLI, no storage. Only data types and core enums.

pub mod allowance;
pub mod common;
pub mod period;
pub mod transaction;

pub use allowance::*;
pub use common::*;
pub use period::*;
pub use transaction::*;
