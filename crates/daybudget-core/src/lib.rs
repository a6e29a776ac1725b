//! daybudget-core
//!
//! Allowance arithmetic and services for daybudget.
//! Depends on daybudget-domain. No CLI, no terminal I/O, no storage.

pub mod error;
pub mod money;
pub mod rollover_service;
pub mod spending_service;
pub mod statistics_service;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use money::*;
pub use rollover_service::*;
pub use spending_service::*;
pub use statistics_service::*;
pub use time::*;
