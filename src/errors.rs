use std::result::Result as StdResult;

use daybudget_config::ConfigError as PreferencesError;
use daybudget_core::CoreError as ServiceCoreError;
use daybudget_domain::PeriodError;
use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the session, core, and configuration layers.
#[derive(Error, Debug)]
pub enum DayBudgetError {
    #[error("No budget period is active. Start one with `period <budget> <finish-date>`.")]
    PeriodNotStarted,
    #[error("Leftover of {0} is waiting for a distribution choice")]
    RolloverPending(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, DayBudgetError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] DayBudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<PeriodError> for DayBudgetError {
    fn from(err: PeriodError) -> Self {
        DayBudgetError::InvalidInput(err.to_string())
    }
}

impl From<ServiceCoreError> for DayBudgetError {
    fn from(err: ServiceCoreError) -> Self {
        match err {
            ServiceCoreError::InvalidOperation(message) | ServiceCoreError::Validation(message) => {
                DayBudgetError::InvalidInput(message)
            }
        }
    }
}

impl From<PreferencesError> for DayBudgetError {
    fn from(err: PreferencesError) -> Self {
        DayBudgetError::ConfigError(err.to_string())
    }
}

impl From<PreferencesError> for CliError {
    fn from(err: PreferencesError) -> Self {
        CliError::from(DayBudgetError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
