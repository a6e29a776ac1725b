//! daybudget-config
//!
//! Persistent user preferences: the leftover distribution method, default
//! currency, and output settings. Owns the Config data structure plus disk
//! persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{BackupEntry, ConfigManager};
pub use model::Config;
