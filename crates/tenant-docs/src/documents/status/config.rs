use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;
pub const MAX_EXPIRY_WARNING_DAYS: i64 = 3650;

/// Tuning for annotations the engine adds on top of the three buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Completed documents expiring within this many days of `as_of` are flagged.
    pub expiry_warning_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}
