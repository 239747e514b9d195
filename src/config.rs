use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("voting power divisor must be positive, got {0}")]
    InvalidDivisor(i64),
    #[error("majority percent must be in 1..=100, got {0}")]
    InvalidMajority(u8),
    #[error("malformed settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game-balance settings snapshot.
///
/// Passed by value or reference into every call that needs it. Admin changes
/// produce a new snapshot; nothing reads settings from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Land units per point of voting power.
    pub voting_power_divisor: i64,
    /// Share of the alliance's total voting power (inclusive) the top
    /// candidate needs to lead.
    pub majority_percent: u8,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            voting_power_divisor: 100,
            majority_percent: 50,
        }
    }
}

impl GameSettings {
    /// Parse and validate a settings document. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voting_power_divisor <= 0 {
            return Err(ConfigError::InvalidDivisor(self.voting_power_divisor));
        }
        if !(1..=100).contains(&self.majority_percent) {
            return Err(ConfigError::InvalidMajority(self.majority_percent));
        }
        Ok(())
    }
}
