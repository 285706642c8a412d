//! Persistent controller settings.

use crate::utils::protocol::Configuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Nothing has been stored yet.
    NotInitialized,
}

/// Storage for the [`Configuration`] record.
pub trait ConfigStore {
    type Error: core::fmt::Debug;

    fn load(&mut self) -> Result<Configuration, Self::Error>;

    /// Persist `config`. The stored record is marked valid.
    fn store(&mut self, config: Configuration) -> Result<(), Self::Error>;
}

/// A [`ConfigStore`] that keeps the record in RAM.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    config: Option<Configuration>,
}

impl MemoryConfigStore {
    pub const fn new() -> Self {
        Self { config: None }
    }

    /// A store that already holds `config`.
    pub fn with_config(config: Configuration) -> Self {
        Self {
            config: Some(Configuration { valid: 1, ..config }),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    type Error = ConfigError;

    fn load(&mut self) -> Result<Configuration, Self::Error> {
        self.config.ok_or(ConfigError::NotInitialized)
    }

    fn store(&mut self, config: Configuration) -> Result<(), Self::Error> {
        tracing::info!(team = config.team_number, "configuration stored");
        self.config = Some(Configuration { valid: 1, ..config });
        Ok(())
    }
}
