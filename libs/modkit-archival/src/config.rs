//! Configuration for the archival filter.

use figment::Figment;
use serde::Deserialize;

use crate::error::ConfigError;

/// Conventional name of the archival marker column.
pub const DEFAULT_ARCHIVED_COLUMN: &str = "is_archived";

/// Configuration for [`crate::OmitArchivedStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ArchivalConfig {
    /// Name of the column that marks a row as archived.
    /// Boolean columns mean archived when `true`, any other type when non-null.
    /// Default: `is_archived`
    pub column_name: String,
}

impl Default for ArchivalConfig {
    fn default() -> Self {
        Self {
            column_name: DEFAULT_ARCHIVED_COLUMN.to_owned(),
        }
    }
}

impl ArchivalConfig {
    /// Creates a config that looks for `column_name` instead of the default.
    #[must_use]
    pub fn with_column_name(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }

    /// Extracts the config found under `key` and validates it.
    ///
    /// A missing key yields the default configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Extract` if the section is malformed or has unknown fields,
    /// and `ConfigError::EmptyColumnName` if the column name is blank.
    pub fn from_figment(figment: &Figment, key: &str) -> Result<Self, ConfigError> {
        let cfg = if figment.contains(key) {
            figment
                .extract_inner::<Self>(key)
                .map_err(Box::new)?
        } else {
            Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the config for values the strategy cannot work with.
    ///
    /// # Errors
    /// Returns `ConfigError::EmptyColumnName` if the column name is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_name.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName);
        }
        Ok(())
    }
}
