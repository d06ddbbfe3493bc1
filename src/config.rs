//! Dashboard configuration
//!
//! Loaded from an optional TOML file; command line flags override it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::aggregator::Granularity;
use crate::error::{DashError, Result};

pub const DEFAULT_DATABASE: &str = "legal_documents_ecommerce.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// SQLite file holding Orders, Order_Items and Products
    pub database: PathBuf,
    pub granularity: Granularity,
    /// Category shown by the drill-down when none is given
    pub category: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            granularity: Granularity::default(),
            category: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| DashError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn with_database(mut self, database: Option<PathBuf>) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        self
    }

    pub fn with_granularity(mut self, granularity: Option<Granularity>) -> Self {
        if let Some(granularity) = granularity {
            self.granularity = granularity;
        }
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        if category.is_some() {
            self.category = category;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.granularity, Granularity::Monthly);
    }

    #[test]
    fn test_parse_full_config() {
        let config = DashboardConfig::from_toml(
            r#"
            database = "/srv/desk.db"
            granularity = "weekly"
            category = "Business"
            "#,
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("/srv/desk.db"));
        assert_eq!(config.granularity, Granularity::Weekly);
        assert_eq!(config.category.as_deref(), Some("Business"));
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(matches!(
            DashboardConfig::from_toml("colour = \"red\""),
            Err(DashError::Config(_))
        ));
        assert!(DashboardConfig::from_toml("granularity = \"daily\"").is_err());
    }

    #[test]
    fn test_overrides_only_apply_when_set() {
        let config = DashboardConfig::default()
            .with_database(None)
            .with_granularity(Some(Granularity::Weekly))
            .with_category(None);
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.granularity, Granularity::Weekly);
        assert_eq!(config.category, None);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DashError::Io { .. }));
    }
}
