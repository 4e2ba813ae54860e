use crate::aggregate::Granularity;
use crate::error::ConfigError;
use serde::Deserialize;
use std::{fs, path::Path};

/// Knobs for the dashboard report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Subcategories kept in the best-sellers ranking.
    pub subcategory_limit: usize,
    /// Cities kept in the geographic comparison.
    pub city_limit: usize,
    /// Rows shown in the data sample.
    pub sample_rows: usize,
    pub granularity: Granularity,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            subcategory_limit: 10,
            city_limit: 20,
            sample_rows: 10,
            granularity: Granularity::Month,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.subcategory_limit == 0 || self.city_limit == 0 {
            return Err(ConfigError::Invalid(
                "subcategory_limit and city_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = DashboardConfig::from_toml("city_limit = 5\ngranularity = \"week\"\n").unwrap();
        assert_eq!(cfg.city_limit, 5);
        assert_eq!(cfg.granularity, Granularity::Week);
        assert_eq!(cfg.subcategory_limit, 10);
        assert_eq!(cfg.sample_rows, 10);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            DashboardConfig::from_toml("city_limit = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashboardConfig::from_toml("colour = \"red\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "sample_rows = 3")?;
        let cfg = DashboardConfig::load(file.path())?;
        assert_eq!(cfg.sample_rows, 3);
        Ok(())
    }
}
