//! Meter configuration
//!
//! Re-exports the shared [`MeterConfig`] and adds persistence and validation.

pub use dpsmeter_types::MeterConfig;

use std::path::PathBuf;
use std::sync::Arc;

use super::ConfigError;
use crate::game_data::{BuiltinSkills, SkillCatalog, SkillTable};

const APP_NAME: &str = "dpsmeter";
const CONFIG_NAME: &str = "config";

/// Extension trait for MeterConfig persistence
pub trait MeterConfigExt: Sized {
    fn load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Option<PathBuf>;
    fn validate(&self) -> Result<(), ConfigError>;
    fn skill_catalog(&self) -> Arc<dyn SkillCatalog>;
}

impl MeterConfigExt for MeterConfig {
    fn load() -> Result<Self, ConfigError> {
        let config: MeterConfig = confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retention_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The configured skill table, or the builtin names if none is set or it
    /// fails to load.
    fn skill_catalog(&self) -> Arc<dyn SkillCatalog> {
        let Some(path) = &self.skill_table else {
            return Arc::new(BuiltinSkills);
        };
        match SkillTable::load(path) {
            Ok(table) => Arc::new(table),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "skill table not loaded, using builtin names");
                Arc::new(BuiltinSkills)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        assert!(MeterConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let config = MeterConfig {
            retention_ms: 0,
            ..MeterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "retention_ms", .. })
        ));

        let config = MeterConfig {
            refresh_interval_ms: 0,
            ..MeterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "refresh_interval_ms", .. })
        ));
    }

    #[test]
    fn skill_catalog_loads_table_or_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[skill]]\nid = 5\nname = \"Heavy Bash\"").unwrap();

        let config = MeterConfig {
            skill_table: Some(file.path().to_path_buf()),
            ..MeterConfig::default()
        };
        assert_eq!(config.skill_catalog().skill_name(5), Some("Heavy Bash"));

        let missing = MeterConfig {
            skill_table: Some(PathBuf::from("/nonexistent/skills.toml")),
            ..MeterConfig::default()
        };
        assert_eq!(missing.skill_catalog().skill_name(5), Some("Bash"));
        assert_eq!(MeterConfig::default().skill_catalog().skill_name(5), Some("Bash"));
    }
}
