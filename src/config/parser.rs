//! Configuration parser for loading extractor settings.
//!
//! Settings come from an optional YAML file, then from environment variables
//! (a `.env` file next to the configuration is loaded first when present).

use crate::error::{ChangeGraphError, ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::ExtractorConfig;

/// Configuration parser.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ExtractorConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ChangeGraphError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangeGraphError::Config(ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            ))
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ExtractorConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(ExtractorConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            ChangeGraphError::Config(ConfigError::parse(
                format!("YAML parse error: {e}"),
                source.map(|p| p.display().to_string()),
            ))
        })
    }

    /// Resolves the effective configuration.
    ///
    /// Uses `path` when given, otherwise searches upwards from the current
    /// directory; without a file the defaults apply. Environment overrides
    /// are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found but invalid, or an override is invalid.
    pub fn resolve(&self, path: Option<&Path>) -> Result<ExtractorConfig> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|dir| find_config_file(dir).ok()),
        };

        let mut config = match file {
            Some(f) => self.load_file(f)?,
            None => {
                debug!("No configuration file found, using defaults");
                ExtractorConfig::default()
            }
        };

        Self::apply_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `CHANGEGRAPH_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is not a boolean.
    pub fn apply_overrides(
        config: &mut ExtractorConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(pretty) = read_bool(&lookup, "CHANGEGRAPH_PRETTY")? {
            debug!("Overriding output.pretty from environment");
            config.output.pretty = pretty;
        }

        if let Some(include) = read_bool(&lookup, "CHANGEGRAPH_INCLUDE_DATA_SOURCES")? {
            debug!("Overriding output.include_data_sources from environment");
            config.output.include_data_sources = include;
        }

        if let Some(strict) = read_bool(&lookup, "CHANGEGRAPH_STRICT")? {
            debug!("Overriding strict from environment");
            config.strict = strict;
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ChangeGraphError::Config(ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                ))
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

fn read_bool(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<bool>> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ChangeGraphError::Config(ConfigError::InvalidEnvValue {
            name: name.to_string(),
            value,
        })),
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["changegraph.yaml", "changegraph.yml"];

/// Finds the configuration file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ChangeGraphError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
output:
  pretty: true
  include_data_sources: false
strict: true
";
        let config = ConfigParser::new()
            .parse_yaml(yaml, None)
            .expect("config should parse");

        assert!(config.output.pretty);
        assert!(!config.output.include_data_sources);
        assert!(config.strict);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ConfigParser::new()
            .parse_yaml("strict: true\n", None)
            .expect("config should parse");

        assert!(config.strict);
        assert!(!config.output.pretty);
        assert!(config.output.include_data_sources);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = ConfigParser::new()
            .parse_yaml("   \n", None)
            .expect("config should parse");
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ConfigParser::new().parse_yaml("strict: [", None);
        assert!(matches!(
            result,
            Err(ChangeGraphError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ExtractorConfig::default();
        ConfigParser::apply_overrides(
            &mut config,
            env(&[("CHANGEGRAPH_PRETTY", "yes"), ("CHANGEGRAPH_STRICT", "1")]),
        )
        .expect("overrides should apply");

        assert!(config.output.pretty);
        assert!(config.strict);
        assert!(config.output.include_data_sources);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = ExtractorConfig::default();
        let result = ConfigParser::apply_overrides(
            &mut config,
            env(&[("CHANGEGRAPH_INCLUDE_DATA_SOURCES", "sometimes")]),
        );

        assert!(matches!(
            result,
            Err(ChangeGraphError::Config(ConfigError::InvalidEnvValue { .. }))
        ));
    }

    #[test]
    fn test_find_config_file_in_parent() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("Failed to create dirs");
        std::fs::write(temp.path().join("changegraph.yml"), "strict: true\n")
            .expect("Failed to write config");

        let found = find_config_file(&nested).expect("config should be found");
        assert_eq!(found, temp.path().join("changegraph.yml"));

        let config = ConfigParser::new().load_file(&found).expect("config should load");
        assert!(config.strict);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigParser::new().load_file("/nonexistent/changegraph.yaml");
        assert!(matches!(
            result,
            Err(ChangeGraphError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
