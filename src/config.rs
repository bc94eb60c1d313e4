use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

/// Engine limits. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Longest accepted source string, in bytes
    #[serde(default = "default_max_source_length")]
    pub max_source_length: usize,

    /// Deepest accepted parenthesis nesting, counting call parentheses
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Deepest accepted expression tree, counted in nodes from root to leaf.
    /// Operator chains without parentheses count too.
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,

    /// Keep parsed trees keyed by source text
    #[serde(default = "default_true")]
    pub cache_expressions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_source_length: default_max_source_length(),
            max_nesting_depth: default_max_nesting_depth(),
            max_tree_depth: default_max_tree_depth(),
            cache_expressions: default_true(),
        }
    }
}

fn default_max_source_length() -> usize {
    4096
}

fn default_max_nesting_depth() -> usize {
    64
}

fn default_max_tree_depth() -> usize {
    256
}

fn default_true() -> bool {
    true
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reads any JSON-deserializable type from a file.
pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let display = path.as_ref().display().to_string();
    let file = File::open(path.as_ref()).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

pub fn from_str<T: for<'de> Deserialize<'de>>(json: &str) -> ConfigResult<T> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        path: "<string>".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: EngineConfig = from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_source_length, 4096);
        assert_eq!(config.max_nesting_depth, 64);
        assert_eq!(config.max_tree_depth, 256);
        assert!(config.cache_expressions);
    }

    #[test]
    fn test_partial_override() {
        let config: EngineConfig =
            from_str(r#"{ "max_nesting_depth": 8, "cache_expressions": false }"#).unwrap();
        assert_eq!(config.max_nesting_depth, 8);
        assert_eq!(config.max_source_length, 4096);
        assert_eq!(config.max_tree_depth, 256);
        assert!(!config.cache_expressions);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "dialogue_math_config_{}.json",
            std::process::id()
        ));
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{ "max_source_length": 100 }}"#).unwrap();

        let config: EngineConfig = from_file(&path).unwrap();
        assert_eq!(config.max_source_length, 100);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            from_file::<EngineConfig, _>("/nonexistent/engine.json"),
            Err(ConfigError::Io { .. })
        ));
        assert!(matches!(
            from_str::<EngineConfig>("{ not json"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
