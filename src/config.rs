use crate::chat::DecodePolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub validate: ValidateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub policy: DecodePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeConfig {
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateConfig {
    #[serde(default = "default_max_stop_sequences")]
    pub max_stop_sequences: usize,
    /// Treat warnings as failures in `check`.
    #[serde(default)]
    pub warn_as_error: bool,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            max_stop_sequences: default_max_stop_sequences(),
            warn_as_error: false,
        }
    }
}

fn default_max_stop_sequences() -> usize {
    4
}

impl CodecConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Search standard locations for a config file, falling back to defaults.
    /// Priority: CLI arg > CWD > XDG config > home dir
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load(path);
        }

        for candidate in &config_search_paths() {
            if candidate.exists() {
                tracing::info!(path = %candidate.display(), "Loading config");
                return Self::load(candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("chat-query.toml"));

    if cfg!(target_os = "macos") {
        if let Some(home) = home_dir() {
            paths.push(
                home.join("Library")
                    .join("Application Support")
                    .join("chat-query")
                    .join("config.toml"),
            );
        }
    } else {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("chat-query").join("config.toml"));
        }
        if let Some(home) = home_dir() {
            paths.push(home.join(".config").join("chat-query").join("config.toml"));
        }
    }

    if let Some(home) = home_dir() {
        paths.push(home.join(".chat-query.toml"));
    }

    paths
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
[decode]
policy = "strict"

[encode]
pretty = true

[validate]
warn_as_error = true
"#
        )
        .unwrap();

        let config = CodecConfig::load(f.path()).unwrap();
        assert_eq!(config.decode.policy, DecodePolicy::Strict);
        assert!(config.encode.pretty);
        assert!(config.validate.warn_as_error);
        assert_eq!(config.validate.max_stop_sequences, 4);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let f = NamedTempFile::new().unwrap();
        let config = CodecConfig::load(f.path()).unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.decode.policy, DecodePolicy::Lenient);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[decode]\npolicy = \"loose\"").unwrap();
        assert!(matches!(CodecConfig::load(f.path()), Err(Error::Toml(_))));
    }

    #[test]
    fn test_missing_explicit_path_is_config_error() {
        let err = CodecConfig::find_and_load(Some(Path::new("/nonexistent/chat-query.toml")))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_search_paths_start_in_cwd() {
        let paths = config_search_paths();
        assert_eq!(paths[0], PathBuf::from("chat-query.toml"));
    }
}
