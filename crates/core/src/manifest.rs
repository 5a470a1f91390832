use crate::AssetError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FALLBACK_LABEL: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Labels substituted for a request's own labels when nothing matched.
    pub fallback_labels: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_labels: vec![DEFAULT_FALLBACK_LABEL.to_string()],
        }
    }
}

impl ResolverConfig {
    /// Reads `resolver.toml` from the config directory, or the defaults when
    /// the file is absent.
    pub fn load(dirs: &AssetDirs) -> Result<Self, AssetError> {
        Self::from_file(&dirs.config_dir.join("resolver.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Where catalog manifests and cached registry files live.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl AssetDirs {
    pub fn new(config_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Resolves directories from the environment and creates them.
    pub fn resolve() -> Result<Self, AssetError> {
        let config_dir = if let Ok(home) = std::env::var("ASSETKEY_HOME") {
            PathBuf::from(home)
        } else if let Ok(custom_path) = std::env::var("ASSETKEY_CONFIG_DIR") {
            PathBuf::from(custom_path)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    AssetError::ConfigError("Could not find config directory".to_string())
                })?
                .join("assetkey")
        };

        let cache_dir = if let Ok(cache) = std::env::var("ASSETKEY_CACHE") {
            PathBuf::from(cache)
        } else {
            config_dir.join("cache")
        };

        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&cache_dir)?;

        Ok(Self {
            config_dir,
            cache_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fallback_is_single_sentinel() {
        assert_eq!(ResolverConfig::default().fallback_labels, vec!["default"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ResolverConfig::from_file(Path::new("/nonexistent/resolver.toml")).unwrap();
        assert_eq!(config.fallback_labels, vec!["default"]);
    }

    #[test]
    fn parses_custom_fallback_labels() {
        let parsed: ResolverConfig = toml::from_str(r#"fallback_labels = ["base", "en"]"#).unwrap();
        assert_eq!(parsed.fallback_labels, vec!["base", "en"]);
    }
}
