use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::read_to_string;
use tutorial_tree::DefaultSelection;

pub const CONFIG_FILENAME: &str = "tutorial.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found at: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    document: Option<PathBuf>,
    version: Option<String>,
    default_selection: Option<DefaultSelection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// File the config was read from, if any.
    pub path: Option<PathBuf>,
    /// Tutorial document, resolved against the config file's directory.
    pub document: Option<PathBuf>,
    pub version: Option<String>,
    pub default_selection: DefaultSelection,
}

impl Config {
    /// Load from an explicit path, else from `tutorial.toml` in `cwd` when
    /// present, else fall back to defaults.
    pub async fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_dir() {
                    path.join(CONFIG_FILENAME)
                } else {
                    path.to_owned()
                };
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                path
            }
            None => {
                let path = cwd.join(CONFIG_FILENAME);
                if !path.exists() {
                    return Ok(Config::default());
                }
                path
            }
        };

        let ConfigToml {
            document,
            version,
            default_selection,
        } = Self::load_config(&path).await?;

        Ok(Config {
            document: document.map(|document| Self::resolve_document(&path, document)),
            path: Some(path),
            version,
            default_selection: default_selection.unwrap_or_default(),
        })
    }

    async fn load_config(path: &Path) -> Result<ConfigToml, ConfigError> {
        let string = read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        let config = toml::from_str(&string).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        Ok(config)
    }

    fn resolve_document(config_path: &Path, document: PathBuf) -> PathBuf {
        if document.is_absolute() {
            return document;
        }
        match config_path.parent() {
            Some(parent) => parent.join(document),
            None => document,
        }
    }
}
