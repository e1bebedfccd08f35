//! Repository configuration, read from `<repo>/folio.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use folio_types::{Author, TypeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside a repository directory.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Per-repository settings. Every field has a default, so a partial (or
/// missing) file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Suffix appended to a title to form its storage path.
    pub page_extension: String,
    /// Directory for rendered pages, relative to the repository. Renders are
    /// kept in memory when unset.
    pub render_cache_dir: Option<PathBuf>,
    /// Author recorded when the caller does not name one.
    pub author: AuthorConfig,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            page_extension: ".rst".into(),
            render_cache_dir: None,
            author: AuthorConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "anonymous".into(),
            email: "anonymous@localhost".into(),
        }
    }
}

impl AuthorConfig {
    pub fn to_author(&self) -> Result<Author, TypeError> {
        Author::new(self.name.clone(), self.email.clone())
    }
}

impl WikiConfig {
    /// Load `<repo>/folio.toml`, falling back to defaults if it is absent.
    pub fn load(repo: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = repo.as_ref().join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Write this configuration to `<repo>/folio.toml`.
    pub fn save(&self, repo: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = repo.as_ref().join(CONFIG_FILE);
        let text = toml::to_string_pretty(self)?;
        fs::write(&path, text).map_err(|source| ConfigError::Write { path, source })
    }

    /// The render cache directory resolved against `repo`, if configured.
    pub fn render_cache_path(&self, repo: &Path) -> Option<PathBuf> {
        self.render_cache_dir.as_ref().map(|dir| repo.join(dir))
    }
}
