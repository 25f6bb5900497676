// Store location and backend selection

use crate::backend::Backend;
use crate::json_file::JsonFileBackend;
use crate::sqlite::SqliteBackend;
use crate::store::DEFAULT_NAMESPACE;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const ENV_STORE_PATH: &str = "GAMEVAULT_STORE_PATH";
pub const ENV_BACKEND: &str = "GAMEVAULT_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One JSON document per namespace
    #[default]
    Json,
    /// Key/value table in a SQLite database
    Sqlite,
}

impl FromStr for BackendKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(BackendKind::Json),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(eyre!("Unknown backend: {} (expected json or sqlite)", other)),
        }
    }
}

/// Contents of `config.yaml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub store_path: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub namespace: Option<String>,
}

impl FileConfig {
    /// `<config_dir>/gamevault/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gamevault").join("config.yaml"))
    }

    /// Read an explicitly requested file; it must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Explicit path if given, otherwise the default path when it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = ?path, "Loading default config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Resolved settings used to open the store
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub backend: BackendKind,
    pub namespace: String,
}

impl Config {
    /// Resolve from CLI flags, then the process environment, then the YAML file
    pub fn resolve(cli_store_path: Option<PathBuf>, cli_backend: Option<BackendKind>, file: FileConfig) -> Result<Self> {
        Self::from_sources(cli_store_path, cli_backend, |key| std::env::var(key).ok(), file)
    }

    /// Precedence: CLI > environment > YAML > built-in default
    pub fn from_sources<F>(
        cli_store_path: Option<PathBuf>,
        cli_backend: Option<BackendKind>,
        env: F,
        file: FileConfig,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_path = if let Some(path) = cli_store_path {
            path
        } else if let Some(path) = env(ENV_STORE_PATH).filter(|p| !p.is_empty()) {
            PathBuf::from(path)
        } else if let Some(path) = file.store_path {
            path
        } else {
            Self::default_store_path()?
        };

        let backend = if let Some(kind) = cli_backend {
            kind
        } else if let Some(raw) = env(ENV_BACKEND).filter(|b| !b.is_empty()) {
            raw.parse()?
        } else {
            file.backend.unwrap_or_default()
        };

        let namespace = file.namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self {
            store_path,
            backend,
            namespace,
        })
    }

    /// `<data_dir>/gamevault`
    pub fn default_store_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join("gamevault"))
            .ok_or_else(|| eyre!("Could not determine a data directory; pass --store-path"))
    }

    pub fn open_backend(&self) -> Result<Box<dyn Backend>> {
        debug!(path = ?self.store_path, backend = ?self.backend, namespace = %self.namespace, "Opening backend");
        Ok(match self.backend {
            BackendKind::Json => Box::new(JsonFileBackend::open(&self.store_path, &self.namespace)?),
            BackendKind::Sqlite => Box::new(SqliteBackend::open(&self.store_path, &self.namespace)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "store_path: /tmp/games\nbackend: sqlite\nnamespace: my-games\n";
        let file: FileConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(file.store_path, Some(PathBuf::from("/tmp/games")));
        assert_eq!(file.backend, Some(BackendKind::Sqlite));
        assert_eq!(file.namespace.as_deref(), Some("my-games"));
    }

    #[test]
    fn test_partial_yaml() {
        let file: FileConfig = serde_yaml::from_str("backend: json\n").unwrap();
        assert_eq!(file.store_path, None);
        assert_eq!(file.backend, Some(BackendKind::Json));
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(FileConfig::from_file(&temp.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let env: HashMap<&str, &str> = [(ENV_STORE_PATH, "/env/path"), (ENV_BACKEND, "sqlite")].into();
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());
        let file = FileConfig {
            store_path: Some(PathBuf::from("/file/path")),
            backend: Some(BackendKind::Json),
            namespace: None,
        };

        let config = Config::from_sources(Some(PathBuf::from("/cli/path")), None, lookup, file.clone()).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/cli/path"));
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);

        let config = Config::from_sources(None, Some(BackendKind::Json), lookup, file.clone()).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/env/path"));
        assert_eq!(config.backend, BackendKind::Json);

        let config = Config::from_sources(None, None, no_env, file).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/file/path"));
        assert_eq!(config.backend, BackendKind::Json);
    }

    #[test]
    fn test_bad_env_backend_is_error() {
        let lookup = |k: &str| (k == ENV_BACKEND).then(|| "postgres".to_string());
        let result = Config::from_sources(Some(PathBuf::from("/x")), None, lookup, FileConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_open_backend_kinds() {
        let temp = TempDir::new().unwrap();
        for backend in [BackendKind::Json, BackendKind::Sqlite] {
            let config = Config {
                store_path: temp.path().to_path_buf(),
                backend,
                namespace: DEFAULT_NAMESPACE.to_string(),
            };
            let mut opened = config.open_backend().unwrap();
            opened.persist("[]").unwrap();
            assert_eq!(opened.load().unwrap().as_deref(), Some("[]"));
        }
        assert!(temp.path().join("gamevault-games.json").exists());
        assert!(temp.path().join(crate::sqlite::DB_FILE).exists());
    }
}
