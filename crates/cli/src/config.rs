//! Provider credentials.
//!
//! The document lists one entry per catalog database:
//!
//! ```json
//! {"databases": [
//!   {"database": "TMDB", "auth": {"apikey": "..."}},
//!   {"database": "TVDB", "auth": {"apikey": "...", "username": "...", "userkey": "..."}}
//! ]}
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mediamap_core::ProviderKind;
use mediamap_metadata::TvdbCredentials;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Base64 encoded auth document. Takes precedence over `--auth`.
pub const AUTH_CONFIG_ENV: &str = "MEDIAMAP_AUTH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no auth configuration: set MEDIAMAP_AUTH_CONFIG or pass --auth <file>")]
    NoSource,
    #[error("cannot read auth file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid auth document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("MEDIAMAP_AUTH_CONFIG is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("no credentials for {0} in auth document")]
    MissingProvider(ProviderKind),
    #[error("{provider} credentials are missing \"{key}\"")]
    MissingKey {
        provider: ProviderKind,
        key: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct Document {
    databases: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    database: String,
    #[serde(default)]
    auth: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct AuthConfig {
    databases: HashMap<ProviderKind, HashMap<String, String>>,
}

impl AuthConfig {
    /// Pick the configured source: the encoded environment value first,
    /// then the auth file.
    pub fn load(encoded: Option<&str>, file: Option<&Path>) -> Result<Self, ConfigError> {
        match (encoded, file) {
            (Some(encoded), _) => {
                debug!(source = AUTH_CONFIG_ENV, "loading auth configuration");
                Self::from_base64(encoded)
            }
            (None, Some(path)) => {
                debug!(source = %path.display(), "loading auth configuration");
                Self::from_file(path)
            }
            (None, None) => Err(ConfigError::NoSource),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&raw)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        let raw = STANDARD.decode(encoded.trim())?;
        Self::from_slice(&raw)
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, ConfigError> {
        let doc: Document = serde_json::from_slice(raw)?;

        let mut databases = HashMap::new();
        for entry in doc.databases {
            match entry.database.parse::<ProviderKind>() {
                Ok(kind) => {
                    databases.insert(kind, entry.auth);
                }
                Err(e) => warn!(error = %e, "ignoring auth entry"),
            }
        }

        Ok(Self { databases })
    }

    pub fn tmdb_key(&self) -> Result<String, ConfigError> {
        self.require(ProviderKind::Tmdb, "apikey")
    }

    pub fn tvdb_credentials(&self) -> Result<TvdbCredentials, ConfigError> {
        Ok(TvdbCredentials {
            api_key: self.require(ProviderKind::Tvdb, "apikey")?,
            username: self.require(ProviderKind::Tvdb, "username")?,
            user_key: self.require(ProviderKind::Tvdb, "userkey")?,
        })
    }

    fn require(&self, provider: ProviderKind, key: &'static str) -> Result<String, ConfigError> {
        let auth = self
            .databases
            .get(&provider)
            .ok_or(ConfigError::MissingProvider(provider))?;

        match auth.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.clone()),
            _ => Err(ConfigError::MissingKey { provider, key }),
        }
    }
}
