//! Server configuration from environment variables.

use std::path::{Path, PathBuf};

use enrichit_core::vocabulary::Vocabulary;

use crate::error::AppError;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Vocabulary dataset, `.json`, `.yaml` or `.yml` (`VOCABULARY_PATH`).
    pub vocabulary_path: PathBuf,
    /// Directory of journal files (`JOURNALS_DIR`).
    pub journals_dir: PathBuf,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value is invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} environment variable must be set")))
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            host,
            port,
            vocabulary_path: PathBuf::from(required("VOCABULARY_PATH")?),
            journals_dir: PathBuf::from(required("JOURNALS_DIR")?),
        })
    }

    /// The `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads the vocabulary dataset, choosing the format by file extension.
///
/// # Errors
///
/// Returns `AppError::Config` for an unreadable file or unknown extension,
/// and `AppError::Vocabulary` if the dataset is invalid.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary, AppError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let vocabulary = match extension.as_deref() {
        Some("json") => Vocabulary::from_json(&source)?,
        Some("yaml" | "yml") => Vocabulary::from_yaml(&source)?,
        _ => {
            return Err(AppError::Config(format!(
                "unsupported vocabulary format: {}",
                path.display()
            )));
        }
    };
    Ok(vocabulary)
}
