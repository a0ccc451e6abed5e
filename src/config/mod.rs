use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::DEFAULT_IMPORT_LOOKAHEAD;

const CONFIG_FILE: &str = ".resolvejsrc.json";
const LOG_FILE: &str = "log.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How many characters from the top of a buffer are scanned for imports.
    #[serde(default = "default_import_lookahead")]
    pub import_lookahead: usize,

    /// Buffers whose file carries one of these extensions get completions.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_import_lookahead() -> usize { DEFAULT_IMPORT_LOOKAHEAD }

fn default_source_extensions() -> Vec<String> {
    vec![".js".to_string(), ".mjs".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            import_lookahead: default_import_lookahead(),
            source_extensions: default_source_extensions(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Whether a buffer backed by `file_name` should be treated as JavaScript.
    pub fn is_javascript_source(&self, file_name: Option<&Path>) -> bool {
        file_name
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_with_dot = format!(".{}", ext);
                self.source_extensions.contains(&ext_with_dot)
            })
            .unwrap_or(false)
    }

    /// The configured log file, or `log.txt` beside the executable.
    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(LOG_FILE)))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    }
}
