//! Error types for metatags

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for metatags
#[derive(Debug, Error)]
pub enum MetaTagsError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid rule pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported flag '{flag}' in rule pattern '{pattern}'")]
    UnsupportedPatternFlag { pattern: String, flag: char },

    #[error("Asset resolution failed: {0}")]
    AssetResolution(String),

    #[error("Directive error: {0}")]
    Directive(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetaTagsError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MetaTagsError::ConfigNotFound(_) => 2,
            MetaTagsError::InvalidPattern { .. }
            | MetaTagsError::UnsupportedPatternFlag { .. } => 3,
            MetaTagsError::Directive(_) | MetaTagsError::Json(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            MetaTagsError::ConfigNotFound(path) => {
                format!(
                    "Config file not found: {}\n\n\
                    Suggestions:\n\
                    • Run 'metatags init' to write the default configuration\n\
                    • Pass the config location with --config <FILE>",
                    path.display()
                )
            }
            MetaTagsError::InvalidPattern { pattern, source } => {
                format!(
                    "Invalid rule pattern '{}': {}\n\n\
                    Rule patterns are regular expressions matched against tag keys.\n\
                    Both plain (^description) and delimited (/^description/i) forms are accepted.",
                    pattern, source
                )
            }
            MetaTagsError::UnsupportedPatternFlag { pattern, flag } => {
                format!(
                    "Unsupported flag '{}' in rule pattern '{}'\n\n\
                    Supported flags: i, m, s, x, U (u is accepted and ignored)",
                    flag, pattern
                )
            }
            MetaTagsError::Directive(msg) => {
                format!(
                    "{}\n\n\
                    Supported directives:\n\
                    • @meta\n\
                    • @meta_get('og:title')\n\
                    • @meta_set({{\"title\": \"Home\", \"description\": \"...\"}})",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using MetaTagsError
pub type Result<T> = std::result::Result<T, MetaTagsError>;
