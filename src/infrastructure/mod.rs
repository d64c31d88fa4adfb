//! Infrastructure layer - Configuration loading and persistence

pub mod config;

pub use config::{Config, DEFAULT_CONFIG_FILE};
