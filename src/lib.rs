//! metatags - HTML meta tag generation
//!
//! Renders `<title>`, `<meta>` and `<link>` tags for a page from a declarative
//! configuration, applying per-tag rules (placeholder substitution,
//! truncation, formatting) to every value.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::MetaTagsService;
pub use error::MetaTagsError;
