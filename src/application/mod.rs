//! Application layer - Page-level meta tag use cases

pub mod directives;
pub mod service;

pub use directives::expand;
pub use service::MetaTagsService;
