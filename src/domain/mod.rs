//! Domain layer - Tag storage, value rules and markup rendering

pub mod format;
pub mod render;
pub mod rules;
pub mod store;

pub use render::{build_custom_tag, Renderer};
pub use rules::{AssetResolver, BaseUrlAssets, RuleEngine, RuleSet};
pub use store::{SpecialKey, SpecialState, TagGroup, TagStore};
