//! Markup rendering for tag groups and special tags

use crate::domain::format::fill;
use crate::domain::rules::RuleEngine;
use crate::domain::store::{SpecialKey, TagStore};
use crate::error::Result;

/// Special tags with a dedicated builder, in render order
const SPECIAL_TAGS: [SpecialKey; 2] = [SpecialKey::Title, SpecialKey::Charset];

/// Renders the contents of a [`TagStore`] through a [`RuleEngine`]
pub struct Renderer<'a> {
    store: &'a TagStore,
    engine: &'a RuleEngine,
    empty_tags_hidden: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a TagStore, engine: &'a RuleEngine, empty_tags_hidden: bool) -> Self {
        Renderer {
            store,
            engine,
            empty_tags_hidden,
        }
    }

    /// Render every tag: special tags first, then each group in order
    pub fn render_all(&self) -> Result<Vec<String>> {
        let mut tags = Vec::new();

        for special in SPECIAL_TAGS {
            if let Some(tag) = self.render_special(special)? {
                tags.push(tag);
            }
        }

        for group in self.store.groups() {
            for (key, value) in &group.tags {
                if self.empty_tags_hidden && value.as_deref().map_or(true, str::is_empty) {
                    continue;
                }

                tags.push(self.render_group_tag(&group.format, key, value.as_deref())?);
            }
        }

        Ok(tags)
    }

    /// Render a single tag, `None` if `key` is unknown.
    ///
    /// Special tags are always rendered, regardless of `empty_tags_hidden`.
    pub fn render_one(&self, key: &str) -> Result<Option<String>> {
        if let Some(tag) = self.render_special(SpecialKey::from_key(key))? {
            return Ok(Some(tag));
        }

        match self.store.get(key) {
            Some((format, value)) => self.render_group_tag(format, key, value).map(Some),
            None => Ok(None),
        }
    }

    fn render_group_tag(&self, format: &str, key: &str, value: Option<&str>) -> Result<String> {
        let value = self.engine.apply(key, value)?.unwrap_or_default();
        Ok(fill(format, &[key, &value]))
    }

    fn render_special(&self, special: SpecialKey) -> Result<Option<String>> {
        match special {
            SpecialKey::Title => self.build_title_tag().map(Some),
            SpecialKey::Charset => Ok(Some(self.build_charset_tag())),
            _ => Ok(None),
        }
    }

    /// `<title>` with the title run through the rules as key "title"
    fn build_title_tag(&self) -> Result<String> {
        let title = self
            .engine
            .apply("title", Some(self.store.special().title.as_str()))?
            .unwrap_or_default();
        Ok(format!("<title>{}</title>", title))
    }

    fn build_charset_tag(&self) -> String {
        build_custom_tag("meta", &[("charset", self.store.special().charset.as_str())])
    }
}

/// Build an opening tag with attributes in the given order.
///
/// Attribute values are written as-is, without escaping.
pub fn build_custom_tag(tag: &str, attributes: &[(&str, &str)]) -> String {
    let mut output = format!("<{}", tag);
    for (name, value) in attributes {
        output.push_str(&format!(" {}=\"{}\"", name, value));
    }
    output.push('>');
    output
}
