//! Tag groups and the mutable tag table

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// A set of related tags sharing one markup format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagGroup {
    /// Markup with two `%s` placeholders: tag key, then processed value
    pub format: String,

    /// Tag key -> raw value, in render order
    pub tags: IndexMap<String, Option<String>>,
}

impl TagGroup {
    pub fn new(format: impl Into<String>) -> Self {
        TagGroup {
            format: format.into(),
            tags: IndexMap::new(),
        }
    }

    /// Builder-style tag insertion
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), Some(value.into()));
        self
    }
}

/// Keys handled by dedicated logic instead of a plain group write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    /// Page title, mirrored into `twitter:title` and `og:title`
    Title,
    /// Fans out to `description`, `og:description`, `twitter:description`
    Description,
    /// Fans out to `twitter:url`, `og:url`, `canonical`
    Url,
    /// Fans out to `twitter:image`, `og:image`
    Image,
    /// Document character encoding
    Charset,
    /// Any other key
    Plain,
}

const SPECIAL_KEYS: [(&str, SpecialKey); 5] = [
    ("title", SpecialKey::Title),
    ("description", SpecialKey::Description),
    ("url", SpecialKey::Url),
    ("image", SpecialKey::Image),
    ("charset", SpecialKey::Charset),
];

impl SpecialKey {
    /// Look up the handler for `key` (ASCII case-insensitive)
    pub fn from_key(key: &str) -> Self {
        SPECIAL_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, special)| *special)
            .unwrap_or(SpecialKey::Plain)
    }
}

/// Singleton values rendered outside of any tag group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialState {
    pub title: String,
    pub charset: String,
}

/// Request-scoped table of tag groups plus the special values
#[derive(Debug, Clone)]
pub struct TagStore {
    groups: Vec<TagGroup>,
    special: SpecialState,
}

impl TagStore {
    /// Create a store from its initial groups and charset
    pub fn new(groups: Vec<TagGroup>, charset: impl Into<String>) -> Self {
        TagStore {
            groups,
            special: SpecialState {
                title: String::new(),
                charset: charset.into(),
            },
        }
    }

    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    pub fn special(&self) -> &SpecialState {
        &self.special
    }

    /// Find `key` in the first group declaring it.
    ///
    /// Returns the group's format and the raw value.
    pub fn get(&self, key: &str) -> Option<(&str, Option<&str>)> {
        self.groups.iter().find_map(|group| {
            group
                .tags
                .get(key)
                .map(|value| (group.format.as_str(), value.as_deref()))
        })
    }

    /// Set a tag value.
    ///
    /// With `discover`, special keys are routed to their handler. Otherwise
    /// the value is written into every group declaring `key`; unknown keys
    /// are ignored.
    pub fn set(&mut self, key: &str, value: Option<String>, discover: bool) {
        let special = if discover {
            SpecialKey::from_key(key)
        } else {
            SpecialKey::Plain
        };

        if special != SpecialKey::Plain {
            debug!("Routing '{}' to the {:?} handler", key, special);
        }

        match special {
            SpecialKey::Title => self.set_title(value),
            SpecialKey::Description => self.set_description(value),
            SpecialKey::Url => self.set_url(value),
            SpecialKey::Image => self.set_image(value),
            SpecialKey::Charset => self.set_charset(value),
            SpecialKey::Plain => self.set_plain(key, value),
        }
    }

    fn set_plain(&mut self, key: &str, value: Option<String>) {
        let mut found = false;
        for group in &mut self.groups {
            if let Some(slot) = group.tags.get_mut(key) {
                *slot = value.clone();
                found = true;
            }
        }

        if !found {
            debug!("Ignoring unknown meta tag '{}'", key);
        }
    }

    fn set_title(&mut self, value: Option<String>) {
        self.special.title = value.clone().unwrap_or_default();
        self.set("twitter:title", value.clone(), false);
        self.set("og:title", value, false);
    }

    fn set_description(&mut self, value: Option<String>) {
        self.set("description", value.clone(), false);
        self.set("og:description", value.clone(), false);
        self.set("twitter:description", value, false);
    }

    fn set_url(&mut self, value: Option<String>) {
        self.set("twitter:url", value.clone(), false);
        self.set("og:url", value.clone(), false);
        self.set("canonical", value, false);
    }

    // Fan-out keys go back through discovery; they are plain keys so this
    // lands in set_plain.
    fn set_image(&mut self, value: Option<String>) {
        self.set("twitter:image", value.clone(), true);
        self.set("og:image", value, true);
    }

    fn set_charset(&mut self, value: Option<String>) {
        self.special.charset = value.unwrap_or_default();
    }
}
