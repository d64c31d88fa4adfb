//! Configuration management

use crate::domain::{RuleSet, TagGroup};
use crate::error::{MetaTagsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "meta-tags.toml";

const NAME_FORMAT: &str = r#"<meta name="%s" content="%s">"#;
const PROPERTY_FORMAT: &str = r#"<meta property="%s" content="%s">"#;
const LINK_FORMAT: &str = r#"<link rel="%s" href="%s">"#;

/// Meta tag configuration.
///
/// Loaded once and used as the read-only template for every page; each
/// page works on its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Skip tags without a value when rendering all tags
    #[serde(default = "default_empty_tags_hidden")]
    pub empty_tags_hidden: bool,

    /// Character encoding of the HTML document
    #[serde(default = "default_charset")]
    pub charset: String,

    #[serde(default)]
    pub rules: RuleSet,

    /// Tag groups in lookup and render order
    #[serde(default)]
    pub tag_groups: Vec<TagGroup>,
}

fn default_empty_tags_hidden() -> bool {
    true
}

fn default_charset() -> String {
    "utf-8".to_string()
}

impl Config {
    /// Build the stock configuration for an application.
    ///
    /// `app_name` feeds the title format rule, `application-name` and
    /// `og:site_name`; `locale` feeds `og:locale`.
    pub fn with_defaults(app_name: &str, locale: &str) -> Self {
        let mut rules = RuleSet::default();
        rules.max_length.insert("/^description/".to_string(), 150);
        rules.max_length.insert("/description$/".to_string(), 200);
        rules.max_length.insert("/title$/".to_string(), 70);
        rules
            .format
            .insert("/title$/".to_string(), format!("%s - {}", app_name));

        let general = TagGroup::new(NAME_FORMAT)
            // General purpose
            .with_tag(
                "viewport",
                "width=device-width, initial-scale=1, shrink-to-fit=no",
            )
            .with_tag("application-name", app_name)
            .with_tag("theme-color", "#1d8cf8")
            .with_tag("description", "")
            .with_tag("subject", "")
            .with_tag("keywords", "")
            .with_tag("referrer", "same-origin")
            .with_tag("rating", "general")
            .with_tag("format-detection", "")
            .with_tag("robots", "index,follow")
            .with_tag("googlebot", "index,follow")
            // Site verification
            .with_tag("google-site-verification", "")
            .with_tag("yandex-verification", "")
            .with_tag("msvalidate.01", "")
            .with_tag("alexaVerifyID", "")
            .with_tag("p:domain_verify", "")
            // Twitter card
            .with_tag("twitter:card", "summary")
            .with_tag("twitter:site", "")
            .with_tag("twitter:site:id", "")
            .with_tag("twitter:creator", "")
            .with_tag("twitter:creator:id", "")
            .with_tag("twitter:description", "")
            .with_tag("twitter:title", "")
            .with_tag("twitter:image", "")
            .with_tag("twitter:image:alt", "")
            .with_tag("twitter:dnt", "on")
            .with_tag("twitter:url", "[url]");

        let open_graph = TagGroup::new(PROPERTY_FORMAT)
            .with_tag("fb:app_id", "")
            .with_tag("og:type", "website")
            .with_tag("og:title", "")
            .with_tag("og:image", "")
            .with_tag("og:image:alt", "")
            .with_tag("og:description", "")
            .with_tag("og:site_name", app_name)
            .with_tag("og:locale", locale)
            .with_tag("article:author", "")
            .with_tag("og:url", "[url]");

        let links = TagGroup::new(LINK_FORMAT)
            .with_tag("dns-prefetch", "")
            .with_tag("preconnect", "")
            .with_tag("prefetch", "")
            .with_tag("prerender", "")
            .with_tag("preload", "")
            .with_tag("canonical", "[url]");

        Config {
            empty_tags_hidden: true,
            charset: default_charset(),
            rules,
            tag_groups: vec![general, open_graph, links],
        }
    }

    /// Parse config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MetaTagsError::ConfigNotFound(path.to_path_buf())
            } else {
                MetaTagsError::Io(e)
            }
        })?;

        Self::from_toml_str(&contents)
    }

    /// Save config as TOML, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;

        fs::write(path, contents)?;

        Ok(())
    }
}
