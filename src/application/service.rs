//! Meta tag service for a single page render

use crate::domain::{build_custom_tag, AssetResolver, Renderer, RuleEngine, RuleSet, TagStore};
use crate::error::Result;
use crate::infrastructure::Config;
use log::debug;

/// Public entry point combining the tag store, rules and renderer.
///
/// One instance serves one page. It owns a private copy of the config, so
/// `set` calls never leak into other pages.
pub struct MetaTagsService {
    store: TagStore,
    engine: RuleEngine,
    empty_tags_hidden: bool,
}

impl MetaTagsService {
    /// Create a service for the page at `url`
    pub fn new(config: &Config, url: impl Into<String>, assets: Box<dyn AssetResolver>) -> Self {
        let config = config.clone();
        MetaTagsService {
            store: TagStore::new(config.tag_groups, config.charset),
            engine: RuleEngine::new(config.rules, url, assets),
            empty_tags_hidden: config.empty_tags_hidden,
        }
    }

    /// Set a tag, routing special keys (title, description, url, image,
    /// charset) to their handlers
    pub fn set(&mut self, key: &str, value: &str) {
        self.set_with(key, Some(value.to_string()), true);
    }

    /// Set a tag value, optionally bypassing special-key discovery
    pub fn set_with(&mut self, key: &str, value: Option<String>, discover: bool) {
        debug!("set {} = {:?} (discover: {})", key, value, discover);
        self.store.set(key, value, discover);
    }

    /// Remove the value of a tag
    pub fn clear(&mut self, key: &str) {
        self.set_with(key, None, true);
    }

    /// Set several tags in iteration order
    pub fn set_many<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in values {
            self.set(key.as_ref(), value.as_ref());
        }
    }

    /// Raw lookup: the format of the first group declaring `key` and its value
    pub fn get(&self, key: &str) -> Option<(&str, Option<&str>)> {
        self.store.get(key)
    }

    pub fn title(&self) -> &str {
        &self.store.special().title
    }

    pub fn charset(&self) -> &str {
        &self.store.special().charset
    }

    pub fn url(&self) -> &str {
        self.engine.url()
    }

    /// Rules can be adjusted per page
    pub fn rules_mut(&mut self) -> &mut RuleSet {
        self.engine.rules_mut()
    }

    /// Render one tag; empty for unknown keys
    pub fn build_tag(&self, key: &str) -> Result<String> {
        Ok(self.renderer().render_one(key)?.unwrap_or_default())
    }

    /// Render all tags in order
    pub fn build_tags(&self) -> Result<Vec<String>> {
        self.renderer().render_all()
    }

    /// Markup ready for the page head: all tags (or only `key`), one per
    /// line, newline-terminated
    pub fn to_html(&self, key: Option<&str>) -> Result<String> {
        let html = match key {
            Some(key) => self.build_tag(key)?,
            None => self.build_tags()?.join("\n"),
        };
        Ok(format!("{}\n", html))
    }

    /// Build an ad-hoc tag such as `<link rel="icon" href="...">`
    pub fn build_custom_tag(&self, tag: &str, attributes: &[(&str, &str)]) -> String {
        build_custom_tag(tag, attributes)
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.store, &self.engine, self.empty_tags_hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BaseUrlAssets;

    fn service() -> MetaTagsService {
        MetaTagsService::new(
            &Config::with_defaults("Laravel", "en"),
            "http://localhost",
            Box::new(BaseUrlAssets::new("http://localhost")),
        )
    }

    #[test]
    fn test_template_config_is_not_mutated() {
        let config = Config::with_defaults("Laravel", "en");
        let mut service = MetaTagsService::new(
            &config,
            "http://localhost",
            Box::new(BaseUrlAssets::new("http://localhost")),
        );
        service.set("keywords", "rust");
        service.rules_mut().format.clear();

        assert_eq!(config.tag_groups[0].tags["keywords"].as_deref(), Some(""));
        assert_eq!(config.rules.format.len(), 1);
        assert_eq!(service.get("keywords").unwrap().1, Some("rust"));
    }

    #[test]
    fn test_set_many() {
        let mut service = service();
        service.set_many([("title", "Home"), ("keywords", "a,b")]);
        assert_eq!(service.title(), "Home");
        assert_eq!(service.get("keywords").unwrap().1, Some("a,b"));
    }

    #[test]
    fn test_clear() {
        let mut service = service();
        service.clear("robots");
        assert_eq!(service.get("robots").unwrap().1, None);
        assert!(!service.build_tags().unwrap().iter().any(|t| t.contains("robots")));
    }

    #[test]
    fn test_build_tag_unknown_is_empty() {
        let service = service();
        assert_eq!(service.build_tag("nope").unwrap(), "");
        assert_eq!(service.to_html(Some("nope")).unwrap(), "\n");
    }

    #[test]
    fn test_to_html_joins_lines() {
        let service = service();
        let html = service.to_html(None).unwrap();
        let tags = service.build_tags().unwrap();
        assert_eq!(html, format!("{}\n", tags.join("\n")));
        assert!(html.starts_with("<title></title>\n<meta charset=\"utf-8\">\n"));
    }

    #[test]
    fn test_charset_and_url_accessors() {
        let mut service = service();
        assert_eq!(service.charset(), "utf-8");
        service.set("charset", "iso-8859-1");
        assert_eq!(service.charset(), "iso-8859-1");
        assert_eq!(service.url(), "http://localhost");
        assert_eq!(
            service.build_tag("charset").unwrap(),
            r#"<meta charset="iso-8859-1">"#
        );
    }
}
