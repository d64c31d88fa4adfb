//! Tag value transformation rules
//!
//! Every rendered value goes through three steps, always in this order:
//! special-value substitution (`[url]`, `[asset:path]`), max-length
//! truncation and format wrapping. Rule patterns are regular expressions
//! matched against the tag key; the first matching pattern of each rule
//! table wins.

use crate::domain::format::fill;
use crate::error::{MetaTagsError, Result};
use indexmap::IndexMap;
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Placeholder replaced by the canonical URL of the current page
pub const URL_PLACEHOLDER: &str = "[url]";

const ELLIPSIS: &str = "...";

/// Regex for matching asset placeholders: [asset:img/social.png]
fn asset_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\[asset:(.*)\]").unwrap())
}

/// Ordered rule tables keyed by regex pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Pattern -> maximum value length (including the trailing "...")
    pub max_length: IndexMap<String, usize>,

    /// Pattern -> format template with a single `%s` placeholder
    pub format: IndexMap<String, String>,
}

/// Resolves a relative asset path to an absolute URL
pub trait AssetResolver {
    fn resolve(&self, path: &str) -> Result<String>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Result<String>,
{
    fn resolve(&self, path: &str) -> Result<String> {
        self(path)
    }
}

/// Asset resolver that prefixes paths with a site base URL
#[derive(Debug, Clone)]
pub struct BaseUrlAssets {
    base: String,
}

impl BaseUrlAssets {
    pub fn new(base: impl Into<String>) -> Self {
        BaseUrlAssets { base: base.into() }
    }
}

impl AssetResolver for BaseUrlAssets {
    fn resolve(&self, path: &str) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

/// Applies a [`RuleSet`] to tag values for a single page
pub struct RuleEngine {
    rules: RuleSet,
    url: String,
    assets: Box<dyn AssetResolver>,
    patterns: RefCell<HashMap<String, Regex>>,
}

impl RuleEngine {
    /// Create a rule engine for the page at `url`
    pub fn new(rules: RuleSet, url: impl Into<String>, assets: Box<dyn AssetResolver>) -> Self {
        RuleEngine {
            rules,
            url: url.into(),
            assets,
            patterns: RefCell::new(HashMap::new()),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Canonical URL of the current page
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Transform the value of tag `key`.
    ///
    /// Absent and empty values short-circuit to `None`, meaning the tag
    /// carries no content.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule pattern fails to compile or the asset
    /// resolver fails.
    pub fn apply(&self, key: &str, value: Option<&str>) -> Result<Option<String>> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };

        let value = self.replace_special_values(value)?;
        let value = self.apply_max_length_rule(key, value)?;
        let value = self.apply_format_rule(key, value)?;

        Ok(Some(value))
    }

    /// Replace `[url]` with the page URL and `[asset:path]` with the resolved asset
    fn replace_special_values(&self, value: &str) -> Result<String> {
        let value = value.replace(URL_PLACEHOLDER, &self.url);

        if let Some(caps) = asset_regex().captures(&value) {
            return self.assets.resolve(&caps[1]);
        }

        Ok(value)
    }

    fn apply_max_length_rule(&self, key: &str, value: String) -> Result<String> {
        for (pattern, limit) in &self.rules.max_length {
            if self.matches(pattern, key)? {
                trace!("max_length rule '{}' ({}) applies to '{}'", pattern, limit, key);
                return Ok(truncate(&value, *limit));
            }
        }

        Ok(value)
    }

    fn apply_format_rule(&self, key: &str, value: String) -> Result<String> {
        for (pattern, template) in &self.rules.format {
            if self.matches(pattern, key)? {
                trace!("format rule '{}' applies to '{}'", pattern, key);
                return Ok(fill(template, &[&value]));
            }
        }

        Ok(value)
    }

    /// Match `key` against `pattern`, compiling and caching it on first use
    fn matches(&self, pattern: &str, key: &str) -> Result<bool> {
        let mut cache = self.patterns.borrow_mut();
        if let Some(regex) = cache.get(pattern) {
            return Ok(regex.is_match(key));
        }

        let regex = compile_pattern(pattern)?;
        let matched = regex.is_match(key);
        cache.insert(pattern.to_string(), regex);
        Ok(matched)
    }
}

/// Compile a rule pattern.
///
/// Accepts plain regexes (`^description`) as well as delimited ones
/// (`/^description/`, `/TITLE$/i`).
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let source = strip_delimiters(pattern)?.unwrap_or_else(|| pattern.to_string());

    Regex::new(&source).map_err(|source| MetaTagsError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Turn `/expr/flags` into `(?flags)expr`; `None` if not delimited.
///
/// `u` is accepted and dropped since Rust regexes are always Unicode-aware.
fn strip_delimiters(pattern: &str) -> Result<Option<String>> {
    let Some(body) = pattern.strip_prefix('/') else {
        return Ok(None);
    };
    let Some(end) = body.rfind('/') else {
        return Ok(None);
    };
    let (expr, flags) = (&body[..end], &body[end + 1..]);

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'u' => {}
            _ => {
                return Err(MetaTagsError::UnsupportedPatternFlag {
                    pattern: pattern.to_string(),
                    flag,
                })
            }
        }
    }

    if inline.is_empty() {
        Ok(Some(expr.to_string()))
    } else {
        Ok(Some(format!("(?{}){}", inline, expr)))
    }
}

/// Cut `value` to `limit` characters, ending with "..." when shortened.
///
/// The cut is a raw character cut: whitespace before the ellipsis is trimmed
/// but no word boundary is searched for.
pub fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }

    let kept: String = value
        .chars()
        .take(limit.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rules: RuleSet) -> RuleEngine {
        RuleEngine::new(
            rules,
            "http://localhost",
            Box::new(BaseUrlAssets::new("http://localhost")),
        )
    }

    fn sample_rules() -> RuleSet {
        let mut rules = RuleSet::default();
        rules.max_length.insert("/^description/".to_string(), 150);
        rules.max_length.insert("/description$/".to_string(), 200);
        rules.max_length.insert("/title$/".to_string(), 70);
        rules
            .format
            .insert("/title$/".to_string(), "%s - SiteName".to_string());
        rules
    }

    #[test]
    fn test_absent_and_empty_values_skip_rules() {
        let engine = engine(sample_rules());
        assert_eq!(engine.apply("title", None).unwrap(), None);
        assert_eq!(engine.apply("title", Some("")).unwrap(), None);
    }

    #[test]
    fn test_url_placeholder() {
        let engine = engine(RuleSet::default());
        let out = engine.apply("canonical", Some("[url]")).unwrap();
        assert_eq!(out.as_deref(), Some("http://localhost"));

        let out = engine.apply("og:url", Some("[url]/about?ref=[url]")).unwrap();
        assert_eq!(
            out.as_deref(),
            Some("http://localhost/about?ref=http://localhost")
        );
    }

    #[test]
    fn test_asset_placeholder_replaces_whole_value() {
        let engine = engine(RuleSet::default());
        let out = engine
            .apply("og:image", Some("[asset:img/social.png]"))
            .unwrap();
        assert_eq!(out.as_deref(), Some("http://localhost/img/social.png"));

        let out = engine
            .apply("og:image", Some("see [asset:/img/a.png] here"))
            .unwrap();
        assert_eq!(out.as_deref(), Some("http://localhost/img/a.png"));
    }

    #[test]
    fn test_asset_resolver_closure_and_error() {
        let engine = RuleEngine::new(
            RuleSet::default(),
            "http://localhost",
            Box::new(|path: &str| -> Result<String> {
                Err(MetaTagsError::AssetResolution(format!("missing {}", path)))
            }),
        );
        let err = engine.apply("og:image", Some("[asset:x.png]")).unwrap_err();
        assert!(err.to_string().contains("missing x.png"));
    }

    #[test]
    fn test_first_max_length_pattern_wins() {
        let engine = engine(sample_rules());
        let long = "a".repeat(500);

        // "description" matches both ^description and description$; the first wins
        let out = engine.apply("description", Some(&long)).unwrap().unwrap();
        assert_eq!(out.len(), 150);
        assert!(out.ends_with("..."));

        let out = engine.apply("og:description", Some(&long)).unwrap().unwrap();
        assert_eq!(out.len(), 200);
    }

    #[test]
    fn test_truncation_before_format() {
        let engine = engine(sample_rules());
        let long = "b".repeat(100);
        let out = engine.apply("og:title", Some(&long)).unwrap().unwrap();
        assert_eq!(out, format!("{}... - SiteName", "b".repeat(67)));
    }

    #[test]
    fn test_format_rule() {
        let engine = engine(sample_rules());
        let out = engine.apply("title", Some("Hello World!")).unwrap();
        assert_eq!(out.as_deref(), Some("Hello World! - SiteName"));

        let out = engine.apply("keywords", Some("rust")).unwrap();
        assert_eq!(out.as_deref(), Some("rust"));
    }

    #[test]
    fn test_invalid_pattern_fails_on_apply() {
        let mut rules = RuleSet::default();
        rules.max_length.insert("/([a-z/".to_string(), 10);
        let engine = engine(rules);

        // No pattern runs for empty values
        assert!(engine.apply("title", None).is_ok());

        match engine.apply("title", Some("x")) {
            Err(MetaTagsError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "/([a-z/"),
            other => panic!("Expected InvalidPattern error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rules_mut_takes_effect() {
        let mut engine = engine(RuleSet::default());
        engine
            .rules_mut()
            .format
            .insert("^keywords$".to_string(), "[%s]".to_string());
        let out = engine.apply("keywords", Some("a,b")).unwrap();
        assert_eq!(out.as_deref(), Some("[a,b]"));
    }

    #[test]
    fn test_compile_pattern_delimiters_and_flags() {
        assert!(compile_pattern("/^description/").unwrap().is_match("description"));
        assert!(!compile_pattern("/^description/").unwrap().is_match("og:description"));
        assert!(compile_pattern("/TITLE$/i").unwrap().is_match("og:title"));
        assert!(compile_pattern("title$").unwrap().is_match("twitter:title"));
        assert!(compile_pattern("/TITLE$/iu").unwrap().is_match("og:title"));
    }

    #[test]
    fn test_compile_pattern_unicode_flag() {
        let regex = compile_pattern("/title$/u").unwrap();
        assert!(regex.is_match("og:title"));
        assert!(!regex.is_match("og:title:alt"));
    }

    #[test]
    fn test_compile_pattern_unsupported_flag() {
        match compile_pattern("/title$/e") {
            Err(MetaTagsError::UnsupportedPatternFlag { pattern, flag }) => {
                assert_eq!(pattern, "/title$/e");
                assert_eq!(flag, 'e');
            }
            other => panic!("Expected UnsupportedPatternFlag error, got {:?}", other),
        }
        assert!(compile_pattern("/a/b").is_err());
    }

    #[test]
    fn test_format_rule_with_unicode_flag() {
        let mut rules = RuleSet::default();
        rules
            .format
            .insert("/title$/u".to_string(), "%s - X".to_string());
        let engine = engine(rules);
        let out = engine.apply("title", Some("Hi")).unwrap();
        assert_eq!(out.as_deref(), Some("Hi - X"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefg...");
        // Whitespace before the ellipsis is trimmed
        assert_eq!(truncate("abcdef  ghijk", 10), "abcdef...");
        // Counts characters, not bytes
        assert_eq!(truncate("ééééééééééé", 10), "ééééééé...");
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_base_url_assets_join() {
        let assets = BaseUrlAssets::new("https://example.com/");
        assert_eq!(
            assets.resolve("/img/a.png").unwrap(),
            "https://example.com/img/a.png"
        );
        assert_eq!(
            assets.resolve("img/a.png").unwrap(),
            "https://example.com/img/a.png"
        );
    }
}
