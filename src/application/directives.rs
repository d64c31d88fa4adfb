//! Template directive expansion
//!
//! Replaces meta tag directives embedded in a page template:
//!
//! - `@meta` - all tags
//! - `@meta_get('og:title')` - a single tag
//! - `@meta_set({"title": "Home"})` - sets tags, produces no output
//!
//! Directives are expanded left to right, so a `@meta_set` only affects the
//! directives after it. `@@meta` produces a literal `@meta`, and an `@meta`
//! preceded by a word character (`admin@meta.com`) is not a directive.

use crate::application::service::MetaTagsService;
use crate::error::{MetaTagsError, Result};
use serde_json::{Map, Value};

const DIRECTIVE: &str = "@meta";
const GET_PREFIX: &str = "_get(";
const SET_PREFIX: &str = "_set(";

#[derive(Debug, Clone, PartialEq)]
enum Directive {
    All,
    Get(String),
    Set(Vec<(String, Option<String>)>),
    /// `@meta` followed by more identifier characters, e.g. `@metadata`
    Literal,
}

/// Expand every directive in `template` against `service`
pub fn expand(template: &str, service: &mut MetaTagsService) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(DIRECTIVE) {
        let (before, at) = rest.split_at(pos);
        let after = &at[DIRECTIVE.len()..];

        if let Some(before) = before.strip_suffix('@') {
            output.push_str(before);
            output.push_str(DIRECTIVE);
            rest = after;
            continue;
        }
        output.push_str(before);

        // Mid-word `@meta`, e.g. an email address
        if before.ends_with(|c: char| c.is_alphanumeric() || c == '_') {
            output.push_str(DIRECTIVE);
            rest = after;
            continue;
        }

        let (directive, consumed) = parse_directive(after)?;
        match directive {
            Directive::All => output.push_str(&service.to_html(None)?),
            Directive::Get(key) => output.push_str(&service.to_html(Some(&key))?),
            Directive::Set(values) => {
                for (key, value) in values {
                    service.set_with(&key, value, true);
                }
            }
            Directive::Literal => output.push_str(DIRECTIVE),
        }

        rest = &after[consumed..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Parse what follows `@meta`, returning the directive and the bytes consumed
fn parse_directive(after: &str) -> Result<(Directive, usize)> {
    if let Some(args) = after.strip_prefix(GET_PREFIX) {
        let end = args.find(')').ok_or_else(|| {
            MetaTagsError::Directive("Unterminated @meta_get directive".to_string())
        })?;
        let key = unquote(args[..end].trim())?;
        return Ok((Directive::Get(key), GET_PREFIX.len() + end + 1));
    }

    if let Some(args) = after.strip_prefix(SET_PREFIX) {
        let (values, len) = parse_set_arguments(args)?;
        return Ok((Directive::Set(values), SET_PREFIX.len() + len));
    }

    if after.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return Ok((Directive::Literal, 0));
    }

    Ok((Directive::All, 0))
}

/// Strip one pair of matching quotes from a tag key
fn unquote(arg: &str) -> Result<String> {
    let key = ['\'', '"']
        .iter()
        .find_map(|q| arg.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
        .unwrap_or(arg);

    if key.is_empty() {
        return Err(MetaTagsError::Directive(
            "@meta_get requires a tag key".to_string(),
        ));
    }

    Ok(key.to_string())
}

/// Parse `{...})` into ordered key/value pairs
fn parse_set_arguments(args: &str) -> Result<(Vec<(String, Option<String>)>, usize)> {
    let mut stream = serde_json::Deserializer::from_str(args).into_iter::<Map<String, Value>>();

    let map = match stream.next() {
        Some(map) => map?,
        None => {
            return Err(MetaTagsError::Directive(
                "@meta_set expects a JSON object".to_string(),
            ))
        }
    };

    let consumed = stream.byte_offset();
    let tail = &args[consumed..];
    let close = tail.len() - tail.trim_start().len();
    if !tail[close..].starts_with(')') {
        return Err(MetaTagsError::Directive(
            "Unterminated @meta_set directive".to_string(),
        ));
    }

    let values = map
        .into_iter()
        .map(|(key, value)| {
            let value = directive_value(&key, value)?;
            Ok((key, value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((values, consumed + close + 1))
}

fn directive_value(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Null => Ok(None),
        _ => Err(MetaTagsError::Directive(format!(
            "@meta_set value for '{}' must be a string",
            key
        ))),
    }
}
