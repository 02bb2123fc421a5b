//! Production template helper functions.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDateTime;
use tera::Value;

use crate::server::ui::UiMethod;

/// URL prefix static assets are served under
pub const STATIC_URL_PREFIX: &str = "/static/";

/// Every helper function available to production templates.
pub fn all() -> Vec<(&'static str, UiMethod)> {
    vec![
        ("pretty_date", Arc::new(pretty_date) as UiMethod),
        ("pluralize", Arc::new(pluralize) as UiMethod),
        ("static_url", Arc::new(static_url) as UiMethod),
    ]
}

/// `pretty_date(value=...)`: formats a timestamp as `Oct 16, 2026 14:05`.
///
/// Values that are not timestamps are passed through unchanged.
pub fn pretty_date(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let value = required(args, "pretty_date", "value")?;

    Ok(match value.as_str() {
        Some(raw) => Value::String(format_timestamp(raw)),
        None => value.clone(),
    })
}

/// Formats a serialized timestamp for display, returning the input unchanged when it
/// does not parse.
pub fn format_timestamp(raw: &str) -> String {
    raw.parse::<NaiveDateTime>()
        .map(|timestamp| timestamp.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `pluralize(count=..., word=...)`: `1 request`, `3 requests`.
pub fn pluralize(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = required(args, "pluralize", "count")?
        .as_u64()
        .ok_or_else(|| tera::Error::msg("pluralize: `count` must be a non-negative integer"))?;
    let word = required(args, "pluralize", "word")?
        .as_str()
        .ok_or_else(|| tera::Error::msg("pluralize: `word` must be a string"))?;

    let suffix = if count == 1 { "" } else { "s" };
    Ok(Value::String(format!("{count} {word}{suffix}")))
}

/// `static_url(path=...)`: URL of a static asset.
pub fn static_url(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = required(args, "static_url", "path")?
        .as_str()
        .ok_or_else(|| tera::Error::msg("static_url: `path` must be a string"))?;

    Ok(Value::String(format!(
        "{STATIC_URL_PREFIX}{}",
        path.trim_start_matches('/')
    )))
}

fn required<'a>(
    args: &'a HashMap<String, Value>,
    function: &str,
    name: &str,
) -> tera::Result<&'a Value> {
    args.get(name)
        .ok_or_else(|| tera::Error::msg(format!("{function}: missing `{name}` argument")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tera::Value;

    use super::{pluralize, pretty_date, static_url};

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn pretty_date_formats_timestamps() {
        let result = pretty_date(&args(&[("value", Value::from("2026-10-16T14:05:00"))])).unwrap();
        assert_eq!(result, Value::from("Oct 16, 2026 14:05"));
    }

    #[test]
    fn pretty_date_passes_unparseable_values_through() {
        let result = pretty_date(&args(&[("value", Value::from("yesterday"))])).unwrap();
        assert_eq!(result, Value::from("yesterday"));
    }

    #[test]
    fn pluralize_uses_singular_for_one() {
        let word = ("word", Value::from("request"));
        let one = pluralize(&args(&[("count", Value::from(1)), word.clone()]));
        let many = pluralize(&args(&[("count", Value::from(3)), word]));

        assert_eq!(one.unwrap(), Value::from("1 request"));
        assert_eq!(many.unwrap(), Value::from("3 requests"));
    }

    #[test]
    fn pluralize_requires_count() {
        assert!(pluralize(&args(&[("word", Value::from("request"))])).is_err());
    }

    #[test]
    fn static_url_prefixes_paths() {
        let result = static_url(&args(&[("path", Value::from("/css/pushmanager.css"))])).unwrap();
        assert_eq!(result, Value::from("/static/css/pushmanager.css"));
    }
}
