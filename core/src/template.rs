//! Path templates with placeholder markers resolved against a nested value.
//!
//! # Design
//! A `PathTemplate` pairs the raw template text with the `TemplateSyntax`
//! that delimits its placeholders. Rendering depends only on the template,
//! its syntax and the scope it renders against.
//!
//! Placeholders hold a dotted path (`ref.type`, `items.0.id`, `items[0].id`)
//! which is followed through the scope. Substituted values are not escaped;
//! percent-encoding is left to the transport. A path that resolves to nothing
//! renders as the literal `undefined`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;

/// Text substituted for a placeholder whose path does not resolve.
pub const UNDEFINED: &str = "undefined";

static DEFAULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("valid placeholder pattern"));

/// Errors raised while configuring a `TemplateSyntax`.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("placeholder delimiters must not be empty")]
    EmptyDelimiter,

    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Opening and closing delimiters of a placeholder.
///
/// The default is `{{` / `}}`. The content between the delimiters is matched
/// lazily and must be non-empty, so `{{a}}{{b}}` holds two placeholders.
#[derive(Debug, Clone)]
pub struct TemplateSyntax {
    open: String,
    close: String,
    pattern: Regex,
}

impl TemplateSyntax {
    pub fn new(open: &str, close: &str) -> Result<Self, TemplateError> {
        if open.is_empty() || close.is_empty() {
            return Err(TemplateError::EmptyDelimiter);
        }
        let pattern = Regex::new(&format!(
            "{}(.+?){}",
            regex::escape(open),
            regex::escape(close)
        ))?;
        Ok(Self {
            open: open.to_string(),
            close: close.to_string(),
            pattern,
        })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl Default for TemplateSyntax {
    fn default() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

/// A path template such as `/item/{{item_id}}/value/{{field_id}}`.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    syntax: TemplateSyntax,
}

impl PathTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_syntax(source, TemplateSyntax::default())
    }

    pub fn with_syntax(source: impl Into<String>, syntax: TemplateSyntax) -> Self {
        Self {
            source: source.into(),
            syntax,
        }
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn syntax(&self) -> &TemplateSyntax {
        &self.syntax
    }

    /// Path expressions referenced by the template, trimmed, in order of
    /// appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        self.syntax
            .pattern
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .collect()
    }

    /// Replace every placeholder with the value its path resolves to in
    /// `scope`.
    ///
    /// Unterminated markers are left verbatim. Unresolved paths render as
    /// [`UNDEFINED`].
    pub fn render(&self, scope: &Value) -> String {
        self.syntax
            .pattern
            .replace_all(&self.source, |caps: &Captures<'_>| {
                let expr = caps[1].trim();
                match lookup(scope, expr) {
                    Some(value) => display_value(value),
                    None => {
                        tracing::warn!(
                            template = %self.source,
                            placeholder = expr,
                            "placeholder did not resolve"
                        );
                        UNDEFINED.to_string()
                    }
                }
            })
            .into_owned()
    }
}

impl From<&str> for PathTemplate {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for PathTemplate {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

// ---------------------------------------------------------------------------
// Path lookup
// ---------------------------------------------------------------------------

enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn segments(expr: &str) -> Option<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    for part in expr.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(i) => part.split_at(i),
            None => (part, ""),
        };
        if !name.is_empty() {
            out.push(Segment::Key(name));
        }
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            let index = stripped[..end].trim().parse().ok()?;
            out.push(Segment::Index(index));
            rest = &stripped[end + 1..];
        }
        if !rest.is_empty() || (name.is_empty() && part.is_empty()) {
            return None;
        }
    }
    Some(out)
}

/// Follow a dotted path through `scope`. Numeric keys index into arrays.
pub(crate) fn lookup<'v>(scope: &'v Value, expr: &str) -> Option<&'v Value> {
    let mut current = scope;
    for segment in segments(expr)? {
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key)?,
            (Segment::Key(key), Value::Array(items)) => items.get(key.parse::<usize>().ok()?)?,
            (Segment::Index(i), Value::Array(items)) => items.get(i)?,
            (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a value the way it is stringified inside a URL.
///
/// Strings are inserted raw, a top-level `null` renders as the text `null`,
/// arrays are comma-joined with `null` elements left empty, and objects
/// collapse to `[object Object]`.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
