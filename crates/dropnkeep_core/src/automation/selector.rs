//! Restricted CSS selector subset used by the lookup table.
//!
//! Grammar: an optional lowercase tag name followed by zero or more
//! attribute clauses `[name]`, `[name="v"]`, `[name^="v"]`, `[name*="v"]`
//! or `[name$="v"]`. Combinators and selector lists are not supported;
//! alternatives are separate table entries instead.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static COMPOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<tag>[a-z][a-z0-9-]*)?(?P<attrs>(?:\[[^\]]*\])*)$")
        .expect("valid compound selector regex")
});
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\[\s*(?P<name>[A-Za-z_][-A-Za-z0-9_]*)\s*(?:(?P<op>[\^*$]?=)\s*"(?P<value>[^"]*)"\s*)?\]"#,
    )
    .expect("valid attribute selector regex")
});

/// Read-only view of an element, enough to evaluate a `Selector`.
pub trait ElementAttributes {
    /// Lowercase tag name, e.g. `div`.
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// Attribute comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[name]`
    Present,
    /// `[name="v"]`
    Equals,
    /// `[name^="v"]`
    StartsWith,
    /// `[name*="v"]`
    Contains,
    /// `[name$="v"]`
    EndsWith,
}

impl AttributeOp {
    fn css_operator(self) -> &'static str {
        match self {
            Self::Present => "",
            Self::Equals => "=",
            Self::StartsWith => "^=",
            Self::Contains => "*=",
            Self::EndsWith => "$=",
        }
    }
}

/// One `[name op "value"]` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub op: AttributeOp,
    pub value: String,
}

impl AttributeMatch {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self.op {
            AttributeOp::Present => true,
            AttributeOp::Equals => actual == self.value,
            // CSS: an empty operand never matches for the substring forms.
            AttributeOp::StartsWith => !self.value.is_empty() && actual.starts_with(&self.value),
            AttributeOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
            AttributeOp::EndsWith => !self.value.is_empty() && actual.ends_with(&self.value),
        }
    }
}

/// Parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attributes: Vec<AttributeMatch>,
}

impl Selector {
    /// Parses one compound selector.
    ///
    /// # Errors
    /// - `SelectorError::Empty` for blank input.
    /// - `SelectorError::Unsupported` for anything outside the grammar.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let caps = COMPOUND_RE
            .captures(trimmed)
            .ok_or_else(|| SelectorError::Unsupported(trimmed.to_string()))?;

        let tag = caps.name("tag").map(|m| m.as_str().to_string());
        let attrs_source = caps.name("attrs").map_or("", |m| m.as_str());

        let mut attributes = Vec::new();
        let mut consumed = 0;
        for attr in ATTRIBUTE_RE.captures_iter(attrs_source) {
            let whole = attr.get(0).map_or(0..0, |m| m.range());
            if whole.start != consumed {
                return Err(SelectorError::Unsupported(trimmed.to_string()));
            }
            consumed = whole.end;

            let op = match attr.name("op").map(|m| m.as_str()) {
                None => AttributeOp::Present,
                Some("=") => AttributeOp::Equals,
                Some("^=") => AttributeOp::StartsWith,
                Some("*=") => AttributeOp::Contains,
                Some("$=") => AttributeOp::EndsWith,
                Some(_) => return Err(SelectorError::Unsupported(trimmed.to_string())),
            };
            attributes.push(AttributeMatch {
                name: attr["name"].to_string(),
                op,
                value: attr
                    .name("value")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            });
        }
        if consumed != attrs_source.len() {
            return Err(SelectorError::Unsupported(trimmed.to_string()));
        }
        if tag.is_none() && attributes.is_empty() {
            return Err(SelectorError::Unsupported(trimmed.to_string()));
        }

        Ok(Self { tag, attributes })
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn attributes(&self) -> &[AttributeMatch] {
        &self.attributes
    }

    /// Evaluates this selector against one element.
    pub fn matches(&self, element: &impl ElementAttributes) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|clause| clause.matches(element.attribute(&clause.name)))
    }

    /// Renders the selector back to CSS for `querySelector`.
    pub fn to_css(&self) -> String {
        let mut css = self.tag.clone().unwrap_or_default();
        for clause in &self.attributes {
            match clause.op {
                AttributeOp::Present => css.push_str(&format!("[{}]", clause.name)),
                op => css.push_str(&format!(
                    "[{}{}\"{}\"]",
                    clause.name,
                    op.css_operator(),
                    clause.value
                )),
            }
        }
        css
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Ordered alternatives; earlier entries have priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parses every entry, failing on the first invalid one.
    pub fn parse<S: AsRef<str>>(sources: &[S]) -> Result<Self, SelectorError> {
        let selectors = sources
            .iter()
            .map(|source| Selector::parse(source.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectorList {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

/// Selector parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    Unsupported(String),
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "selector must not be empty"),
            Self::Unsupported(value) => write!(f, "unsupported selector: `{value}`"),
        }
    }
}

impl Error for SelectorError {}
