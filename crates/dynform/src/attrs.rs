// File: src/attrs.rs
// Purpose: Attribute bags for generated controls and caller passthrough

use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTML attributes for one element.
///
/// An empty value renders as a bare boolean attribute (`multiple`, `checked`).
/// Keys are kept sorted, so the same bag always renders the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`Attributes::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a boolean attribute such as `multiple` or `required`
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.with(name, "")
    }

    /// Set `name` only when `value` is present
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer `overrides` on top of these attributes. On a name conflict the
    /// override wins.
    pub fn merged(mut self, overrides: &Attributes) -> Self {
        for (name, value) in &overrides.0 {
            self.0.insert(name.clone(), value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Renders as ` name="value"` pairs with a leading space, ready to sit inside a tag.
/// Names that could break out of the tag are dropped.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter().filter(|(name, _)| is_valid_name(name)) {
            if value.is_empty() {
                write!(f, " {}", name)?;
            } else {
                write!(f, " {}=\"{}\"", name, escape(value))?;
            }
        }
        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '>' | '<' | '/' | '='))
}

fn escape(value: &str) -> String {
    html! { (value) }.into_string()
}

/// Element without content (`<input ...>`)
pub(crate) fn void_element(tag: &str, attrs: &Attributes) -> Markup {
    PreEscaped(format!("<{}{}>", tag, attrs))
}

/// Element wrapping already-rendered content
pub(crate) fn element(tag: &str, attrs: &Attributes, content: Markup) -> Markup {
    PreEscaped(format!("<{tag}{attrs}>{}</{tag}>", content.into_string()))
}

/// Join a theme default with an optional caller style hook.
/// Returns `None` when both are empty so no empty `class` is emitted.
pub(crate) fn class_list<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
