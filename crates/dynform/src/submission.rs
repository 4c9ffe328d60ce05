// File: src/submission.rs
// Purpose: Raw control values posted by a browser, before coercion

use crate::value::FileHandle;

/// One posted control value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    File(FileHandle),
}

/// Control values as the browser posts them, in document order.
///
/// Repeated names are kept (checkbox groups post one entry per checked box);
/// unchecked boxes and unselected radios post nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    entries: Vec<(String, RawValue)>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &str) -> Self {
        let entries = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(name), RawValue::Text(decode(value)))
            })
            .collect();

        Self { entries }
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), RawValue::Text(value.into())));
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: FileHandle) {
        self.entries.push((name.into(), RawValue::File(file)));
    }

    /// Builder form of [`Submission::push_text`]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    /// Builder form of [`Submission::push_file`]
    pub fn file(mut self, name: impl Into<String>, file: FileHandle) -> Self {
        self.push_file(name, file);
        self
    }

    /// All text values posted under `name`, in order
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.entries_for(name)
            .filter_map(|value| match value {
                RawValue::Text(text) => Some(text.as_str()),
                RawValue::File(_) => None,
            })
            .collect()
    }

    /// All files posted under `name`, in order
    pub fn files(&self, name: &str) -> Vec<&FileHandle> {
        self.entries_for(name)
            .filter_map(|value| match value {
                RawValue::File(file) => Some(file),
                RawValue::Text(_) => None,
            })
            .collect()
    }

    pub fn entries(&self) -> &[(String, RawValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries_for(&self, name: &str) -> impl Iterator<Item = &RawValue> + '_ {
        let name = name.to_owned();
        self.entries
            .iter()
            .filter(move |(entry_name, _)| *entry_name == name)
            .map(|(_, value)| value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), RawValue::Text(v.into())))
                .collect(),
        }
    }
}

fn decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}
