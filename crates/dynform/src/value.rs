// File: src/value.rs
// Purpose: Field value types collected from controls and handed to submit callbacks

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current value of every registered field, keyed by field key
pub type ValueMap = BTreeMap<String, Value>;

/// An uploaded file, passed through to the submit callback untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    #[serde(skip_serializing, default)]
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            size: bytes.len() as u64,
            bytes,
        }
    }
}

/// Value held for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Checked options of a checkbox group
    List(Vec<String>),
    Files(Vec<FileHandle>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[FileHandle]> {
        match self {
            Value::Files(files) => Some(files),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether a choice control carrying `option` should render as checked/selected
    pub fn selects(&self, option: &str) -> bool {
        match self {
            Value::Text(s) => s == option,
            Value::List(items) => items.iter().any(|item| item == option),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                // Format number nicely (remove .0 for integers)
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Text(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(", ")),
            Value::Files(files) => {
                let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<FileHandle>> for Value {
    fn from(files: Vec<FileHandle>) -> Self {
        Value::Files(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::List(vec!["a".into(), "b".into()]).to_string(), "a, b");
    }

    #[test]
    fn test_selects() {
        assert!(Value::from("option1").selects("option1"));
        assert!(!Value::from("option1").selects("option2"));
        assert!(Value::List(vec!["films".into()]).selects("films"));
        assert!(!Value::Null.selects(""));
    }

    #[test]
    fn test_serialize_to_json() {
        let mut map = ValueMap::new();
        map.insert("age".into(), Value::Number(30.0));
        map.insert("hobbies".into(), Value::List(vec!["films".into()]));
        map.insert("note".into(), Value::Null);
        map.insert(
            "file".into(),
            Value::Files(vec![FileHandle::new("cv.pdf", Some("application/pdf".into()), vec![1, 2, 3])]),
        );

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "age": 30.0,
                "file": [{ "name": "cv.pdf", "content_type": "application/pdf", "size": 3 }],
                "hobbies": ["films"],
                "note": null
            })
        );
    }
}
