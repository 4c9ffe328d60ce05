// File: src/schema/rules.rs
// Purpose: Declarative rule schema, one typed rule per field key

use super::{ErrorMap, FieldErrors, Schema};
use crate::validators;
use crate::value::{FileHandle, Value, ValueMap};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Rules for string-valued fields (text, email, date, textarea, select, radio)
#[derive(Debug, Clone)]
pub struct TextRule {
    invalid_type: String,
    checks: Vec<TextCheck>,
}

#[derive(Debug, Clone)]
enum TextCheck {
    MinLength(usize, String),
    MaxLength(usize, String),
    Email(String),
    Date(String),
    OneOf(Vec<String>, String),
    Pattern(Regex, String),
}

impl TextRule {
    pub fn new() -> Self {
        Self {
            invalid_type: "Required".to_string(),
            checks: Vec::new(),
        }
    }

    /// Message reported when the value is missing or not text
    pub fn invalid_type(mut self, message: impl Into<String>) -> Self {
        self.invalid_type = message.into();
        self
    }

    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.checks.push(TextCheck::MinLength(min, message.into()));
        self
    }

    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.checks.push(TextCheck::MaxLength(max, message.into()));
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.checks.push(TextCheck::Email(message.into()));
        self
    }

    pub fn date(mut self, message: impl Into<String>) -> Self {
        self.checks.push(TextCheck::Date(message.into()));
        self
    }

    pub fn one_of<I, S>(mut self, allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed.into_iter().map(Into::into).collect();
        self.checks.push(TextCheck::OneOf(allowed, message.into()));
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.checks.push(TextCheck::Pattern(regex, message.into()));
        self
    }

    fn check(&self, value: &Value) -> Option<FieldErrors> {
        let Value::Text(text) = value else {
            return Some(FieldErrors::single(&self.invalid_type));
        };

        self.checks
            .iter()
            .find_map(|check| {
                let (ok, message) = match check {
                    TextCheck::MinLength(min, m) => (validators::has_min_length(text, *min), m),
                    TextCheck::MaxLength(max, m) => (validators::has_max_length(text, *max), m),
                    TextCheck::Email(m) => (validators::is_valid_email(text), m),
                    TextCheck::Date(m) => (validators::is_valid_date(text), m),
                    TextCheck::OneOf(allowed, m) => (validators::is_one_of(text, allowed), m),
                    TextCheck::Pattern(regex, m) => (regex.is_match(text), m),
                };
                (!ok).then_some(message)
            })
            .map(FieldErrors::single)
    }
}

impl Default for TextRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules for number fields. Expects the coerced `Value::Number`.
#[derive(Debug, Clone)]
pub struct NumberRule {
    invalid_type: String,
    checks: Vec<NumberCheck>,
}

#[derive(Debug, Clone)]
enum NumberCheck {
    Min(f64, String),
    Max(f64, String),
    Integer(String),
}

impl NumberRule {
    pub fn new() -> Self {
        Self {
            invalid_type: "Expected number".to_string(),
            checks: Vec::new(),
        }
    }

    pub fn invalid_type(mut self, message: impl Into<String>) -> Self {
        self.invalid_type = message.into();
        self
    }

    pub fn min(mut self, min: f64, message: impl Into<String>) -> Self {
        self.checks.push(NumberCheck::Min(min, message.into()));
        self
    }

    pub fn max(mut self, max: f64, message: impl Into<String>) -> Self {
        self.checks.push(NumberCheck::Max(max, message.into()));
        self
    }

    pub fn integer(mut self, message: impl Into<String>) -> Self {
        self.checks.push(NumberCheck::Integer(message.into()));
        self
    }

    fn check(&self, value: &Value) -> Option<FieldErrors> {
        let n = match value {
            Value::Number(n) if n.is_finite() => *n,
            _ => return Some(FieldErrors::single(&self.invalid_type)),
        };

        self.checks
            .iter()
            .find_map(|check| match check {
                NumberCheck::Min(min, m) if n < *min => Some(m),
                NumberCheck::Max(max, m) if n > *max => Some(m),
                NumberCheck::Integer(m) if n.fract() != 0.0 => Some(m),
                _ => None,
            })
            .map(FieldErrors::single)
    }
}

impl Default for NumberRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules for checkbox groups
#[derive(Debug, Clone)]
pub struct ListRule {
    invalid_type: String,
    checks: Vec<ListCheck>,
}

#[derive(Debug, Clone)]
enum ListCheck {
    MinItems(usize, String),
    MaxItems(usize, String),
    Allowed(Vec<String>, String),
}

impl ListRule {
    pub fn new() -> Self {
        Self {
            invalid_type: "Expected a list".to_string(),
            checks: Vec::new(),
        }
    }

    pub fn invalid_type(mut self, message: impl Into<String>) -> Self {
        self.invalid_type = message.into();
        self
    }

    pub fn min_items(mut self, min: usize, message: impl Into<String>) -> Self {
        self.checks.push(ListCheck::MinItems(min, message.into()));
        self
    }

    pub fn max_items(mut self, max: usize, message: impl Into<String>) -> Self {
        self.checks.push(ListCheck::MaxItems(max, message.into()));
        self
    }

    /// Every checked item must be one of `allowed`
    pub fn allowed<I, S>(mut self, allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed.into_iter().map(Into::into).collect();
        self.checks.push(ListCheck::Allowed(allowed, message.into()));
        self
    }

    fn check(&self, value: &Value) -> Option<FieldErrors> {
        let Value::List(items) = value else {
            return Some(FieldErrors::single(&self.invalid_type));
        };

        self.checks
            .iter()
            .find_map(|check| match check {
                ListCheck::MinItems(min, m) if items.len() < *min => Some(m),
                ListCheck::MaxItems(max, m) if items.len() > *max => Some(m),
                ListCheck::Allowed(allowed, m)
                    if !items.iter().all(|item| validators::is_one_of(item, allowed)) =>
                {
                    Some(m)
                }
                _ => None,
            })
            .map(FieldErrors::single)
    }
}

impl Default for ListRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules for single boolean checkboxes
#[derive(Debug, Clone)]
pub struct BoolRule {
    invalid_type: String,
    must_be_true: Option<String>,
}

impl BoolRule {
    pub fn new() -> Self {
        Self {
            invalid_type: "Expected boolean".to_string(),
            must_be_true: None,
        }
    }

    pub fn invalid_type(mut self, message: impl Into<String>) -> Self {
        self.invalid_type = message.into();
        self
    }

    /// Reject an unchecked box (terms-of-service style)
    pub fn must_be_true(mut self, message: impl Into<String>) -> Self {
        self.must_be_true = Some(message.into());
        self
    }

    fn check(&self, value: &Value) -> Option<FieldErrors> {
        match (value, &self.must_be_true) {
            (Value::Bool(false), Some(message)) => Some(FieldErrors::single(message)),
            (Value::Bool(_), _) => None,
            _ => Some(FieldErrors::single(&self.invalid_type)),
        }
    }
}

impl Default for BoolRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Rules for file inputs. Errors are always reported as a sequence.
#[derive(Debug, Clone, Default)]
pub struct FileRule {
    required: Option<String>,
    max_files: Option<(usize, String)>,
    per_file: Vec<FileCheck>,
}

#[derive(Debug, Clone)]
enum FileCheck {
    MaxSize(u64, String),
    Accept(Vec<String>, String),
}

impl FileRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn max_files(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_files = Some((max, message.into()));
        self
    }

    /// Largest accepted file in bytes
    pub fn max_size(mut self, bytes: u64, message: impl Into<String>) -> Self {
        self.per_file.push(FileCheck::MaxSize(bytes, message.into()));
        self
    }

    /// Accepted types, in `accept` attribute syntax (`image/*`, `.pdf`)
    pub fn accept<I, S>(mut self, types: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types = types.into_iter().map(Into::into).collect();
        self.per_file.push(FileCheck::Accept(types, message.into()));
        self
    }

    fn file_error(&self, file: &FileHandle) -> Option<&String> {
        self.per_file.iter().find_map(|check| match check {
            FileCheck::MaxSize(max, m) if file.size > *max => Some(m),
            FileCheck::Accept(types, m)
                if !validators::matches_accept(&file.name, file.content_type.as_deref(), types) =>
            {
                Some(m)
            }
            _ => None,
        })
    }

    fn check(&self, value: &Value) -> Option<FieldErrors> {
        let files: &[FileHandle] = match value {
            Value::Files(files) => files,
            _ => &[],
        };

        if files.is_empty() {
            return self
                .required
                .as_ref()
                .map(|message| FieldErrors::many([message.as_str()]));
        }

        if let Some((max, message)) = &self.max_files {
            if files.len() > *max {
                return Some(FieldErrors::many([message.as_str()]));
            }
        }

        let errors: Vec<&String> = files.iter().filter_map(|file| self.file_error(file)).collect();
        if errors.is_empty() {
            None
        } else {
            Some(FieldErrors::many(errors.into_iter().cloned()))
        }
    }
}

/// A typed rule for one field
#[derive(Debug, Clone)]
pub enum Rule {
    Text(TextRule),
    Number(NumberRule),
    List(ListRule),
    Boolean(BoolRule),
    Files(FileRule),
}

impl Rule {
    /// `None` when the value passes
    pub fn check(&self, value: &Value) -> Option<FieldErrors> {
        match self {
            Rule::Text(rule) => rule.check(value),
            Rule::Number(rule) => rule.check(value),
            Rule::List(rule) => rule.check(value),
            Rule::Boolean(rule) => rule.check(value),
            Rule::Files(rule) => rule.check(value),
        }
    }
}

impl From<TextRule> for Rule {
    fn from(rule: TextRule) -> Self {
        Rule::Text(rule)
    }
}

impl From<NumberRule> for Rule {
    fn from(rule: NumberRule) -> Self {
        Rule::Number(rule)
    }
}

impl From<ListRule> for Rule {
    fn from(rule: ListRule) -> Self {
        Rule::List(rule)
    }
}

impl From<BoolRule> for Rule {
    fn from(rule: BoolRule) -> Self {
        Rule::Boolean(rule)
    }
}

impl From<FileRule> for Rule {
    fn from(rule: FileRule) -> Self {
        Rule::Files(rule)
    }
}

/// Schema built from one rule per field key.
///
/// Keys without a rule pass through unchecked. A missing value is checked as
/// `Value::Null`.
///
/// ```
/// use dynform::{NumberRule, RuleSchema, Schema, TextRule, Value, ValueMap};
///
/// let schema = RuleSchema::new()
///     .field("name", TextRule::new().min_length(1, "Name is required"))
///     .field("age", NumberRule::new().invalid_type("Age must be a number").min(0.0, "Too young"));
///
/// let mut values = ValueMap::new();
/// values.insert("name".into(), Value::from("Ada"));
/// values.insert("age".into(), Value::Number(36.0));
/// assert!(schema.validate(&values).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSchema {
    rules: BTreeMap<String, Rule>,
}

impl RuleSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.rules.insert(key.into(), rule.into());
        self
    }

    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }
}

impl Schema for RuleSchema {
    fn validate(&self, values: &ValueMap) -> Result<ValueMap, ErrorMap> {
        let errors: ErrorMap = self
            .rules
            .iter()
            .filter_map(|(key, rule)| {
                let value = values.get(key).unwrap_or(&Value::Null);
                rule.check(value).map(|errors| (key.clone(), errors))
            })
            .collect();

        if errors.is_empty() {
            Ok(values.clone())
        } else {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "rule schema rejected values");
            Err(errors)
        }
    }
}
