// File: src/state.rs
// Purpose: Form state manager: registered fields, current values, touched state and errors

use crate::attrs::Attributes;
use crate::field::FieldType;
use crate::schema::{ErrorMap, FieldErrors, Schema};
use crate::submission::Submission;
use crate::value::{Value, ValueMap};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// How posted control values become a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// First posted text, empty string when absent
    Text,
    /// First posted text parsed as a number; `Null` when empty or not numeric
    Number,
    /// Checked when anything was posted
    Bool,
    /// Every posted text (checkbox group)
    Multiple,
    /// First posted text, `Null` when nothing is selected (radio group)
    Single,
    Files,
}

impl ValueKind {
    pub fn for_field(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text
            | FieldType::Email
            | FieldType::Date
            | FieldType::Textarea
            | FieldType::Select => ValueKind::Text,
            FieldType::Number => ValueKind::Number,
            FieldType::Boolean => ValueKind::Bool,
            FieldType::Checkbox => ValueKind::Multiple,
            FieldType::Radio => ValueKind::Single,
            FieldType::File => ValueKind::Files,
        }
    }

    /// Value of a field nobody has touched yet
    pub fn empty_value(&self) -> Value {
        match self {
            ValueKind::Text => Value::Text(String::new()),
            ValueKind::Number | ValueKind::Single => Value::Null,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Multiple => Value::List(Vec::new()),
            ValueKind::Files => Value::Files(Vec::new()),
        }
    }

    fn coerce(&self, key: &str, submission: &Submission) -> Value {
        let texts = submission.texts(key);
        match self {
            ValueKind::Text => Value::Text(texts.first().copied().unwrap_or_default().to_string()),
            ValueKind::Number => texts.first().map(|raw| parse_number(raw)).unwrap_or(Value::Null),
            ValueKind::Bool => Value::Bool(!texts.is_empty()),
            ValueKind::Multiple => Value::List(texts.into_iter().map(str::to_string).collect()),
            ValueKind::Single => texts
                .first()
                .map(|text| Value::Text(text.to_string()))
                .unwrap_or(Value::Null),
            ValueKind::Files => {
                Value::Files(submission.files(key).into_iter().cloned().collect())
            }
        }
    }
}

/// Numeric coercion for number inputs
pub fn parse_number(raw: &str) -> Value {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Null,
    }
}

/// Where a form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Editable. Errors from a rejected submit may be showing.
    #[default]
    Pristine,
    Validating,
    Submitted,
}

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Schema accepted the values and the callback ran
    Submitted,
    /// Schema rejected the values; the callback did not run
    Invalid { fields: Vec<String> },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Tracks the live state of one mounted form.
///
/// Owned by exactly one form; nothing here is shared.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    registrations: BTreeMap<String, ValueKind>,
    values: ValueMap,
    /// Text as typed into number fields, kept for echo when it did not parse
    raw_inputs: BTreeMap<String, String>,
    touched: BTreeSet<String>,
    errors: ErrorMap,
    phase: FormPhase,
    submit_count: u32,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control for `key` and return the attributes it must carry.
    ///
    /// Registering a key again replaces its kind (last registration wins) and
    /// keeps the current value.
    pub fn register(&mut self, key: &str, kind: ValueKind) -> Attributes {
        if let Some(previous) = self.registrations.insert(key.to_string(), kind) {
            if previous != kind {
                warn!(key, ?previous, ?kind, "field re-registered with a different kind");
                self.values.insert(key.to_string(), kind.empty_value());
                self.raw_inputs.remove(key);
            }
        }
        self.values
            .entry(key.to_string())
            .or_insert_with(|| kind.empty_value());

        let attrs = Attributes::new().with("name", key);
        match kind {
            ValueKind::Number => attrs.with("data-value-as", "number"),
            _ => attrs,
        }
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.registrations.contains_key(key)
    }

    pub fn kind(&self, key: &str) -> Option<ValueKind> {
        self.registrations.get(key).copied()
    }

    /// Registered keys in sorted order
    pub fn registered_keys(&self) -> impl Iterator<Item = &str> {
        self.registrations.keys().map(|k| k.as_str())
    }

    /// Set a value directly, bypassing coercion
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) {
        self.raw_inputs.remove(key);
        self.values.insert(key.to_string(), value.into());
    }

    /// A change event from a control carrying `raw` text.
    ///
    /// Checkbox groups toggle `raw` in their list; boolean boxes read
    /// `on`/`true`/`1` as checked. Unregistered keys are ignored.
    pub fn input(&mut self, key: &str, raw: &str) {
        let Some(kind) = self.kind(key) else {
            debug!(key, "input for unregistered field ignored");
            return;
        };

        let value = match kind {
            ValueKind::Text | ValueKind::Single => Value::Text(raw.to_string()),
            ValueKind::Number => {
                self.raw_inputs.insert(key.to_string(), raw.to_string());
                parse_number(raw)
            }
            ValueKind::Bool => Value::Bool(matches!(raw.trim(), "on" | "true" | "1")),
            ValueKind::Multiple => {
                let mut items = self
                    .values
                    .get(key)
                    .and_then(Value::as_list)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                match items.iter().position(|item| item == raw) {
                    Some(index) => {
                        items.remove(index);
                    }
                    None => items.push(raw.to_string()),
                }
                Value::List(items)
            }
            ValueKind::Files => {
                debug!(key, "text input for file field ignored");
                return;
            }
        };

        self.values.insert(key.to_string(), value);
    }

    /// A blur event
    pub fn touch(&mut self, key: &str) {
        self.touched.insert(key.to_string());
    }

    /// Replace the value of every registered key with what `submission` posted
    pub fn collect(&mut self, submission: &Submission) {
        for (key, kind) in &self.registrations {
            if *kind == ValueKind::Number {
                match submission.texts(key).first() {
                    Some(raw) => self.raw_inputs.insert(key.clone(), raw.to_string()),
                    None => self.raw_inputs.remove(key),
                };
            }
            let value = kind.coerce(key, submission);
            self.values.insert(key.clone(), value);
        }
    }

    /// Validate current values against `schema`.
    ///
    /// On success the error map is cleared and `on_valid` runs once with the
    /// accepted values. On failure `on_valid` is not called and the schema's
    /// errors replace the error map.
    pub fn handle_submit<S, F>(&mut self, schema: &S, on_valid: F) -> SubmitOutcome
    where
        S: Schema + ?Sized,
        F: FnOnce(ValueMap),
    {
        self.phase = FormPhase::Validating;
        self.submit_count += 1;

        match schema.validate(&self.values) {
            Ok(accepted) => {
                self.errors.clear();
                self.phase = FormPhase::Submitted;
                info!(fields = accepted.len(), submit_count = self.submit_count, "form submitted");
                on_valid(accepted);
                SubmitOutcome::Submitted
            }
            Err(errors) => {
                let fields: Vec<String> = errors.keys().cloned().collect();
                debug!(?fields, submit_count = self.submit_count, "form rejected by schema");
                self.errors = errors;
                self.phase = FormPhase::Pristine;
                SubmitOutcome::Invalid { fields }
            }
        }
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Text last typed or posted into a number field, parsed or not
    pub fn raw_input(&self, key: &str) -> Option<&str> {
        self.raw_inputs.get(key).map(|raw| raw.as_str())
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&FieldErrors> {
        self.errors.get(key)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Set an error from outside the schema (e.g. a caller-side check)
    pub fn set_error(&mut self, key: &str, errors: FieldErrors) {
        self.errors.insert(key.to_string(), errors);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Whether the value differs from the field's empty value
    pub fn is_dirty(&self, key: &str) -> bool {
        match (self.kind(key), self.values.get(key)) {
            (Some(kind), Some(value)) => *value != kind.empty_value(),
            _ => false,
        }
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Back to empty values, no errors, pristine. Registrations stay.
    pub fn reset(&mut self) {
        self.values = self
            .registrations
            .iter()
            .map(|(key, kind)| (key.clone(), kind.empty_value()))
            .collect();
        self.raw_inputs.clear();
        self.touched.clear();
        self.errors.clear();
        self.phase = FormPhase::Pristine;
        self.submit_count = 0;
    }
}
