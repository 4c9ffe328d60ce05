// File: src/field.rs
// Purpose: Declarative field descriptors driving form rendering

use crate::attrs::Attributes;
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    File,
    Boolean,
    Checkbox,
    Radio,
    Select,
    Textarea,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Date,
        FieldType::File,
        FieldType::Boolean,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Select,
        FieldType::Textarea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Boolean => "boolean",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
        }
    }

    /// Whether the field is driven by its `options` list
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Radio | FieldType::Select)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormError::UnknownFieldType(s.to_string()))
    }
}

/// Style hooks for a field container and its parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldClassNames {
    pub base: Option<String>,
    pub label: Option<String>,
    pub input: Option<String>,
    pub error: Option<String>,
}

/// Style hooks for one option of a choice field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionClassNames {
    pub base: Option<String>,
    pub input: Option<String>,
    pub label: Option<String>,
}

/// One choice of a checkbox, radio or select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Submitted when the option is chosen
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub class_names: OptionClassNames,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            attributes: Attributes::new(),
            class_names: OptionClassNames::default(),
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn class_names(mut self, class_names: OptionClassNames) -> Self {
        self.class_names = class_names;
        self
    }
}

/// Describes one form field. Carries no state; values and errors live in
/// [`crate::FormState`], keyed by `key`.
///
/// ```
/// use dynform::{FieldDescriptor, FieldType};
///
/// let field = FieldDescriptor::new(FieldType::Textarea, "description")
///     .label("Description")
///     .attribute("rows", "3");
/// assert_eq!(field.rows(2), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub class_names: FieldClassNames,
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType, key: impl Into<String>) -> Self {
        Self {
            field_type,
            key: key.into(),
            label: None,
            options: Vec::new(),
            attributes: Attributes::new(),
            class_names: FieldClassNames::default(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(value, label));
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn class_names(mut self, class_names: FieldClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Row count for a textarea, read from the `rows` attribute
    pub fn rows(&self, default: u32) -> u32 {
        self.attributes
            .get("rows")
            .and_then(|rows| rows.trim().parse::<u32>().ok())
            .filter(|rows| *rows > 0)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_round_trips_through_str() {
        for ty in FieldType::ALL {
            assert_eq!(ty.as_str().parse::<FieldType>(), Ok(ty));
        }
        assert_eq!("TextArea".parse::<FieldType>(), Ok(FieldType::Textarea));
        assert_eq!(
            "color".parse::<FieldType>(),
            Err(FormError::UnknownFieldType("color".to_string()))
        );
    }

    #[test]
    fn test_has_options() {
        let with_options: Vec<_> = FieldType::ALL
            .into_iter()
            .filter(FieldType::has_options)
            .collect();
        assert_eq!(
            with_options,
            vec![FieldType::Checkbox, FieldType::Radio, FieldType::Select]
        );
    }

    #[test]
    fn test_rows_default_and_override() {
        let field = FieldDescriptor::new(FieldType::Textarea, "bio");
        assert_eq!(field.rows(2), 2);
        assert_eq!(field.clone().attribute("rows", "5").rows(2), 5);
        assert_eq!(field.clone().attribute("rows", "abc").rows(2), 2);
        assert_eq!(field.attribute("rows", "0").rows(2), 2);
    }

    #[test]
    fn test_deserialize_descriptor_from_json() {
        let json = serde_json::json!({
            "type": "radio",
            "key": "experience",
            "label": "Experience",
            "options": [
                { "value": "less1", "label": "0-1 year" },
                { "value": "1to3", "label": "1-3 years", "class_names": { "input": "accent-blue-500" } }
            ],
            "class_names": { "error": "italic" }
        });

        let field: FieldDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(field.field_type, FieldType::Radio);
        assert_eq!(field.options.len(), 2);
        assert_eq!(field.options[1].class_names.input.as_deref(), Some("accent-blue-500"));
        assert_eq!(field.class_names.error.as_deref(), Some("italic"));
        assert!(field.attributes.is_empty());
    }
}
