// dynform - dynamic HTML forms rendered with Maud
// Declarative field lists, typed validation schemas, inline error rendering

pub mod attrs;
pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod render;
pub mod schema;
pub mod state;
pub mod submission;
pub mod validators;
pub mod value;

// Re-export Maud for callers composing leading/trailing content
pub use maud::{html as maud, Markup, PreEscaped, DOCTYPE};

pub use attrs::Attributes;
pub use config::{Config, FormSettings, ServerConfig, Theme};
pub use error::FormError;
pub use field::{FieldClassNames, FieldDescriptor, FieldOption, FieldType, OptionClassNames};
pub use form::{Form, FormBuilder, FormClassNames, SubmitCallback};
pub use render::FieldRenderer;
pub use schema::{
    BoolRule, ErrorMap, FieldError, FieldErrors, FileRule, ListRule, NumberRule, Rule, RuleSchema,
    Schema, TextRule,
};
pub use state::{FormPhase, FormState, SubmitOutcome, ValueKind};
pub use submission::{RawValue, Submission};
pub use value::{FileHandle, Value, ValueMap};
