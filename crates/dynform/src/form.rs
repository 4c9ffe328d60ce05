// File: src/form.rs
// Purpose: Form orchestrator: mounts a field list against a schema and submit callback

use crate::attrs::{class_list, element, Attributes};
use crate::config::{Config, FormSettings, Theme};
use crate::error::FormError;
use crate::field::{FieldDescriptor, FieldType};
use crate::render::FieldRenderer;
use crate::schema::Schema;
use crate::state::{FormPhase, FormState, SubmitOutcome, ValueKind};
use crate::submission::Submission;
use crate::value::ValueMap;
use maud::{html, Markup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Style hooks for the form element, the field wrapper and the submit button
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormClassNames {
    pub form: Option<String>,
    pub input_fields: Option<String>,
    pub button: Option<String>,
}

/// Receives the accepted values of a valid submission
pub type SubmitCallback<'a> = Box<dyn FnMut(ValueMap) + 'a>;

/// Collects the optional parts of a form before mounting it
pub struct FormBuilder<'a> {
    fields: Vec<FieldDescriptor>,
    schema: &'a dyn Schema,
    on_submit: SubmitCallback<'a>,
    before: Option<Markup>,
    after: Option<Markup>,
    class_names: FormClassNames,
    form_attributes: Attributes,
    submit_attributes: Attributes,
    theme: Theme,
    settings: FormSettings,
}

impl<'a> FormBuilder<'a> {
    /// Content rendered inside the form, ahead of the fields
    pub fn before(mut self, markup: Markup) -> Self {
        self.before = Some(markup);
        self
    }

    /// Content rendered after the fields, ahead of the submit button
    pub fn after(mut self, markup: Markup) -> Self {
        self.after = Some(markup);
        self
    }

    pub fn class_names(mut self, class_names: FormClassNames) -> Self {
        self.class_names = class_names;
        self
    }

    /// Passthrough attributes for the `<form>` element
    pub fn form_attributes(mut self, attributes: Attributes) -> Self {
        self.form_attributes = attributes;
        self
    }

    /// Passthrough attributes for the submit button
    pub fn submit_attributes(mut self, attributes: Attributes) -> Self {
        self.submit_attributes = attributes;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn settings(mut self, settings: FormSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Take theme and form settings from a loaded configuration
    pub fn config(self, config: &Config) -> Self {
        self.theme(config.theme.clone()).settings(config.form.clone())
    }

    /// Check the field list and register every field with a fresh state
    pub fn build(self) -> Result<Form<'a>, FormError> {
        check_fields(&self.fields, self.settings.reject_duplicate_keys)?;

        let mut state = FormState::new();
        for field in &self.fields {
            state.register(&field.key, ValueKind::for_field(field.field_type));
        }
        debug!(fields = self.fields.len(), "form mounted");

        Ok(Form {
            fields: self.fields,
            schema: self.schema,
            on_submit: self.on_submit,
            before: self.before,
            after: self.after,
            class_names: self.class_names,
            form_attributes: self.form_attributes,
            submit_attributes: self.submit_attributes,
            theme: self.theme,
            settings: self.settings,
            state,
        })
    }
}

fn check_fields(fields: &[FieldDescriptor], reject_duplicates: bool) -> Result<(), FormError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.key.as_str()) {
            if reject_duplicates {
                return Err(FormError::DuplicateKey(field.key.clone()));
            }
            warn!(key = %field.key, "duplicate field key, last registration wins");
        }
        if field.field_type.has_options() && field.options.is_empty() {
            return Err(FormError::MissingOptions {
                key: field.key.clone(),
                field_type: field.field_type,
            });
        }
    }
    Ok(())
}

/// A mounted form: field list, live state, schema and submit callback.
///
/// ```
/// use dynform::{FieldDescriptor, FieldType, Form, RuleSchema, Submission, TextRule};
///
/// let schema = RuleSchema::new().field("name", TextRule::new().min_length(1, "Name is required"));
/// let mut submitted = Vec::new();
/// let mut form = Form::builder(
///     vec![FieldDescriptor::new(FieldType::Text, "name").label("Name")],
///     &schema,
///     |values| submitted.push(values),
/// )
/// .build()
/// .unwrap();
///
/// assert!(!form.submit(&Submission::new().text("name", "")).is_submitted());
/// assert!(form.render().into_string().contains("Name is required"));
///
/// assert!(form.submit(&Submission::new().text("name", "Ada")).is_submitted());
/// drop(form);
/// assert_eq!(submitted.len(), 1);
/// ```
pub struct Form<'a> {
    fields: Vec<FieldDescriptor>,
    schema: &'a dyn Schema,
    on_submit: SubmitCallback<'a>,
    before: Option<Markup>,
    after: Option<Markup>,
    class_names: FormClassNames,
    form_attributes: Attributes,
    submit_attributes: Attributes,
    theme: Theme,
    settings: FormSettings,
    state: FormState,
}

impl<'a> Form<'a> {
    pub fn builder(
        fields: Vec<FieldDescriptor>,
        schema: &'a dyn Schema,
        on_submit: impl FnMut(ValueMap) + 'a,
    ) -> FormBuilder<'a> {
        FormBuilder {
            fields,
            schema,
            on_submit: Box::new(on_submit),
            before: None,
            after: None,
            class_names: FormClassNames::default(),
            form_attributes: Attributes::new(),
            submit_attributes: Attributes::new(),
            theme: Theme::default(),
            settings: FormSettings::default(),
        }
    }

    /// Render the whole form: leading content, one group per field in
    /// order, trailing content, submit button.
    pub fn render(&mut self) -> Markup {
        let renderer = FieldRenderer::new(&self.theme, &self.settings);

        let form_attrs = Attributes::new()
            .with("method", "post")
            .with_opt("enctype", self.has_file_field().then_some("multipart/form-data"))
            .with_opt(
                "class",
                class_list([Some(self.theme.form.as_str()), self.class_names.form.as_deref()]),
            )
            .merged(&self.form_attributes);

        let submit_attrs = Attributes::new()
            .with("type", "submit")
            .with_opt(
                "class",
                class_list([Some(self.theme.button.as_str()), self.class_names.button.as_deref()]),
            )
            .merged(&self.submit_attributes);

        let content = html! {
            @if let Some(before) = &self.before {
                (before)
            }
            div class=[class_list([Some(self.theme.input_fields.as_str()), self.class_names.input_fields.as_deref()])] {
                @for field in &self.fields {
                    (renderer.render(field, &mut self.state))
                }
            }
            @if let Some(after) = &self.after {
                (after)
            }
            (element("button", &submit_attrs, html! { (self.settings.submit_label) }))
        };

        element("form", &form_attrs, content)
    }

    /// Collect posted values and run them through the schema.
    ///
    /// The callback runs exactly once when the schema accepts the values and
    /// never when it rejects them; rejected submissions leave their errors in
    /// [`Form::state`] for the next [`Form::render`].
    pub fn submit(&mut self, submission: &Submission) -> SubmitOutcome {
        self.state.collect(submission);
        self.submit_current()
    }

    /// Validate the values already held by the state (after
    /// [`FormState::input`] events) without collecting a submission
    pub fn submit_current(&mut self) -> SubmitOutcome {
        let on_submit = &mut self.on_submit;
        self.state
            .handle_submit(self.schema, |values| on_submit(values))
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase()
    }

    fn has_file_field(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.field_type == FieldType::File)
    }
}
