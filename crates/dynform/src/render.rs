// File: src/render.rs
// Purpose: Field renderer: one control group per descriptor, dispatched on field type

use crate::attrs::{class_list, element, void_element, Attributes};
use crate::config::{FormSettings, Theme};
use crate::field::{FieldDescriptor, FieldOption, FieldType};
use crate::state::{FormState, ValueKind};
use crate::value::Value;
use maud::{html, Markup};
use tracing::warn;

/// Renders single fields against a form's live state.
///
/// Every control registers its field key with the state before it is
/// rendered; caller passthrough attributes are layered after the generated
/// and registration attributes, so they win on conflicts.
pub struct FieldRenderer<'a> {
    theme: &'a Theme,
    textarea_rows: u32,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(theme: &'a Theme, settings: &FormSettings) -> Self {
        Self {
            theme,
            textarea_rows: settings.textarea_rows,
        }
    }

    pub fn render(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        match field.field_type {
            FieldType::Boolean => self.boolean(field, state),
            FieldType::Checkbox | FieldType::Radio => self.choice_group(field, state),
            FieldType::Select => self.select(field, state),
            FieldType::Textarea => self.textarea(field, state),
            FieldType::Text
            | FieldType::Email
            | FieldType::Number
            | FieldType::Date
            | FieldType::File => self.input(field, state),
        }
    }

    fn boolean(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        let registration = register(field, state);
        let checked = state
            .value(&field.key)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut generated = Attributes::new()
            .with("type", "checkbox")
            .with("id", &field.key)
            .with("value", "true")
            .with_opt(
                "class",
                class_list([Some(self.theme.choice.as_str()), field.class_names.input.as_deref()]),
            );
        if checked {
            generated.insert("checked", "");
        }
        let attrs = generated.merged(&registration).merged(&field.attributes);

        html! {
            div class=[class_list([Some(self.theme.inline.as_str()), field.class_names.base.as_deref()])] {
                (void_element("input", &attrs))
                (self.label(field))
                (self.error_message(field, state))
            }
        }
    }

    fn choice_group(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        html! {
            div class=[self.container_class(field)] {
                @if let Some(label) = &field.label {
                    label class=[self.label_class(field)] { (label) }
                }
                @for option in &field.options {
                    (self.choice_option(field, option, state))
                }
                (self.error_message(field, state))
            }
        }
    }

    fn choice_option(&self, field: &FieldDescriptor, option: &FieldOption, state: &mut FormState) -> Markup {
        // Every option registers the same key: the group shares one value
        let registration = register(field, state);
        let id = format!("{}-{}", field.key, option.value);
        let checked = state
            .value(&field.key)
            .map(|value| value.selects(&option.value))
            .unwrap_or(false);

        let mut generated = Attributes::new()
            .with("type", field.field_type.as_str())
            .with("id", &id)
            .with("value", &option.value)
            .with_opt(
                "class",
                class_list([Some(self.theme.choice.as_str()), option.class_names.input.as_deref()]),
            );
        if checked {
            generated.insert("checked", "");
        }
        let attrs = generated
            .merged(&registration)
            .merged(&field.attributes)
            .merged(&option.attributes);

        html! {
            div class=[class_list([Some(self.theme.inline.as_str()), option.class_names.base.as_deref()])] {
                (void_element("input", &attrs))
                label class=[option.class_names.label.as_deref()] for=(id) { (option.label) }
            }
        }
    }

    fn select(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        let registration = register(field, state);
        let generated = Attributes::new()
            .with("id", &field.key)
            .with_opt("class", self.control_class(&self.theme.select, field, state));
        let attrs = generated.merged(&registration).merged(&field.attributes);

        let current = state.value(&field.key);
        let options = html! {
            @for option in &field.options {
                (select_option(option, current))
            }
        };

        html! {
            div class=[self.container_class(field)] {
                (self.label(field))
                (element("select", &attrs, options))
                (self.error_message(field, state))
            }
        }
    }

    fn textarea(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        let registration = register(field, state);
        let generated = Attributes::new()
            .with("id", &field.key)
            .with("rows", field.rows(self.textarea_rows).to_string())
            .with_opt("class", self.control_class(&self.theme.control, field, state));
        let attrs = generated.merged(&registration).merged(&field.attributes);

        let text = state.value(&field.key).and_then(Value::as_str).unwrap_or("");

        html! {
            div class=[self.container_class(field)] {
                (self.label(field))
                (element("textarea", &attrs, html! { (text) }))
                (self.error_message(field, state))
            }
        }
    }

    /// text, email, number, date and file: `<input>` whose type is the tag itself
    fn input(&self, field: &FieldDescriptor, state: &mut FormState) -> Markup {
        let registration = register(field, state);

        // File inputs cannot be pre-filled; number inputs echo what was typed
        let current = match field.field_type {
            FieldType::File => None,
            _ => state
                .raw_input(&field.key)
                .map(str::to_string)
                .or_else(|| state.value(&field.key).map(|value| value.to_string()))
                .filter(|value| !value.is_empty()),
        };

        let generated = Attributes::new()
            .with("type", field.field_type.as_str())
            .with("id", &field.key)
            .with_opt("value", current)
            .with_opt("class", self.control_class(&self.theme.control, field, state));
        let attrs = generated.merged(&registration).merged(&field.attributes);

        html! {
            div class=[self.container_class(field)] {
                (self.label(field))
                (void_element("input", &attrs))
                (self.error_message(field, state))
            }
        }
    }

    fn label(&self, field: &FieldDescriptor) -> Markup {
        html! {
            @if let Some(label) = &field.label {
                label class=[self.label_class(field)] for=(field.key) { (label) }
            }
        }
    }

    /// Inline message for the field's entry in the error map.
    ///
    /// File fields store a sequence of errors and show the first entry's
    /// message; every other field stores one error object.
    fn error_message(&self, field: &FieldDescriptor, state: &FormState) -> Markup {
        let Some(errors) = state.error(&field.key) else {
            return html! {};
        };

        let message = match field.field_type {
            FieldType::File => errors.first_message(),
            _ => errors.message(),
        };
        let message = message.unwrap_or_else(|| {
            warn!(key = %field.key, field_type = %field.field_type, "error entry shape does not match field type");
            ""
        });

        html! {
            p class=[class_list([Some(self.theme.error.as_str()), field.class_names.error.as_deref()])] {
                (message)
            }
        }
    }

    fn container_class(&self, field: &FieldDescriptor) -> Option<String> {
        class_list([Some(self.theme.field.as_str()), field.class_names.base.as_deref()])
    }

    fn label_class(&self, field: &FieldDescriptor) -> Option<String> {
        class_list([Some(self.theme.label.as_str()), field.class_names.label.as_deref()])
    }

    fn control_class(&self, base: &str, field: &FieldDescriptor, state: &FormState) -> Option<String> {
        let error = state
            .error(&field.key)
            .map(|_| self.theme.control_error.as_str());
        class_list([Some(base), error, field.class_names.input.as_deref()])
    }
}

/// Register `field` under the kind its key already carries.
///
/// The form resolves kinds once at mount, so rendering never flips a shared
/// key between kinds (which would reset its value).
fn register(field: &FieldDescriptor, state: &mut FormState) -> Attributes {
    let kind = state
        .kind(&field.key)
        .unwrap_or_else(|| ValueKind::for_field(field.field_type));
    state.register(&field.key, kind)
}

fn select_option(option: &FieldOption, current: Option<&Value>) -> Markup {
    let mut generated = Attributes::new()
        .with("value", &option.value)
        .with_opt("class", option.class_names.input.as_deref());
    if current.map(|value| value.selects(&option.value)).unwrap_or(false) {
        generated.insert("selected", "");
    }
    let attrs = generated.merged(&option.attributes);

    element("option", &attrs, html! { (option.label) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::FieldErrors;
    use pretty_assertions::assert_eq;

    fn render(field: &FieldDescriptor, state: &mut FormState) -> String {
        let config = Config::default();
        FieldRenderer::new(&config.theme, &config.form)
            .render(field, state)
            .into_string()
    }

    #[test]
    fn test_text_input_markup() {
        let field = FieldDescriptor::new(FieldType::Text, "name").label("Name");
        let mut state = FormState::new();

        assert_eq!(
            render(&field, &mut state),
            concat!(
                r#"<div class="flex flex-col">"#,
                r#"<label for="name">Name</label>"#,
                r#"<input class="px-3 py-2 border-2 border-gray-200 focus:border-gray-400 outline-none transition-all duration-100 rounded-md" id="name" name="name" type="text">"#,
                "</div>"
            )
        );
        assert!(state.is_registered("name"));
    }

    #[test]
    fn test_number_registers_numeric_coercion() {
        let field = FieldDescriptor::new(FieldType::Number, "age");
        let mut state = FormState::new();
        let html = render(&field, &mut state);

        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"data-value-as="number""#));
        assert_eq!(state.kind("age"), Some(ValueKind::Number));

        state.input("age", "41");
        assert!(render(&field, &mut state).contains(r#"value="41""#));
    }

    #[test]
    fn test_boolean_renders_single_checkbox_with_inline_label() {
        let field = FieldDescriptor::new(FieldType::Boolean, "terms").label("I agree");
        let mut state = FormState::new();
        state.register("terms", ValueKind::Bool);
        state.input("terms", "on");

        assert_eq!(
            render(&field, &mut state),
            concat!(
                r#"<div class="flex flex-row items-center gap-2">"#,
                r#"<input checked class="w-5 h-5" id="terms" name="terms" type="checkbox" value="true">"#,
                r#"<label for="terms">I agree</label>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_radio_group_shares_key_and_marks_selection() {
        let field = FieldDescriptor::new(FieldType::Radio, "experience")
            .label("Experience")
            .option("less1", "0-1 year")
            .option("1to3", "1-3 years");
        let mut state = FormState::new();
        state.register("experience", ValueKind::Single);
        state.input("experience", "1to3");

        let html = render(&field, &mut state);
        assert_eq!(html.matches(r#"name="experience""#).count(), 2);
        assert!(html.contains(r#"<input class="w-5 h-5" id="experience-less1" name="experience" type="radio" value="less1">"#));
        assert!(html.contains(r#"<input checked class="w-5 h-5" id="experience-1to3" name="experience" type="radio" value="1to3">"#));
        assert!(html.contains(r#"<label for="experience-1to3">1-3 years</label>"#));
    }

    #[test]
    fn test_select_marks_current_option() {
        let field = FieldDescriptor::new(FieldType::Select, "select")
            .option("", "Choose option")
            .option("option1", "Option 1");
        let mut state = FormState::new();
        state.register("select", ValueKind::Text);
        state.input("select", "option1");

        let html = render(&field, &mut state);
        // An empty value renders as a bare attribute
        assert!(html.contains("<option value>Choose option</option>"));
        assert!(html.contains(r#"<option selected value="option1">Option 1</option>"#));
    }

    #[test]
    fn test_textarea_rows() {
        let mut state = FormState::new();
        let default_rows = FieldDescriptor::new(FieldType::Textarea, "bio");
        assert!(render(&default_rows, &mut state).contains(r#"rows="2""#));

        let custom = FieldDescriptor::new(FieldType::Textarea, "description").attribute("rows", "3");
        state.register("description", ValueKind::Text);
        state.input("description", "<b>hi</b>");
        let html = render(&custom, &mut state);
        assert!(html.contains(r#"rows="3""#));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;</textarea>"));
    }

    #[test]
    fn test_textarea_rows_passthrough_verbatim() {
        let mut state = FormState::new();
        let field = FieldDescriptor::new(FieldType::Textarea, "notes").attribute("rows", "auto");

        let html = render(&field, &mut state);
        assert!(html.contains(r#"rows="auto""#));
        assert_eq!(html.matches("rows=").count(), 1);
    }

    #[test]
    fn test_number_echoes_unparsed_text() {
        let field = FieldDescriptor::new(FieldType::Number, "age");
        let mut state = FormState::new();
        state.register("age", ValueKind::Number);
        state.input("age", "abc");

        assert_eq!(state.value("age"), Some(&Value::Null));
        assert!(render(&field, &mut state).contains(r#"value="abc""#));
    }

    #[test]
    fn test_render_keeps_registered_kind() {
        let field = FieldDescriptor::new(FieldType::Text, "age");
        let mut state = FormState::new();
        state.register("age", ValueKind::Number);
        state.input("age", "42");

        let html = render(&field, &mut state);
        assert_eq!(state.kind("age"), Some(ValueKind::Number));
        assert_eq!(state.value("age"), Some(&Value::Number(42.0)));
        assert!(html.contains(r#"value="42""#));
    }

    #[test]
    fn test_passthrough_overrides_registration() {
        let field = FieldDescriptor::new(FieldType::File, "upload")
            .attribute("multiple", "")
            .attribute("name", "upload[]")
            .attribute("accept", "image/*");
        let mut state = FormState::new();

        let html = render(&field, &mut state);
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains(" multiple "));
        assert!(html.contains(r#"name="upload[]""#));
        assert!(!html.contains(r#"name="upload""#));
    }

    #[test]
    fn test_error_message_single_object() {
        let field = FieldDescriptor::new(FieldType::Email, "email").label("Email");
        let mut state = FormState::new();
        state.set_error("email", FieldErrors::single("Invalid e-mail"));

        let html = render(&field, &mut state);
        assert!(html.contains("border-red-700 focus:border-red-700"));
        assert!(html.ends_with(r#"<p class="text-red-700 font-medium">Invalid e-mail</p></div>"#));
    }

    #[test]
    fn test_file_error_reads_first_sequence_entry() {
        let field = FieldDescriptor::new(FieldType::File, "file");
        let mut state = FormState::new();
        state.set_error("file", FieldErrors::many(["File is required", "Second"]));

        let html = render(&field, &mut state);
        assert!(html.contains(r#"<p class="text-red-700 font-medium">File is required</p>"#));
        assert!(!html.contains("Second"));
    }

    #[test]
    fn test_shape_mismatch_renders_empty_message() {
        let mut state = FormState::new();

        let file = FieldDescriptor::new(FieldType::File, "file");
        state.set_error("file", FieldErrors::single("top-level"));
        let html = render(&file, &mut state);
        assert!(html.contains(r#"<p class="text-red-700 font-medium"></p>"#));
        assert!(!html.contains("top-level"));

        let text = FieldDescriptor::new(FieldType::Text, "name");
        state.set_error("name", FieldErrors::many(["in a list"]));
        let html = render(&text, &mut state);
        assert!(html.contains(r#"<p class="text-red-700 font-medium"></p>"#));
    }

    #[test]
    fn test_style_hooks_are_appended() {
        let field = FieldDescriptor::new(FieldType::Text, "name")
            .label("Name")
            .class_names(crate::field::FieldClassNames {
                base: Some("mb-4".into()),
                label: Some("font-bold".into()),
                input: Some("w-full".into()),
                error: Some("italic".into()),
            });
        let mut state = FormState::new();
        state.set_error("name", FieldErrors::single("Name is required"));

        let html = render(&field, &mut state);
        assert!(html.starts_with(r#"<div class="flex flex-col mb-4">"#));
        assert!(html.contains(r#"<label class="font-bold" for="name">"#));
        assert!(html.contains("border-red-700 focus:border-red-700 w-full"));
        assert!(html.contains(r#"<p class="text-red-700 font-medium italic">"#));
    }
}
