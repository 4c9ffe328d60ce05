// File: src/demo.rs
// Purpose: Field list and validation rules of the demo page

use dynform::{
    FieldDescriptor, FieldType, FileRule, ListRule, NumberRule, RuleSchema, TextRule,
};

const HOBBIES: [&str; 3] = ["football", "e-gaming", "films"];
const EXPERIENCE: [&str; 4] = ["less1", "1to3", "3to5", "5more"];

pub fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(FieldType::Text, "name").label("Name"),
        FieldDescriptor::new(FieldType::Textarea, "description")
            .label("Description")
            .attribute("rows", "3"),
        FieldDescriptor::new(FieldType::Email, "email").label("Email"),
        FieldDescriptor::new(FieldType::Number, "age").label("Age"),
        FieldDescriptor::new(FieldType::Checkbox, "hobbies")
            .label("Hobbies")
            .option("football", "Football")
            .option("e-gaming", "E-Gaming")
            .option("films", "Films"),
        FieldDescriptor::new(FieldType::Radio, "experience")
            .label("Experience")
            .option("less1", "0-1 year")
            .option("1to3", "1-3 years")
            .option("3to5", "3-5 years")
            .option("5more", "More than 5 years"),
        FieldDescriptor::new(FieldType::Select, "select")
            .label("Select")
            .option("", "Choose option")
            .option("option1", "Option 1")
            .option("option2", "Option 2"),
        FieldDescriptor::new(FieldType::Date, "birthday").label("Birthday"),
        FieldDescriptor::new(FieldType::File, "file").label("File"),
    ]
}

pub fn schema() -> RuleSchema {
    RuleSchema::new()
        .field("name", TextRule::new().min_length(1, "Name is required"))
        .field(
            "description",
            TextRule::new().min_length(1, "Description is required"),
        )
        .field(
            "email",
            TextRule::new()
                .min_length(1, "E-mail is required")
                .email("Invalid e-mail"),
        )
        .field(
            "age",
            NumberRule::new()
                .invalid_type("Age is required and must be a number")
                .min(0.0, "Number must be greater than or equal to 0")
                .max(150.0, "Number must be less than or equal to 150"),
        )
        .field(
            "hobbies",
            ListRule::new()
                .min_items(1, "Hobbies is required")
                .allowed(HOBBIES, "Invalid hobby"),
        )
        .field(
            "experience",
            TextRule::new()
                .invalid_type("Experience is required")
                .one_of(EXPERIENCE, "Experience is required"),
        )
        .field("select", TextRule::new().min_length(1, "Select is required"))
        .field("birthday", TextRule::new().date("Invalid date"))
        .field("file", FileRule::new().required("File is required"))
}
