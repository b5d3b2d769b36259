use super::raw::{RawField, RawForm, RawRule};
use super::{Choices, Condition, DynamicOptions, Field, FieldBody, FieldKind, Form, Rule};
use crate::error::SchemaError;
use ahash::AHashSet;
use std::fs;
use std::path::Path;

/// A trait for wire or custom schema models that can be converted into typed `Form`s.
///
/// The engine only ever works on `Form`. Implement this trait on your own
/// deserialization structs to feed a differently shaped schema into it.
///
/// # Example
///
/// ```rust
/// use yoshiki::error::SchemaError;
/// use yoshiki::schema::{Field, FieldBody, Form, IntoSchema};
///
/// struct Questionnaire {
///     questions: Vec<(String, String)>,
/// }
///
/// impl IntoSchema for Questionnaire {
///     fn into_schema(self) -> Result<Vec<Form>, SchemaError> {
///         let fields = self
///             .questions
///             .into_iter()
///             .map(|(id, label)| Field {
///                 id,
///                 label,
///                 required: false,
///                 visibility: None,
///                 body: FieldBody::Text,
///             })
///             .collect();
///         Ok(vec![Form {
///             form_id: "questionnaire".to_string(),
///             title: "Questionnaire".to_string(),
///             fields,
///         }])
///     }
/// }
/// ```
pub trait IntoSchema {
    /// Consumes the object and converts it into the engine's form model.
    fn into_schema(self) -> Result<Vec<Form>, SchemaError>;
}

/// Field ids must be unique across all forms: answers, fetched options and
/// the submit payload are keyed by field id alone.
impl IntoSchema for Vec<RawForm> {
    fn into_schema(self) -> Result<Vec<Form>, SchemaError> {
        let mut seen = AHashSet::new();
        self.into_iter()
            .map(|form| convert_form(form, &mut seen))
            .collect()
    }
}

impl IntoSchema for RawForm {
    fn into_schema(self) -> Result<Vec<Form>, SchemaError> {
        Ok(vec![convert_form(self, &mut AHashSet::new())?])
    }
}

/// Parses a JSON array of forms in the wire format.
pub fn parse_forms(json: &str) -> Result<Vec<Form>, SchemaError> {
    let raw: Vec<RawForm> =
        serde_json::from_str(json).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
    raw.into_schema()
}

/// Converts an already decoded JSON document (an array of forms) into typed forms.
pub fn forms_from_value(value: serde_json::Value) -> Result<Vec<Form>, SchemaError> {
    let raw: Vec<RawForm> =
        serde_json::from_value(value).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
    raw.into_schema()
}

/// Loads and converts a schema file.
pub fn load_forms(path: &Path) -> Result<Vec<Form>, SchemaError> {
    let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_forms(&content)
}

/// Checks that no field id appears twice anywhere in `forms`.
///
/// Forms built by hand or by a custom `IntoSchema` bypass the wire
/// conversion, so sessions run this check on whatever they are given.
pub fn check_unique_ids(forms: &[Form]) -> Result<(), SchemaError> {
    let mut seen = AHashSet::new();
    for form in forms {
        let mut duplicate = None;
        form.walk(&mut |field| {
            if duplicate.is_none() && !seen.insert(field.id.as_str()) {
                duplicate = Some(field.id.clone());
            }
        });
        if let Some(field_id) = duplicate {
            return Err(SchemaError::DuplicateFieldId {
                form_id: form.form_id.clone(),
                field_id,
            });
        }
    }
    Ok(())
}

fn convert_form(raw: RawForm, seen: &mut AHashSet<String>) -> Result<Form, SchemaError> {
    let fields = raw
        .fields
        .into_iter()
        .map(|field| convert_field(field, &raw.form_id, seen))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Form {
        form_id: raw.form_id,
        title: raw.title,
        fields,
    })
}

fn convert_field(
    mut raw: RawField,
    form_id: &str,
    seen: &mut AHashSet<String>,
) -> Result<Field, SchemaError> {
    if !seen.insert(raw.id.clone()) {
        return Err(SchemaError::DuplicateFieldId {
            form_id: form_id.to_string(),
            field_id: raw.id,
        });
    }

    let kind = FieldKind::parse(&raw.field_type).ok_or_else(|| SchemaError::UnknownFieldType {
        form_id: form_id.to_string(),
        field_id: raw.id.clone(),
        type_name: raw.field_type.clone(),
    })?;

    let invalid = |message: &str| SchemaError::InvalidShape {
        form_id: form_id.to_string(),
        field_id: raw.id.clone(),
        message: message.to_string(),
    };

    let has_options = raw.options.is_some() || raw.dynamic_options.is_some();
    let body = match kind {
        FieldKind::Group => {
            if has_options {
                return Err(invalid("a group cannot declare options"));
            }
            let fields = raw
                .fields
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|child| convert_field(child, form_id, seen))
                .collect::<Result<Vec<_>, _>>()?;
            FieldBody::Group { fields }
        }
        _ if raw.fields.is_some() => {
            return Err(invalid("only groups can contain nested fields"));
        }
        FieldKind::Text | FieldKind::Date if has_options => {
            return Err(invalid("only select and radio fields can declare options"));
        }
        FieldKind::Text => FieldBody::Text,
        FieldKind::Date => FieldBody::Date,
        FieldKind::Select => FieldBody::Select {
            choices: convert_choices(&raw),
        },
        FieldKind::Radio => FieldBody::Radio {
            choices: convert_choices(&raw),
        },
    };

    Ok(Field {
        visibility: raw.visibility.map(convert_rule),
        id: raw.id,
        label: raw.label,
        required: raw.required,
        body,
    })
}

/// Dynamic options win over a static list when both are present.
fn convert_choices(raw: &RawField) -> Choices {
    match (&raw.dynamic_options, &raw.options) {
        (Some(dynamic), _) => Choices::Dynamic(DynamicOptions {
            depends_on: dynamic.depends_on.clone(),
            endpoint: dynamic.endpoint.clone(),
            method: dynamic.method.clone(),
        }),
        (None, Some(options)) => Choices::Static(options.clone()),
        (None, None) => Choices::Static(Vec::new()),
    }
}

fn convert_rule(raw: RawRule) -> Rule {
    let value = match raw.value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        // Null, arrays and objects have no string form and leave the rule without an operand.
        _ => None,
    };
    Rule {
        depends_on: raw.depends_on,
        condition: Condition::parse(&raw.condition),
        value,
    }
}
