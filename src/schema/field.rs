use super::Rule;
use serde::Serialize;
use std::fmt;

/// The kind of a schema field. Mirrors the `type` discriminator of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Group,
    Text,
    Date,
    Select,
    Radio,
}

impl FieldKind {
    /// Every kind the engine knows how to render.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Group,
        FieldKind::Text,
        FieldKind::Date,
        FieldKind::Select,
        FieldKind::Radio,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "group" => Some(FieldKind::Group),
            "text" => Some(FieldKind::Text),
            "date" => Some(FieldKind::Date),
            "select" => Some(FieldKind::Select),
            "radio" => Some(FieldKind::Radio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Group => "group",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Describes a remote lookup for an option list that depends on another field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicOptions {
    pub depends_on: String,
    pub endpoint: String,
    pub method: String,
}

/// Where a select or radio field gets its options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    Static(Vec<String>),
    Dynamic(DynamicOptions),
}

/// The kind-specific part of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldBody {
    Group { fields: Vec<Field> },
    Text,
    Date,
    Select { choices: Choices },
    Radio { choices: Choices },
}

/// A single node of the form tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub visibility: Option<Rule>,
    pub body: FieldBody,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match &self.body {
            FieldBody::Group { .. } => FieldKind::Group,
            FieldBody::Text => FieldKind::Text,
            FieldBody::Date => FieldKind::Date,
            FieldBody::Select { .. } => FieldKind::Select,
            FieldBody::Radio { .. } => FieldKind::Radio,
        }
    }

    /// Child fields of a group; empty for leaves.
    pub fn children(&self) -> &[Field] {
        match &self.body {
            FieldBody::Group { fields } => fields,
            _ => &[],
        }
    }

    pub fn choices(&self) -> Option<&Choices> {
        match &self.body {
            FieldBody::Select { choices } | FieldBody::Radio { choices } => Some(choices),
            FieldBody::Group { .. } | FieldBody::Text | FieldBody::Date => None,
        }
    }

    pub fn dynamic_options(&self) -> Option<&DynamicOptions> {
        match self.choices() {
            Some(Choices::Dynamic(dynamic)) => Some(dynamic),
            _ => None,
        }
    }

    /// Visits this field and all of its descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Field)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
