use crate::answers::Answers;
use crate::condition;
use crate::options::{OptionCache, SelectOption, resolve_options};
use crate::schema::{Field, FieldBody, FieldKind, Form};
use serde::Serialize;

mod tree;

pub use tree::RenderTree;

/// Everything the presentation layer needs to draw one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInstruction {
    pub id: String,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    /// The stored answer, or an empty string if unset.
    pub current_value: String,
    /// Resolved options for select and radio fields, `None` otherwise.
    pub options: Option<Vec<SelectOption>>,
}

/// One step of a rendered form, in schema order.
///
/// Containers are bracketed by start/end markers so the presentation layer can
/// rebuild the nesting from the flat sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "instruction", rename_all = "camelCase")]
pub enum RenderInstruction {
    #[serde(rename_all = "camelCase")]
    FormStart { form_id: String, title: String },
    #[serde(rename_all = "camelCase")]
    FormEnd { form_id: String },
    GroupStart { id: String, label: String },
    GroupEnd { id: String },
    Field(FieldInstruction),
}

impl RenderInstruction {
    pub fn as_field(&self) -> Option<&FieldInstruction> {
        match self {
            RenderInstruction::Field(field) => Some(field),
            _ => None,
        }
    }
}

/// Walks the form tree depth-first and emits render instructions for visible nodes.
///
/// The walker is pure: the output depends only on the schema, the answers and
/// the option cache it was built with.
pub struct SchemaWalker<'a> {
    answers: &'a Answers,
    cache: &'a OptionCache,
}

impl<'a> SchemaWalker<'a> {
    pub fn new(answers: &'a Answers, cache: &'a OptionCache) -> Self {
        Self { answers, cache }
    }

    /// Renders every form, each wrapped in its own container.
    pub fn render_forms(&self, forms: &[Form]) -> Vec<RenderInstruction> {
        let mut out = Vec::new();
        for form in forms {
            out.push(RenderInstruction::FormStart {
                form_id: form.form_id.clone(),
                title: form.title.clone(),
            });
            for field in &form.fields {
                self.walk(field, &mut out);
            }
            out.push(RenderInstruction::FormEnd {
                form_id: form.form_id.clone(),
            });
        }
        out
    }

    /// Renders one subtree. Returns nothing if the node is hidden.
    pub fn render_field(&self, field: &Field) -> Vec<RenderInstruction> {
        let mut out = Vec::new();
        self.walk(field, &mut out);
        out
    }

    fn walk(&self, field: &Field, out: &mut Vec<RenderInstruction>) {
        // A hidden node is dropped with its whole subtree.
        if !condition::is_visible(field, self.answers) {
            return;
        }

        match &field.body {
            FieldBody::Group { fields } => {
                out.push(RenderInstruction::GroupStart {
                    id: field.id.clone(),
                    label: field.label.clone(),
                });
                for child in fields {
                    self.walk(child, out);
                }
                out.push(RenderInstruction::GroupEnd {
                    id: field.id.clone(),
                });
            }
            FieldBody::Text | FieldBody::Date => {
                out.push(RenderInstruction::Field(self.leaf(field, None)));
            }
            FieldBody::Select { .. } | FieldBody::Radio { .. } => {
                let options = resolve_options(field, self.answers, self.cache);
                out.push(RenderInstruction::Field(self.leaf(field, Some(options))));
            }
        }
    }

    fn leaf(&self, field: &Field, options: Option<Vec<SelectOption>>) -> FieldInstruction {
        FieldInstruction {
            id: field.id.clone(),
            kind: field.kind(),
            label: field.label.clone(),
            required: field.required,
            current_value: self.answers.get(&field.id).unwrap_or_default().to_string(),
            options,
        }
    }
}

/// Renders all forms against the given answers and option cache.
pub fn render(forms: &[Form], answers: &Answers, cache: &OptionCache) -> Vec<RenderInstruction> {
    SchemaWalker::new(answers, cache).render_forms(forms)
}

/// Renders a single field subtree against the given answers and option cache.
pub fn render_field(field: &Field, answers: &Answers, cache: &OptionCache) -> Vec<RenderInstruction> {
    SchemaWalker::new(answers, cache).render_field(field)
}
