//! Detects which dependent fields need a fresh option fetch after an edit.
use crate::answers::Answers;
use crate::schema::{DynamicOptions, Form};
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

/// A select or radio field whose options come from a remote lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicField {
    pub field_id: String,
    pub options: DynamicOptions,
}

/// A request to refresh one field's options, tagged with the controlling
/// value that triggered it. Results are only applied while that value is
/// still current.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub field_id: String,
    pub endpoint: String,
    pub method: String,
    pub depends_on: String,
    pub value: String,
}

/// The outcome of one dependency check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyChanges {
    /// Fields whose controlling value changed to a new non-empty value.
    pub refresh: Vec<FetchRequest>,
    /// Fields whose controlling value was cleared; their cached options no longer apply.
    pub invalidate: Vec<String>,
}

impl DependencyChanges {
    pub fn is_empty(&self) -> bool {
        self.refresh.is_empty() && self.invalidate.is_empty()
    }
}

/// Collects every field with dynamic options, descending into groups, in schema order.
pub fn collect_dynamic_fields(forms: &[Form]) -> Vec<DynamicField> {
    let mut dynamic_fields = Vec::new();
    for form in forms {
        form.walk(&mut |field| {
            if let Some(options) = field.dynamic_options() {
                dynamic_fields.push(DynamicField {
                    field_id: field.id.clone(),
                    options: options.clone(),
                });
            }
        });
    }
    dynamic_fields
}

/// Returns the dynamic fields whose controlling value differs between the two
/// snapshots and is non-empty in `current`. Clearing a controlling value never
/// flags a refresh.
pub fn fields_needing_refresh<'a>(
    dynamic_fields: &'a [DynamicField],
    previous: &Answers,
    current: &Answers,
) -> Vec<&'a DynamicField> {
    dynamic_fields
        .iter()
        .filter(|field| {
            let depends_on = &field.options.depends_on;
            let now = current.present(depends_on);
            now.is_some() && now != previous.present(depends_on)
        })
        .unique_by(|field| field.field_id.clone())
        .collect()
}

/// Returns the dynamic fields whose controlling value was non-empty in
/// `previous` and is unset or empty in `current`.
pub fn fields_to_invalidate<'a>(
    dynamic_fields: &'a [DynamicField],
    previous: &Answers,
    current: &Answers,
) -> Vec<&'a DynamicField> {
    dynamic_fields
        .iter()
        .filter(|field| {
            let depends_on = &field.options.depends_on;
            previous.present(depends_on).is_some() && current.present(depends_on).is_none()
        })
        .unique_by(|field| field.field_id.clone())
        .collect()
}

/// Stateful tracker that compares each new snapshot against the snapshot of
/// the previous check.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    dynamic_fields: Vec<DynamicField>,
    baseline: Answers,
}

impl DependencyTracker {
    pub fn new(forms: &[Form]) -> Self {
        Self {
            dynamic_fields: collect_dynamic_fields(forms),
            baseline: Answers::new(),
        }
    }

    pub fn dynamic_fields(&self) -> &[DynamicField] {
        &self.dynamic_fields
    }

    pub fn baseline(&self) -> &Answers {
        &self.baseline
    }

    /// Compares `current` with the last checked snapshot and moves the baseline forward.
    pub fn check(&mut self, current: &Answers) -> DependencyChanges {
        let refresh = fields_needing_refresh(&self.dynamic_fields, &self.baseline, current)
            .into_iter()
            .filter_map(|field| {
                let value = current.present(&field.options.depends_on)?;
                Some(FetchRequest {
                    field_id: field.field_id.clone(),
                    endpoint: field.options.endpoint.clone(),
                    method: field.options.method.clone(),
                    depends_on: field.options.depends_on.clone(),
                    value: value.to_string(),
                })
            })
            .collect::<Vec<_>>();

        let invalidate = fields_to_invalidate(&self.dynamic_fields, &self.baseline, current)
            .into_iter()
            .map(|field| field.field_id.clone())
            .collect::<Vec<_>>();

        if !refresh.is_empty() || !invalidate.is_empty() {
            debug!(
                refresh = %refresh.iter().map(|r| r.field_id.as_str()).join(", "),
                invalidate = %invalidate.join(", "),
                "Dependent option sets changed"
            );
        }

        self.baseline = current.clone();
        DependencyChanges {
            refresh,
            invalidate,
        }
    }

    /// Forgets the baseline, e.g. after the answers were cleared by a submit.
    pub fn reset(&mut self) {
        self.baseline.clear();
    }
}
