use crate::answers::Answers;
use crate::condition;
use crate::error::{SchemaError, SessionError, SourceError};
use crate::options::{OptionCache, SelectOption, resolve_options};
use crate::render::{RenderInstruction, render};
use crate::schema::{Field, FieldKind, Form, check_unique_ids};
use crate::tracker::{DependencyTracker, FetchRequest};
use ahash::AHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

mod controller;

pub use controller::FormController;

/// Lifecycle of a form session.
///
/// `SubmitSucceeded` and `SubmitFailed` are transient: they are reported by
/// `FormSession::complete_submit` and the session immediately settles into
/// `Idle` or `Editing` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    Idle,
    Editing,
    Submitting,
    SubmitSucceeded,
    SubmitFailed,
}

/// The state of one open form: answers, fetched options and the submit lifecycle.
///
/// Constructed when a schema is available, owned by whoever drives the form
/// and dropped when the form is closed.
#[derive(Debug, Clone)]
pub struct FormSession {
    forms: Vec<Form>,
    answers: Answers,
    cache: OptionCache,
    tracker: DependencyTracker,
    state: SessionState,
    prune_hidden_answers: bool,
}

impl FormSession {
    /// Opens a session over forms whose field ids are already known to be
    /// unique, e.g. the output of `parse_forms`.
    pub fn new(forms: Vec<Form>) -> Self {
        let tracker = DependencyTracker::new(&forms);
        Self {
            forms,
            answers: Answers::new(),
            cache: OptionCache::new(),
            tracker,
            state: SessionState::Idle,
            prune_hidden_answers: false,
        }
    }

    /// Opens a session after checking that no field id is used twice.
    pub fn try_new(forms: Vec<Form>) -> Result<Self, SchemaError> {
        check_unique_ids(&forms)?;
        Ok(Self::new(forms))
    }

    /// Only submit answers of fields that are visible at submit time.
    pub fn with_pruned_submissions(mut self, prune: bool) -> Self {
        self.prune_hidden_answers = prune;
        self
    }

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn cache(&self) -> &OptionCache {
        &self.cache
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn find_field(&self, field_id: &str) -> Option<&Field> {
        self.forms.iter().find_map(|form| form.find_field(field_id))
    }

    /// Records an edit and returns the option fetches it makes necessary.
    ///
    /// Options cached for a dependent field are dropped when its controlling
    /// value is cleared. Edits made while a submission is in flight are kept
    /// but do not change the state.
    pub fn set_answer(
        &mut self,
        field_id: &str,
        value: &str,
    ) -> Result<Vec<FetchRequest>, SessionError> {
        match self.find_field(field_id).map(Field::kind) {
            None => return Err(SessionError::UnknownField(field_id.to_string())),
            Some(FieldKind::Group) => {
                return Err(SessionError::GroupField(field_id.to_string()));
            }
            Some(_) => {}
        }

        self.answers.set(field_id, value);
        if self.state != SessionState::Submitting {
            self.state = SessionState::Editing;
        }

        let changes = self.tracker.check(&self.answers);
        for dependent in &changes.invalidate {
            if self.cache.invalidate(dependent) {
                debug!(field = %dependent, "Dropped options of cleared dependency");
            }
        }
        Ok(changes.refresh)
    }

    /// Applies the result of a fetch. Returns `false` if it was discarded
    /// because the controlling value changed after the fetch was started.
    pub fn apply_options(&mut self, request: &FetchRequest, options: Vec<String>) -> bool {
        if self.answers.present(&request.depends_on) != Some(request.value.as_str()) {
            debug!(
                field = %request.field_id,
                fetched_for = %request.value,
                "Discarding options fetched for a stale value"
            );
            return false;
        }
        self.cache.store(&request.field_id, &request.value, options);
        true
    }

    /// Records a failed fetch. The cache is left untouched, so the field
    /// resolves to the sentinel until a later fetch succeeds.
    pub fn fetch_failed(&mut self, request: &FetchRequest, error: &SourceError) {
        warn!(
            field = %request.field_id,
            endpoint = %request.endpoint,
            error = %error,
            "Dynamic option fetch failed"
        );
    }

    pub fn options_for(&self, field_id: &str) -> Option<Vec<SelectOption>> {
        self.find_field(field_id)
            .map(|field| resolve_options(field, &self.answers, &self.cache))
    }

    pub fn render(&self) -> Vec<RenderInstruction> {
        render(&self.forms, &self.answers, &self.cache)
    }

    /// Ids of all leaf fields that are currently rendered.
    pub fn visible_field_ids(&self) -> AHashSet<String> {
        self.render()
            .iter()
            .filter_map(RenderInstruction::as_field)
            .map(|field| field.id.clone())
            .collect()
    }

    /// Enters `Submitting` and returns the payload to send.
    pub fn begin_submit(&mut self) -> Result<Answers, SessionError> {
        if self.state == SessionState::Submitting {
            return Err(SessionError::SubmitInProgress);
        }
        self.state = SessionState::Submitting;

        let mut payload = self.answers.clone();
        if self.prune_hidden_answers {
            let visible = self.visible_field_ids();
            payload.retain(|field_id, _| visible.contains(field_id));
        }
        Ok(payload)
    }

    /// Finishes the in-flight submission and reports the transient outcome state.
    pub fn complete_submit(
        &mut self,
        outcome: Result<(), SourceError>,
    ) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Submitting {
            return Err(SessionError::NotSubmitting);
        }

        match outcome {
            Ok(()) => {
                info!(answers = self.answers.len(), "Form submitted");
                self.clear();
                self.state = SessionState::Idle;
                Ok(SessionState::SubmitSucceeded)
            }
            Err(e) => {
                warn!(error = %e, "Form submission failed; answers kept");
                self.state = SessionState::Editing;
                Ok(SessionState::SubmitFailed)
            }
        }
    }

    /// Gives up on a submission whose outcome will never arrive, e.g. because
    /// the caller dropped it. Answers are kept and the session returns to
    /// `Editing`. Returns `false` if no submission was in flight.
    pub fn abandon_submit(&mut self) -> bool {
        if self.state != SessionState::Submitting {
            return false;
        }
        warn!("Submission abandoned before completion; answers kept");
        self.state = SessionState::Editing;
        true
    }

    /// Discards all answers and fetched options.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Submitting {
            return Err(SessionError::SubmitInProgress);
        }
        self.clear();
        self.state = SessionState::Idle;
        Ok(())
    }

    fn clear(&mut self) {
        self.answers.clear();
        self.cache.clear();
        self.tracker.reset();
    }
}

/// Explains every visibility rule of the session, in schema order.
pub fn explain_visibility(session: &FormSession) -> Vec<(String, condition::ConditionTrace)> {
    let mut traces = Vec::new();
    for form in session.forms() {
        form.walk(&mut |field| {
            if let Some(rule) = &field.visibility {
                traces.push((field.id.clone(), condition::explain(rule, session.answers())));
            }
        });
    }
    traces
}
