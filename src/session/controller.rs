use super::{FormSession, SessionState};
use crate::error::{SessionError, SourceError};
use crate::render::RenderInstruction;
use crate::source::{OptionSource, SchemaSource, SubmitSink};
use crate::tracker::FetchRequest;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives a [`FormSession`] against its collaborators: loads the schema,
/// runs the option fetches an edit triggers and hands answers to the sink.
pub struct FormController {
    schema: Arc<dyn SchemaSource>,
    options: Arc<dyn OptionSource>,
    sink: Arc<dyn SubmitSink>,
    fetch_timeout: Duration,
    submit_timeout: Duration,
    prune_hidden_answers: bool,
    session: Option<FormSession>,
}

impl FormController {
    pub fn new(
        schema: Arc<dyn SchemaSource>,
        options: Arc<dyn OptionSource>,
        sink: Arc<dyn SubmitSink>,
    ) -> Self {
        Self {
            schema,
            options,
            sink,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            prune_hidden_answers: false,
            session: None,
        }
    }

    /// Uses one backend for the schema, the option lookups and submission.
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: SchemaSource + OptionSource + SubmitSink + 'static,
    {
        Self::new(backend.clone(), backend.clone(), backend)
    }

    /// Builds a controller talking HTTP to the configured service.
    #[cfg(feature = "http")]
    pub fn with_config(config: &crate::config::EngineConfig) -> Result<Self, SourceError> {
        let backend = Arc::new(crate::source::HttpBackend::new(config)?);
        Ok(Self::with_backend(backend)
            .fetch_timeout(config.fetch_timeout())
            .submit_timeout(config.submit_timeout())
            .prune_hidden_answers(config.prune_hidden_answers))
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn prune_hidden_answers(mut self, prune: bool) -> Self {
        self.prune_hidden_answers = prune;
        self
    }

    /// Fetches the schema and opens a fresh session, replacing any previous one.
    pub async fn load(&mut self) -> Result<&FormSession, SessionError> {
        let forms = self
            .schema
            .fetch_forms()
            .await
            .map_err(SessionError::SchemaUnavailable)?;
        let session = FormSession::try_new(forms)
            .map_err(|e| SessionError::SchemaUnavailable(SourceError::Schema(e)))?
            .with_pruned_submissions(self.prune_hidden_answers);
        info!(forms = session.forms().len(), "Session opened");
        Ok(self.session.insert(session))
    }

    pub fn session(&self) -> Option<&FormSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> Option<SessionState> {
        self.session.as_ref().map(FormSession::state)
    }

    /// Records an edit and waits for the option fetches it triggers.
    ///
    /// Fetches run concurrently. Failed or expired fetches leave the cache as
    /// it was. Returns how many fetched lists were applied.
    pub async fn edit(&mut self, field_id: &str, value: &str) -> Result<usize, SessionError> {
        let requests = self.session_mut()?.set_answer(field_id, value)?;
        if requests.is_empty() {
            return Ok(0);
        }

        let results = self.fetch_all(&requests).await;
        let session = self.session_mut()?;
        let mut applied = 0;
        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(options) => {
                    if session.apply_options(request, options) {
                        applied += 1;
                    }
                }
                Err(e) => session.fetch_failed(request, &e),
            }
        }
        Ok(applied)
    }

    async fn fetch_all(&self, requests: &[FetchRequest]) -> Vec<Result<Vec<String>, SourceError>> {
        let timeout = self.fetch_timeout;
        let fetches = requests.iter().map(|request| {
            let source = Arc::clone(&self.options);
            async move {
                debug!(field = %request.field_id, value = %request.value, "Starting option fetch");
                match tokio::time::timeout(timeout, source.fetch_options(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout {
                        operation: format!("Option fetch for '{}'", request.field_id),
                        after_ms: timeout.as_millis() as u64,
                    }),
                }
            }
        });
        join_all(fetches).await
    }

    /// Submits the current answers and reports the transient outcome state.
    ///
    /// A submission that outlives the submit timeout counts as failed. If the
    /// returned future is dropped before it completes, the session goes back
    /// to `Editing` with its answers intact.
    pub async fn submit(&mut self) -> Result<SessionState, SessionError> {
        let sink = Arc::clone(&self.sink);
        let timeout = self.submit_timeout;
        let session = self.session.as_mut().ok_or(SessionError::NotLoaded)?;

        let payload = session.begin_submit()?;
        let guard = SubmitGuard {
            session: Some(session),
        };
        let outcome = match tokio::time::timeout(timeout, sink.submit(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                operation: "Submission".to_string(),
                after_ms: timeout.as_millis() as u64,
            }),
        };
        guard.complete(outcome)
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.session_mut()?.reset()
    }

    pub fn render(&self) -> Result<Vec<RenderInstruction>, SessionError> {
        self.session
            .as_ref()
            .map(FormSession::render)
            .ok_or(SessionError::NotLoaded)
    }

    fn session_mut(&mut self) -> Result<&mut FormSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NotLoaded)
    }
}

/// Returns the session to `Editing` unless the submission it guards completes.
struct SubmitGuard<'a> {
    session: Option<&'a mut FormSession>,
}

impl SubmitGuard<'_> {
    fn complete(mut self, outcome: Result<(), SourceError>) -> Result<SessionState, SessionError> {
        match self.session.take() {
            Some(session) => session.complete_submit(outcome),
            None => Err(SessionError::NotSubmitting),
        }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.abandon_submit();
        }
    }
}
