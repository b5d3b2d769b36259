use super::{OptionSource, SchemaSource, SubmitSink, extract_option_list};
use crate::answers::Answers;
use crate::config::EngineConfig;
use crate::error::SourceError;
use crate::schema::{Form, forms_from_value};
use crate::tracker::FetchRequest;
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};

/// Talks to the form service over HTTP. Implements all three collaborator traits.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    schema_path: String,
    submit_path: String,
    options_key: String,
    timeout_ms: u64,
}

impl HttpBackend {
    pub fn new(config: &EngineConfig) -> Result<Self, SourceError> {
        // The controller bounds each operation separately; the client only needs the longest.
        let timeout = config.fetch_timeout().max(config.submit_timeout());
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            schema_path: config.schema_path.clone(),
            submit_path: config.submit_path.clone(),
            options_key: config.options_key.clone(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    /// Resolves `path` against the base URL. Absolute URLs pass through.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request_error(&self, url: &str, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::Timeout {
                operation: format!("Request to '{}'", url),
                after_ms: self.timeout_ms,
            }
        } else {
            SourceError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    async fn read_json(url: &str, response: Response) -> Result<serde_json::Value, SourceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SchemaSource for HttpBackend {
    async fn fetch_forms(&self) -> Result<Vec<Form>, SourceError> {
        let url = self.url(&self.schema_path);
        debug!(%url, "Fetching form schema");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;
        let body = Self::read_json(&url, response).await?;
        let forms = forms_from_value(body)?;
        info!(forms = forms.len(), "Form schema loaded");
        Ok(forms)
    }
}

#[async_trait]
impl OptionSource for HttpBackend {
    async fn fetch_options(&self, request: &FetchRequest) -> Result<Vec<String>, SourceError> {
        let url = self.url(&request.endpoint);
        let builder = match request.method.to_ascii_lowercase().as_str() {
            "get" => self
                .client
                .get(&url)
                .query(&[(request.depends_on.as_str(), request.value.as_str())]),
            "post" => {
                let mut body = serde_json::Map::new();
                body.insert(
                    request.depends_on.clone(),
                    serde_json::Value::String(request.value.clone()),
                );
                self.client.post(&url).json(&body)
            }
            other => return Err(SourceError::UnsupportedMethod(other.to_string())),
        };

        debug!(%url, field = %request.field_id, value = %request.value, "Fetching dynamic options");
        let response = builder.send().await.map_err(|e| self.request_error(&url, e))?;
        let body = Self::read_json(&url, response).await?;
        extract_option_list(&body, &self.options_key).ok_or_else(|| {
            SourceError::Decode(format!("Response from '{}' contains no option list", url))
        })
    }
}

#[async_trait]
impl SubmitSink for HttpBackend {
    async fn submit(&self, answers: &Answers) -> Result<(), SourceError> {
        let url = self.url(&self.submit_path);
        let response = self
            .client
            .post(&url)
            .json(answers)
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
