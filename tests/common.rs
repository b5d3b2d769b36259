//! Common test utilities: schema fixtures and in-memory collaborators.
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use yoshiki::prelude::*;

/// Country select driving a dependent state select.
#[allow(dead_code)]
pub const SCENARIO_A: &str = r#"[{
    "formId": "travel",
    "title": "Travel",
    "fields": [
        { "id": "country", "type": "select", "label": "Country", "options": ["US", "IN"] },
        { "id": "state", "type": "select", "label": "State",
          "dynamicOptions": { "dependsOn": "country", "endpoint": "/states", "method": "get" } }
    ]
}]"#;

/// A radio that only shows for seniors.
#[allow(dead_code)]
pub const SCENARIO_B: &str = r#"[{
    "formId": "discounts",
    "title": "Discounts",
    "fields": [
        { "id": "age", "type": "text", "label": "Age" },
        { "id": "seniorDiscount", "type": "radio", "label": "Senior discount",
          "options": ["Yes", "No"],
          "visibility": { "dependsOn": "age", "condition": "greaterThanOrEqual", "value": "65" } }
    ]
}]"#;

/// Two forms that each use the id `state` for a dependent select.
#[allow(dead_code)]
pub const SHARED_DEPENDENT_ID: &str = r#"[
    {
        "formId": "us_address",
        "title": "US Address",
        "fields": [
            { "id": "country", "type": "select", "options": ["US"] },
            { "id": "state", "type": "select",
              "dynamicOptions": { "dependsOn": "country", "endpoint": "/states" } }
        ]
    },
    {
        "formId": "ca_address",
        "title": "Canadian Address",
        "fields": [
            { "id": "region", "type": "select", "options": ["US", "CA"] },
            { "id": "state", "type": "select",
              "dynamicOptions": { "dependsOn": "region", "endpoint": "/provinces" } }
        ]
    }
]"#;

/// Two forms with nested groups, a conditional group and a dependent lookup inside a group.
#[allow(dead_code)]
pub const INSURANCE_SCHEMA: &str = r#"[
    {
        "formId": "health_insurance_application",
        "title": "Health Insurance Application",
        "fields": [
            {
                "id": "personal_info", "type": "group", "label": "Personal Information",
                "fields": [
                    { "id": "first_name", "type": "text", "label": "First Name", "required": true },
                    { "id": "dob", "type": "date", "label": "Date of Birth", "required": true },
                    { "id": "age", "type": "text", "label": "Age" }
                ]
            },
            { "id": "smoker", "type": "radio", "label": "Do you smoke?", "options": ["Yes", "No"], "required": true },
            {
                "id": "smoking_details", "type": "group", "label": "Smoking Details",
                "visibility": { "dependsOn": "smoker", "condition": "equals", "value": "Yes" },
                "fields": [
                    { "id": "smoking_frequency", "type": "select", "label": "Frequency",
                      "options": ["Occasionally", "Daily", "Heavy"] },
                    {
                        "id": "smoking_history", "type": "group", "label": "History",
                        "fields": [
                            { "id": "years_smoking", "type": "text", "label": "Years" }
                        ]
                    }
                ]
            }
        ]
    },
    {
        "formId": "home_insurance_application",
        "title": "Home Insurance Application",
        "fields": [
            {
                "id": "address", "type": "group", "label": "Address",
                "fields": [
                    { "id": "country", "type": "select", "label": "Country", "options": ["USA", "Canada"] },
                    { "id": "state", "type": "select", "label": "State", "required": true,
                      "dynamicOptions": { "dependsOn": "country", "endpoint": "/api/getStates", "method": "post" } }
                ]
            },
            { "id": "has_security", "type": "radio", "label": "Security system?", "options": ["Yes", "No"] },
            { "id": "security_provider", "type": "text", "label": "Security provider",
              "visibility": { "dependsOn": "has_security", "condition": "equals", "value": "Yes" } }
        ]
    }
]"#;

#[allow(dead_code)]
pub fn forms(json: &str) -> Vec<Form> {
    parse_forms(json).expect("fixture schema must parse")
}

#[allow(dead_code)]
pub fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

/// Ids of all rendered leaf fields, in order.
#[allow(dead_code)]
pub fn field_ids(instructions: &[RenderInstruction]) -> Vec<String> {
    instructions
        .iter()
        .filter_map(RenderInstruction::as_field)
        .map(|field| field.id.clone())
        .collect()
}

/// Option values without the leading placeholder.
#[allow(dead_code)]
pub fn option_values(options: &[SelectOption]) -> Vec<String> {
    options
        .iter()
        .filter(|option| !option.is_sentinel())
        .map(|option| option.value.clone())
        .collect()
}

/// Answers option lookups from a fixed table and records every request.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockOptionSource {
    responses: Vec<(String, Vec<String>)>,
    delay: Option<Duration>,
    fail: bool,
    pub calls: Mutex<Vec<FetchRequest>>,
}

#[allow(dead_code)]
impl MockOptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Responds with `options` to any request for the controlling value `value`.
    pub fn respond(mut self, value: &str, options: &[&str]) -> Self {
        self.responses.push((
            value.to_string(),
            options.iter().map(|o| o.to_string()).collect(),
        ));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OptionSource for MockOptionSource {
    async fn fetch_options(&self, request: &FetchRequest) -> std::result::Result<Vec<String>, SourceError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SourceError::Status {
                url: request.endpoint.clone(),
                status: 500,
            });
        }
        self.responses
            .iter()
            .find(|(value, _)| *value == request.value)
            .map(|(_, options)| options.clone())
            .ok_or_else(|| SourceError::Decode(format!("no options for '{}'", request.value)))
    }
}

/// Accepts or rejects every submission and records the payloads.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockSink {
    fail: bool,
    delay: Option<Duration>,
    pub payloads: Mutex<Vec<Answers>>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn payloads(&self) -> Vec<Answers> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitSink for MockSink {
    async fn submit(&self, answers: &Answers) -> std::result::Result<(), SourceError> {
        self.payloads.lock().unwrap().push(answers.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SourceError::Status {
                url: "/submit".to_string(),
                status: 503,
            });
        }
        Ok(())
    }
}

/// A schema source that is always down.
#[allow(dead_code)]
pub struct UnavailableSchema;

#[async_trait]
impl SchemaSource for UnavailableSchema {
    async fn fetch_forms(&self) -> std::result::Result<Vec<Form>, SourceError> {
        Err(SourceError::Request {
            url: "/api/insurance/forms".to_string(),
            message: "connection refused".to_string(),
        })
    }
}
