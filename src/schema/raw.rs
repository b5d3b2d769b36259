use serde::Deserialize;

/// Wire-format form as delivered by the schema endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct RawForm {
    #[serde(alias = "formId")]
    pub form_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// Wire-format field. Every kind shares this shape; `IntoSchema` checks which
/// attributes are allowed for which `type`.
#[derive(Debug, Deserialize, Clone)]
pub struct RawField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub visibility: Option<RawRule>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    #[serde(alias = "dynamicOptions")]
    pub dynamic_options: Option<RawDynamicOptions>,
    #[serde(default)]
    pub fields: Option<Vec<RawField>>,
}

/// Wire-format visibility rule. `value` may be a string, number or boolean.
#[derive(Debug, Deserialize, Clone)]
pub struct RawRule {
    #[serde(alias = "dependsOn")]
    pub depends_on: String,
    pub condition: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawDynamicOptions {
    #[serde(alias = "dependsOn")]
    pub depends_on: String,
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "get".to_string()
}
