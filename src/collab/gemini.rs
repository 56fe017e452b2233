use super::{IntentClassifier, http_agent, unavailable};
use crate::config::AppConfig;
use crate::errors::AreaQueryError;
use serde_json::{Value, json};
use std::time::Duration;
use ureq::Agent;

/// Gemini `generateContent` client used as the intent classifier.
#[derive(Clone)]
pub struct GeminiClassifier {
    base_url: String,
    model: String,
    api_key: String,
    system_prompt: String,
    agent: Agent,
}

impl GeminiClassifier {
    /// # Errors
    /// `CollaboratorUnavailable` when no API key is configured.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AreaQueryError> {
        let api_key = cfg
            .classifier_api_key
            .clone()
            .ok_or_else(|| AreaQueryError::CollaboratorUnavailable("classifier: GEMINI_API_KEY not set".into()))?;
        Ok(Self {
            base_url: cfg.classifier_url.trim_end_matches('/').to_string(),
            model: cfg.classifier_model.clone(),
            api_key,
            system_prompt: cfg.classifier_system_prompt.clone(),
            agent: http_agent(Duration::from_secs(cfg.http_timeout_secs)),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "system_instruction": {"parts": [{"text": self.system_prompt}]},
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        })
    }
}

/// Text of the first candidate's parts, concatenated.
pub(crate) fn candidate_text(response: &Value) -> Option<String> {
    let parts = response.pointer("/candidates/0/content/parts")?.as_array()?;
    let text: String = parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect();
    (!text.trim().is_empty()).then_some(text)
}

impl IntentClassifier for GeminiClassifier {
    fn classify(&self, prompt: &str) -> Result<String, AreaQueryError> {
        let url = self.endpoint();
        let mut resp = self
            .agent
            .post(url.as_str())
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(self.request_body(prompt))
            .map_err(unavailable("classifier"))?;
        let body: Value = resp.body_mut().read_json().map_err(unavailable("classifier"))?;
        candidate_text(&body).ok_or_else(|| {
            AreaQueryError::CollaboratorUnavailable("classifier: response carried no text".into())
        })
    }
}
