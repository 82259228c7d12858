//! Blocking client for OpenAI-compatible chat-completions endpoints.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::CostCopilotError;
use crate::report::briefing::{BriefingRequest, NarrativeGenerator};
use crate::CostCopilotResult;

/// Connection and sampling settings for the narrative model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-3.5-turbo".into(),
            max_tokens: 700,
            temperature: 0.6,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionsClient {
    config: ChatConfig,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatConfig, api_key: impl Into<String>) -> Self {
        ChatCompletionsClient {
            config,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl NarrativeGenerator for ChatCompletionsClient {
    fn generate(&self, request: &BriefingRequest) -> CostCopilotResult<String> {
        if self.api_key.trim().is_empty() {
            return Err(CostCopilotError::Narrative("No API key configured".into()));
        }

        let user_prompt = request.user_prompt();
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| CostCopilotError::Narrative(format!("Client setup failed: {e}")))?;

        debug!(model = %self.config.model, endpoint = %self.endpoint(), "requesting narrative");
        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CostCopilotError::Narrative(format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(CostCopilotError::Narrative(format!(
                "API returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| CostCopilotError::Narrative(format!("Invalid response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| CostCopilotError::Narrative("Response contained no text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::SimulationOutput;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    fn request() -> BriefingRequest {
        let sim = SimulationOutput {
            scenario_description: "10% increase in all Labor costs".into(),
            total_baseline_profit: Decimal::ONE_HUNDRED,
            total_scenario_profit: Decimal::TEN,
            total_pnl_impact: Decimal::from(-90),
            impacts: vec![],
        };
        BriefingRequest::build(&sim, &[], 3, &mut StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_missing_key_fails_without_network() {
        let client = ChatCompletionsClient::new(ChatConfig::default(), "  ");
        let err = client.generate(&request()).unwrap_err();
        assert!(matches!(err, CostCopilotError::Narrative(_)));
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let mut config = ChatConfig::default();
        config.base_url = "http://localhost:8080/v1/".into();
        let client = ChatCompletionsClient::new(config, "key");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let req = request();
        let prompt = req.user_prompt();
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: req.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: 700,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 700);
    }
}
