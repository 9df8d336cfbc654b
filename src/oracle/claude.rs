//! Anthropic Messages API oracle
//!
//! Forces a single tool call whose input schema is the requested output
//! shape, at temperature 0.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{Oracle, OracleError, OracleRequest};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 256;

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    name: &'a str,
    description: &'static str,
    input_schema: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    tools: Vec<WireTool<'a>>,
    tool_choice: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse { input: serde_json::Value },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
}

/// Oracle backed by the Anthropic Messages API
pub struct ClaudeOracle {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl ClaudeOracle {
    /// Client for `model`; fails only if the HTTP client can't be built
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            http,
        })
    }

    /// Point at another API host
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| OracleError::Unavailable(format!("bad API key header: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_request<'a>(&'a self, request: &'a OracleRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            system: &request.system,
            messages: vec![WireMessage {
                role: "user",
                content: &request.prompt,
            }],
            tools: vec![WireTool {
                name: request.tool_name,
                description: "Record the answer.",
                input_schema: &request.schema,
            }],
            tool_choice: serde_json::json!({ "type": "tool", "name": request.tool_name }),
        }
    }
}

/// The forced tool call's input, as JSON text
fn tool_input(response: ChatResponse) -> Result<String, OracleError> {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::ToolUse { input } => Some(input.to_string()),
            ContentBlock::Other => None,
        })
        .ok_or_else(|| OracleError::InvalidOutput("no tool_use block in response".to_string()))
}

#[async_trait]
impl Oracle for ClaudeOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let url = format!("{}/messages", self.base_url);
        tracing::debug!(model = %self.model, tool = request.tool_name, "Oracle request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&self.build_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        tool_input(parsed)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::SearchCandidate;
    use crate::oracle::select_best_match;

    fn request() -> OracleRequest {
        OracleRequest {
            system: "sys".to_string(),
            prompt: "pick one".to_string(),
            tool_name: "select_food_item",
            schema: serde_json::json!({ "type": "object" }),
        }
    }

    #[test]
    fn test_request_shape() {
        let oracle = ClaudeOracle::new("sk-test", "claude-3-5-haiku-latest", Duration::from_secs(5)).unwrap();
        let req = request();
        let json = serde_json::to_value(oracle.build_request(&req)).unwrap();

        assert_eq!(json["model"], "claude-3-5-haiku-latest");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "pick one");
        assert_eq!(json["tools"][0]["name"], "select_food_item");
        assert_eq!(json["tool_choice"]["type"], "tool");
        assert_eq!(json["tool_choice"]["name"], "select_food_item");
    }

    #[test]
    fn test_tool_input_extraction() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "text", "text": "thinking" },
                { "type": "tool_use", "id": "t1", "name": "select_food_item", "input": { "foodItem": 2 } }
            ]
        }))
        .unwrap();
        assert_eq!(tool_input(response).unwrap(), r#"{"foodItem":2}"#);
    }

    #[test]
    fn test_missing_tool_use_is_invalid_output() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "content": [{ "type": "text", "text": "2" }]
        }))
        .unwrap();
        assert!(matches!(tool_input(response), Err(OracleError::InvalidOutput(_))));
    }

    #[test]
    fn test_with_base_url() {
        let oracle = ClaudeOracle::new("sk-test", "m", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:9999");
        assert_eq!(oracle.base_url, "http://localhost:9999");
        assert_eq!(oracle.model(), "m");
    }

    fn candidate(name: &str) -> SearchCandidate {
        SearchCandidate {
            name: name.to_string(),
            brand: None,
            url: format!("https://www.fatsecret.com.br/{}", name),
            calories: 100.0,
            fat: 1.0,
            carbs: 2.0,
            protein: 3.0,
        }
    }

    fn oracle_at(server: &MockServer) -> ClaudeOracle {
        ClaudeOracle::new("sk-test", "claude-3-5-haiku-latest", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let oracle = oracle_at(&server);
        let err = oracle.complete(&request()).await.unwrap_err();
        match err {
            OracleError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_selects_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let oracle = oracle_at(&server);
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let chosen = select_best_match(&oracle, "arroz", &candidates).await.unwrap();
        assert_eq!(chosen.name, "a");
    }

    #[tokio::test]
    async fn test_tool_use_answer_selects_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    { "type": "tool_use", "id": "t1", "name": "select_food_item", "input": { "foodItem": 3 } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let oracle = oracle_at(&server);
        let candidates = vec![candidate("a"), candidate("b"), candidate("c")];
        let chosen = select_best_match(&oracle, "arroz", &candidates).await.unwrap();
        assert_eq!(chosen.name, "c");
    }
}
