//! Gemini REST client and the backend seam the analyzer and chat talk to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    error::{FcktyError, Result, ServiceError},
    provider::ProviderConfig,
    types::ChatRole,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: ChatRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    pub contents: Vec<Turn>,
    pub web_search: bool,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebReference {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebReference>,
}

/// What came back from one generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub text: Option<String>,
    pub grounding: Vec<GroundingChunk>,
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireContent<'a> {
    role: &'static str,
    parts: [WirePart<'a>; 1],
}

pub struct GeminiClient {
    api_base: String,
    api_key: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client, failing fast when no API key is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Ok(Self::new(config.api_base.clone(), api_key))
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

pub(crate) fn request_body(request: &GenerationRequest) -> serde_json::Value {
    let contents: Vec<WireContent<'_>> = request
        .contents
        .iter()
        .map(|turn| WireContent {
            role: match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            },
            parts: [WirePart { text: &turn.text }],
        })
        .collect();

    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
        "contents": contents,
    });

    if request.web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    if let Some(temperature) = request.temperature {
        body["generationConfig"] = json!({ "temperature": temperature });
    }

    body
}

fn into_generation(response: GenerateContentResponse) -> Generation {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Generation::default();
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Generation {
        text: (!text.is_empty()).then_some(text),
        grounding: candidate
            .grounding_metadata
            .map(|meta| meta.grounding_chunks)
            .unwrap_or_default(),
    }
}

pub(crate) fn parse_response(body: &str) -> Result<Generation> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    Ok(into_generation(response))
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        debug!(
            model = %request.model,
            turns = request.contents.len(),
            web_search = request.web_search,
            "calling generateContent"
        );

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FcktyError::Service(ServiceError::from_response(
                status.as_u16(),
                &body,
            )));
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(web_search: bool) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash".into(),
            system_instruction: "be brief".into(),
            contents: vec![Turn::user("hi"), Turn::model("hello"), Turn::user("why?")],
            web_search,
            temperature: Some(0.1),
        }
    }

    #[test]
    fn body_carries_history_tools_and_temperature() {
        let body = request_body(&request(true));

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "why?");
        assert!(body["tools"][0]["google_search"].is_object());
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() < 0.2);
    }

    #[test]
    fn chat_body_has_no_tools() {
        let mut req = request(false);
        req.temperature = None;
        let body = request_body(&req);
        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_skips_thoughts_and_keeps_grounding() {
        let body = r#"{
          "candidates": [{
            "content": {"role": "model", "parts": [
              {"text": "thinking...", "thought": true},
              {"text": "Sure! "},
              {"text": "```json\n{}\n```"}
            ]},
            "groundingMetadata": {"groundingChunks": [
              {"web": {"uri": "https://a.example", "title": "A"}},
              {"web": {"uri": "https://b.example"}},
              {}
            ]}
          }]
        }"#;

        let generation = parse_response(body).unwrap();
        assert_eq!(generation.text.as_deref(), Some("Sure! ```json\n{}\n```"));
        assert_eq!(generation.grounding.len(), 3);
        assert_eq!(
            generation.grounding[0].web.as_ref().unwrap().title.as_deref(),
            Some("A")
        );
        assert!(generation.grounding[2].web.is_none());
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let generation = parse_response(r#"{"candidates": []}"#).unwrap();
        assert!(generation.text.is_none());

        let generation =
            parse_response(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(generation.text.is_none());
    }

    #[test]
    fn endpoint_joins_model() {
        let client = GeminiClient::new("https://example.test/v1beta/", "k");
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
