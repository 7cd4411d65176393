use std::collections::VecDeque;

use bytes::Bytes;
use futures::{StreamExt, stream::{self, BoxStream}};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::domain::{
    chat::{
        entities::{ChatContent, ChatRole},
        ports::{ChatModel, FragmentStream},
    },
    common::{LLMConfig, entities::app_errors::CoreError},
    medication::{ports::LLMClient, value_objects::ImagePayload},
};

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: String) -> Self {
        Self {
            role,
            parts: vec![Part::Text { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

impl GenerationConfig {
    fn json(response_schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
            response_schema,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();

        Some(text)
    }
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

impl GeminiLLMClient {
    pub fn new(api_key: String, model_name: String, base_url: String) -> Self {
        Self {
            api_key,
            model_name,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
    }

    async fn post(&self, url: String, request: &GeminiRequest) -> Result<Response, CoreError> {
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model_name, self.api_key
        );

        let response = self.post(url, &request).await?;

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response
            .text()
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }

    async fn stream_gemini_api(&self, request: GeminiRequest) -> Result<FragmentStream, CoreError> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model_name, self.api_key
        );

        let response = self.post(url, &request).await?;

        Ok(decode_event_stream(response.bytes_stream().boxed()))
    }
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(
        &self,
        system_instruction: String,
        prompt: String,
        image: ImagePayload,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest {
            system_instruction: Some(Content::text(None, system_instruction)),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type,
                            data: image.data,
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig::json(response_schema)),
        };

        self.call_gemini_api(request).await
    }

    async fn generate_with_text(
        &self,
        system_instruction: String,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest {
            system_instruction: Some(Content::text(None, system_instruction)),
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: Some(GenerationConfig::json(response_schema)),
        };

        self.call_gemini_api(request).await
    }
}

impl ChatModel for GeminiLLMClient {
    async fn stream_message(
        &self,
        system_instruction: String,
        history: Vec<ChatContent>,
        message: String,
    ) -> Result<FragmentStream, CoreError> {
        let mut contents: Vec<Content> = history
            .into_iter()
            .map(|content| Content::text(Some(role_name(content.role)), content.text))
            .collect();
        contents.push(Content::text(Some("user"), message));

        let request = GeminiRequest {
            system_instruction: Some(Content::text(None, system_instruction)),
            contents,
            generation_config: None,
        };

        self.stream_gemini_api(request).await
    }
}

/// Splits a server-sent event body into lines and decodes the `data:`
/// payloads. Bytes are buffered until a full line is available, so events
/// and multi-byte characters may straddle network chunks.
#[derive(Debug, Default)]
struct EventDecoder {
    buffer: Vec<u8>,
}

impl EventDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<Result<String, CoreError>> {
        self.buffer.extend_from_slice(chunk);

        let mut fragments = Vec::new();
        while let Some(position) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=position).collect();
            fragments.extend(decode_line(&line));
        }
        fragments
    }

    fn finish(&mut self) -> Vec<Result<String, CoreError>> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line).into_iter().collect()
    }
}

fn decode_line(line: &[u8]) -> Option<Result<String, CoreError>> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line.trim(),
        Err(e) => {
            return Some(Err(CoreError::ExternalServiceError(format!(
                "Invalid UTF-8 in LLM stream: {}",
                e
            ))));
        }
    };

    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<GeminiResponse>(data) {
        Ok(response) => response.text().filter(|text| !text.is_empty()).map(Ok),
        Err(e) => {
            tracing::error!("Failed to parse Gemini stream event: {}", e);
            Some(Err(CoreError::ExternalServiceError(format!(
                "Failed to parse LLM stream event: {}",
                e
            ))))
        }
    }
}

struct EventStreamState {
    bytes: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: EventDecoder,
    pending: VecDeque<Result<String, CoreError>>,
    finished: bool,
}

fn decode_event_stream(bytes: BoxStream<'static, reqwest::Result<Bytes>>) -> FragmentStream {
    let state = EventStreamState {
        bytes,
        decoder: EventDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((fragment, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.pending.extend(state.decoder.push(&chunk)),
                Some(Err(e)) => {
                    tracing::error!("Gemini stream interrupted: {}", e);
                    state.pending.push_back(Err(CoreError::ExternalServiceError(format!(
                        "LLM stream error: {}",
                        e
                    ))));
                    state.finished = true;
                }
                None => {
                    let rest = state.decoder.finish();
                    state.pending.extend(rest);
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> String {
        format!(
            "data: {}\r\n\r\n",
            serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
            })
        )
    }

    fn texts(fragments: Vec<Result<String, CoreError>>) -> Vec<String> {
        fragments.into_iter().map(|f| f.unwrap()).collect()
    }

    #[test]
    fn test_decoder_handles_events_split_across_chunks() {
        let body = format!("{}{}", event("Hel"), event("lo"));
        let (first, second) = body.as_bytes().split_at(17);

        let mut decoder = EventDecoder::default();
        let mut fragments = decoder.push(first);
        assert!(fragments.is_empty());
        fragments.extend(decoder.push(second));
        fragments.extend(decoder.finish());

        assert_eq!(texts(fragments), vec!["Hel", "lo"]);
    }

    #[test]
    fn test_decoder_keeps_multibyte_characters_intact() {
        let body = event("سڵاو");
        let bytes = body.as_bytes();
        let split = body.find("سڵاو").unwrap() + 1;

        let mut decoder = EventDecoder::default();
        let mut fragments = decoder.push(&bytes[..split]);
        fragments.extend(decoder.push(&bytes[split..]));

        assert_eq!(texts(fragments), vec!["سڵاو"]);
    }

    #[test]
    fn test_decoder_skips_noise_and_flushes_last_line() {
        let body = format!(
            ": keep-alive\n\nevent: message\n{}data: [DONE]\ndata: {}",
            event("a"),
            serde_json::json!({"candidates": [{"content": {"parts": [{"text": "b"}]}}]})
        );

        let mut decoder = EventDecoder::default();
        let mut fragments = decoder.push(body.as_bytes());
        fragments.extend(decoder.finish());

        assert_eq!(texts(fragments), vec!["a", "b"]);
    }

    #[test]
    fn test_decoder_reports_malformed_event() {
        let mut decoder = EventDecoder::default();
        let fragments = decoder.push(b"data: {not json}\n");

        assert_eq!(fragments.len(), 1);
        assert!(matches!(
            fragments[0],
            Err(CoreError::ExternalServiceError(_))
        ));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "{\"name\":"}, {"text": "\"A\"}"}]}}]
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("{\"name\":\"A\"}"));

        let empty: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_request_uses_gemini_field_names() {
        let request = GeminiRequest {
            system_instruction: Some(Content::text(None, "be brief".to_string())),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::Text {
                        text: "what is this".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "aGk=".to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig::json(serde_json::json!({"type": "OBJECT"}))),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system_instruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(json["generation_config"]["response_mime_type"], "application/json");
        assert!(json["system_instruction"].get("role").is_none());
    }

    #[tokio::test]
    async fn test_event_stream_reports_body_end() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from(event("Hel"))),
            Ok(Bytes::from(event("lo"))),
        ];
        let fragments: Vec<_> = decode_event_stream(stream::iter(chunks).boxed())
            .collect()
            .await;

        assert_eq!(texts(fragments), vec!["Hel", "lo"]);
    }
}
