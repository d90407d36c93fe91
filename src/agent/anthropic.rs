//! Anthropic agent client implementation (API key authentication).

use async_stream::stream;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::Error;

use super::chunk::AgentChunk;
use super::client::{AgentClient, ChunkStream};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API client using API key authentication.
///
/// The API streams text deltas; this client accumulates them into a
/// running answer and emits each accumulation as a chunk whose `output`
/// field is the cumulative snapshot so far.
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    model: String,
    client: Client,
}

impl AnthropicClient {
    /// Create a new Anthropic client with an explicit API key.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }

    fn build_request(&self, message: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "stream": true,
            "messages": [{"role": "user", "content": message}],
        })
    }
}

/// Server-sent events we care about; everything else is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: StreamDelta },
    MessageStop,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

impl AgentClient for AnthropicClient {
    fn stream_respond(&self, message: &str) -> ChunkStream {
        debug!("anthropic stream_respond: model={}", self.model);

        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let body = self.build_request(message);

        Box::pin(stream! {
            let response = match client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    yield Err(Error::Http(e));
                    return;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                yield Err(Error::AgentExecution(format!(
                    "agent returned {status}: {detail}"
                )));
                return;
            }

            let mut bytes = response.bytes_stream();
            let mut buffer = String::new();
            let mut answer = String::new();

            while let Some(piece) = bytes.next().await {
                let piece = match piece {
                    Ok(piece) => piece,
                    Err(e) => {
                        yield Err(Error::Http(e));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&piece));

                // SSE frames are newline-delimited; only `data:` lines matter.
                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim().to_string();
                    buffer.drain(..=newline);

                    let Some(data) = line.strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<StreamEvent>(data) {
                        Ok(StreamEvent::ContentBlockDelta {
                            delta: StreamDelta::TextDelta { text },
                        }) => {
                            answer.push_str(&text);
                            yield Ok(AgentChunk::output(answer.clone()));
                        }
                        Ok(StreamEvent::MessageStop) => return,
                        Ok(_) => {}
                        Err(e) => {
                            warn!("unparseable stream event: {e} - data: {data}");
                        }
                    }
                }
            }
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let client = AnthropicClient::new("key", "claude-test");
        let body = client.build_request("hello");

        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_parse_text_delta_event() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#;
        let event: StreamEvent = serde_json::from_str(data).unwrap();
        assert!(matches!(
            event,
            StreamEvent::ContentBlockDelta {
                delta: StreamDelta::TextDelta { ref text }
            } if text == "Hi"
        ));
    }

    #[test]
    fn test_parse_message_stop_event() {
        let data = r#"{"type":"message_stop"}"#;
        let event: StreamEvent = serde_json::from_str(data).unwrap();
        assert!(matches!(event, StreamEvent::MessageStop));
    }

    #[test]
    fn test_unknown_events_are_skipped() {
        let data = r#"{"type":"message_start","message":{}}"#;
        let event: StreamEvent = serde_json::from_str(data).unwrap();
        assert!(matches!(event, StreamEvent::Other));
    }

    #[test]
    fn test_non_text_delta_is_skipped() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"{}"}}"#;
        let event: StreamEvent = serde_json::from_str(data).unwrap();
        assert!(matches!(
            event,
            StreamEvent::ContentBlockDelta {
                delta: StreamDelta::Other
            }
        ));
    }
}
