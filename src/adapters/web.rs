//! Web adapter — browser chat front-end.
//!
//! Serves a single self-contained chat page plus two endpoints:
//! `POST /api/chat` answers the last turn of a posted conversation
//! history, and `GET /api/chat/stream` streams growing answer snapshots
//! over SSE. The gateway guarantees every request a displayable reply,
//! so request handling never panics on agent problems.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tracing::info;

use crate::agent::ConversationHistory;
use crate::gateway::ResponseGateway;
use crate::Result;

/// Shared state for request handlers.
#[derive(Clone)]
struct AppState {
    gateway: Arc<ResponseGateway>,
}

/// Build the router for the chat front-end.
pub fn router(gateway: Arc<ResponseGateway>) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/api/chat", post(chat))
        .route("/api/chat/stream", get(chat_stream))
        .with_state(AppState { gateway })
}

/// Serve the front-end and block until shutdown.
pub async fn serve(gateway: Arc<ResponseGateway>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("web front-end listening on http://{addr}");

    axum::serve(listener, router(gateway)).await?;
    Ok(())
}

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    history: ConversationHistory,
}

/// Answer the last turn of the posted history and return the updated
/// history for re-rendering.
async fn chat(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Json<ConversationHistory> {
    state.gateway.respond_turn(&mut request.history).await;
    Json(request.history)
}

#[derive(Debug, Deserialize)]
struct StreamParams {
    #[serde(default)]
    message: String,
}

/// Stream growing answer snapshots for one message.
///
/// Each event's data is a JSON-encoded string so the page can render
/// multi-line answers verbatim.
async fn chat_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let snapshots = state.gateway.respond_stream(params.message);
    let events = snapshots.map(|snapshot| {
        let data = serde_json::to_string(&snapshot).unwrap_or_else(|_| "\"\"".to_string());
        Ok(Event::default().data(data))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

const CHAT_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Parlor</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #f8fafc;
      color: #1e293b;
      display: flex;
      justify-content: center;
      min-height: 100vh;
    }
    .app { width: 100%; max-width: 720px; display: flex; flex-direction: column; padding: 24px 16px; }
    h1 { font-size: 20px; margin-bottom: 4px; }
    .subtitle { color: #64748b; font-size: 14px; margin-bottom: 16px; }
    .messages { flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 10px; padding: 8px 0; }
    .bubble { max-width: 85%; padding: 10px 14px; border-radius: 12px; white-space: pre-wrap; line-height: 1.45; }
    .user { align-self: flex-end; background: #0ea5e9; color: #fff; }
    .agent { align-self: flex-start; background: #e2e8f0; }
    .examples { display: flex; gap: 8px; flex-wrap: wrap; margin-bottom: 12px; }
    .examples button {
      border: 1px solid #cbd5e1; background: #fff; border-radius: 999px;
      padding: 6px 12px; font-size: 13px; cursor: pointer; color: #475569;
    }
    form { display: flex; gap: 8px; margin-top: 12px; }
    #input { flex: 1; padding: 10px 14px; border: 1px solid #cbd5e1; border-radius: 10px; font-size: 15px; }
    #send { padding: 10px 18px; border: none; border-radius: 10px; background: #0ea5e9; color: #fff; cursor: pointer; }
    label.stream { font-size: 13px; color: #64748b; display: flex; align-items: center; gap: 6px; margin-top: 8px; }
  </style>
</head>
<body>
  <div class="app">
    <h1>Parlor</h1>
    <div class="subtitle">Chat with the agent. Replies stream in as they grow.</div>
    <div class="examples">
      <button type="button">What can you help me with?</button>
      <button type="button">Summarize the latest developments in gene editing.</button>
      <button type="button">Explain CRISPR like I'm five.</button>
    </div>
    <div class="messages" id="messages"></div>
    <form id="form">
      <input id="input" autocomplete="off" placeholder="Type a message...">
      <button id="send" type="submit">Send</button>
    </form>
    <label class="stream"><input type="checkbox" id="streaming" checked> Stream replies</label>
  </div>
  <script>
    const messages = document.getElementById('messages');
    const form = document.getElementById('form');
    const input = document.getElementById('input');
    const streaming = document.getElementById('streaming');
    let history = [];

    function bubble(cls, text) {
      const div = document.createElement('div');
      div.className = 'bubble ' + cls;
      div.textContent = text;
      messages.appendChild(div);
      messages.scrollTop = messages.scrollHeight;
      return div;
    }

    document.querySelectorAll('.examples button').forEach(btn => {
      btn.addEventListener('click', () => { input.value = btn.textContent; input.focus(); });
    });

    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      const text = input.value;
      input.value = '';
      bubble('user', text);

      if (streaming.checked) {
        const reply = bubble('agent', '...');
        const es = new EventSource('/api/chat/stream?message=' + encodeURIComponent(text));
        es.onmessage = (event) => { reply.textContent = JSON.parse(event.data); };
        es.onerror = () => {
          es.close();
          history.push({ user: text, reply: reply.textContent });
        };
      } else {
        history.push({ user: text });
        const reply = bubble('agent', '...');
        const response = await fetch('/api/chat', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ history }),
        });
        history = await response.json();
        reply.textContent = history[history.length - 1].reply || '';
      }
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_deserializes_history() {
        let body = r#"{"history": [{"user": "hi"}, {"user": "again", "reply": "hello"}]}"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history.last_user_message(), Some("again"));
    }

    #[test]
    fn test_stream_params_default_to_empty_message() {
        let params: StreamParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.message, "");
    }

    #[test]
    fn test_chat_page_has_form_and_examples() {
        assert!(CHAT_PAGE.contains("id=\"form\""));
        assert!(CHAT_PAGE.contains("/api/chat/stream"));
        assert!(CHAT_PAGE.contains("class=\"examples\""));
    }
}
