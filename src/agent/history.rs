//! Conversation history shared between the presentation layer and the gateway.

use serde::{Deserialize, Serialize};

/// One exchange: the user's message and, once answered, the agent's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl ConversationTurn {
    /// A turn awaiting its reply.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            user: message.into(),
            reply: None,
        }
    }

    /// A completed turn.
    pub fn answered(message: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user: message.into(),
            reply: Some(reply.into()),
        }
    }
}

/// Ordered conversation turns, oldest first.
///
/// Owned by the presentation layer. The gateway only ever fills in the
/// reply of the most recent turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn awaiting its reply.
    pub fn push_user(&mut self, message: impl Into<String>) {
        self.turns.push(ConversationTurn::user(message));
    }

    /// The most recent turn's user message.
    pub fn last_user_message(&self) -> Option<&str> {
        self.turns.last().map(|turn| turn.user.as_str())
    }

    /// Write `reply` into the most recent turn. No other turn is touched.
    pub fn resolve_last(&mut self, reply: impl Into<String>) {
        if let Some(turn) = self.turns.last_mut() {
            turn.reply = Some(reply.into());
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop all turns.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_resolve() {
        let mut history = ConversationHistory::new();
        history.push_user("hello");
        assert_eq!(history.last_user_message(), Some("hello"));

        history.resolve_last("hi there");
        assert_eq!(history.turns()[0].reply.as_deref(), Some("hi there"));
    }

    #[test]
    fn test_resolve_touches_only_last_turn() {
        let mut history = ConversationHistory::new();
        history.push_user("first");
        history.resolve_last("first reply");
        history.push_user("second");
        history.resolve_last("second reply");

        assert_eq!(history.turns()[0].reply.as_deref(), Some("first reply"));
        assert_eq!(history.turns()[1].reply.as_deref(), Some("second reply"));
    }

    #[test]
    fn test_resolve_on_empty_history_is_noop() {
        let mut history = ConversationHistory::new();
        history.resolve_last("orphan");
        assert!(history.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut history = ConversationHistory::new();
        history.push_user("ping");
        history.resolve_last("pong");
        history.push_user("unanswered");

        let json = serde_json::to_string(&history).unwrap();
        let parsed: ConversationHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history);
        assert_eq!(parsed.turns()[1].reply, None);
    }
}
