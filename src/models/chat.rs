use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Coach,
}

/// One message in the coach chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            body: body.into(),
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_new() {
        let msg = ChatMessage::new(ChatRole::User, "How many rest days?");
        assert_eq!(msg.role, ChatRole::User);
        assert_eq!(msg.body, "How many rest days?");
    }
}
