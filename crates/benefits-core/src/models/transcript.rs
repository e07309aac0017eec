use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::chat::ChatMessage;

/// A persisted conversation for one employee.
///
/// `chat_history` holds the serialized message list. Each save replaces the
/// whole record; there is no append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub employee_id: String,
    pub chat_history: String,
    pub timestamp: jiff::Timestamp,
}

impl TranscriptRecord {
    pub fn new(
        employee_id: &str,
        messages: &[ChatMessage],
        timestamp: jiff::Timestamp,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            employee_id: employee_id.to_string(),
            chat_history: serde_json::to_string(messages)?,
            timestamp,
        })
    }

    pub fn messages(&self) -> Result<Vec<ChatMessage>, CoreError> {
        Ok(serde_json::from_str(&self.chat_history)?)
    }
}
