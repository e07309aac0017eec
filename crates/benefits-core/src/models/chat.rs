use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::lenient;

/// Client-generated message identifier.
///
/// Derived from the creation time in milliseconds and bumped when two
/// messages land in the same millisecond, so ids sort in display order.
/// Serialized as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(MessageId(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(MessageId)
                .map_err(|e| D::Error::custom(format!("invalid message id {s:?}: {e}"))),
        }
    }
}

/// Hands out strictly increasing [`MessageId`]s.
#[derive(Debug, Clone, Default)]
pub struct MessageIdGen {
    last: i64,
}

impl MessageIdGen {
    pub fn next_at(&mut self, now: jiff::Timestamp) -> MessageId {
        let millis = now.as_millisecond();
        let id = if millis > self.last {
            millis
        } else {
            self.last.saturating_add(1)
        };
        self.last = id;
        MessageId(id)
    }

    /// Make sure future ids sort after `id` (used after loading history).
    ///
    /// Ids past the last representable timestamp cannot have come from a
    /// clock and are not followed.
    pub fn observe(&mut self, id: MessageId) {
        if id.0 > jiff::Timestamp::MAX.as_millisecond() {
            return;
        }
        self.last = self.last.max(id.0);
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// Structured recommendations attached to an assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDetails {
    #[serde(default, deserialize_with = "lenient::string_or_list")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_or_list")]
    pub action_items: Vec<String>,
}

impl MessageDetails {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty() && self.action_items.is_empty()
    }
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<MessageDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn user(id: MessageId, text: impl Into<String>, timestamp: jiff::Timestamp) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            timestamp,
            details: None,
            suggestions: None,
        }
    }

    pub fn assistant(id: MessageId, text: impl Into<String>, timestamp: jiff::Timestamp) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Assistant,
            timestamp,
            details: None,
            suggestions: None,
        }
    }

    /// Attach details unless both lists are empty.
    pub fn with_details(mut self, details: MessageDetails) -> Self {
        self.details = (!details.is_empty()).then_some(details);
        self
    }

    /// Attach suggestions unless there are none.
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = (!suggestions.is_empty()).then_some(suggestions);
        self
    }
}
