//! Wire types for the external analysis service (`POST /manager/analyze`).

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::chat::MessageDetails;
use crate::models::lenient;
use crate::models::trace::DebugEntry;

/// Request body for `POST /manager/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub employee_id: String,
    pub query: String,
}

/// Successful reply from the analysis service.
///
/// Only `response.message` is required. Everything else defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub response: ResponseMessage,
    #[serde(default, deserialize_with = "lenient::string_or_list")]
    pub next_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::valid_entries")]
    pub debug_info: Vec<DebugEntry>,
    /// Free-form routing context from the manager agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl AnalyzeResponse {
    /// Next steps with blank entries dropped.
    pub fn suggestions(&self) -> Vec<String> {
        self.next_steps
            .iter()
            .filter(|step| !step.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub message: String,
    #[serde(default, deserialize_with = "lenient_details")]
    pub details: MessageDetails,
}

/// The service sends details as an object on success but as a bare error
/// string from its fallback path. Anything that is not an object is empty.
fn lenient_details<'de, D>(deserializer: D) -> Result<MessageDetails, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDetails {
        Structured(MessageDetails),
        Text(String),
    }

    Ok(match Option::<RawDetails>::deserialize(deserializer)? {
        Some(RawDetails::Structured(details)) => details,
        Some(RawDetails::Text(_)) | None => MessageDetails::default(),
    })
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Reply from `GET /` on the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub service: String,
    pub version: String,
    pub status: String,
}
