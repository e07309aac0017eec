use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use benefits_core::models::chat::ChatMessage;
use benefits_core::models::transcript::TranscriptRecord;

use crate::error::HistoryError;
use crate::store::TranscriptStore;

pub const DEFAULT_HISTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort transcript persistence.
///
/// History is never on the critical path: a failed save reports `false`
/// and a failed load yields an empty transcript. Errors are logged, not
/// returned.
#[derive(Clone)]
pub struct HistorySync {
    store: Arc<dyn TranscriptStore>,
    timeout: Duration,
}

impl HistorySync {
    pub fn new(store: Arc<dyn TranscriptStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Replace the stored transcript for `employee_id` with `messages`.
    pub async fn save(
        &self,
        employee_id: &str,
        messages: &[ChatMessage],
        timestamp: jiff::Timestamp,
    ) -> bool {
        match self.try_save(employee_id, messages, timestamp).await {
            Ok(()) => {
                debug!(employee_id, count = messages.len(), "transcript saved");
                true
            }
            Err(e) => {
                warn!(employee_id, error = %e, "failed to save transcript");
                false
            }
        }
    }

    /// Fetch the stored transcript, or an empty one if there is none or it
    /// cannot be read.
    pub async fn load(&self, employee_id: &str) -> Vec<ChatMessage> {
        match self.try_load(employee_id).await {
            Ok(Some(messages)) => {
                debug!(employee_id, count = messages.len(), "transcript loaded");
                messages
            }
            Ok(None) => {
                debug!(employee_id, "no stored transcript");
                Vec::new()
            }
            Err(e) => {
                warn!(employee_id, error = %e, "failed to load transcript");
                Vec::new()
            }
        }
    }

    async fn try_save(
        &self,
        employee_id: &str,
        messages: &[ChatMessage],
        timestamp: jiff::Timestamp,
    ) -> Result<(), HistoryError> {
        let record = TranscriptRecord::new(employee_id, messages, timestamp)?;
        tokio::time::timeout(self.timeout, self.store.upsert(&record))
            .await
            .map_err(|_| HistoryError::Timeout(self.timeout))?
    }

    async fn try_load(&self, employee_id: &str) -> Result<Option<Vec<ChatMessage>>, HistoryError> {
        let record = tokio::time::timeout(self.timeout, self.store.fetch(employee_id))
            .await
            .map_err(|_| HistoryError::Timeout(self.timeout))??;

        match record {
            Some(record) => Ok(Some(record.messages()?)),
            None => Ok(None),
        }
    }
}
