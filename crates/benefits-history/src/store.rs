use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tokio::sync::Mutex;

use benefits_core::keys;
use benefits_core::models::transcript::TranscriptRecord;
use benefits_storage::state;

use crate::error::HistoryError;

/// Backend holding one transcript record per employee.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Insert or fully replace the record for `record.employee_id`.
    async fn upsert(&self, record: &TranscriptRecord) -> Result<(), HistoryError>;

    async fn fetch(&self, employee_id: &str) -> Result<Option<TranscriptRecord>, HistoryError>;
}

/// In-process store. Clones share the same records and failure switches.
#[derive(Debug, Clone, Default)]
pub struct MemoryTranscriptStore {
    records: Arc<Mutex<HashMap<String, TranscriptRecord>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `upsert` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `fetch` fail until switched back.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful upserts.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn record(&self, employee_id: &str) -> Option<TranscriptRecord> {
        self.records.lock().await.get(employee_id).cloned()
    }

    /// Store a record as-is, bypassing serialization.
    pub async fn insert_raw(&self, record: TranscriptRecord) {
        self.records
            .lock()
            .await
            .insert(record.employee_id.clone(), record);
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn upsert(&self, record: &TranscriptRecord) -> Result<(), HistoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HistoryError::Store("write rejected".to_string()));
        }
        self.records
            .lock()
            .await
            .insert(record.employee_id.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch(&self, employee_id: &str) -> Result<Option<TranscriptRecord>, HistoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HistoryError::Store("read rejected".to_string()));
        }
        Ok(self.records.lock().await.get(employee_id).cloned())
    }
}

/// Store backed by `transcripts/{employee_id}.json` objects in S3.
pub struct S3TranscriptStore {
    client: Client,
    bucket: String,
}

impl S3TranscriptStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl TranscriptStore for S3TranscriptStore {
    async fn upsert(&self, record: &TranscriptRecord) -> Result<(), HistoryError> {
        let employee_id = keys::validate_employee_id(&record.employee_id)?;
        let key = keys::transcript(employee_id);
        state::save_state(&self.client, &self.bucket, &key, record).await?;
        tracing::debug!(bucket = %self.bucket, key = %key, "transcript uploaded");
        Ok(())
    }

    async fn fetch(&self, employee_id: &str) -> Result<Option<TranscriptRecord>, HistoryError> {
        let employee_id = keys::validate_employee_id(employee_id)?;
        let key = keys::transcript(employee_id);
        Ok(state::try_load_state(&self.client, &self.bucket, &key).await?)
    }
}
