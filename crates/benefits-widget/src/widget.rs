use std::sync::Arc;

use benefits_auth::directory::{EmployeeDirectory, MemoryDirectory, S3Directory};
use benefits_auth::session::SessionStore;
use benefits_chat::controller::ConversationController;
use benefits_chat::service::HttpAnalysisClient;
use benefits_core::models::analysis::HealthStatus;
use benefits_history::store::{MemoryTranscriptStore, S3TranscriptStore, TranscriptStore};
use benefits_history::sync::HistorySync;
use benefits_storage::client;
use benefits_storage::kv::FileStore;

use crate::config::{StorageBackend, WidgetConfig};

/// A fully wired chat client.
pub struct Widget {
    controller: ConversationController,
    analysis: Arc<HttpAnalysisClient>,
}

impl Widget {
    /// Build the session store, directory, history and analysis client
    /// described by `config`, restoring any stored session.
    pub async fn from_config(config: &WidgetConfig) -> eyre::Result<Self> {
        let (directory, transcripts): (Arc<dyn EmployeeDirectory>, Arc<dyn TranscriptStore>) =
            match &config.storage {
                StorageBackend::Memory { employees } => {
                    tracing::info!(employees = employees.len(), "using in-memory storage");
                    (
                        Arc::new(MemoryDirectory::new(employees.iter().cloned())),
                        Arc::new(MemoryTranscriptStore::new()),
                    )
                }
                StorageBackend::S3 { region, bucket } => {
                    tracing::info!(region = %region, bucket = %bucket, "using S3 storage");
                    let client = if region.trim().is_empty() {
                        client::build_client().await
                    } else {
                        client::build_client_with_region(region).await
                    };
                    (
                        Arc::new(S3Directory::new(client.clone(), bucket.clone())),
                        Arc::new(S3TranscriptStore::new(client, bucket.clone())),
                    )
                }
            };

        let session_dir = config.session_dir()?;
        let session = SessionStore::restore(
            Box::new(FileStore::new(session_dir)),
            directory,
            config.lookup_timeout(),
        );
        let history = HistorySync::new(transcripts, config.history_timeout());

        let analysis = Arc::new(HttpAnalysisClient::new(
            config.analysis_base_url.clone(),
            config.analysis_timeout(),
        )?);

        let controller =
            ConversationController::new(session, history, analysis.clone(), config.analysis_timeout());

        Ok(Self {
            controller,
            analysis,
        })
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ConversationController {
        &mut self.controller
    }

    pub fn into_controller(self) -> ConversationController {
        self.controller
    }

    /// Check that the analysis service is reachable.
    pub async fn health(&self) -> eyre::Result<HealthStatus> {
        Ok(self.analysis.health().await?)
    }
}
