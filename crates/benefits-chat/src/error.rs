use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request to analysis service failed: {0}")]
    Transport(String),

    #[error("analysis service returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("analysis response was malformed: {0}")]
    Malformed(String),

    #[error("analysis request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client config error: {0}")]
    Config(String),
}
