use thiserror::Error;

use crate::transport::TransportError;

/// Errors that end a run early
///
/// The transcript keeps everything appended before the failure.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
