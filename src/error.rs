use thiserror::Error;

/// Failures that end a run. Each kind maps to its own process exit code.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Nothing is staged; the user has to `git add` something first.
    #[error("no staged changes to describe (stage files with `git add` first)")]
    EmptyChangeSet,

    /// git could not be started or exited with a failure status.
    #[error("`{command}` failed: {detail}")]
    ToolInvocation { command: String, detail: String },

    /// Credential missing, or rejected by the completion service.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Any other completion-service failure (network, status, body).
    #[error("completion service error: {0}")]
    Service(String),
}

impl DraftError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DraftError::EmptyChangeSet => 3,
            DraftError::ToolInvocation { .. } => 4,
            DraftError::Authentication(_) => 5,
            DraftError::Service(_) => 6,
        }
    }
}

/// Exit code for an error chain: the first `DraftError` in it decides, anything else is 1.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DraftError>())
        .map(DraftError::exit_code)
        .unwrap_or(1)
}
