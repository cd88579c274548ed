use phup_backend::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{version} is not an installed version; run `phup list` first")]
    UnknownVersion { version: String },

    #[error("No PHP versions are installed; run `phup install <version>` first")]
    NoVersionsInstalled,

    #[error("Operation completed with errors: {summary}")]
    OperationFailed { summary: String },

    #[error("The background worker stopped before signalling completion")]
    WorkerStopped,

    #[error("Confirmation prompt failed: {0}")]
    Prompt(String),
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn operation_failed_display_carries_the_summary() {
        let error = AppError::OperationFailed {
            summary: "apt exited with status 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Operation completed with errors: apt exited with status 100"
        );
    }
}
