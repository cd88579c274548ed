use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Command failed: {stderr}")]
    CommandFailed { stderr: String },

    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl BackendError {
    pub fn spawn(program: impl Into<String>, error: &std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
