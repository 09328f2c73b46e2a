use thiserror::Error;

/// Failures originating below the application layer: sockets, the
/// database pool, or subscriber installation.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("could not install telemetry: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
