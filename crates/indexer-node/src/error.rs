use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to connect to a dependency during startup: {0}")]
    Bootstrap(String),

    #[error("shutdown deadline exceeded")]
    ShutdownTimeout,
}

pub type NodeResult<T> = Result<T, NodeError>;
