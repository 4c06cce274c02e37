use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("amqp connection error: {0}")]
    Connection(String),

    #[error("amqp channel closed")]
    ChannelClosed,

    #[error("failed to serialize event payload: {0}")]
    Serialize(String),

    #[error("broker did not confirm publish: {0}")]
    Unconfirmed(String),
}

impl Classified for PublishError {
    fn kind(&self) -> ErrorKind {
        match self {
            PublishError::Connection(_) => ErrorKind::Transient,
            PublishError::ChannelClosed => ErrorKind::Transient,
            PublishError::Serialize(_) => ErrorKind::Fatal,
            PublishError::Unconfirmed(_) => ErrorKind::Transient,
        }
    }
}

impl From<lapin::Error> for PublishError {
    fn from(e: lapin::Error) -> Self {
        PublishError::Connection(e.to_string())
    }
}

pub type PublishResult<T> = Result<T, PublishError>;
