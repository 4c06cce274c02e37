use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("address '{0}' does not match ^0x[0-9a-f]{{40}}$")]
    InvalidAddress(String),

    #[error("chain id '{0}' is not valid CAIP-2")]
    InvalidChainId(String),

    #[error("address is bound to a different account")]
    UnauthorizedAccess,

    #[error("wallet link row corrupted: {0}")]
    Corrupted(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("publish error: {0}")]
    Publish(#[from] event_publisher::PublishError),
}

impl Classified for WalletError {
    fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidAddress(_) | WalletError::InvalidChainId(_) => ErrorKind::Validation,
            WalletError::UnauthorizedAccess => ErrorKind::Unauthorized,
            WalletError::Corrupted(_) => ErrorKind::Fatal,
            WalletError::Database(_) => ErrorKind::Transient,
            WalletError::Publish(e) => e.kind(),
        }
    }
}

impl From<sqlx::Error> for WalletError {
    fn from(e: sqlx::Error) -> Self {
        WalletError::Database(e.to_string())
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
