use thiserror::Error;
use tokio::sync::broadcast;

/// Ошибка при получении событий из потока.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecvError {
    #[error("event bus is closed")]
    Closed,

    #[error("operation exceeded the specified timeout")]
    Timeout,

    #[error("receiver lagged behind by {0} events")]
    Lagged(u64),
}

/// Ошибка при неблокирующем получении событий.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TryRecvError {
    #[error("no events available")]
    Empty,

    #[error("event bus is closed")]
    Closed,

    #[error("receiver lagged behind by {0} events")]
    Lagged(u64),
}

// === Преобразования ===

impl From<broadcast::error::RecvError> for RecvError {
    fn from(err: broadcast::error::RecvError) -> Self {
        match err {
            broadcast::error::RecvError::Closed => RecvError::Closed,
            broadcast::error::RecvError::Lagged(n) => RecvError::Lagged(n),
        }
    }
}

impl From<broadcast::error::TryRecvError> for TryRecvError {
    fn from(err: broadcast::error::TryRecvError) -> Self {
        match err {
            broadcast::error::TryRecvError::Empty => TryRecvError::Empty,
            broadcast::error::TryRecvError::Closed => TryRecvError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => TryRecvError::Lagged(n),
        }
    }
}

impl From<TryRecvError> for RecvError {
    fn from(err: TryRecvError) -> Self {
        match err {
            TryRecvError::Empty => RecvError::Timeout,
            TryRecvError::Closed => RecvError::Closed,
            TryRecvError::Lagged(n) => RecvError::Lagged(n),
        }
    }
}
