use tokio::sync::broadcast;

use super::ProgramEvent;
use crate::error::{RecvError, TryRecvError};

/// Асинхронный поток событий шины.
///
/// Получает каждое событие, испущенное после создания потока. Отставший
/// приёмник теряет старые события и получает [`RecvError::Lagged`].
///
/// Отписка происходит автоматически при `Drop`.
pub struct EventStream {
    pub(crate) inner: broadcast::Receiver<ProgramEvent>,
}

impl EventStream {
    /// Асинхронно ожидает следующее событие.
    ///
    /// # Возвращает
    /// - `Ok(ProgramEvent)` при успешном получении
    /// - `Err(RecvError::Closed)` если шина уничтожена
    /// - `Err(RecvError::Lagged(n))` если приёмник отстал на `n` событий
    pub async fn recv(&mut self) -> Result<ProgramEvent, RecvError> {
        self.inner.recv().await.map_err(Into::into)
    }

    /// Пытается получить событие без блокировки.
    pub fn try_recv(&mut self) -> Result<ProgramEvent, TryRecvError> {
        self.inner.try_recv().map_err(Into::into)
    }

    /// Явно отписаться. Аналогично `drop(self)`.
    pub fn close(self) {}

    /// Проверяет, закрыта ли шина (нет активных отправителей).
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Количество событий в очереди на получение.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
