use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use super::{EventKind, EventStream, ProgramEvent};

/// Идентификатор зарегистрированного слушателя.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

type Callback = Arc<dyn Fn(&ProgramEvent) + Send + Sync>;

struct Listener {
    kind: EventKind,
    callback: Callback,
}

/// Снимок счётчиков шины.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusMetrics {
    /// Всего испущено событий.
    pub emitted: usize,
    /// Событий, которые не получил ни один слушатель и ни один поток.
    pub undelivered: usize,
    pub listeners: usize,
    pub streams: usize,
}

/// Шина событий программы.
///
/// Поддерживает:
/// - Слушателей-коллбеки по виду события (id монотонно растёт)
/// - Асинхронные потоки всех событий через `broadcast`
/// - Статистику испущенных и недоставленных событий
///
/// Доставка по принципу "выстрелил и забыл": не более одного раза, только
/// тем, кто подключён в момент испускания. Событие без получателей не
/// считается ошибкой.
pub struct EventBus {
    listeners: DashMap<ListenerId, Listener>,
    next_id: AtomicU64,
    sender: broadcast::Sender<ProgramEvent>,
    emitted: AtomicUsize,
    undelivered: AtomicUsize,
}

impl EventBus {
    /// Создаёт шину с заданной ёмкостью буфера потоков.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
            sender,
            emitted: AtomicUsize::new(0),
            undelivered: AtomicUsize::new(0),
        }
    }

    /// Регистрирует коллбек на события вида `kind`.
    pub fn add_event_listener<F>(
        &self,
        kind: EventKind,
        callback: F,
    ) -> ListenerId
    where
        F: Fn(&ProgramEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(
            id,
            Listener {
                kind,
                callback: Arc::new(callback),
            },
        );
        trace!(listener = id.0, %kind, "event listener added");
        id
    }

    /// Снимает слушателя. Возвращает `false`, если его уже не было.
    pub fn remove_event_listener(
        &self,
        id: ListenerId,
    ) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Открывает поток всех последующих событий.
    pub fn stream(&self) -> EventStream {
        EventStream {
            inner: self.sender.subscribe(),
        }
    }

    /// Испускает событие. Возвращает число получателей (коллбеки + потоки).
    pub fn emit(
        &self,
        event: ProgramEvent,
    ) -> usize {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind();

        // Коллбеки вызываются вне блокировки карты, чтобы слушатель мог
        // снять себя или добавить другого.
        let callbacks: Vec<Callback> = self
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Arc::clone(&l.callback))
            .collect();
        for callback in &callbacks {
            callback(&event);
        }

        let streamed = self.sender.send(event).unwrap_or(0);
        let reached = callbacks.len() + streamed;
        if reached == 0 {
            self.undelivered.fetch_add(1, Ordering::Relaxed);
        }
        trace!(%kind, reached, "event emitted");
        reached
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn metrics(&self) -> BusMetrics {
        BusMetrics {
            emitted: self.emitted.load(Ordering::Relaxed),
            undelivered: self.undelivered.load(Ordering::Relaxed),
            listeners: self.listeners.len(),
            streams: self.sender.receiver_count(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
