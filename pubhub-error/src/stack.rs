use std::{error::Error, fmt, panic::Location, sync::Arc};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{ErrorExt, StatusCode};

/// Ошибка верхнего уровня: исходная ошибка программы плюс цепочка
/// пояснений, которые добавлялись по пути наверх.
///
/// Пояснения хранятся от внутреннего к внешнему. `Display` печатает их в
/// обратном порядке, начиная с самого внешнего:
///
/// ```text
/// instruction createTopic failed: topics registry not initialised: ...
/// ```
#[derive(Clone)]
pub struct StackError {
    root: Arc<dyn ErrorExt>,
    cause: Arc<dyn Error + Send + Sync>,
    trail: Vec<Frame>,
}

/// Одно пояснение в цепочке и место в коде, где его добавили.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub note: String,
    pub at: &'static Location<'static>,
}

impl fmt::Display for Frame {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} at {}:{}", self.note, self.at.file(), self.at.line())
    }
}

/// Ответ об ошибке для CLI: код, безопасное сообщение и, в отладочной
/// сборке, цепочка пояснений.
#[cfg(feature = "serde")]
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<String>,
}

impl StackError {
    pub fn new<E: ErrorExt>(err: E) -> Self {
        let err = Arc::new(err);
        Self {
            root: err.clone(),
            cause: err,
            trail: Vec::new(),
        }
    }

    /// Добавляет внешнее пояснение и запоминает место вызова.
    #[track_caller]
    pub fn context(
        mut self,
        note: impl Into<String>,
    ) -> Self {
        self.trail.push(Frame {
            note: note.into(),
            at: Location::caller(),
        });
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.root.status_code()
    }

    pub fn client_message(&self) -> String {
        self.root.client_message()
    }

    pub fn root(&self) -> &dyn ErrorExt {
        self.root.as_ref()
    }

    /// Пояснения от самого внутреннего к самому внешнему.
    pub fn contexts(&self) -> &[Frame] {
        &self.trail
    }

    /// Исходная ошибка конкретного типа, если она такого типа.
    pub fn downcast_ref<T: ErrorExt>(&self) -> Option<&T> {
        self.root.as_any().downcast_ref()
    }

    #[cfg(feature = "serde")]
    pub fn to_response(&self) -> ErrorResponse {
        let trail = if cfg!(debug_assertions) {
            self.trail.iter().map(Frame::to_string).collect()
        } else {
            Vec::new()
        };
        ErrorResponse {
            code: self.status_code().code(),
            message: self.client_message(),
            trail,
        }
    }
}

impl fmt::Display for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for frame in self.trail.iter().rev() {
            write!(f, "{}: ", frame.note)?;
        }
        fmt::Display::fmt(&self.root, f)
    }
}

impl fmt::Debug for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{}] {}", self.status_code(), self.root)?;
        for frame in self.trail.iter().rev() {
            write!(f, "\n    in {frame}")?;
        }
        Ok(())
    }
}

impl Error for StackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause)
    }
}

impl<E: ErrorExt> From<E> for StackError {
    fn from(err: E) -> Self {
        Self::new(err)
    }
}
