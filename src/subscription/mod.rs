//! Индекс подписок: кто из участников интересуется какой парой (хаб, топик).

mod index;

pub use index::*;
