//! Шина событий: публикации и события жизненного цикла аккаунтов.

mod bus;
mod event;
mod stream;

pub use bus::*;
pub use event::*;
pub use stream::*;
