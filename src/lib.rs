pub mod detail;
pub mod error;
pub mod jellyfin;
pub mod screen;
pub mod session;
pub mod sync;
pub mod ticks;
pub mod utils;
