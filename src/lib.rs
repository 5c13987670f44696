// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod analysis;
pub mod backend;
pub mod cards;
pub mod codec;
pub mod config;
pub mod protocol;
pub mod session;
pub mod transcript;
pub mod tui;
