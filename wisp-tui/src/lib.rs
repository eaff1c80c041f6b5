// Library interface for wisp (for testing purposes)
pub mod api;
pub mod app;
pub mod auth;
pub mod config;

#[macro_use]
pub mod logging;

pub mod session;
pub mod terminal;
pub mod ui;
