// Library root: re-exports all modules so integration tests can `use radiolume::*`.

pub mod action;
pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod headless;
pub mod logging;
pub mod theme;
pub mod tui;
pub mod ui;
