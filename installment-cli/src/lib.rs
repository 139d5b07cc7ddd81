pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod utils;
pub mod views;
