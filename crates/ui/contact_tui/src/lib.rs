pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod errors;
pub mod listeners;
pub mod logging;
pub mod tui;
