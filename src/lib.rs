pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod state;
pub mod ui;
