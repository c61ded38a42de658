pub mod accounts;
pub mod admin;
pub mod advice;
pub mod app;
pub mod channel;
pub mod coach;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod hub;
pub mod journal;
pub mod media;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod views;

pub use app::router;
pub use config::Settings;
pub use hub::Hub;
pub use state::AppState;
pub use storage::{JsonFileStore, MemoryStore};
