pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod render;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use api::ChatClient;
pub use app::App;
pub use config::Config;
pub use error::ChatError;
