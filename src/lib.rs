pub mod app;
pub mod config;
pub mod gemini;
pub mod handler;
pub mod logging;
pub mod session;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Config, Overrides, Settings};
pub use gemini::{GeminiClient, GeminiError};
pub use session::{ChatSession, ERROR_OCCURRED, NO_RESPONSE};
pub use state::{Message, Role};
