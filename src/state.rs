//! Transcript data types
//!
//! These types carry no UI framework dependencies so the one-shot `ask`
//! command and the TUI share them.

use chrono::Local;

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Local wall-clock time the entry was created, e.g. `3:04:05 PM`
    pub timestamp: String,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: local_time_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

fn local_time_string() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}
