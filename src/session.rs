use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::state::{Message, Role};

/// Shown when the reply payload has no text at the expected path
pub const NO_RESPONSE: &str = "No response";

/// Shown for every failed call, whatever the cause
pub const ERROR_OCCURRED: &str = "Error occurred";

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Transcript, input buffer and in-flight flag for one conversation.
///
/// At most one call is outstanding: `submit` refuses while a reply is
/// awaited, and every accepted submit must be followed by exactly one
/// `resolve`.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<Message>,
    pending_input: String,
    cursor: usize, // character position in pending_input
    awaiting_response: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Whether `submit` would currently send anything
    pub fn can_submit(&self) -> bool {
        !self.awaiting_response && !self.pending_input.trim().is_empty()
    }

    /// Commit the pending input as a user message.
    ///
    /// Returns the text to send, or `None` when the input is blank or a
    /// reply is still outstanding. In that case nothing changes.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        let text = std::mem::take(&mut self.pending_input);
        self.cursor = 0;
        self.transcript.push(Message::user(text.clone()));
        self.awaiting_response = true;
        info!(chars = text.chars().count(), "message submitted");
        Some(text)
    }

    /// Settle the outstanding call with its outcome.
    ///
    /// `Ok(Some(text))` becomes the reply, `Ok(None)` the fallback string,
    /// and any error the fixed error string. Returns `false` if no call
    /// was outstanding.
    pub fn resolve<E: Display>(&mut self, outcome: Result<Option<String>, E>) -> bool {
        if !self.awaiting_response {
            debug!("resolve without an outstanding call ignored");
            return false;
        }

        let content = match outcome {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("reply had no text at the expected path");
                NO_RESPONSE.to_string()
            }
            Err(err) => {
                warn!(error = %err, "generate call failed");
                ERROR_OCCURRED.to_string()
            }
        };

        self.transcript.push(Message::new(Role::Assistant, content));
        self.awaiting_response = false;
        true
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
        self.cursor = self.pending_input.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.pending_input, self.cursor);
        self.pending_input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.pending_input, self.cursor);
            self.pending_input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.pending_input.chars().count() {
            let byte_pos = char_to_byte_index(&self.pending_input, self.cursor);
            self.pending_input.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.pending_input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.pending_input.chars().count();
    }
}
