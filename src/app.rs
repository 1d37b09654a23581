use anyhow::bail;
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::gemini::{GeminiClient, GeminiError};
use crate::session::ChatSession;
use crate::state::Role;

type ReplyTask = JoinHandle<Result<Option<String>, GeminiError>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: ChatSession,
    pub client: GeminiClient,
    reply_task: Option<ReplyTask>,

    // Chat view state
    pub chat_scroll: u16,
    pub follow_tail: bool, // keep the newest entry in view
    pub chat_height: u16,  // inner height of the transcript area
    pub chat_width: u16,   // inner width, for wrap calculations

    // Animation state
    pub animation_frame: u8,

    // Panel area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            should_quit: false,
            session: ChatSession::new(),
            client,
            reply_task: None,

            chat_scroll: 0,
            follow_tail: true,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,

            chat_area: None,
        }
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.session.is_awaiting_response()
    }

    /// Submit the pending input and start the outbound call in the background.
    pub fn send_message(&mut self) {
        let Some(text) = self.session.submit() else {
            return;
        };

        let client = self.client.clone();
        self.reply_task = Some(tokio::spawn(async move { client.generate(&text).await }));

        // Scroll to bottom so the loading indicator is visible
        self.follow_tail = true;
    }

    /// Apply the reply if the background call has finished. Returns whether
    /// the transcript changed.
    pub async fn poll_reply(&mut self) -> bool {
        match &self.reply_task {
            Some(task) if task.is_finished() => self.wait_for_reply().await,
            _ => false,
        }
    }

    /// Wait for the outstanding call, if any, and apply its result.
    pub async fn wait_for_reply(&mut self) -> bool {
        let Some(task) = self.reply_task.take() else {
            return false;
        };

        let outcome = match task.await {
            Ok(outcome) => outcome.map_err(|err| err.to_string()),
            Err(join_err) => {
                error!(error = %join_err, "reply task did not complete");
                Err(join_err.to_string())
            }
        };

        let applied = self.session.resolve(outcome);
        if applied {
            self.follow_tail = true;
        }
        applied
    }

    /// Run one submit/reply cycle for `text` and return the reply entry's content.
    pub async fn ask(&mut self, text: &str) -> anyhow::Result<String> {
        if self.is_awaiting_response() {
            bail!("a reply is still outstanding");
        }
        if text.trim().is_empty() {
            bail!("message is empty");
        }

        self.session.set_input(text);
        self.send_message();
        self.wait_for_reply().await;

        match self.session.transcript().last() {
            Some(reply) if reply.role == Role::Assistant => Ok(reply.content.clone()),
            _ => bail!("no reply was recorded"),
        }
    }

    /// Drop an unfinished call when the view goes away.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.reply_task.take() {
            info!("aborting outstanding request on exit");
            task.abort();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_awaiting_response() {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    /// Scrolling past the end re-attaches to the tail; the renderer clamps.
    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn page_size(&self) -> u16 {
        self.chat_height.saturating_sub(1).max(1)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
