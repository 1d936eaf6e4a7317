use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::ChatClient;
use crate::error::ChatError;
use crate::render::response_lines;

pub const SEND_LABEL: &str = "Send Message";
pub const SENDING_LABEL: &str = "Sending...";

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Page state for the coach form.
///
/// `response` and `error` are never both `Some`: each submission clears both
/// before the request starts and settling sets at most one of them.
pub struct App {
    pub should_quit: bool,

    // Form state
    pub draft: String,
    pub cursor: usize, // char index into draft
    pub response: Option<String>,
    pub error: Option<String>,
    pub loading: bool,

    // View state
    pub response_scroll: u16,
    pub response_width: u16,  // Inner width of the response box, for wrap calculations
    pub response_height: u16, // Inner height of the response box
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub pending: Option<JoinHandle<Result<String, ChatError>>>,
    client: ChatClient,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            draft: String::new(),
            cursor: 0,
            response: None,
            error: None,
            loading: false,
            response_scroll: 0,
            response_width: 0,
            response_height: 0,
            animation_frame: 0,
            pending: None,
            client,
        }
    }

    /// The reply to display. An empty reply shows nothing, like no reply at all.
    pub fn visible_response(&self) -> Option<&str> {
        self.response.as_deref().filter(|reply| !reply.is_empty())
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.draft.trim().is_empty()
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            SENDING_LABEL
        } else {
            SEND_LABEL
        }
    }

    /// Starts a submission and returns the message to send, or `None` when
    /// the draft is blank or a request is already in flight. `None` leaves
    /// every field untouched.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        self.loading = true;
        self.error = None;
        self.response = None;
        self.response_scroll = 0;
        Some(self.draft.clone())
    }

    /// Applies the outcome of the request started by [`App::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<String, ChatError>) {
        match result {
            Ok(reply) => {
                self.response = Some(reply);
                self.error = None;
                self.clear_draft_text();
            }
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "chat submission failed");
                self.response = None;
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
    }

    /// Submits the draft on a background task. The event loop picks up the
    /// result through [`App::poll_pending`].
    pub fn submit(&mut self) {
        let Some(message) = self.begin_submit() else {
            return;
        };

        debug!(chars = message.chars().count(), "submitting draft");
        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move { client.send(&message).await }));
    }

    /// Settles the background request if it has finished.
    pub async fn poll_pending(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.pending.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(error = %err, "chat request task did not complete");
                    Err(ChatError::TaskFailed)
                }
            };
            self.finish_submit(result);
        }
    }

    /// Submits and waits inline. Returns `false` when nothing was sent.
    pub async fn submit_and_wait(&mut self) -> bool {
        let Some(message) = self.begin_submit() else {
            return false;
        };

        let result = self.client.send(&message).await;
        self.finish_submit(result);
        true
    }

    // Draft editing. All of it is disabled while a request is in flight.

    pub fn set_draft(&mut self, text: &str) {
        if self.loading {
            return;
        }
        self.draft = text.to_string();
        self.cursor = self.draft.chars().count();
    }

    pub fn clear_draft(&mut self) {
        if self.loading {
            return;
        }
        self.clear_draft_text();
    }

    fn clear_draft_text(&mut self) {
        self.draft.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        if self.loading {
            return;
        }
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        if self.loading {
            return;
        }
        // Terminals deliver pasted line breaks as \r or \r\n
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.insert_str(byte_pos, &text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.loading || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.draft, self.cursor);
        self.draft.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        if self.loading {
            return;
        }
        let char_count = self.draft.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.draft, self.cursor);
            self.draft.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        if !self.loading {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn cursor_right(&mut self) {
        if !self.loading {
            let char_count = self.draft.chars().count();
            self.cursor = (self.cursor + 1).min(char_count);
        }
    }

    pub fn cursor_home(&mut self) {
        if !self.loading {
            self.cursor = 0;
        }
    }

    pub fn cursor_end(&mut self) {
        if !self.loading {
            self.cursor = self.draft.chars().count();
        }
    }

    /// Cursor as (row, column) within the draft, both counted in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before: String = self.draft.chars().take(self.cursor).collect();
        let row = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|line| line.chars().count())
            .unwrap_or(0);
        (row, col)
    }

    /// Rows the visible reply takes once wrapped to the response box.
    pub fn response_line_count(&self) -> u16 {
        // Use actual box width for wrap calculation, default to 50 if not set
        let wrap_width = if self.response_width > 0 {
            self.response_width as usize
        } else {
            50
        };

        let Some(response) = self.visible_response() else {
            return 0;
        };

        let total: usize = response_lines(response)
            .into_iter()
            .map(|line| {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                char_count.saturating_sub(1) / wrap_width + 1
            })
            .sum();
        total.min(u16::MAX as usize) as u16
    }

    /// Furthest scroll offset that still keeps the box filled.
    pub fn max_response_scroll(&self) -> u16 {
        let visible_height = if self.response_height > 0 {
            self.response_height
        } else {
            20
        };
        self.response_line_count().saturating_sub(visible_height)
    }

    pub fn scroll_response_down(&mut self, lines: u16) {
        self.response_scroll = self
            .response_scroll
            .saturating_add(lines)
            .min(self.max_response_scroll());
    }

    pub fn scroll_response_up(&mut self, lines: u16) {
        self.response_scroll = self.response_scroll.saturating_sub(lines);
    }

    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }
}
