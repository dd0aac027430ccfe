use tokio::task::JoinHandle;

use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::gemini::GeminiClient;
use crate::persona;
use crate::reveal::Reveal;

/// Ticks between thinking-dots frames. Ticks arrive at the typing cadence
/// (25 ms by default), so 12 of them is roughly the 300 ms dot rhythm.
const DOTS_FRAME_TICKS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input line state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Conversation state
    pub conversation: Conversation,
    pub loading: bool,
    exchange_task: Option<JoinHandle<Result<String, ChatError>>>,
    reveal: Option<Reveal>,

    // Chat viewport
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
    tick_count: u32,

    pub client: GeminiClient,
}

impl App {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: String::new(),
            input_cursor: 0,

            conversation: Conversation::new(),
            loading: false,
            exchange_task: None,
            reveal: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,
            tick_count: 0,

            client,
        }
    }

    /// True while a submission or reveal is in progress. Only one exchange is
    /// ever in flight; the input surface is rejected rather than queued.
    pub fn busy(&self) -> bool {
        self.loading || self.exchange_task.is_some() || self.reveal.is_some()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Submit the current input line. No-op for blank input or while a prior
    /// exchange is still running. On accept the user message is appended
    /// immediately and the completion call runs on a background task.
    pub fn submit(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.busy() {
            return;
        }

        self.conversation.push_user(&text);
        self.input.clear();
        self.input_cursor = 0;
        self.loading = true;
        self.scroll_chat_to_bottom();

        let client = self.client.clone();
        let history = self.conversation.recent_history();
        self.exchange_task = Some(tokio::spawn(async move { client.complete(&history).await }));
    }

    /// Resolve the in-flight exchange once its task has finished. Called from
    /// the main loop between draws.
    pub async fn poll_exchange(&mut self) {
        let Some(task) = self.exchange_task.take() else {
            return;
        };
        if !task.is_finished() {
            self.exchange_task = Some(task);
            return;
        }

        // A panicked task counts as a failed exchange like any other.
        let result = match task.await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Format),
        };
        self.finish_exchange(result);
    }

    /// Append the bot placeholder and start revealing either the reply or the
    /// fixed fallback. Errors stop here; they never propagate further.
    pub fn finish_exchange(&mut self, result: Result<String, ChatError>) {
        self.loading = false;
        self.exchange_task = None;
        let id = self.conversation.push_bot_placeholder();
        let text = match result {
            Ok(reply) => reply,
            Err(_) => persona::FALLBACK_REPLY.to_string(),
        };
        self.start_reveal(id, &text);
        self.scroll_chat_to_bottom();
    }

    fn start_reveal(&mut self, message_id: u64, text: &str) {
        let reveal = Reveal::new(message_id, text);
        // Empty reply: nothing to type, the slot stays free.
        if !reveal.is_done() {
            self.reveal = Some(reveal);
        }
    }

    /// Advance animations: one revealed character per tick, plus the
    /// thinking-dots frame while waiting on the API.
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.loading && self.tick_count % DOTS_FRAME_TICKS == 0 {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if let Some(reveal) = &mut self.reveal {
            if reveal.step(&mut self.conversation) {
                self.reveal = None;
            }
            self.scroll_chat_to_bottom();
        }
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    /// Pin the viewport to the newest message, estimating wrapped line counts
    /// the same way the renderer lays them out.
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.conversation.messages() {
            total_lines += 1; // Role + timestamp line
            if msg.text.is_empty() {
                total_lines += 1; // Placeholder still occupies a line
            }
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.loading {
            total_lines += 2; // Role line + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::DEFAULT_MODEL;

    fn keyless_app() -> App {
        // Unroutable base url: any attempted call would fail loudly instead of
        // hitting the real API.
        let client = GeminiClient::new(None, DEFAULT_MODEL).with_base_url("http://127.0.0.1:1");
        App::new(client)
    }

    async fn settle_exchange(app: &mut App) {
        // The spawned task needs the (current-thread) runtime to schedule it.
        for _ in 0..100 {
            tokio::task::yield_now().await;
            app.poll_exchange().await;
            if !app.loading {
                return;
            }
        }
        panic!("exchange never settled");
    }

    fn run_reveal_to_end(app: &mut App) {
        let mut guard = 0;
        while app.is_revealing() {
            app.on_tick();
            guard += 1;
            assert!(guard < 10_000, "reveal never finished");
        }
    }

    #[tokio::test]
    async fn test_submit_appends_exactly_one_user_message() {
        let mut app = keyless_app();
        let before = app.conversation.messages().len();

        app.input = "hello".to_string();
        app.submit();

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), before + 1);
        let last = messages.last().unwrap();
        assert!(!last.is_bot);
        assert_eq!(last.text, "hello");
        assert!(app.loading);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_input() {
        let mut app = keyless_app();
        let before = app.conversation.messages().len();

        app.input = "   \n ".to_string();
        app.submit();

        assert_eq!(app.conversation.messages().len(), before);
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_submit_rejects_while_in_flight() {
        let mut app = keyless_app();
        app.input = "first".to_string();
        app.submit();
        let after_first = app.conversation.messages().len();

        app.input = "second".to_string();
        app.submit();

        assert_eq!(app.conversation.messages().len(), after_first);
        assert_eq!(app.input, "second"); // rejected input is left in place
    }

    #[tokio::test]
    async fn test_submit_trims_input() {
        let mut app = keyless_app();
        app.input = "  hello  ".to_string();
        app.submit();
        assert_eq!(app.conversation.messages().last().unwrap().text, "hello");
    }

    #[tokio::test]
    async fn test_missing_key_reveals_fallback() {
        let mut app = keyless_app();
        app.input = "hello".to_string();
        app.submit();

        settle_exchange(&mut app).await;
        assert!(!app.loading);
        assert!(app.is_revealing());

        run_reveal_to_end(&mut app);

        let last = app.conversation.messages().last().unwrap();
        assert!(last.is_bot);
        assert!(!last.is_typing);
        assert_eq!(last.text, persona::FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_finish_exchange_success_reveals_reply() {
        let mut app = keyless_app();
        app.loading = true;
        app.finish_exchange(Ok("You are not alone.".to_string()));

        assert!(!app.loading);
        run_reveal_to_end(&mut app);
        let last = app.conversation.messages().last().unwrap();
        assert_eq!(last.text, "You are not alone.");
    }

    #[tokio::test]
    async fn test_finish_exchange_empty_reply_skips_reveal() {
        let mut app = keyless_app();
        app.loading = true;
        app.finish_exchange(Ok(String::new()));

        assert!(!app.is_revealing());
        assert!(!app.busy());
        let last = app.conversation.messages().last().unwrap();
        assert!(last.is_bot);
        assert!(last.text.is_empty());
        assert!(!last.is_typing);
    }

    #[tokio::test]
    async fn test_submit_rejected_during_reveal() {
        let mut app = keyless_app();
        app.loading = true;
        app.finish_exchange(Ok("long enough reply".to_string()));
        assert!(app.is_revealing());

        let before = app.conversation.messages().len();
        app.input = "too soon".to_string();
        app.submit();
        assert_eq!(app.conversation.messages().len(), before);

        run_reveal_to_end(&mut app);
        app.submit();
        assert_eq!(app.conversation.messages().len(), before + 1);
    }

    #[tokio::test]
    async fn test_ordering_user_then_placeholder() {
        let mut app = keyless_app();
        app.input = "how do I cope?".to_string();
        app.submit();
        settle_exchange(&mut app).await;
        run_reveal_to_end(&mut app);

        let messages = app.conversation.messages();
        let n = messages.len();
        assert!(!messages[n - 2].is_bot);
        assert!(messages[n - 1].is_bot);
    }
}
