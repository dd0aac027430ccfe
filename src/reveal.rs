use crate::conversation::Conversation;

/// Character-by-character reveal of a fully received reply.
///
/// Holds no timer of its own: the event loop calls [`Reveal::step`] once per
/// tick, and each step appends exactly one character to the target message.
/// The target's `is_typing` flag stays true until the final character lands.
pub struct Reveal {
    message_id: u64,
    chars: Vec<char>,
    pos: usize,
}

impl Reveal {
    pub fn new(message_id: u64, full_text: &str) -> Self {
        Self {
            message_id,
            chars: full_text.chars().collect(),
            pos: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Apply the next character. Returns true once the reveal has completed.
    ///
    /// Empty text completes on the spot without ever marking the message as
    /// typing. A vanished target (never happens in practice; the transcript is
    /// append-only) just ends the reveal.
    pub fn step(&mut self, conversation: &mut Conversation) -> bool {
        let Some(msg) = conversation.get_mut(self.message_id) else {
            self.pos = self.chars.len();
            return true;
        };
        if self.pos >= self.chars.len() {
            msg.is_typing = false;
            return true;
        }
        msg.text.push(self.chars[self.pos]);
        self.pos += 1;
        let done = self.pos >= self.chars.len();
        msg.is_typing = !done;
        done
    }
}
