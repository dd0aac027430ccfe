use chrono::Local;

use crate::persona;

/// Maximum number of conversation messages sent as request context.
pub const HISTORY_LIMIT: usize = 10;

/// Gemini role for one turn of request history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// A chat message. `text` and `is_typing` are mutated in place by the reveal
/// animator while a bot reply is being typed out; otherwise a message is
/// frozen once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: String,
    pub is_typing: bool,
}

/// Ordered, append-only chat transcript for the session.
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        let mut conversation = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        conversation.push(persona::GREETING.to_string(), true);
        conversation
    }

    fn push(&mut self, text: String, is_bot: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text,
            is_bot,
            timestamp: Local::now().format("%H:%M").to_string(),
            is_typing: false,
        });
        id
    }

    pub fn push_user(&mut self, text: &str) -> u64 {
        self.push(text.to_string(), false)
    }

    /// Append an empty bot message for the reveal animator to fill.
    pub fn push_bot_placeholder(&mut self) -> u64 {
        self.push(String::new(), true)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Last `HISTORY_LIMIT` messages oldest-first, mapped to Gemini roles.
    /// Whitespace-only texts are dropped after the window is taken, so the
    /// window never grows to compensate.
    pub fn recent_history(&self) -> Vec<Turn> {
        let start = self.messages.len().saturating_sub(HISTORY_LIMIT);
        self.messages[start..]
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| Turn {
                role: if m.is_bot { Role::Model } else { Role::User },
                text: m.text.clone(),
            })
            .collect()
    }
}
