use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of turns a context retains.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Role of a participant in a rendered transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One user message and the model's reply to it.
///
/// `ai_response` stays empty until the reply is written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_message: String,
    #[serde(default)]
    pub ai_response: String,
}

impl ConversationTurn {
    /// Both sides of the exchange are present.
    pub fn is_complete(&self) -> bool {
        !self.user_message.is_empty() && !self.ai_response.is_empty()
    }
}

/// Bounded, insertion-ordered turn history.
///
/// Holds at most `window_size` turns; when a new turn pushes it over, the
/// oldest turns are dropped first. Eviction is purely positional, so context
/// older than the window is lost regardless of relevance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContextRecord")]
pub struct ConversationContext {
    window_size: usize,
    turns: VecDeque<ConversationTurn>,
}

/// Unchecked wire form; every deserialized context passes through
/// [`ConversationContext::with_window`] and the window bound.
#[derive(Deserialize)]
struct ContextRecord {
    window_size: usize,
    #[serde(default)]
    turns: Vec<ConversationTurn>,
}

impl TryFrom<ContextRecord> for ConversationContext {
    type Error = CoreError;

    fn try_from(record: ContextRecord) -> Result<Self, Self::Error> {
        let mut context = Self::with_window(record.window_size)?;
        if record.turns.len() > record.window_size {
            return Err(CoreError::WindowOverflow {
                turns: record.turns.len(),
                window_size: record.window_size,
            });
        }
        context.turns.extend(record.turns);
        Ok(context)
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            turns: VecDeque::with_capacity(DEFAULT_WINDOW_SIZE + 1),
        }
    }

    pub fn with_window(window_size: usize) -> Result<Self, CoreError> {
        if window_size == 0 {
            return Err(CoreError::InvalidWindowSize(window_size));
        }
        Ok(Self {
            window_size,
            turns: VecDeque::with_capacity(window_size + 1),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in insertion order, oldest first.
    pub fn turns(&self) -> impl ExactSizeIterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    /// Append a turn, evicting from the front until the window fits.
    pub fn add_message(&mut self, user_message: impl Into<String>, ai_response: impl Into<String>) {
        self.turns.push_back(ConversationTurn {
            user_message: user_message.into(),
            ai_response: ai_response.into(),
        });
        while self.turns.len() > self.window_size {
            self.turns.pop_front();
        }
    }

    /// Append a turn whose reply is not known yet.
    pub fn add_pending(&mut self, user_message: impl Into<String>) {
        self.add_message(user_message, String::new());
    }

    /// Overwrite the reply of the most recent turn. Earlier turns are never
    /// touched.
    pub fn update_last_response(&mut self, ai_response: impl Into<String>) -> Result<(), CoreError> {
        let last = self.turns.back_mut().ok_or(CoreError::EmptyContext)?;
        last.ai_response = ai_response.into();
        Ok(())
    }

    /// Complete turns in insertion order, optionally leaving out the most
    /// recent (in-flight) one.
    pub fn complete_turns(&self, exclude_current: bool) -> impl Iterator<Item = &ConversationTurn> {
        let take = if exclude_current {
            self.turns.len().saturating_sub(1)
        } else {
            self.turns.len()
        };
        self.turns
            .iter()
            .take(take)
            .filter(|turn| turn.is_complete())
    }

    /// Role-tagged transcript of the complete turns.
    ///
    /// Each turn renders as a ChatML user block followed by an assistant
    /// block. Incomplete turns are skipped.
    pub fn render_history(&self, exclude_current: bool) -> String {
        let mut history = String::new();
        for turn in self.complete_turns(exclude_current) {
            push_block(&mut history, ChatRole::User, &turn.user_message);
            push_block(&mut history, ChatRole::Assistant, &turn.ai_response);
        }
        history
    }
}

/// Append one `<|im_start|>role ... <|im_end|>` block.
pub fn push_block(out: &mut String, role: ChatRole, content: &str) {
    out.push_str("<|im_start|>");
    out.push_str(role.as_str());
    out.push('\n');
    out.push_str(content);
    out.push_str("<|im_end|>\n");
}
