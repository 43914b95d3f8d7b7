//! Per-session state and the question-answer turn.
//!
//! A [`Session`] exclusively owns the conversation log and the system
//! instruction. An [`Assistant`] runs one turn against it: record the question,
//! extract the upload, bind a model (cached or not), stream the answer and
//! record it.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod turn;

pub use turn::{Assistant, TurnOutcome};

use crate::conversation::{Conversation, Role, SystemPrompt};

/// State of one interactive session. Dropped when the session ends.
#[derive(Debug, Clone, Default)]
pub struct Session {
    conversation: Conversation,
    system_prompt: SystemPrompt,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(text: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            system_prompt: SystemPrompt::new(text),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn system_prompt(&self) -> &SystemPrompt {
        &self.system_prompt
    }

    /// Overwrite the system instruction used from the next turn on.
    pub fn set_system_prompt(&mut self, text: impl Into<String>) {
        self.system_prompt.set(text);
    }

    pub(crate) fn record(&mut self, role: Role, content: impl Into<String>) {
        self.conversation.append(role, content);
    }
}
