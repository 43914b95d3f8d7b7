//! Conversation state for a single session.
//!
//! A [`Conversation`] is an append-only log of role-tagged messages. Its
//! serialized form (one JSON record per line, in arrival order) is exactly the
//! text sent to the model, so entries are never reordered, merged or trimmed.
//! Growth is unbounded for the lifetime of the session.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation log. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The structured record for this message, e.g. `{"role":"user","content":"hi"}`.
    pub fn record(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Ordered log of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end of the log.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Newline-joined records of every message, in arrival order.
    pub fn serialize(&self) -> Result<String> {
        let records = self
            .messages
            .iter()
            .map(Message::record)
            .collect::<Result<Vec<_>>>()?;
        Ok(records.join("\n"))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The user-editable system instruction. Overwritten on every edit, no history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
