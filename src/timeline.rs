//! Conversation timeline
//!
//! Ordered log of chat entries. The log only grows, with one exception:
//! a transient placeholder may be retracted once the result it stands in
//! for has arrived.

use crate::content::{self, Rendered};
use crate::ui_text;
use serde::Serialize;
use std::fmt;

/// Identifier of one timeline entry. Never reused within a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Chat speaker role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    /// Raw text as produced by the user or the service
    pub content: String,
    /// `content` run through the formatter
    pub rendered: Rendered,
    /// Placeholder awaiting a result; drawn with a spinner
    pub transient: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<Message>,
    next_id: u64,
    /// Bumped on every mutation. The presentation layer scrolls to the
    /// latest entry whenever it changes.
    revision: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished entry and return its id
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> MessageId {
        self.push(role, content.into(), false)
    }

    /// Append the "thinking" placeholder. Callers keep at most one per
    /// outstanding request; the timeline does not enforce it.
    pub fn append_transient(&mut self, role: Role) -> MessageId {
        self.push(role, ui_text::THINKING.to_string(), true)
    }

    /// Remove a transient entry. Unknown ids and finished entries are left
    /// alone, so a late retraction is harmless. Returns whether anything was
    /// removed.
    pub fn retract(&mut self, id: MessageId) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|m| m.id == id && m.transient)
        else {
            return false;
        };
        self.entries.remove(index);
        self.revision += 1;
        true
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn transient_count(&self) -> usize {
        self.entries.iter().filter(|m| m.transient).count()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, role: Role, content: String, transient: bool) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.entries.push(Message {
            id,
            role,
            rendered: content::format(&content),
            content,
            transient,
        });
        self.revision += 1;
        id
    }
}
