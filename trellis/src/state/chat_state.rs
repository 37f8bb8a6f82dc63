//! Chat-shaped state: a message list plus a merge combinator.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// State a conversation graph reads and rewrites as it executes.
///
/// The engine treats state as a value: every layer starts from a clone, and
/// the store is the only holder between layers, so `Clone` must be deep
/// (owned `Vec`s and `String`s are).
///
/// `merge` is the user hook for folding a node's delta into the prior state.
/// It must be associative; the expected shape concatenates `messages` and
/// keeps the first non-empty value for scalar fields, so that
/// `merge(s, Default::default()) == s`.
///
/// **Interaction**: Implemented by application state structs; required by the
/// chatbot loop, which appends user input and tool results to `messages`.
pub trait ChatState: Clone + Send + Sync + 'static {
    /// The conversation so far, oldest first.
    fn messages(&self) -> &[Message];

    /// Mutable access for appending (the engine itself only appends).
    fn messages_mut(&mut self) -> &mut Vec<Message>;

    /// Folds `b` into `a`, producing the combined state.
    fn merge(a: Self, b: Self) -> Self;
}

/// The minimal chat state: a message list and nothing else.
///
/// Applications with extra fields define their own state struct and
/// implement [`ChatState`]; this type covers examples and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesState {
    pub messages: Vec<Message>,
}

impl MessagesState {
    /// Creates a state holding the given messages.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Returns a copy of this state with one message appended.
    pub fn append(&self, message: Message) -> Self {
        let mut messages = self.messages.clone();
        messages.push(message);
        Self { messages }
    }
}

impl ChatState for MessagesState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    fn merge(a: Self, b: Self) -> Self {
        let mut messages = a.messages;
        messages.extend(b.messages);
        Self { messages }
    }
}
