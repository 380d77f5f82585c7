pub mod backend;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::content::{parse_assistant_message, Segment};

pub use backend::*;

/// Instructions sent ahead of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert SQL assistant. Your task is to generate SQL queries based on user requests. Follow these strict formatting guidelines:

You should create a SQLite query based on natural language.
Use the \"getFromDB\" tool to get data from a database.

- Always enclose field names and table names in double quotes (\"), even if they contain no special characters.
- Ensure proper SQL syntax and use best practices for readability.
- Maintain consistency in capitalization (e.g., SQL keywords in uppercase).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Avatar label shown next to the message bubble.
    pub fn avatar(self) -> &'static str {
        match self {
            Role::System => "SYS",
            Role::User => "Me",
            Role::Assistant => "AI",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Local::now(),
        }
    }

    /// Display segments for this message. Only assistant replies go through
    /// the SQL pipeline; everything else is shown verbatim.
    pub fn segments(&self) -> Vec<Segment> {
        match self.role {
            Role::Assistant => parse_assistant_message(&self.content),
            Role::System | Role::User => vec![Segment::plain(self.content.clone())],
        }
    }

    pub fn time_label(&self) -> String {
        self.sent_at.format("%H:%M").to_string()
    }
}

/// Append-only conversation log.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: &str) -> Self {
        let mut log = Self::new();
        if !prompt.trim().is_empty() {
            log.messages.push(ChatMessage::new(Role::System, prompt.trim()));
        }
        log
    }

    /// Appends a user message. Blank input is rejected and returns `None`.
    pub fn push_user(&mut self, content: &str) -> Option<&ChatMessage> {
        if content.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::new(Role::User, content));
        self.messages.last()
    }

    pub fn push_assistant(&mut self, content: &str) -> &ChatMessage {
        self.messages.push(ChatMessage::new(Role::Assistant, content));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages shown in the transcript (system instructions are hidden).
    pub fn visible(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|message| message.role != Role::System)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod chat_tests;
