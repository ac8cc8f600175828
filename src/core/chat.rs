//! # Chat Data Model
//!
//! Messages, participants, and the owned conversation log.
//!
//! The log is an ordered sequence (oldest first) that also carries a
//! precomputed `first_in_group` annotation per message: a message starts a
//! group when its sender differs from the previous message's sender.
//! Renderers consume the annotation instead of peeking at `index - 1`, so
//! grouping stays correct no matter how the list is traversed.

use chrono::{DateTime, Utc};

use crate::platform::picker::SelectedAsset;

/// Author metadata attached to each message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub uid: String,
    pub display_name: String,
    pub thumb_url: String,
    pub photo_url: String,
    pub status_msg: String,
}

impl Participant {
    pub fn new(uid: &str, display_name: &str) -> Self {
        Self {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
            thumb_url: String::new(),
            photo_url: String::new(),
            status_msg: String::new(),
        }
    }

    /// The participant representing this screen's user.
    pub fn local(display_name: &str, status_msg: &str) -> Self {
        Self {
            uid: "local".to_string(),
            display_name: display_name.to_string(),
            thumb_url: String::new(),
            photo_url: String::new(),
            status_msg: status_msg.to_string(),
        }
    }
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Empty for seeded entries (no identity was ever assigned to them);
    /// a generated UUID for messages sent from the composer.
    pub id: String,
    pub sender: Participant,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub attachment: Option<SelectedAsset>,
}

impl ChatMessage {
    /// A seeded entry: no id, no attachment.
    fn seeded(sender: Participant, body: &str) -> Self {
        Self {
            id: String::new(),
            sender,
            body: body.to_string(),
            sent_at: Utc::now(),
            attachment: None,
        }
    }

    /// A message drafted locally, about to be appended to the log.
    pub fn outgoing(sender: Participant, body: String, attachment: Option<SelectedAsset>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            body,
            sent_at: Utc::now(),
            attachment,
        }
    }
}

/// The four entries every fresh screen starts with, in display order.
pub fn seed_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::seeded(Participant::new("0", "sender111"), "hello1"),
        ChatMessage::seeded(
            Participant::new("2", "sender111"),
            "Hello2. This is long message. This is long message.This is long message.\
             This is long message. This is long message. This is long message.\
             This is long message. This is long message.\
             This is long message. This is long message. This is long message.",
        ),
        ChatMessage::seeded(Participant::new("0", "sender111"), "hello"),
        ChatMessage::seeded(Participant::new("0", "sender111"), "hello2"),
    ]
}

/// Owned, ordered conversation log with grouping annotations.
///
/// Invariant: `first_in_group.len() == messages.len()`, and index 0 (when
/// present) is always a group start.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    first_in_group: Vec<bool>,
}

impl ChatLog {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        let mut log = Self {
            messages,
            first_in_group: Vec::new(),
        };
        log.rebuild_groups();
        log
    }

    /// A log holding the hardcoded seed entries.
    pub fn seeded() -> Self {
        Self::new(seed_messages())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&ChatMessage> {
        self.messages.get(index)
    }

    /// Whether the message at `index` starts a new sender group.
    /// Out-of-range indices report `true` (a lone message is its own group).
    pub fn is_first_in_group(&self, index: usize) -> bool {
        self.first_in_group.get(index).copied().unwrap_or(true)
    }

    /// Append a message and extend the grouping annotations for it.
    pub fn push(&mut self, message: ChatMessage) {
        let starts_group = match self.messages.last() {
            Some(prev) => prev.sender.uid != message.sender.uid,
            None => true,
        };
        self.messages.push(message);
        self.first_in_group.push(starts_group);
    }

    /// Iterate messages paired with their grouping annotation.
    pub fn entries(&self) -> impl Iterator<Item = (&ChatMessage, bool)> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m, self.is_first_in_group(i)))
    }

    fn rebuild_groups(&mut self) {
        self.first_in_group = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| match i {
                0 => true,
                _ => self.messages[i - 1].sender.uid != m.sender.uid,
            })
            .collect();
    }
}
