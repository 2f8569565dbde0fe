//! Back-office message inbox.
//!
//! Customer messages the admin reads, flags and answers. The inbox is local
//! state seeded with the shop's sample messages; replies are returned to the
//! caller for delivery.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Numeric message id.
pub type MessageId = u32;

/// Errors raised by inbox operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InboxError {
    #[error("message {0} not found")]
    NotFound(MessageId),

    #[error("reply cannot be empty")]
    EmptyReply,
}

/// A customer message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: String,
    pub email: String,
    pub subject: String,
    pub content: String,
    pub date: NaiveDate,
    pub read: bool,
}

/// An answer ready to be sent back to a message's sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message_id: MessageId,
    pub to: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Messages in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Vec<Message>,
}

impl Inbox {
    /// Create an empty inbox.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// The sample inbox the back-office ships with.
    #[must_use]
    pub fn seeded() -> Self {
        let seed = [
            (1, "John Doe", "john@example.com", "Order Help", "Hi, I need help with my order.", (2025, 9, 20), false),
            (2, "Jane Smith", "jane@example.com", "Address Change", "Can I change my delivery address?", (2025, 9, 21), true),
            (3, "Bob Johnson", "bob@example.com", "Feedback", "Great service, thanks!", (2025, 9, 22), false),
        ];

        let messages = seed
            .into_iter()
            .filter_map(|(id, sender, email, subject, content, (y, m, d), read)| {
                Some(Message {
                    id,
                    sender: sender.to_owned(),
                    email: email.to_owned(),
                    subject: subject.to_owned(),
                    content: content.to_owned(),
                    date: NaiveDate::from_ymd_opt(y, m, d)?,
                    read,
                })
            })
            .collect();

        Self { messages }
    }

    /// All messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message with `id`, if present.
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of unread messages.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }

    /// Flip the read flag of message `id` and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `InboxError::NotFound` if no such message exists.
    pub fn toggle_read(&mut self, id: MessageId) -> Result<bool, InboxError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(InboxError::NotFound(id))?;
        message.read = !message.read;
        debug!(message_id = id, read = message.read, "message read flag toggled");
        Ok(message.read)
    }

    /// Remove message `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        let removed = self.messages.len() != before;
        if removed {
            info!(message_id = id, "message deleted");
        }
        removed
    }

    /// Compose a reply to message `id`.
    ///
    /// # Errors
    ///
    /// Returns `InboxError::EmptyReply` for a blank body and
    /// `InboxError::NotFound` for an unknown message.
    pub fn reply(&self, id: MessageId, body: &str) -> Result<Reply, InboxError> {
        if body.trim().is_empty() {
            return Err(InboxError::EmptyReply);
        }
        let message = self.get(id).ok_or(InboxError::NotFound(id))?;

        info!(message_id = id, to = %message.email, "reply composed");
        Ok(Reply {
            message_id: id,
            to: message.sender.clone(),
            email: message.email.clone(),
            subject: format!("Re: {}", message.subject),
            body: body.to_owned(),
        })
    }
}
