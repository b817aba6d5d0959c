use chrono::{DateTime, Utc};

use prochat_types::{Message, MessageId, Session};

/// Hands out millisecond-timestamp ids, bumping past the previous id when
/// two sends land in the same tick (or the clock steps back).
#[derive(Debug, Default, Clone)]
pub struct MessageIds {
    last: Option<MessageId>,
}

impl MessageIds {
    pub fn next(&mut self, now: DateTime<Utc>) -> MessageId {
        let candidate = now.timestamp_millis();
        let id = match self.last {
            Some(last) if candidate <= last => last + 1,
            _ => candidate,
        };
        self.last = Some(id);
        id
    }
}

/// Ordered, append-only list of the current session's messages.
#[derive(Debug, Default)]
pub struct Feed {
    messages: Vec<Message>,
    ids: MessageIds,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` as authored by `author` at `now`.
    pub fn push(&mut self, text: &str, author: &Session, now: DateTime<Utc>) -> &Message {
        let id = self.ids.next(now);
        self.messages.push(Message {
            id,
            text: text.to_string(),
            timestamp: now,
            user_id: author.uid.clone(),
            display_username: author.display_name.clone(),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Full history in insertion order. Cheap to call again on every render.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
