use crate::errors::{StoreError, VitaliError, VitaliResult};
use crate::models::{Account, ChannelMessage, IdSource};
use crate::storage::MessageRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_CHANNEL: &str = "GLOBAL-01";
pub const CHANNEL_CAP: usize = 100;

/// The shared message log. Every account sees every channel.
pub struct ChannelLog {
    repo: Arc<dyn MessageRepository>,
    messages: Vec<ChannelMessage>,
    cap: usize,
}

impl ChannelLog {
    pub async fn open(repo: Arc<dyn MessageRepository>) -> Result<Self, StoreError> {
        Self::open_with_cap(repo, CHANNEL_CAP).await
    }

    pub async fn open_with_cap(repo: Arc<dyn MessageRepository>, cap: usize) -> Result<Self, StoreError> {
        let messages = repo.load_messages().await?.unwrap_or_default();
        Ok(Self { repo, messages, cap })
    }

    pub fn all(&self) -> &[ChannelMessage] {
        &self.messages
    }

    /// Exact match on the channel code.
    pub fn filter(&self, code: &str) -> Vec<ChannelMessage> {
        self.messages
            .iter()
            .filter(|message| message.code == code)
            .cloned()
            .collect()
    }

    pub async fn send(
        &mut self,
        ids: &IdSource,
        sender: &Account,
        text: &str,
        code: &str,
    ) -> VitaliResult<ChannelMessage> {
        if text.trim().is_empty() {
            return Err(VitaliError::missing("text"));
        }
        let message = ChannelMessage {
            id: ids.next_id(),
            sender_id: sender.id.clone(),
            sender_name: sender.name.clone(),
            text: text.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            code: code.to_string(),
        };

        let mut next = self.messages.clone();
        next.push(message.clone());
        if next.len() > self.cap {
            let excess = next.len() - self.cap;
            next.drain(..excess);
        }
        self.repo.save_messages(&next).await?;
        self.messages = next;
        debug!(code, sender = %sender.id, "channel message sent");
        Ok(message)
    }
}
