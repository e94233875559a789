//! In-process push delivery
//!
//! Fans diffs out over one tokio broadcast channel per collection id.
//! Subscribers may join or leave at any time; a subscriber joining
//! mid-mutation only ever sees diffs published after its `subscribe` call.
//! A lagging subscriber loses old messages instead of blocking the sender.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::domain::{DomainError, PushDelivery};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub struct ChannelDelivery {
    channels: DashMap<String, broadcast::Sender<serde_json::Value>>,
    capacity: usize,
}

impl ChannelDelivery {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Join the channel for one collection.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<serde_json::Value> {
        self.sender(channel).subscribe()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<serde_json::Value> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for ChannelDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushDelivery for ChannelDelivery {
    async fn publish(
        &self,
        channel: &str,
        payload: serde_json::Value,
    ) -> Result<(), DomainError> {
        // send only errors when nobody is subscribed, which is fine for a
        // fire-and-forget notification
        if self.sender(channel).send(payload).is_err() {
            tracing::debug!("no subscribers on channel {}", channel);
        }
        Ok(())
    }
}
