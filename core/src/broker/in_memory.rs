//! Single-process broker backed by a bounded `mpsc` channel per run.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Broker, BrokerError, BrokerSubscription};

struct ChannelEntry<T> {
    tx: mpsc::Sender<T>,
    rx: Option<mpsc::Receiver<T>>,
    closed: bool,
}

impl<T> ChannelEntry<T> {
    fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Some(rx),
            closed: false,
        }
    }
}

/// In-memory [`Broker`]: safe for the inline runtime within one process.
///
/// Each channel is a bounded `mpsc` queue created lazily on first `subscribe` or
/// `publish`, whichever comes first, so publishers and subscribers can arrive in either
/// order without losing chunks. A full channel blocks the publisher (`send` awaits free
/// capacity) rather than dropping the oldest chunk.
pub struct InMemoryBroker<T> {
    channels: Mutex<HashMap<String, ChannelEntry<T>>>,
    capacity: usize,
}

/// Default per-channel buffer size.
const DEFAULT_CAPACITY: usize = 256;

impl<T> InMemoryBroker<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }
}

impl<T> Default for InMemoryBroker<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription handle for [`InMemoryBroker`].
pub struct InMemoryBrokerSubscription<T> {
    rx: mpsc::Receiver<T>,
}

#[async_trait]
impl<T> BrokerSubscription<T> for InMemoryBrokerSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

#[async_trait]
impl<T> Broker<T> for InMemoryBroker<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Subscription = InMemoryBrokerSubscription<T>;

    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, BrokerError> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let entry = channels
            .entry(channel.to_string())
            .or_insert_with(|| ChannelEntry::new(self.capacity));
        let rx = entry
            .rx
            .take()
            .ok_or_else(|| BrokerError::AlreadySubscribed(channel.to_string()))?;
        Ok(InMemoryBrokerSubscription { rx })
    }

    async fn publish(&self, channel: &str, chunk: T) -> Result<(), BrokerError> {
        let tx = {
            let mut channels = self
                .channels
                .lock()
                .map_err(|e| BrokerError::Transport(e.to_string()))?;
            let entry = channels
                .entry(channel.to_string())
                .or_insert_with(|| ChannelEntry::new(self.capacity));
            if entry.closed {
                return Err(BrokerError::ChannelClosed(channel.to_string()));
            }
            entry.tx.clone()
        };
        tx.send(chunk)
            .await
            .map_err(|_| BrokerError::ChannelClosed(channel.to_string()))
    }

    async fn close(&self, channel: &str) -> Result<(), BrokerError> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        if let Some(entry) = channels.get_mut(channel) {
            entry.closed = true;
            // Drop our own sender clone (replacing it with one whose receiver is
            // already gone) so the last reference to the subscriber's tx disappears
            // once any in-flight publish finishes; the subscriber's `recv` then
            // returns `None` after draining whatever was already buffered.
            let (dead_tx, _dead_rx) = mpsc::channel(1);
            entry.tx = dead_tx;
        }
        Ok(())
    }
}
