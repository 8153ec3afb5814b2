//! Redis Streams-backed broker: durable variant for cross-process publish/subscribe.
//!
//! The channel name is the stream key on the caller-supplied Redis database. Publishers
//! `XADD`; subscribers `XREAD BLOCK` from the last-delivered id, so a subscriber that
//! reconnects after a crash resumes from where it left off rather than replaying or
//! skipping. A TTL is applied to each stream (refreshed on every publish) so an
//! abandoned run's storage is eventually reclaimed.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Broker, BrokerError, BrokerSubscription};

const DATA_FIELD: &str = "data";
const BLOCK_MILLIS: usize = 5_000;

/// [`Broker`] backed by Redis Streams.
///
/// `T` must round-trip through JSON (`Serialize + DeserializeOwned`): each chunk is
/// stored as a single `data` field on the stream entry.
pub struct RedisBroker<T> {
    conn: ConnectionManager,
    ttl: Duration,
    _marker: PhantomData<T>,
}

impl<T> RedisBroker<T> {
    /// Wraps an existing connection manager. `ttl` is applied to a channel's stream
    /// key on every publish (e.g. one hour, per the channel being a single run).
    pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            ttl,
            _marker: PhantomData,
        }
    }
}

/// Subscription handle for [`RedisBroker`]: polls `XREAD BLOCK` from the last id seen.
pub struct RedisBrokerSubscription<T> {
    conn: ConnectionManager,
    channel: String,
    last_id: String,
    closed: bool,
    _marker: PhantomData<T>,
}

#[async_trait]
impl<T> BrokerSubscription<T> for RedisBrokerSubscription<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn recv(&mut self) -> Option<T> {
        if self.closed {
            return None;
        }
        loop {
            let reply: Option<redis::streams::StreamReadReply> = self
                .conn
                .xread_options(
                    &[&self.channel],
                    &[&self.last_id],
                    &redis::streams::StreamReadOptions::default().block(BLOCK_MILLIS),
                )
                .await
                .ok();
            let Some(reply) = reply else {
                self.closed = true;
                return None;
            };
            for key in reply.keys {
                for id in key.ids {
                    self.last_id = id.id.clone();
                    if let Some(redis::Value::BulkString(bytes)) = id.map.get(DATA_FIELD) {
                        if let Ok(value) = serde_json::from_slice::<T>(bytes) {
                            return Some(value);
                        }
                    }
                }
            }
            // Block timed out with nothing new; loop and block again. A real deployment
            // pairs this with a deadline/cancellation token at the call site.
        }
    }
}

#[async_trait]
impl<T> Broker<T> for RedisBroker<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Subscription = RedisBrokerSubscription<T>;

    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, BrokerError> {
        Ok(RedisBrokerSubscription {
            conn: self.conn.clone(),
            channel: channel.to_string(),
            last_id: "0".to_string(),
            closed: false,
            _marker: PhantomData,
        })
    }

    async fn publish(&self, channel: &str, chunk: T) -> Result<(), BrokerError> {
        let payload = serde_json::to_vec(&chunk)
            .map_err(|e| BrokerError::Transport(format!("serialize chunk: {e}")))?;
        let mut conn = self.conn.clone();
        let _: String = conn
            .xadd(channel, "*", &[(DATA_FIELD, payload)])
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let _: () = conn
            .expire(channel, self.ttl.as_secs() as i64)
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn close(&self, channel: &str) -> Result<(), BrokerError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(channel)
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        Ok(())
    }
}
