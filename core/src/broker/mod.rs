//! Stream Broker: ordered, subscribe-before-publish pub/sub of a run's chunks.
//!
//! One channel is created per run (keyed by `run_id`, or any caller-chosen name). The
//! gateway subscribes to a run's channel before the run is dispatched, and the run
//! publishes chunks to it in order as they're produced; the subscriber observes exactly
//! that publish order, with no reordering and no silent drops. [`InMemoryBroker`] is the
//! single-process variant; behind the `redis-broker` feature, [`RedisBroker`] backs the
//! same interface with Redis Streams so a durable workflow worker in a separate process
//! can publish to a channel the gateway subscribes to.
//!
//! A broker has no notion of "terminal chunk" — it only knows how to move values of `T`
//! in order. Callers decide when a run is done (by inspecting the chunks they receive)
//! and call [`Broker::close`] themselves.

mod error;
mod in_memory;
#[cfg(feature = "redis-broker")]
mod redis_broker;

pub use error::BrokerError;
pub use in_memory::InMemoryBroker;
#[cfg(feature = "redis-broker")]
pub use redis_broker::RedisBroker;

use async_trait::async_trait;

/// Ordered, bounded-buffer pub/sub channel.
///
/// Implementations must preserve publish order per channel, must let a subscriber that
/// arrives before the first publish observe every chunk published afterward, and must
/// apply backpressure (block the publisher) rather than drop a chunk when a channel's
/// buffer is full.
#[async_trait]
pub trait Broker<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscriber handle returned by [`Broker::subscribe`].
    type Subscription: BrokerSubscription<T>;

    /// Subscribes to `channel`, creating it if it doesn't exist yet.
    ///
    /// Must be called before the first [`Broker::publish`] of a run to guarantee the
    /// subscriber observes every chunk. Only one subscriber is supported per channel;
    /// a second `subscribe` on the same name returns [`BrokerError::AlreadySubscribed`].
    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, BrokerError>;

    /// Appends `chunk` to `channel`, blocking the caller while the channel's buffer is full.
    async fn publish(&self, channel: &str, chunk: T) -> Result<(), BrokerError>;

    /// Closes `channel`. Chunks already published before the call are still delivered;
    /// no chunk published afterward is, and the subscriber's receive end reports closed
    /// once the buffer drains.
    async fn close(&self, channel: &str) -> Result<(), BrokerError>;
}

/// A live subscription returned by [`Broker::subscribe`].
#[async_trait]
pub trait BrokerSubscription<T>: Send
where
    T: Clone + Send + Sync + 'static,
{
    /// Awaits the next chunk, or `None` once the channel is closed and drained.
    async fn recv(&mut self) -> Option<T>;
}
