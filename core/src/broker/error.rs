//! Broker-related errors.

use thiserror::Error;

/// Errors that can occur when publishing, subscribing to, or closing a broker channel.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// `publish`/`subscribe` called on a channel that was already closed.
    #[error("channel {0} is closed")]
    ChannelClosed(String),

    /// `subscribe` called on a channel that already has an active subscriber.
    ///
    /// Each channel is single-subscriber: a run's chunks have exactly one consumer
    /// (the gateway handler streaming the response), so a second subscribe on the same
    /// channel name is almost always a caller bug rather than a legitimate fan-out.
    #[error("channel {0} already has a subscriber")]
    AlreadySubscribed(String),

    /// Transport-level failure (e.g. Redis connection error).
    #[error("broker transport error: {0}")]
    Transport(String),
}
