//! Channels: per-field state merge semantics for graph nodes.
//!
//! A [`Channel`] wraps one piece of state and defines how concurrent writes
//! from parallel branches combine; [`StateUpdater`] does the same job at the
//! level of a whole state struct (used by [`crate::graph::StateGraph::with_state_updater`]).

mod ephemeral_value;
mod error;
mod named_barrier;
mod updater;

pub use ephemeral_value::EphemeralValue;
pub use error::ChannelError;
pub use named_barrier::{NamedBarrierUpdate, NamedBarrierValue};
pub use updater::{boxed_updater, BoxedStateUpdater, FieldBasedUpdater, ReplaceUpdater, StateUpdater};

/// A mergeable slot of state, independent of the state struct as a whole.
///
/// `T` is the value a read returns (for [`NamedBarrierValue`] this is `()`,
/// since the channel only signals completion, not a payload).
pub trait Channel<T>: Send + Sync {
    /// Current value, if the channel has one to offer.
    fn read(&self) -> Option<T>;

    /// Overwrites the channel's value outright.
    fn write(&mut self, value: T);

    /// Merges a batch of concurrent writes (e.g. from parallel branches).
    fn update(&mut self, updates: Vec<T>) -> Result<(), ChannelError>;

    /// Name used in logs/visualisation; not load-bearing for correctness.
    fn channel_type(&self) -> &'static str;
}
