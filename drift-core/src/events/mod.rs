//! Repository-scoped event plumbing.
//!
//! No global emitter: each pattern repository owns one `EventBus`, and
//! handlers subscribe with a stable token they can later unsubscribe with.

pub mod bus;
pub mod types;

pub use bus::{EventBus, SubscriptionToken};
pub use types::PatternEvent;
