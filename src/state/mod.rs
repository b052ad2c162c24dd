// ABOUTME: State and property containers backing every view instance
// ABOUTME: Exports the observable key-value store and the read-only properties store

pub mod props;
pub mod store;

pub use props::Props;
pub use store::{State, SubscriptionId, WeakState};
