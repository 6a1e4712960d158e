//! Event system for the task handler
//!
//! This crate provides the event bus and event types used to observe
//! pipeline progress and callback outcomes.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
