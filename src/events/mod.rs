//! Analysis event module
//!
//! The worker reports lifecycle and progress to the consuming layer over a
//! bounded channel instead of sharing mutable state with it.

pub mod bus;

pub use bus::{AnalysisEvent, EventBus, EVENT_CHANNEL_CAPACITY, TERMINAL_EVENT_RESERVE};
