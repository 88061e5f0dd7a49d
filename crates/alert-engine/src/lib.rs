//! Market-alert prioritization engine.
//!
//! Three pure stages run in sequence: rule extraction over quote snapshots,
//! watchlist partition with per-category selection, and a stable priority
//! sort. No I/O, no shared state; every call is independent.

pub mod engine;
pub mod priority;
pub mod rules;
pub mod selector;

#[cfg(test)]
mod engine_tests;

pub use engine::{AlertConfig, AlertEngine};
pub use priority::sort_by_priority;
pub use rules::generate_alerts;
pub use selector::select_prioritized;
