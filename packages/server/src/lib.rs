//! Real-time group messaging and notification gateway.
//!
//! This library upgrades clients to WebSocket connections, organizes them
//! into named groups (chat rooms and per-user notification channels) and fans
//! events out to every live connection in a group.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
