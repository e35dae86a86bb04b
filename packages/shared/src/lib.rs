//! Shared utilities for the Huddle gateway packages.

pub mod logger;
pub mod time;
