//! Data Transfer Objects (DTOs) for the gateway.
//!
//! DTOs are organized by purpose:
//! - `websocket`: WebSocket frame DTOs (wire contract with clients)
//! - `fixture`: directory seed file DTOs
//! - `conversion`: rendering of domain events into outbound frames

pub mod conversion;
pub mod fixture;
pub mod websocket;
