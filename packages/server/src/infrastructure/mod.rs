//! Infrastructure layer
//!
//! Domain 層が定義する trait の具体的な実装と、ワイヤーフォーマット（DTO）を提供します。

pub mod broadcast_bus;
pub mod dto;
pub mod repository;
