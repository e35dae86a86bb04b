//! Domain errors

use thiserror::Error;

/// Value Object の生成時エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("query string does not carry a token")]
    MissingToken,

    #[error("token must not be empty")]
    EmptyToken,
}

/// 外部コラボレーター（認証情報の解決・メンバーシップ確認）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Message Store のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    #[error("message store capacity exceeded (max: {0})")]
    CapacityExceeded(usize),
}

/// Broadcast Bus のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("connection '{0}' is already attached")]
    AlreadyAttached(String),

    #[error("connection '{0}' is not attached")]
    NotAttached(String),
}
