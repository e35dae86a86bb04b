//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{BusError, CollaboratorError, StoreError};

/// 接続処理のエラー
///
/// どの種類もクライアントには close code 1008 としてのみ伝わり、理由はサーバー側のログにだけ残します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("authorization failed: {0}")]
    AuthorizationFailure(String),

    #[error("collaborator unavailable: {0}")]
    Unavailable(#[from] CollaboratorError),

    #[error("registration failed: {0}")]
    Registration(#[from] BusError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message could not be stored: {0}")]
    PersistenceFailed(#[from] StoreError),

    #[error("session is not bound to a room")]
    NotARoom,
}
