//! 外部コラボレーターの trait 定義
//!
//! 認証情報の解決・メンバーシップ確認・メッセージ永続化はゲートウェイの外側の責務です。
//! ここではその境界となるインターフェースだけを定義します（依存性の逆転）。

use async_trait::async_trait;

use super::{CollaboratorError, Identity, MessageText, RoomName, StoreError, Token};

/// トークンから Identity を解決する
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// 解決できないトークンの場合は `Ok(None)`
    async fn resolve(&self, token: &Token) -> Result<Option<Identity>, CollaboratorError>;
}

/// Identity がルーム（circle）のメンバーかどうかを確認する
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipChecker: Send + Sync {
    /// 存在しないルームの場合は `Ok(false)`
    async fn is_member(
        &self,
        identity: &Identity,
        room: &RoomName,
    ) -> Result<bool, CollaboratorError>;
}

/// チャットメッセージの永続化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append(
        &self,
        sender: &Identity,
        text: &MessageText,
        room: &RoomName,
    ) -> Result<(), StoreError>;
}
