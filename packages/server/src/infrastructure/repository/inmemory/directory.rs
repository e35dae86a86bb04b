//! InMemory ディレクトリ（認証情報 + circle メンバーシップ）
//!
//! `CredentialResolver` と `MembershipChecker` の両方を実装します。
//! 起動時に JSON の fixture ファイルから読み込むこともできます。

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
    domain::{
        CollaboratorError, CredentialResolver, Identity, MembershipChecker, RoomName, Token,
        UserId, Username, ValueObjectError,
    },
    infrastructure::dto::fixture::DirectoryFixture,
};

/// fixture の読み込みエラー
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid fixture value: {0}")]
    InvalidValue(#[from] ValueObjectError),

    #[error("circle '{room}' lists unknown member {user_id}")]
    UnknownMember { room: String, user_id: i64 },
}

#[derive(Default)]
struct DirectoryData {
    /// Key: token, Value: user id
    tokens: HashMap<String, UserId>,
    identities: HashMap<UserId, Identity>,
    /// Key: room name, Value: member ids
    circles: HashMap<String, HashSet<UserId>>,
}

/// インメモリのユーザー・circle ディレクトリ
#[derive(Default)]
pub struct InMemoryDirectory {
    data: RwLock<DirectoryData>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// fixture からディレクトリを構築する
    pub fn from_fixture(fixture: DirectoryFixture) -> Result<Self, FixtureError> {
        let mut data = DirectoryData::default();

        for user in fixture.users {
            let id = UserId::new(user.id);
            let identity = Identity::new(id, Username::new(user.username)?);
            let token = Token::new(user.token)?;
            data.tokens.insert(token.as_str().to_string(), id);
            data.identities.insert(id, identity);
        }

        for circle in fixture.circles {
            let room = RoomName::new(circle.room)?;
            let members = data.circles.entry(room.as_str().to_string()).or_default();
            for member in circle.members {
                let id = UserId::new(member);
                if !data.identities.contains_key(&id) {
                    return Err(FixtureError::UnknownMember {
                        room: room.as_str().to_string(),
                        user_id: member,
                    });
                }
                members.insert(id);
            }
        }

        Ok(Self {
            data: RwLock::new(data),
        })
    }

    /// JSON の fixture ファイルから読み込む
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let fixture: DirectoryFixture = serde_json::from_str(&raw)?;
        Self::from_fixture(fixture)
    }

    /// ユーザーとそのトークンを登録する
    pub async fn add_user(&self, identity: Identity, token: Token) {
        let mut data = self.data.write().await;
        data.tokens.insert(token.as_str().to_string(), identity.id);
        data.identities.insert(identity.id, identity);
    }

    /// circle にメンバーを追加する
    pub async fn add_member(&self, room: &RoomName, user_id: UserId) {
        let mut data = self.data.write().await;
        data.circles
            .entry(room.as_str().to_string())
            .or_default()
            .insert(user_id);
    }

    /// circle からメンバーを外す
    ///
    /// 接続中の Session には影響しません（認可は接続時にのみ確認される）。
    pub async fn remove_member(&self, room: &RoomName, user_id: UserId) -> bool {
        let mut data = self.data.write().await;
        data.circles
            .get_mut(room.as_str())
            .is_some_and(|members| members.remove(&user_id))
    }

    pub async fn user_count(&self) -> usize {
        self.data.read().await.identities.len()
    }

    pub async fn circle_count(&self) -> usize {
        self.data.read().await.circles.len()
    }
}

#[async_trait]
impl CredentialResolver for InMemoryDirectory {
    async fn resolve(&self, token: &Token) -> Result<Option<Identity>, CollaboratorError> {
        let data = self.data.read().await;
        Ok(data
            .tokens
            .get(token.as_str())
            .and_then(|id| data.identities.get(id))
            .cloned())
    }
}

#[async_trait]
impl MembershipChecker for InMemoryDirectory {
    async fn is_member(
        &self,
        identity: &Identity,
        room: &RoomName,
    ) -> Result<bool, CollaboratorError> {
        let data = self.data.read().await;
        Ok(data
            .circles
            .get(room.as_str())
            .is_some_and(|members| members.contains(&identity.id)))
    }
}
