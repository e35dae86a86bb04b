//! UseCase: 参加者接続処理
//!
//! 認証（トークン解決）→ 認可（メンバーシップ確認）→ Broadcast Bus への登録 → Active 化、
//! の順に処理します。認証・認可のどちらかに失敗した場合、Bus には何も登録されません。

use std::sync::Arc;

use crate::domain::{
    BroadcastBus, ConnectionId, CredentialResolver, EventReceiver, GroupEvent, Identity,
    MembershipChecker, PresenceKind, RoomBinding, RoomKind, RoomName, RoomPolicy, Session,
    SessionContext, Token,
};

use super::error::ConnectError;

/// 接続に成功した Session と、その配送キューの受信側
#[derive(Debug)]
pub struct ConnectedSession {
    pub session: Session,
    pub events: EventReceiver,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// トークンから Identity を解決する
    credentials: Arc<dyn CredentialResolver>,
    /// circle のメンバーシップを確認する
    memberships: Arc<dyn MembershipChecker>,
    /// Broadcast Bus
    bus: Arc<dyn BroadcastBus>,
    /// circle ルームの配送ポリシー
    circle_policy: RoomPolicy,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        credentials: Arc<dyn CredentialResolver>,
        memberships: Arc<dyn MembershipChecker>,
        bus: Arc<dyn BroadcastBus>,
        circle_policy: RoomPolicy,
    ) -> Self {
        Self {
            credentials,
            memberships,
            bus,
            circle_policy,
        }
    }

    /// トークンを Identity に解決する
    ///
    /// 解決できないトークンは `AuthenticationFailure`、解決処理自体の失敗は `Unavailable`。
    pub async fn authenticate(&self, token: &Token) -> Result<Identity, ConnectError> {
        self.credentials.resolve(token).await?.ok_or_else(|| {
            ConnectError::AuthenticationFailure("token could not be resolved".to_string())
        })
    }

    /// circle ルームへの接続（トークンはクエリ文字列から取り出す）
    ///
    /// # Arguments
    ///
    /// * `room` - ルートパラメータで指定されたルーム名
    /// * `raw_query` - アップグレード要求の生のクエリ文字列
    pub async fn connect_circle(
        &self,
        room: RoomName,
        raw_query: Option<&str>,
    ) -> Result<ConnectedSession, ConnectError> {
        let token = Token::from_query_string(raw_query.unwrap_or_default())
            .map_err(|e| ConnectError::AuthenticationFailure(e.to_string()))?;
        let identity = self.authenticate(&token).await?;

        if !self.memberships.is_member(&identity, &room).await? {
            return Err(ConnectError::AuthorizationFailure(format!(
                "user {} is not a member of circle '{}'",
                identity.id, room
            )));
        }

        let binding = RoomBinding {
            room,
            kind: RoomKind::Circle,
            policy: self.circle_policy,
        };
        self.register(SessionContext::room(
            ConnectionId::new(),
            Some(identity),
            binding,
        ))
        .await
    }

    /// lobby ルームへの接続（匿名可）
    pub async fn connect_lobby(
        &self,
        room: RoomName,
        identity: Option<Identity>,
    ) -> Result<ConnectedSession, ConnectError> {
        let binding = RoomBinding {
            room,
            kind: RoomKind::Lobby,
            policy: RoomPolicy::LOBBY,
        };
        self.register(SessionContext::room(ConnectionId::new(), identity, binding))
            .await
    }

    /// 自分の通知チャンネルへの接続（Identity 必須）
    pub async fn connect_notifications(
        &self,
        identity: Option<Identity>,
    ) -> Result<ConnectedSession, ConnectError> {
        let identity = identity.ok_or_else(|| {
            ConnectError::AuthenticationFailure(
                "notification channel requires an identity".to_string(),
            )
        })?;
        self.register(SessionContext::notifications(ConnectionId::new(), identity))
            .await
    }

    /// Bus への登録と Active 化
    ///
    /// グループへの参加に失敗した場合は配送キューも破棄する。
    async fn register(&self, context: SessionContext) -> Result<ConnectedSession, ConnectError> {
        let connection_id = context.connection_id();
        let group = context.group();

        let events = self.bus.attach(connection_id).await?;
        if let Err(e) = self.bus.join(&group, &connection_id).await {
            self.bus.detach(&connection_id).await;
            return Err(e.into());
        }

        let mut session = Session::new(context);
        session.activate();
        tracing::info!(
            "Connection '{}' is active in group '{}'",
            connection_id,
            group
        );

        if session.context().announces_presence() {
            self.bus
                .publish(&group, GroupEvent::presence(PresenceKind::Joined))
                .await;
        }

        Ok(ConnectedSession { session, events })
    }
}
