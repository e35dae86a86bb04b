//! Session
//!
//! 接続ごとの状態機械。`Connecting → Active → Closed` の順にのみ遷移し、
//! `Closed` は終端状態です（再接続は常に新しい Session として扱う）。

use super::value_object::{ConnectionId, GroupName, Identity, RoomName, UserId};

/// 永続化とブロードキャストの厳密さ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryStrictness {
    /// 永続化しない
    Ephemeral,
    /// 永続化を試み、結果に関わらずブロードキャストする
    BestEffort,
    /// 永続化に成功した場合のみブロードキャストする
    #[default]
    Durable,
}

/// ルームの配送ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPolicy {
    pub strictness: DeliveryStrictness,
    /// 入退室イベントをグループに流すかどうか
    pub announce_presence: bool,
}

impl RoomPolicy {
    /// 匿名参加可能なルームのポリシー（永続化なし、入退室通知あり）
    pub const LOBBY: Self = Self {
        strictness: DeliveryStrictness::Ephemeral,
        announce_presence: true,
    };
}

/// ルームの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// メンバー限定（トークン認証 + メンバーシップ確認）
    Circle,
    /// 匿名参加可能
    Lobby,
}

/// Session が参加しているルーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomBinding {
    pub room: RoomName,
    pub kind: RoomKind,
    pub policy: RoomPolicy,
}

impl RoomBinding {
    pub fn group(&self) -> GroupName {
        match self.kind {
            RoomKind::Circle => GroupName::circle(&self.room),
            RoomKind::Lobby => GroupName::lobby(&self.room),
        }
    }
}

/// Session のチャンネル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Room(RoomBinding),
    /// 対象ユーザーの通知チャンネル
    Notifications(UserId),
}

/// Session の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

/// Session の不変な情報（接続ハンドル・Identity・チャンネル）
///
/// 受信タスクなど、状態を変更しない処理にはこちらを渡します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    connection_id: ConnectionId,
    identity: Option<Identity>,
    channel: Channel,
}

impl SessionContext {
    /// 通知チャンネルは必ず Identity を持つため、`Identity` を直接受け取る
    pub fn notifications(connection_id: ConnectionId, identity: Identity) -> Self {
        Self {
            connection_id,
            channel: Channel::Notifications(identity.id),
            identity: Some(identity),
        }
    }

    pub fn room(
        connection_id: ConnectionId,
        identity: Option<Identity>,
        binding: RoomBinding,
    ) -> Self {
        Self {
            connection_id,
            identity,
            channel: Channel::Room(binding),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// この Session が登録されるグループ
    pub fn group(&self) -> GroupName {
        match &self.channel {
            Channel::Room(binding) => binding.group(),
            Channel::Notifications(user_id) => GroupName::notifications(*user_id),
        }
    }

    /// 入退室イベントを流すかどうか
    pub fn announces_presence(&self) -> bool {
        match &self.channel {
            Channel::Room(binding) => binding.policy.announce_presence,
            Channel::Notifications(_) => false,
        }
    }
}

/// 接続ごとの Session
#[derive(Debug)]
pub struct Session {
    context: SessionContext,
    state: SessionState,
}

impl Session {
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            state: SessionState::Connecting,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// `Connecting → Active`
    ///
    /// 遷移した場合は `true`。それ以外の状態からは遷移しない。
    pub fn activate(&mut self) -> bool {
        if self.state != SessionState::Connecting {
            return false;
        }
        self.state = SessionState::Active;
        true
    }

    /// `Connecting | Active → Closed`
    ///
    /// 既に `Closed` の場合は `false`（切断処理の二重実行防止に使う）。
    pub fn close(&mut self) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        true
    }
}
