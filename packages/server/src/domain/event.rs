//! Group events
//!
//! Broadcast Bus を流れるイベント。永続化されず、配送中にだけ存在します。
//! 新しい種類のイベントはこの列挙型に追加し、各 Session の `match` で処理します。

use serde_json::Value;

use super::value_object::{Identity, MessageText};

/// メッセージの送信者
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// 認証済みの送信者
    Member(Identity),
    /// 未認証の送信者（匿名参加可能なルームのみ）
    Anonymous,
}

impl Sender {
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        identity.map_or(Self::Anonymous, |identity| Self::Member(identity.clone()))
    }

    /// 表示名（匿名の場合は "Anonymous"）
    pub fn display_name(&self) -> &str {
        match self {
            Self::Member(identity) => identity.username.as_str(),
            Self::Anonymous => "Anonymous",
        }
    }
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub text: MessageText,
    pub sender: Sender,
}

/// 入退室イベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Joined,
    Left,
}

impl PresenceKind {
    pub fn announcement(&self) -> &'static str {
        match self {
            Self::Joined => "Bir kullanıcı odaya katıldı",
            Self::Left => "Bir kullanıcı odadan ayrıldı",
        }
    }
}

/// グループに配送されるイベント
#[derive(Debug, Clone, PartialEq)]
pub enum GroupEvent {
    ChatMessage(ChatEvent),
    UserEvent { message: String, kind: PresenceKind },
    Notification { data: Value },
}

impl GroupEvent {
    pub fn chat(text: MessageText, sender: Sender) -> Self {
        Self::ChatMessage(ChatEvent { text, sender })
    }

    pub fn presence(kind: PresenceKind) -> Self {
        Self::UserEvent {
            message: kind.announcement().to_string(),
            kind,
        }
    }

    pub fn notification(data: Value) -> Self {
        Self::Notification { data }
    }

    /// ログ出力用の種類名
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ChatMessage(_) => "chat_message",
            Self::UserEvent { .. } => "user_event",
            Self::Notification { .. } => "notification",
        }
    }
}
