//! Value Objects
//!
//! 不変で、値そのものが意味を持つドメインの型を定義します。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 接続ハンドル
///
/// プロセス内で一意。接続ごとに新しく生成され、再利用されることはありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザー ID（外部の認証基盤が発行する数値 ID）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザー名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 認証済みの主体
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
}

impl Identity {
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }
}

/// 認証トークン
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// クエリ文字列からトークンを取り出す
    ///
    /// トークンは最初の `token=` から次の `&`（または文字列の終端）までの部分文字列です。
    ///
    /// ```
    /// use huddle_server::domain::Token;
    ///
    /// let token = Token::from_query_string("room=1&token=abc123&v=2").unwrap();
    /// assert_eq!(token.as_str(), "abc123");
    /// ```
    pub fn from_query_string(query: &str) -> Result<Self, ValueObjectError> {
        let (_, rest) = query
            .split_once("token=")
            .ok_or(ValueObjectError::MissingToken)?;
        let raw = rest.split_once('&').map_or(rest, |(token, _)| token);
        Self::new(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// トークンをログに出さない
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// ルーム名（ルートパラメータで指定される）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文
///
/// 空文字列も有効です（`message` フィールドが無い入力は空文字列として扱う）。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// ブロードキャストグループ名
///
/// グループの種類ごとに接頭辞が異なるため、同じルーム名でも
/// circle ルームと lobby ルームのグループは衝突しません。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// メンバー限定ルームのグループ（`circle_<room>`）
    pub fn circle(room: &RoomName) -> Self {
        Self(format!("circle_{}", room.as_str()))
    }

    /// 匿名参加可能なルームのグループ（`chat_<room>`）
    pub fn lobby(room: &RoomName) -> Self {
        Self(format!("chat_{}", room.as_str()))
    }

    /// ユーザーごとの通知グループ（`notifications_<id>`）
    pub fn notifications(user_id: UserId) -> Self {
        Self(format!("notifications_{}", user_id.value()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_query_string_single_param() {
        // テスト項目: token だけのクエリ文字列からトークンを取り出せる
        // given (前提条件):
        let query = "token=abc123";

        // when (操作):
        let result = Token::from_query_string(query);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_token_from_query_string_stops_at_ampersand() {
        // テスト項目: トークンは次の & までで区切られる
        // given (前提条件):
        let query = "room=team1&token=abc123&lang=ja";

        // when (操作):
        let result = Token::from_query_string(query);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_token_from_query_string_missing() {
        // テスト項目: token= を含まないクエリ文字列はエラーになる
        // given (前提条件):
        let query = "room=team1";

        // when (操作):
        let result = Token::from_query_string(query);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::MissingToken));
    }

    #[test]
    fn test_token_from_query_string_empty() {
        // テスト項目: 空のトークンはエラーになる
        // given (前提条件):
        let query = "token=&room=team1";

        // when (操作):
        let result = Token::from_query_string(query);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyToken));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        // テスト項目: Debug 出力にトークンの値が含まれない
        // given (前提条件):
        let token = Token::new("secret".to_string()).unwrap();

        // when (操作):
        let debug = format!("{:?}", token);

        // then (期待する結果):
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_room_name_rejects_empty() {
        // テスト項目: 空のルーム名は生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = RoomName::try_from(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomName));
    }

    #[test]
    fn test_group_names_are_prefixed_by_kind() {
        // テスト項目: グループ名は種類ごとの接頭辞を持ち、互いに衝突しない
        // given (前提条件):
        let room = RoomName::new("team1".to_string()).unwrap();

        // when (操作):
        let circle = GroupName::circle(&room);
        let lobby = GroupName::lobby(&room);
        let notifications = GroupName::notifications(UserId::new(42));

        // then (期待する結果):
        assert_eq!(circle.as_str(), "circle_team1");
        assert_eq!(lobby.as_str(), "chat_team1");
        assert_eq!(notifications.as_str(), "notifications_42");
        assert_ne!(circle, lobby);
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 接続ハンドルは生成ごとに異なる
        // given (前提条件):

        // when (操作):
        let first = ConnectionId::new();
        let second = ConnectionId::new();

        // then (期待する結果):
        assert_ne!(first, second);
    }
}
