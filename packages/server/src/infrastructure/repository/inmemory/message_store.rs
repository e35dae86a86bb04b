//! InMemory Message Store 実装
//!
//! 保存されたメッセージを追記専用のリストとして保持します。
//! 容量を指定した場合、上限を超える追記は `StoreError::CapacityExceeded` になります。

use std::sync::Arc;

use async_trait::async_trait;
use huddle_shared::time::{Clock, SystemClock, millis_to_rfc3339};
use tokio::sync::Mutex;

use crate::domain::{Identity, MessageStore, MessageText, RoomName, StoreError};

/// 保存済みメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub sender: Identity,
    pub text: MessageText,
    pub room: RoomName,
    /// Unix timestamp (UTC, milliseconds)
    pub timestamp: i64,
}

/// インメモリ Message Store
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<StoredMessage>>,
    capacity: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageStore {
    /// 容量無制限の Message Store を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), None)
    }

    /// 時計と容量を指定して作成
    pub fn with_clock(clock: Arc<dyn Clock>, capacity: Option<usize>) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            capacity,
            clock,
        }
    }

    /// 指定したルームのメッセージを保存順に取得
    pub async fn messages_in(&self, room: &RoomName) -> Vec<StoredMessage> {
        let messages = self.messages.lock().await;
        messages
            .iter()
            .filter(|message| &message.room == room)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        sender: &Identity,
        text: &MessageText,
        room: &RoomName,
    ) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().await;
        if let Some(capacity) = self.capacity
            && messages.len() >= capacity
        {
            return Err(StoreError::CapacityExceeded(capacity));
        }

        let timestamp = self.clock.now_millis();
        messages.push(StoredMessage {
            sender: sender.clone(),
            text: text.clone(),
            room: room.clone(),
            timestamp,
        });
        tracing::debug!(
            "Stored message from '{}' in room '{}' at {}",
            sender.username.as_str(),
            room,
            millis_to_rfc3339(timestamp).unwrap_or_else(|| timestamp.to_string())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, Username};
    use huddle_shared::time::FixedClock;

    fn alice() -> Identity {
        Identity::new(UserId::new(1), Username::new("alice".to_string()).unwrap())
    }

    fn room(value: &str) -> RoomName {
        RoomName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_append_records_message_with_clock_time() {
        // テスト項目: 追記したメッセージが時計の時刻とともに保存される
        // given (前提条件):
        let store = InMemoryMessageStore::with_clock(Arc::new(FixedClock::new(1000)), None);

        // when (操作):
        let result = store
            .append(&alice(), &MessageText::new("hi".to_string()), &room("team1"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let messages = store.messages_in(&room("team1")).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, alice());
        assert_eq!(messages[0].text.as_str(), "hi");
        assert_eq!(messages[0].timestamp, 1000);
    }

    #[tokio::test]
    async fn test_messages_are_filtered_by_room() {
        // テスト項目: ルームごとにメッセージを取得できる
        // given (前提条件):
        let store = InMemoryMessageStore::new();
        store
            .append(&alice(), &MessageText::new("a".to_string()), &room("team1"))
            .await
            .unwrap();
        store
            .append(&alice(), &MessageText::new("b".to_string()), &room("team2"))
            .await
            .unwrap();

        // when (操作):
        let team1 = store.messages_in(&room("team1")).await;

        // then (期待する結果):
        assert_eq!(team1.len(), 1);
        assert_eq!(team1[0].text.as_str(), "a");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_append_beyond_capacity_fails() {
        // テスト項目: 容量を超える追記はエラーになり、保存されない
        // given (前提条件):
        let store = InMemoryMessageStore::with_clock(Arc::new(FixedClock::new(0)), Some(1));
        store
            .append(&alice(), &MessageText::new("1".to_string()), &room("team1"))
            .await
            .unwrap();

        // when (操作):
        let result = store
            .append(&alice(), &MessageText::new("2".to_string()), &room("team1"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::CapacityExceeded(1)));
        assert_eq!(store.len().await, 1);
    }
}
