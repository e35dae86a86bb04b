//! UseCase: メッセージ送信処理
//!
//! ルームの `DeliveryStrictness` に従って永続化とブロードキャストを行います。
//!
//! | strictness   | 永続化           | ブロードキャスト           |
//! |--------------|------------------|----------------------------|
//! | `Ephemeral`  | しない           | 常に行う                   |
//! | `BestEffort` | 試みる（失敗はログ）| 永続化の結果に関わらず行う |
//! | `Durable`    | 試みる           | 永続化に成功した場合のみ   |
//!
//! 匿名の送信者は永続化しません（Message Store は Identity を必要とする）。

use std::sync::Arc;

use crate::domain::{
    BroadcastBus, Channel, DeliveryStrictness, GroupEvent, MessageStore, MessageText, RoomBinding,
    Sender, SessionContext,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Message Store（永続化の抽象化）
    store: Arc<dyn MessageStore>,
    /// Broadcast Bus
    bus: Arc<dyn BroadcastBus>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>, bus: Arc<dyn BroadcastBus>) -> Self {
        Self { store, bus }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `context` - 送信元の Session
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - イベントを配送キューに積めた接続の数（送信者自身を含む）
    /// * `Err(SendMessageError)` - `Durable` での永続化失敗など
    pub async fn execute(
        &self,
        context: &SessionContext,
        text: MessageText,
    ) -> Result<usize, SendMessageError> {
        let Channel::Room(binding) = context.channel() else {
            return Err(SendMessageError::NotARoom);
        };

        self.persist(context, binding, &text).await?;

        let sender = Sender::from_identity(context.identity());
        let recipients = self
            .bus
            .publish(&binding.group(), GroupEvent::chat(text, sender))
            .await;
        Ok(recipients)
    }

    async fn persist(
        &self,
        context: &SessionContext,
        binding: &RoomBinding,
        text: &MessageText,
    ) -> Result<(), SendMessageError> {
        let strictness = binding.policy.strictness;
        if strictness == DeliveryStrictness::Ephemeral {
            return Ok(());
        }
        let Some(identity) = context.identity() else {
            return Ok(());
        };

        match self.store.append(identity, text, &binding.room).await {
            Ok(()) => Ok(()),
            Err(e) if strictness == DeliveryStrictness::BestEffort => {
                tracing::warn!(
                    "Failed to store message from '{}' in room '{}', broadcasting anyway: {}",
                    identity.username.as_str(),
                    binding.room,
                    e
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to store message from '{}' in room '{}': {}",
                    identity.username.as_str(),
                    binding.room,
                    e
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionId, EventReceiver, GroupName, Identity, RoomKind, RoomName, RoomPolicy,
            StoreError, UserId, Username, collaborator::MockMessageStore,
        },
        infrastructure::{
            broadcast_bus::InMemoryBroadcastBus, repository::InMemoryMessageStore,
        },
    };

    fn alice() -> Identity {
        Identity::new(UserId::new(1), Username::new("alice".to_string()).unwrap())
    }

    fn team1() -> RoomName {
        RoomName::new("team1".to_string()).unwrap()
    }

    fn circle_context(strictness: DeliveryStrictness) -> SessionContext {
        SessionContext::room(
            ConnectionId::new(),
            Some(alice()),
            RoomBinding {
                room: team1(),
                kind: RoomKind::Circle,
                policy: RoomPolicy {
                    strictness,
                    announce_presence: false,
                },
            },
        )
    }

    fn failing_store() -> Arc<MockMessageStore> {
        let mut store = MockMessageStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Unavailable("disk full".to_string())));
        Arc::new(store)
    }

    /// context をグループに登録し、その配送キューを返す
    async fn subscribe(bus: &InMemoryBroadcastBus, context: &SessionContext) -> EventReceiver {
        let events = bus.attach(context.connection_id()).await.unwrap();
        bus.join(&context.group(), &context.connection_id())
            .await
            .unwrap();
        events
    }

    #[tokio::test]
    async fn test_durable_message_is_stored_and_broadcast() {
        // テスト項目: Durable では永続化に成功した後、送信者を含む全員に配送される
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(store.clone(), bus.clone());
        let context = circle_context(DeliveryStrictness::Durable);
        let mut events = subscribe(&bus, &context).await;

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        let stored = store.messages_in(&team1()).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sender, alice());
        assert_eq!(
            *events.try_recv().unwrap(),
            GroupEvent::chat(MessageText::new("hi".to_string()), Sender::Member(alice()))
        );
    }

    #[tokio::test]
    async fn test_durable_store_failure_suppresses_broadcast() {
        // テスト項目: Durable で永続化に失敗した場合はエラーになり、誰にも配送されない
        // given (前提条件):
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(failing_store(), bus.clone());
        let context = circle_context(DeliveryStrictness::Durable);
        let mut events = subscribe(&bus, &context).await;

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::PersistenceFailed(StoreError::Unavailable(
                "disk full".to_string()
            )))
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_best_effort_store_failure_still_broadcasts() {
        // テスト項目: BestEffort では永続化に失敗しても配送される
        // given (前提条件):
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(failing_store(), bus.clone());
        let context = circle_context(DeliveryStrictness::BestEffort);
        let mut events = subscribe(&bus, &context).await;

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(events.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_ephemeral_message_is_not_stored() {
        // テスト項目: Ephemeral では Message Store を呼ばずに配送する
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_append().never();
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(Arc::new(store), bus.clone());
        let context = circle_context(DeliveryStrictness::Ephemeral);
        let _events = subscribe(&bus, &context).await;

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
    }

    #[tokio::test]
    async fn test_anonymous_lobby_message_is_broadcast_as_anonymous() {
        // テスト項目: lobby の匿名メッセージは永続化されず、匿名の送信者として配送される
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(store.clone(), bus.clone());
        let general = RoomName::new("general".to_string()).unwrap();
        let context = SessionContext::room(
            ConnectionId::new(),
            None,
            RoomBinding {
                room: general.clone(),
                kind: RoomKind::Lobby,
                policy: RoomPolicy::LOBBY,
            },
        );
        let mut events = subscribe(&bus, &context).await;

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("yo".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(store.is_empty().await);
        let event = events.try_recv().unwrap();
        assert_eq!(
            *event,
            GroupEvent::chat(MessageText::new("yo".to_string()), Sender::Anonymous)
        );
        assert_eq!(bus.member_count(&GroupName::lobby(&general)).await, 1);
    }

    #[tokio::test]
    async fn test_notification_session_cannot_send_chat() {
        // テスト項目: 通知チャンネルからのチャット送信はエラーになる
        // given (前提条件):
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = SendMessageUseCase::new(Arc::new(InMemoryMessageStore::new()), bus);
        let context = SessionContext::notifications(ConnectionId::new(), alice());

        // when (操作):
        let result = usecase
            .execute(&context, MessageText::new("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::NotARoom));
    }
}
