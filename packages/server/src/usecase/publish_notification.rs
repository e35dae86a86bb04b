//! UseCase: 通知の発行
//!
//! ゲートウェイの外側のコードが、特定のユーザーの通知チャンネルへ通知を送るための入口です。
//! クライアントから通知を発行する手段はありません。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{BroadcastBus, GroupEvent, GroupName, UserId};

/// 通知発行のユースケース
pub struct PublishNotificationUseCase {
    bus: Arc<dyn BroadcastBus>,
}

impl PublishNotificationUseCase {
    pub fn new(bus: Arc<dyn BroadcastBus>) -> Self {
        Self { bus }
    }

    /// `notifications_<user_id>` に通知を配送し、受け取った接続の数を返す
    ///
    /// 接続中の通知チャンネルが無い場合は `0`（通知は保持されない）。
    pub async fn execute(&self, user_id: UserId, data: Value) -> usize {
        let group = GroupName::notifications(user_id);
        let recipients = self
            .bus
            .publish(&group, GroupEvent::notification(data))
            .await;
        tracing::debug!(
            "Published notification to user {} ({} connections)",
            user_id,
            recipients
        );
        recipients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ConnectionId, infrastructure::broadcast_bus::InMemoryBroadcastBus};

    #[tokio::test]
    async fn test_notification_reaches_only_target_user() {
        // テスト項目: 通知は対象ユーザーの通知チャンネルにだけ届く
        // given (前提条件):
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = PublishNotificationUseCase::new(bus.clone());

        let target = ConnectionId::new();
        let mut target_events = bus.attach(target).await.unwrap();
        bus.join(&GroupName::notifications(UserId::new(42)), &target)
            .await
            .unwrap();
        let other = ConnectionId::new();
        let mut other_events = bus.attach(other).await.unwrap();
        bus.join(&GroupName::notifications(UserId::new(43)), &other)
            .await
            .unwrap();

        // when (操作):
        let recipients = usecase
            .execute(UserId::new(42), serde_json::json!({"x": 1}))
            .await;

        // then (期待する結果):
        assert_eq!(recipients, 1);
        assert_eq!(
            *target_events.try_recv().unwrap(),
            GroupEvent::notification(serde_json::json!({"x": 1}))
        );
        assert!(other_events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notification_without_listener_is_discarded() {
        // テスト項目: 接続中の通知チャンネルが無い場合、通知は誰にも届かない
        // given (前提条件):
        let bus = Arc::new(InMemoryBroadcastBus::default());
        let usecase = PublishNotificationUseCase::new(bus.clone());

        // when (操作):
        let recipients = usecase
            .execute(UserId::new(7), serde_json::json!("ping"))
            .await;

        // then (期待する結果):
        assert_eq!(recipients, 0);
        assert_eq!(bus.group_count().await, 0);
    }
}
