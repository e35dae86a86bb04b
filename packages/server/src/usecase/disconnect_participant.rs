//! UseCase: 参加者切断処理
//!
//! Session を Closed にし、Broadcast Bus から登録を外します。
//! 二回目以降の呼び出しは何もしません（登録解除も退室通知も行わない）。

use std::sync::Arc;

use crate::domain::{BroadcastBus, GroupEvent, PresenceKind, Session};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Broadcast Bus
    bus: Arc<dyn BroadcastBus>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(bus: Arc<dyn BroadcastBus>) -> Self {
        Self { bus }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 今回の呼び出しで切断処理を行った場合は `true`
    pub async fn execute(&self, session: &mut Session) -> bool {
        if !session.close() {
            return false;
        }

        let context = session.context();
        let connection_id = context.connection_id();
        let group = context.group();
        self.bus.detach(&connection_id).await;
        tracing::info!(
            "Connection '{}' disconnected from group '{}'",
            connection_id,
            group
        );

        if context.announces_presence() {
            self.bus
                .publish(&group, GroupEvent::presence(PresenceKind::Left))
                .await;
        }
        true
    }
}
