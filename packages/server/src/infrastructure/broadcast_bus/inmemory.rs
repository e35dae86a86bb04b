//! インメモリ Broadcast Bus 実装
//!
//! ## 責務
//!
//! - 接続ごとの有界な配送キュー（`mpsc::Sender`）の管理
//! - `GroupRegistry` を使ったグループメンバーシップの管理
//! - グループへのファンアウト配送
//!
//! ## 設計ノート
//!
//! レジストリと配送キューは一つの Mutex で保護されます。`publish` はロックを保持したまま
//! 各キューに `try_send` するため、同じ呼び出し元からの連続した `publish` の順序が保たれ、
//! 遅い購読者が呼び出し元を待たせることもありません。
//! 外部 I/O（認証・永続化）の間にこのロックが保持されることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, mpsc::error::TrySendError};

use crate::domain::{
    BroadcastBus, BusError, ConnectionId, EventReceiver, GroupEvent, GroupName, GroupRegistry,
    OverflowPolicy,
};

/// 配送キューのデフォルト容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// 購読者（接続ごとの配送キュー）
struct Subscriber {
    sender: mpsc::Sender<Arc<GroupEvent>>,
    /// キューが満杯で捨てたイベントの累計
    dropped: u64,
}

struct BusInner {
    registry: GroupRegistry,
    subscribers: HashMap<ConnectionId, Subscriber>,
}

impl BusInner {
    /// 購読者を全てのグループから外し、キューを閉じる
    fn evict(&mut self, connection_id: &ConnectionId) -> bool {
        self.registry.leave_all(connection_id);
        // Sender を drop すると受信側の recv() は残りを読み切った後に None を返す
        self.subscribers.remove(connection_id).is_some()
    }
}

/// インメモリ Broadcast Bus
pub struct InMemoryBroadcastBus {
    inner: Mutex<BusInner>,
    queue_capacity: usize,
    overflow_policy: OverflowPolicy,
}

impl InMemoryBroadcastBus {
    /// 新しい InMemoryBroadcastBus を作成
    ///
    /// # 引数
    ///
    /// - `queue_capacity`: 接続ごとの配送キューの容量（0 の場合は 1 として扱う）
    /// - `overflow_policy`: キューが満杯のときの扱い
    pub fn new(queue_capacity: usize, overflow_policy: OverflowPolicy) -> Self {
        Self {
            inner: Mutex::new(BusInner {
                registry: GroupRegistry::new(),
                subscribers: HashMap::new(),
            }),
            queue_capacity: queue_capacity.max(1),
            overflow_policy,
        }
    }

    /// 配送キューを持つ接続の数
    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }

    /// メンバーが存在するグループの数
    pub async fn group_count(&self) -> usize {
        self.inner.lock().await.registry.group_count()
    }
}

impl Default for InMemoryBroadcastBus {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY, OverflowPolicy::default())
    }
}

#[async_trait]
impl BroadcastBus for InMemoryBroadcastBus {
    async fn attach(&self, connection_id: ConnectionId) -> Result<EventReceiver, BusError> {
        let mut inner = self.inner.lock().await;
        if inner.subscribers.contains_key(&connection_id) {
            return Err(BusError::AlreadyAttached(connection_id.to_string()));
        }

        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        inner
            .subscribers
            .insert(connection_id, Subscriber { sender, dropped: 0 });
        tracing::debug!("Connection '{}' attached to broadcast bus", connection_id);
        Ok(receiver)
    }

    async fn detach(&self, connection_id: &ConnectionId) -> bool {
        let mut inner = self.inner.lock().await;
        let detached = inner.evict(connection_id);
        if detached {
            tracing::debug!("Connection '{}' detached from broadcast bus", connection_id);
        }
        detached
    }

    async fn join(&self, group: &GroupName, connection_id: &ConnectionId) -> Result<(), BusError> {
        let mut inner = self.inner.lock().await;
        if !inner.subscribers.contains_key(connection_id) {
            return Err(BusError::NotAttached(connection_id.to_string()));
        }

        if inner.registry.join(group.clone(), *connection_id) {
            tracing::debug!(
                "Connection '{}' joined group '{}' ({} members)",
                connection_id,
                group,
                inner.registry.member_count(group)
            );
        }
        Ok(())
    }

    async fn leave(&self, group: &GroupName, connection_id: &ConnectionId) -> bool {
        let mut inner = self.inner.lock().await;
        let left = inner.registry.leave(group, connection_id);
        if left {
            tracing::debug!("Connection '{}' left group '{}'", connection_id, group);
        }
        left
    }

    async fn publish(&self, group: &GroupName, event: GroupEvent) -> usize {
        let kind = event.kind_name();
        let event = Arc::new(event);

        let mut guard = self.inner.lock().await;
        let BusInner {
            registry,
            subscribers,
        } = &mut *guard;

        let mut delivered = 0;
        let mut evicted = Vec::new();
        for connection_id in registry.members(group) {
            let Some(subscriber) = subscribers.get_mut(&connection_id) else {
                tracing::warn!(
                    "Connection '{}' is in group '{}' without a queue, skipping",
                    connection_id,
                    group
                );
                continue;
            };

            match subscriber.sender.try_send(Arc::clone(&event)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    subscriber.dropped += 1;
                    match self.overflow_policy {
                        OverflowPolicy::Drop => tracing::warn!(
                            "Queue of connection '{}' is full, dropped {} event (total drops: {})",
                            connection_id,
                            kind,
                            subscriber.dropped
                        ),
                        OverflowPolicy::Disconnect => {
                            tracing::warn!(
                                "Queue of connection '{}' is full, disconnecting slow subscriber",
                                connection_id
                            );
                            evicted.push(connection_id);
                        }
                    }
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        "Queue of connection '{}' is closed, removing subscriber",
                        connection_id
                    );
                    evicted.push(connection_id);
                }
            }
        }

        for connection_id in &evicted {
            guard.evict(connection_id);
        }

        tracing::debug!(
            "Published {} to group '{}' ({} recipients, {} evicted)",
            kind,
            group,
            delivered,
            evicted.len()
        );
        delivered
    }

    async fn member_count(&self, group: &GroupName) -> usize {
        self.inner.lock().await.registry.member_count(group)
    }
}
