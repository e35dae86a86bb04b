//! Broadcast Bus trait 定義
//!
//! グループに登録されている全ての接続へイベントを配送する publish/subscribe の抽象。
//! UseCase 層はこの trait に依存し、具体的な実装（インメモリ、分散 pub-sub など）には依存しません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{BusError, ConnectionId, GroupEvent, GroupName};

/// 接続ごとの配送キューの受信側
///
/// キューは有界です。Bus がキューを閉じると `recv()` は `None` を返し、Session は終了します。
pub type EventReceiver = mpsc::Receiver<Arc<GroupEvent>>;

/// 配送キューが満杯になったときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// その購読者へのイベントだけを捨てる
    #[default]
    Drop,
    /// その購読者を全てのグループから外し、キューを閉じる（接続が切断される）
    Disconnect,
}

/// Broadcast Bus
///
/// ## 配送の保証
///
/// - `publish` は呼び出し時点のメンバー集合に対して配送する（後から参加した接続には届かない）
/// - 同じ呼び出し元からの連続した `publish` は、その間ずっと参加しているメンバーに順序通り届く
/// - 遅い購読者が `publish` の呼び出し元をブロックすることはない
/// - 1 回の `publish` で同じ接続に二重に配送されることはない
#[async_trait]
pub trait BroadcastBus: Send + Sync {
    /// 接続の配送キューを作成する
    async fn attach(&self, connection_id: ConnectionId) -> Result<EventReceiver, BusError>;

    /// 接続を全てのグループから外し、配送キューを閉じる
    ///
    /// 冪等。接続が登録されていた場合は `true` を返す。
    async fn detach(&self, connection_id: &ConnectionId) -> bool;

    /// グループに参加する（冪等）
    async fn join(&self, group: &GroupName, connection_id: &ConnectionId) -> Result<(), BusError>;

    /// グループから退出する（メンバーでなければ何もしない）
    async fn leave(&self, group: &GroupName, connection_id: &ConnectionId) -> bool;

    /// グループの全メンバーへイベントを配送し、キューに積めた接続の数を返す
    async fn publish(&self, group: &GroupName, event: GroupEvent) -> usize;

    /// グループの現在のメンバー数
    async fn member_count(&self, group: &GroupName) -> usize;
}
