//! Group Registry
//!
//! グループ名から所属する接続ハンドルの集合への純粋なマッピング。
//! ビジネスロジックも I/O も持たず、排他制御は利用側（Broadcast Bus）が行います。

use std::collections::{HashMap, HashSet};

use super::value_object::{ConnectionId, GroupName};

/// グループ名 → メンバー集合
///
/// メンバーが一人もいないグループはマップから取り除かれます。
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: HashMap<GroupName, HashSet<ConnectionId>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// グループに参加する
    ///
    /// 新たに追加された場合は `true`、既にメンバーだった場合は `false`（冪等）。
    pub fn join(&mut self, group: GroupName, connection_id: ConnectionId) -> bool {
        self.groups.entry(group).or_default().insert(connection_id)
    }

    /// グループから退出する
    ///
    /// メンバーでなかった場合は何もせず `false` を返します。
    pub fn leave(&mut self, group: &GroupName, connection_id: &ConnectionId) -> bool {
        let Some(members) = self.groups.get_mut(group) else {
            return false;
        };
        let removed = members.remove(connection_id);
        if members.is_empty() {
            self.groups.remove(group);
        }
        removed
    }

    /// 全てのグループから退出し、退出したグループ名を返す
    pub fn leave_all(&mut self, connection_id: &ConnectionId) -> Vec<GroupName> {
        let mut left = Vec::new();
        self.groups.retain(|group, members| {
            if members.remove(connection_id) {
                left.push(group.clone());
            }
            !members.is_empty()
        });
        left
    }

    /// 現時点のメンバー一覧（スナップショット）
    pub fn members(&self, group: &GroupName) -> Vec<ConnectionId> {
        self.groups
            .get(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_member(&self, group: &GroupName, connection_id: &ConnectionId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(connection_id))
    }

    pub fn member_count(&self, group: &GroupName) -> usize {
        self.groups.get(group).map_or(0, HashSet::len)
    }

    /// メンバーが存在するグループの数
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
