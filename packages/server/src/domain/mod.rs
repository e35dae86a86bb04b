//! Domain layer
//!
//! ゲートウェイの中核となる型と、外部コラボレーター・ブロードキャストバスの
//! インターフェースを定義します。具体的な実装は Infrastructure 層が提供します。

pub mod broadcast;
pub mod collaborator;
pub mod error;
pub mod event;
pub mod group_registry;
pub mod session;
pub mod value_object;

pub use broadcast::{BroadcastBus, EventReceiver, OverflowPolicy};
pub use collaborator::{CredentialResolver, MembershipChecker, MessageStore};
pub use error::{BusError, CollaboratorError, StoreError, ValueObjectError};
pub use event::{ChatEvent, GroupEvent, PresenceKind, Sender};
pub use group_registry::GroupRegistry;
pub use session::{
    Channel, DeliveryStrictness, RoomBinding, RoomKind, RoomPolicy, Session, SessionContext,
    SessionState,
};
pub use value_object::{
    ConnectionId, GroupName, Identity, MessageText, RoomName, Token, UserId, Username,
};
