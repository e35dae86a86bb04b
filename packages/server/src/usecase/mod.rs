//! UseCase layer
//!
//! Domain 層の trait（Broadcast Bus・外部コラボレーター）を組み合わせて、
//! 接続・送信・切断・通知発行の各処理を実装します。

mod connect_participant;
mod disconnect_participant;
mod error;
mod publish_notification;
mod send_message;

pub use connect_participant::{ConnectParticipantUseCase, ConnectedSession};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, SendMessageError};
pub use publish_notification::PublishNotificationUseCase;
pub use send_message::SendMessageUseCase;
