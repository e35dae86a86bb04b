//! Conversion logic between domain events and outbound frames.

use crate::domain::{Channel, GroupEvent, PresenceKind, RoomKind, Sender};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<PresenceKind> for dto::UserEventKind {
    fn from(kind: PresenceKind) -> Self {
        match kind {
            PresenceKind::Joined => Self::UserJoined,
            PresenceKind::Left => Self::UserLeft,
        }
    }
}

/// Render a group event for a session on the given channel.
///
/// Returns `None` for events that the channel does not deliver
/// (e.g. a chat message reaching a notification channel).
pub fn render_event(channel: &Channel, event: &GroupEvent) -> Option<dto::OutboundFrame> {
    match (channel, event) {
        (Channel::Room(binding), GroupEvent::ChatMessage(chat)) => match (binding.kind, &chat.sender)
        {
            (RoomKind::Circle, Sender::Member(identity)) => {
                Some(dto::OutboundFrame::CircleChat(dto::CircleChatFrame {
                    message: chat.text.as_str().to_string(),
                    sender: dto::SenderInfo {
                        username: identity.username.as_str().to_string(),
                        id: identity.id.value(),
                    },
                }))
            }
            // circle rooms only admit authenticated members
            (RoomKind::Circle, Sender::Anonymous) => None,
            (RoomKind::Lobby, sender) => Some(dto::OutboundFrame::LobbyChat(dto::LobbyChatFrame {
                r#type: dto::FrameType::ChatMessage,
                message: chat.text.as_str().to_string(),
                sender: sender.display_name().to_string(),
            })),
        },
        (Channel::Room(_), GroupEvent::UserEvent { message, kind }) => {
            Some(dto::OutboundFrame::UserEvent(dto::UserEventFrame {
                r#type: dto::FrameType::UserEvent,
                message: message.clone(),
                event: (*kind).into(),
            }))
        }
        (Channel::Notifications(_), GroupEvent::Notification { data }) => {
            Some(dto::OutboundFrame::Notification(dto::NotificationFrame {
                r#type: dto::FrameType::Notification,
                data: data.clone(),
            }))
        }
        (Channel::Room(_), GroupEvent::Notification { .. })
        | (Channel::Notifications(_), GroupEvent::ChatMessage(_))
        | (Channel::Notifications(_), GroupEvent::UserEvent { .. }) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DeliveryStrictness, Identity, MessageText, RoomBinding, RoomName, RoomPolicy, UserId,
        Username,
    };

    fn alice() -> Identity {
        Identity::new(UserId::new(7), Username::new("alice".to_string()).unwrap())
    }

    fn room_channel(kind: RoomKind) -> Channel {
        Channel::Room(RoomBinding {
            room: RoomName::new("team1".to_string()).unwrap(),
            kind,
            policy: RoomPolicy {
                strictness: DeliveryStrictness::Ephemeral,
                announce_presence: true,
            },
        })
    }

    #[test]
    fn test_circle_chat_renders_sender_object() {
        // テスト項目: circle ルームのチャットは sender オブジェクト付きで描画される
        // given (前提条件):
        let event = GroupEvent::chat(MessageText::new("hi".to_string()), Sender::Member(alice()));

        // when (操作):
        let frame = render_event(&room_channel(RoomKind::Circle), &event);

        // then (期待する結果):
        assert_eq!(
            frame.unwrap().to_json().unwrap(),
            r#"{"message":"hi","sender":{"username":"alice","id":7}}"#
        );
    }

    #[test]
    fn test_lobby_chat_renders_sender_name() {
        // テスト項目: lobby ルームのチャットは送信者名の文字列で描画される
        // given (前提条件):
        let anonymous = GroupEvent::chat(MessageText::new("yo".to_string()), Sender::Anonymous);
        let member = GroupEvent::chat(MessageText::new("yo".to_string()), Sender::Member(alice()));

        // when (操作):
        let anonymous_frame = render_event(&room_channel(RoomKind::Lobby), &anonymous);
        let member_frame = render_event(&room_channel(RoomKind::Lobby), &member);

        // then (期待する結果):
        assert_eq!(
            anonymous_frame.unwrap().to_json().unwrap(),
            r#"{"type":"chat_message","message":"yo","sender":"Anonymous"}"#
        );
        assert_eq!(
            member_frame.unwrap().to_json().unwrap(),
            r#"{"type":"chat_message","message":"yo","sender":"alice"}"#
        );
    }

    #[test]
    fn test_presence_event_renders_user_event() {
        // テスト項目: 入室イベントが user_event フレームとして描画される
        // given (前提条件):
        let event = GroupEvent::presence(PresenceKind::Joined);

        // when (操作):
        let frame = render_event(&room_channel(RoomKind::Lobby), &event);

        // then (期待する結果):
        assert_eq!(
            frame.unwrap().to_json().unwrap(),
            r#"{"type":"user_event","message":"Bir kullanıcı odaya katıldı","event":"user_joined"}"#
        );
    }

    #[test]
    fn test_notification_renders_only_on_notification_channel() {
        // テスト項目: 通知イベントは通知チャンネルでのみ描画される
        // given (前提条件):
        let event = GroupEvent::notification(serde_json::json!({"x": 1}));
        let notifications = Channel::Notifications(UserId::new(42));

        // when (操作):
        let on_notifications = render_event(&notifications, &event);
        let on_room = render_event(&room_channel(RoomKind::Circle), &event);

        // then (期待する結果):
        assert_eq!(
            on_notifications.unwrap().to_json().unwrap(),
            r#"{"type":"notification","data":{"x":1}}"#
        );
        assert!(on_room.is_none());
    }

    #[test]
    fn test_chat_is_not_rendered_on_notification_channel() {
        // テスト項目: 通知チャンネルにはチャットが描画されない
        // given (前提条件):
        let event = GroupEvent::chat(MessageText::new("hi".to_string()), Sender::Member(alice()));

        // when (操作):
        let frame = render_event(&Channel::Notifications(UserId::new(7)), &event);

        // then (期待する結果):
        assert!(frame.is_none());
    }
}
