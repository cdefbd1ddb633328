//! Frame definitions
//!
//! Inbound JSON is validated into a closed `ClientFrame` sum before
//! dispatch; everything the server emits is a `ServerFrame`. The `type`
//! field tags both directions.

use chrono::{DateTime, Utc};
use courier_core::{DirectMessage, GroupMessage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message type applied when the client omits one
pub const DEFAULT_MESSAGE_TYPE: &str = "text";

fn default_message_type() -> String {
    DEFAULT_MESSAGE_TYPE.to_string()
}

/// Client → server frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "message.send")]
    MessageSend {
        recipient_id: Uuid,
        content: String,
        #[serde(default = "default_message_type")]
        message_type: String,
    },

    #[serde(rename = "message.group.send")]
    GroupMessageSend {
        group_id: Uuid,
        content: String,
        #[serde(default = "default_message_type")]
        message_type: String,
    },

    #[serde(rename = "message.read")]
    MessageRead { message_id: Uuid },

    #[serde(rename = "typing")]
    Typing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_id: Option<Uuid>,
    },

    #[serde(rename = "ping")]
    Ping,
}

/// Why an inbound frame was rejected before dispatch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameParseError {
    #[error("frame is not valid JSON")]
    Json,

    #[error("unknown frame type: {0}")]
    UnknownType(String),

    #[error("recipient_id is required")]
    MissingRecipient,

    #[error("group_id is required")]
    MissingGroup,

    #[error("invalid frame: {0}")]
    Invalid(String),
}

impl ClientFrame {
    /// Parse one inbound text frame.
    ///
    /// Distinguishes malformed JSON (`PARSE_ERROR`), a well-formed frame
    /// with an unknown `type` (`INVALID_MESSAGE_TYPE`), and a known type
    /// with bad fields (`VALIDATION_ERROR`).
    pub fn parse(text: &str) -> Result<Self, FrameParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| FrameParseError::Json)?;

        match serde_json::from_value::<Self>(value.clone()) {
            Ok(frame) => Ok(frame),
            Err(e) => {
                let frame_type = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default();
                if !Self::is_known_type(frame_type) {
                    return Err(FrameParseError::UnknownType(frame_type.to_string()));
                }
                if frame_type == "message.send" && value.get("recipient_id").is_none() {
                    return Err(FrameParseError::MissingRecipient);
                }
                if frame_type == "message.group.send" && value.get("group_id").is_none() {
                    return Err(FrameParseError::MissingGroup);
                }
                Err(FrameParseError::Invalid(e.to_string()))
            }
        }
    }

    fn is_known_type(frame_type: &str) -> bool {
        matches!(
            frame_type,
            "message.send" | "message.group.send" | "message.read" | "typing" | "ping"
        )
    }
}

/// Delivery status carried by `message.ack`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Delivered,
    Queued,
    Error,
}

/// A replayed message inside a `messages.offline` batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OfflineMessage {
    Direct {
        message_id: Uuid,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
        message_type: String,
        created_at: DateTime<Utc>,
    },
    Group {
        message_id: Uuid,
        group_id: Uuid,
        sender_id: Uuid,
        content: String,
        message_type: String,
        created_at: DateTime<Utc>,
    },
}

impl From<DirectMessage> for OfflineMessage {
    fn from(msg: DirectMessage) -> Self {
        Self::Direct {
            message_id: msg.message_id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            content: msg.content,
            message_type: msg.message_type,
            created_at: msg.created_at,
        }
    }
}

impl From<GroupMessage> for OfflineMessage {
    fn from(msg: GroupMessage) -> Self {
        Self::Group {
            message_id: msg.message_id,
            group_id: msg.group_id,
            sender_id: msg.sender_id,
            content: msg.content,
            message_type: msg.message_type,
            created_at: msg.created_at,
        }
    }
}

/// Server → client frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    #[serde(rename = "message.new")]
    MessageNew {
        message_id: Uuid,
        sender_id: Uuid,
        sender_username: String,
        recipient_id: Uuid,
        content: String,
        message_type: String,
        created_at: DateTime<Utc>,
    },

    #[serde(rename = "message.group.new")]
    GroupMessageNew {
        message_id: Uuid,
        group_id: Uuid,
        sender_id: Uuid,
        content: String,
        message_type: String,
        created_at: DateTime<Utc>,
    },

    #[serde(rename = "messages.offline")]
    OfflineBatch {
        messages: Vec<OfflineMessage>,
        count: usize,
    },

    #[serde(rename = "message.ack")]
    Ack {
        message_id: Uuid,
        status: AckStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "message.read")]
    MessageRead {
        message_id: Uuid,
        reader_id: Uuid,
        read_at: DateTime<Utc>,
    },

    #[serde(rename = "typing")]
    Typing {
        user_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient_id: Option<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_id: Option<Uuid>,
    },

    #[serde(rename = "pong")]
    Pong { timestamp: DateTime<Utc> },

    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl ServerFrame {
    /// Build an error frame
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build a success ack
    #[must_use]
    pub fn ack(message_id: Uuid, status: AckStatus) -> Self {
        Self::Ack {
            message_id,
            status,
            code: None,
            timestamp: Utc::now(),
        }
    }

    /// Build a failure ack carrying an error code
    #[must_use]
    pub fn ack_error(message_id: Uuid, code: impl Into<String>) -> Self {
        Self::Ack {
            message_id,
            status: AckStatus::Error,
            code: Some(code.into()),
            timestamp: Utc::now(),
        }
    }

    /// Serialize to the wire representation
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_send() {
        let id = Uuid::new_v4();
        let text = format!(r#"{{"type":"message.send","recipient_id":"{id}","content":"hi"}}"#);
        let frame = ClientFrame::parse(&text).unwrap();

        match frame {
            ClientFrame::MessageSend {
                recipient_id,
                content,
                message_type,
            } => {
                assert_eq!(recipient_id, id);
                assert_eq!(content, "hi");
                assert_eq!(message_type, "text");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_parse_ping() {
        assert!(matches!(
            ClientFrame::parse(r#"{"type":"ping"}"#).unwrap(),
            ClientFrame::Ping
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert_eq!(
            ClientFrame::parse("{not json").unwrap_err(),
            FrameParseError::Json
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = ClientFrame::parse(r#"{"type":"message.edit","message_id":"x"}"#).unwrap_err();
        assert_eq!(err, FrameParseError::UnknownType("message.edit".to_string()));
    }

    #[test]
    fn test_parse_missing_type() {
        let err = ClientFrame::parse(r#"{"content":"hi"}"#).unwrap_err();
        assert_eq!(err, FrameParseError::UnknownType(String::new()));
    }

    #[test]
    fn test_parse_missing_recipient() {
        let err = ClientFrame::parse(r#"{"type":"message.send","content":"hi"}"#).unwrap_err();
        assert_eq!(err, FrameParseError::MissingRecipient);
    }

    #[test]
    fn test_parse_missing_group() {
        let err =
            ClientFrame::parse(r#"{"type":"message.group.send","content":"hi"}"#).unwrap_err();
        assert_eq!(err, FrameParseError::MissingGroup);
    }

    #[test]
    fn test_parse_known_type_bad_fields() {
        let err = ClientFrame::parse(r#"{"type":"message.read","message_id":42}"#).unwrap_err();
        assert!(matches!(err, FrameParseError::Invalid(_)));
    }

    #[test]
    fn test_server_frame_tags() {
        let frame = ServerFrame::Pong {
            timestamp: Utc::now(),
        };
        let json = frame.to_json().unwrap();
        assert!(json.contains(r#""type":"pong""#));

        let frame = ServerFrame::error("PARSE_ERROR", "frame is not valid JSON");
        let json = frame.to_json().unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains(r#""code":"PARSE_ERROR""#));
    }

    #[test]
    fn test_ack_serialization() {
        let id = Uuid::new_v4();
        let json = ServerFrame::ack(id, AckStatus::Queued).to_json().unwrap();
        assert!(json.contains(r#""status":"queued""#));
        assert!(!json.contains("code"));

        let json = ServerFrame::ack_error(id, "PERSIST_FAILED").to_json().unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains(r#""code":"PERSIST_FAILED""#));
    }

    #[test]
    fn test_offline_message_kind_tags() {
        let msg = DirectMessage::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "hello".to_string(),
            "text".to_string(),
        );
        let json = serde_json::to_string(&OfflineMessage::from(msg)).unwrap();
        assert!(json.contains(r#""kind":"direct""#));

        let msg = GroupMessage::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "hello".to_string(),
            "text".to_string(),
        );
        let json = serde_json::to_string(&OfflineMessage::from(msg)).unwrap();
        assert!(json.contains(r#""kind":"group""#));
    }

    #[test]
    fn test_typing_frame_omits_absent_target() {
        let frame = ServerFrame::Typing {
            user_id: Uuid::new_v4(),
            recipient_id: Some(Uuid::new_v4()),
            group_id: None,
        };
        let json = frame.to_json().unwrap();
        assert!(json.contains("recipient_id"));
        assert!(!json.contains("group_id"));
    }
}
