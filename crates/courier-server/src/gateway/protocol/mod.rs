//! Wire protocol: JSON frames, one message per WebSocket text frame

mod close_codes;
mod frames;

pub use close_codes::CloseCode;
pub use frames::{
    AckStatus, ClientFrame, FrameParseError, OfflineMessage, ServerFrame, DEFAULT_MESSAGE_TYPE,
};
