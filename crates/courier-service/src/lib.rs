//! # courier-service
//!
//! Business services orchestrating the durable log, the cache and the
//! authentication primitives. The transport layers (REST handlers and
//! the WebSocket gateway) depend on this crate and never touch SQL or
//! Redis directly.

pub mod dto;
pub mod services;

// Re-export commonly used types
pub use dto::{
    AddMembersRequest, AuthResponse, ConfirmResetRequest, ConversationSummaryResponse,
    CreateGroupRequest, GroupMessageResponse, GroupResponse, LoginRequest, LogoutRequest,
    LookupUserResponse, MessageResponse, ReadReceipt, RefreshRequest, RequestResetRequest,
    SessionResponse, SignupRequest, UserGroupResponse, UserResponse,
};
pub use services::{
    AuthService, GroupService, LogMailer, Mailer, MessageService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
