//! Data transfer objects for the REST surface

mod requests;
mod responses;

pub use requests::{
    AddMembersRequest, ConfirmResetRequest, CreateGroupRequest, LoginRequest, LogoutRequest,
    RefreshRequest, RequestResetRequest, SignupRequest,
};
pub use responses::{
    AuthResponse, ConversationSummaryResponse, GroupMessageResponse, GroupResponse,
    LookupUserResponse, MessageResponse, ReadReceipt, SessionResponse, UserGroupResponse,
    UserResponse,
};
