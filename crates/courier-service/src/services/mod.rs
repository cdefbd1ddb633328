//! Business services

mod auth;
mod context;
mod error;
mod group;
mod mailer;
mod message;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use group::GroupService;
pub use mailer::{LogMailer, Mailer};
pub use message::MessageService;
