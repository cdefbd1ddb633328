//! Request extractors

mod auth;
mod pagination;
mod validated;

pub use auth::AuthUser;
pub use pagination::PageQuery;
pub use validated::ValidatedJson;
