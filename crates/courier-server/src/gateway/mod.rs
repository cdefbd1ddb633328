//! WebSocket gateway
//!
//! One reader task per socket feeds the frame dispatcher; one writer
//! task drains the bounded outbound channel. The registry maps users to
//! their live sockets and is the authority for local fan-out.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod replay;
pub mod socket;

pub use connection::Connection;
pub use registry::ConnectionRegistry;
