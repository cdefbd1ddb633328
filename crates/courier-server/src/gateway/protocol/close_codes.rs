//! WebSocket close codes

/// Close codes used by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseCode {
    /// Normal closure
    Normal,
    /// Server overloaded or per-user connection cap exceeded
    Overloaded,
    /// Authentication failed or expired; the client must re-authenticate
    /// and must not auto-reconnect
    AuthFailed,
}

impl CloseCode {
    #[must_use]
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Normal => 1000,
            Self::Overloaded => 1013,
            Self::AuthFailed => 4001,
        }
    }

    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Normal => "closed",
            Self::Overloaded => "POLICY_VIOLATION",
            Self::AuthFailed => "AUTH_EXPIRED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_values() {
        assert_eq!(CloseCode::Normal.as_u16(), 1000);
        assert_eq!(CloseCode::Overloaded.as_u16(), 1013);
        assert_eq!(CloseCode::AuthFailed.as_u16(), 4001);
    }

    #[test]
    fn test_reasons() {
        assert_eq!(CloseCode::Overloaded.reason(), "POLICY_VIOLATION");
        assert_eq!(CloseCode::AuthFailed.reason(), "AUTH_EXPIRED");
    }
}
