//! Per-client session state: the server-issued token and the request counter.

use std::fmt;

/// The mutable state one `Caller` owns exclusively.
///
/// The sequence counter starts at zero, advances once per outgoing request
/// and is never reset, not even by logout.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// The last sequence number handed out, zero before the first request.
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    /// Reserve the sequence number for the next outgoing request.
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn begin(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn end(&mut self) {
        self.token = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.is_active())
            .field("seq", &self.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one_and_survives_logout() {
        let mut session = Session::new();
        assert_eq!(session.sequence(), 0);
        assert_eq!(session.next_seq(), 1);
        session.begin("abc".into());
        assert_eq!(session.next_seq(), 2);
        session.end();
        assert!(!session.is_active());
        assert_eq!(session.next_seq(), 3);
    }

    #[test]
    fn sequence_keeps_increasing_past_32_bits() {
        let mut session = Session {
            seq: u64::from(u32::MAX),
            ..Session::default()
        };
        assert_eq!(session.next_seq(), u64::from(u32::MAX) + 1);
        assert_eq!(session.next_seq(), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn debug_hides_token() {
        let mut session = Session::new();
        session.begin("secret-token".into());
        assert!(!format!("{session:?}").contains("secret-token"));
    }
}
