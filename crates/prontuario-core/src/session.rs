//! Signed-in session context.
//!
//! Authentication itself happens at the identity provider. Once it succeeds
//! the host creates a [`Session`] and hands it to whatever needs to know who is
//! signed in. A session ends when it expires or is revoked.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated practitioner session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique session ID
    pub session_id: String,
    /// Identity as reported by the provider (usually an e-mail)
    pub user: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set when the user signs out
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a session lasting `ttl` from now.
    pub fn start(user: String, ttl: Duration) -> Self {
        Self::start_at(user, ttl, Utc::now())
    }

    /// Start a session lasting `ttl` from `now`. Expiry saturates at the
    /// latest representable instant.
    pub fn start_at(user: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user,
            started_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            revoked_at: None,
        }
    }

    /// Whether the session is usable at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Time left before expiry; zero once expired or revoked.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        if !self.is_active_at(now) {
            return Duration::zero();
        }
        self.expires_at - now
    }

    /// End the session. Revoking twice keeps the first timestamp.
    pub fn revoke(&mut self) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(Utc::now());
        }
    }
}
