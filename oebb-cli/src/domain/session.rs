//! Authenticated session credentials.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credentials issued by the init handshake and replayed on every
/// authenticated call.
///
/// A session is only usable when all five fields are non-empty; anything
/// else is treated as expired and triggers a fresh handshake.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Client-identifying channel, sent as the `Channel` header.
    pub channel: String,

    /// Sent as the `AccessToken` header.
    pub access_token: String,

    /// Sent as the `SessionId` header.
    pub session_id: String,

    /// Sent as `x-ts-supportid`, prefixed with [`SUPPORT_ID_PREFIX`].
    pub support_id: String,

    /// Value of the `ts-cookie` cookie.
    pub cookie: String,
}

/// Client tag prepended to the support id header.
pub const SUPPORT_ID_PREFIX: &str = "WEB_";

impl AuthSession {
    /// Whether every credential is present.
    pub fn is_usable(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the credentials that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("channel", &self.channel),
            ("accessToken", &self.access_token),
            ("sessionId", &self.session_id),
            ("supportId", &self.support_id),
            ("cookie", &self.cookie),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Value for the `x-ts-supportid` header.
    pub fn support_header(&self) -> String {
        format!("{SUPPORT_ID_PREFIX}{}", self.support_id)
    }
}

/// A session as issued by the handshake, with the lifetime the provider
/// reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub session: AuthSession,
    pub lifetime: Option<Duration>,
}

// Tokens stay out of logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("channel", &self.channel)
            .field("session_id", &self.session_id)
            .field("support_id", &self.support_id)
            .field("access_token", &"<redacted>")
            .field("cookie", &"<redacted>")
            .finish()
    }
}
