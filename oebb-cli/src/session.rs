//! Session lifecycle: reuse a cached session or perform a fresh handshake.
//!
//! The session is returned by value and threaded through every later call;
//! nothing here is global. The cache is advisory, so every cache problem
//! degrades to a refresh and a failed write only costs the next run a
//! handshake.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::KeyValueCache;
use crate::domain::{AuthSession, SessionGrant};
use crate::oebb::{OebbClient, OebbError};

/// Cache key of the persisted session record.
pub const AUTH_CACHE_KEY: &str = "auth.json";

/// Lifetime assumed when the provider does not report one.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 60);

/// Source of fresh sessions.
///
/// This abstraction allows the session manager to be tested without network
/// access.
pub trait Authenticator {
    /// Perform the handshake once.
    fn authenticate(&self) -> impl Future<Output = Result<SessionGrant, OebbError>>;
}

impl Authenticator for OebbClient {
    async fn authenticate(&self) -> Result<SessionGrant, OebbError> {
        self.init_session().await
    }
}

/// How long cached sessions are trusted.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Maximum age of a cached session whose grant carried no lifetime.
    pub fallback_max_age: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            fallback_max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// The persisted form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSession {
    fetched_at: DateTime<Utc>,
    timeout_secs: Option<u64>,
    session: AuthSession,
}

impl CachedSession {
    fn new(grant: &SessionGrant, fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            timeout_secs: grant.lifetime.map(|d| d.as_secs()),
            session: grant.session.clone(),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>, policy: &SessionPolicy) -> bool {
        let lifetime = self
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(policy.fallback_max_age);

        // A record from the future (clock change) is not trusted.
        match (now - self.fetched_at).to_std() {
            Ok(age) => age < lifetime,
            Err(_) => false,
        }
    }
}

/// Obtains a usable session, preferring the persistent cache.
pub struct SessionManager<'a, C, A> {
    cache: &'a C,
    authenticator: &'a A,
    policy: SessionPolicy,
}

impl<'a, C: KeyValueCache, A: Authenticator> SessionManager<'a, C, A> {
    /// Create a new session manager.
    pub fn new(cache: &'a C, authenticator: &'a A, policy: SessionPolicy) -> Self {
        Self {
            cache,
            authenticator,
            policy,
        }
    }

    /// Return the cached session if it is usable, otherwise authenticate.
    ///
    /// Fails with [`OebbError::Auth`] only when the handshake fails.
    pub async fn get_or_refresh(&self) -> Result<AuthSession, OebbError> {
        self.get_or_refresh_at(Utc::now()).await
    }

    async fn get_or_refresh_at(&self, now: DateTime<Utc>) -> Result<AuthSession, OebbError> {
        if let Some(session) = self.cached_at(now) {
            debug!(session_id = %session.session_id, "using cached session");
            return Ok(session);
        }
        self.refresh_at(now).await
    }

    /// Discard the cached session and authenticate again.
    ///
    /// The old record is removed first, so a failed handshake leaves no
    /// session behind for the next run.
    pub async fn refresh(&self) -> Result<AuthSession, OebbError> {
        self.invalidate();
        self.refresh_at(Utc::now()).await
    }

    /// Remove the cached session, if any.
    pub fn invalidate(&self) {
        match self.cache.remove(AUTH_CACHE_KEY) {
            Ok(()) => debug!("cached session removed"),
            Err(e) => warn!(error = %e, "failed to remove cached session"),
        }
    }

    async fn refresh_at(&self, now: DateTime<Utc>) -> Result<AuthSession, OebbError> {
        let grant = self
            .authenticator
            .authenticate()
            .await
            .map_err(|e| OebbError::Auth(e.to_string()))?;

        let missing = grant.session.missing_fields();
        if !missing.is_empty() {
            return Err(OebbError::Auth(format!(
                "handshake returned an incomplete session (missing {})",
                missing.join(", ")
            )));
        }

        debug!(session_id = %grant.session.session_id, "authenticated");
        self.store(&grant, now);
        Ok(grant.session)
    }

    /// Look up a usable, unexpired session in the cache.
    fn cached_at(&self, now: DateTime<Utc>) -> Option<AuthSession> {
        let bytes = self.cache.get(AUTH_CACHE_KEY)?;

        let record: CachedSession = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "discarding undecodable cached session");
                return None;
            }
        };

        if !record.session.is_usable() {
            debug!("discarding incomplete cached session");
            return None;
        }

        if !record.is_fresh(now, &self.policy) {
            debug!(fetched_at = %record.fetched_at, "discarding expired cached session");
            return None;
        }

        Some(record.session)
    }

    fn store(&self, grant: &SessionGrant, now: DateTime<Utc>) {
        let record = CachedSession::new(grant, now);
        let result = serde_json::to_vec(&record)
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                self.cache
                    .put(AUTH_CACHE_KEY, &bytes)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            warn!(error = %e, "failed to cache session");
        }
    }
}
