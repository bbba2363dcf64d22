//! ÖBB tickets API HTTP client.
//!
//! Provides async methods for the three endpoints the journey search needs:
//! session init, station search and the timetable search. Every call has a
//! timeout budget; callers cancel a call by dropping its future.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, SET_COOKIE, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{AuthSession, Connection, JourneySearchRequest, SessionGrant, Station};

use super::convert::{convert_auth, convert_connections, convert_station, request_to_dto};
use super::error::OebbError;
use super::types::{AuthResponse, ConnectionsResponse, StationDto};

/// Default base URL for the tickets API.
const DEFAULT_BASE_URL: &str = "https://tickets.oebb.at";

const INIT_PATH: &str = "/api/domain/v3/init";
const STATIONS_PATH: &str = "/api/hafas/v1/stations";
const TIMETABLE_PATH: &str = "/api/hafas/v4/timetable";

/// Name of the session cookie set by the init endpoint.
pub const SESSION_COOKIE: &str = "ts-cookie";

/// Header carrying the prefixed support id.
const SUPPORT_ID_HEADER: &str = "x-ts-supportid";

/// Configuration for the ÖBB client.
#[derive(Debug, Clone)]
pub struct OebbConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl OebbConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("oebb-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set connect timeout.
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

impl Default for OebbConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// ÖBB tickets API client.
#[derive(Debug, Clone)]
pub struct OebbClient {
    http: reqwest::Client,
    base_url: String,
}

impl OebbClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OebbConfig) -> Result<Self, OebbError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| OebbError::Api {
            status: 0,
            message: "Invalid user agent".to_string(),
        })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform the unauthenticated session handshake.
    ///
    /// The returned session may be incomplete; callers check
    /// [`AuthSession::is_usable`].
    pub async fn init_session(&self) -> Result<SessionGrant, OebbError> {
        let url = self.url(INIT_PATH);
        debug!(%url, "requesting session");

        let response = check_status(self.http.get(&url).send().await?).await?;
        let cookie = session_cookie(response.headers());
        let auth: AuthResponse = read_json(response).await?;

        Ok(convert_auth(auth, cookie))
    }

    /// Search stations by free-text name.
    ///
    /// Returns candidates in the provider's ranking. The list may be empty.
    pub async fn stations(
        &self,
        name: &str,
        session: &AuthSession,
    ) -> Result<Vec<Station>, OebbError> {
        let url = self.url(STATIONS_PATH);
        debug!(%url, name, "searching stations");

        let request = with_session(self.http.get(&url).query(&[("name", name)]), session);
        let response = check_status(request.send().await?).await?;
        let stations: Vec<StationDto> = read_json(response).await?;

        Ok(stations.into_iter().map(convert_station).collect())
    }

    /// Run a timetable search.
    ///
    /// Returns connections in the provider's order. The list may be empty.
    pub async fn timetable(
        &self,
        request: &JourneySearchRequest,
        session: &AuthSession,
    ) -> Result<Vec<Connection>, OebbError> {
        let url = self.url(TIMETABLE_PATH);
        let body = serde_json::to_vec(&request_to_dto(request))
            .map_err(|e| OebbError::json(e, ""))?;
        debug!(%url, count = request.count(), "searching connections");

        let builder = with_session(self.http.post(&url), session)
            .header(CONTENT_TYPE, "application/json")
            .header(SUPPORT_ID_HEADER, session.support_header())
            .header(COOKIE, format!("{SESSION_COOKIE}={}", session.cookie))
            .body(body);

        let response = check_status(builder.send().await?).await?;
        let connections: ConnectionsResponse = read_json(response).await?;

        Ok(convert_connections(connections)?)
    }
}

/// Attach the headers every authenticated call carries.
fn with_session(builder: RequestBuilder, session: &AuthSession) -> RequestBuilder {
    builder
        .header("Channel", &session.channel)
        .header("AccessToken", &session.access_token)
        .header("SessionId", &session.session_id)
}

/// Map error statuses to typed errors.
async fn check_status(response: Response) -> Result<Response, OebbError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(OebbError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OebbError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }

    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, OebbError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| OebbError::json(e, &body))
}

/// Extract the session cookie value from `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next()?.split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = OebbConfig::new()
            .with_base_url("http://localhost:8080/")
            .with_timeout(60)
            .with_connect_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = OebbConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("oebb-cli/"));
    }

    #[test]
    fn client_creation() {
        let client = OebbClient::new(OebbConfig::new());
        assert!(client.is_ok());
    }

    #[test]
    fn endpoint_urls() {
        let client =
            OebbClient::new(OebbConfig::new().with_base_url("http://127.0.0.1:9")).unwrap();
        assert_eq!(client.url(INIT_PATH), "http://127.0.0.1:9/api/domain/v3/init");
        assert_eq!(
            client.url(TIMETABLE_PATH),
            "http://127.0.0.1:9/api/hafas/v4/timetable"
        );
    }

    #[test]
    fn cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("other=1; Path=/"));
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("ts-cookie=abc123; Path=/; HttpOnly; Secure"),
        );

        assert_eq!(session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_absent_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.append(SET_COOKIE, HeaderValue::from_static("ts-cookie=; Path=/"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let client = OebbClient::new(
            OebbConfig::new()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(2)
                .with_connect_timeout(1),
        )
        .unwrap();

        let err = client.init_session().await.unwrap_err();
        assert!(matches!(err, OebbError::Http(_)));
    }
}
