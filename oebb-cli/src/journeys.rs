//! Journey search between two resolved stations.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{AuthSession, Connection, JourneySearchRequest, Station};
use crate::oebb::{OebbClient, OebbError};

/// Trait for timetable search backends.
///
/// This abstraction allows the query to be tested with mock data.
pub trait TimetableSearch {
    /// Execute a search. The result may be empty.
    fn search_timetable(
        &self,
        request: &JourneySearchRequest,
        session: &AuthSession,
    ) -> impl Future<Output = Result<Vec<Connection>, OebbError>>;
}

impl TimetableSearch for OebbClient {
    async fn search_timetable(
        &self,
        request: &JourneySearchRequest,
        session: &AuthSession,
    ) -> Result<Vec<Connection>, OebbError> {
        self.timetable(request, session).await
    }
}

/// Builds and runs timetable searches.
pub struct JourneyQuery<'a, T> {
    timetable: &'a T,
}

impl<'a, T: TimetableSearch> JourneyQuery<'a, T> {
    /// Create a new query runner.
    pub fn new(timetable: &'a T) -> Self {
        Self { timetable }
    }

    /// Build a request with the fixed passenger and filter defaults.
    pub fn build(
        from: Station,
        to: Station,
        departure: NaiveDateTime,
        count: u32,
    ) -> JourneySearchRequest {
        JourneySearchRequest::build(from, to, departure, count)
    }

    /// Run a request.
    ///
    /// Connections keep the provider's order. An empty list is a valid
    /// "no connections" answer, not an error.
    pub async fn execute(
        &self,
        request: &JourneySearchRequest,
        session: &AuthSession,
    ) -> Result<Vec<Connection>, OebbError> {
        let connections = self.timetable.search_timetable(request, session).await?;
        debug!(
            from = %request.from(),
            to = %request.to(),
            found = connections.len(),
            "journey search complete"
        );
        Ok(connections)
    }

    /// Build and run a search in one step.
    pub async fn search(
        &self,
        from: Station,
        to: Station,
        departure: NaiveDateTime,
        count: u32,
        session: &AuthSession,
    ) -> Result<Vec<Connection>, OebbError> {
        let request = Self::build(from, to, departure, count);
        self.execute(&request, session).await
    }
}
