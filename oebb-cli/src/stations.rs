//! Station name resolution.
//!
//! Turns free text ("Wien", "sbg hbf") into ranked station candidates. The
//! provider decides the ranking; this layer only guarantees that callers never
//! receive an empty list.

use tracing::debug;

use crate::domain::{AuthSession, Station};
use crate::oebb::{OebbClient, OebbError};

/// Trait for station search backends.
///
/// This abstraction allows the resolver to be tested with mock data.
pub trait StationSearch {
    /// Search stations by name. May return an empty list.
    fn search_stations(
        &self,
        name: &str,
        session: &AuthSession,
    ) -> impl Future<Output = Result<Vec<Station>, OebbError>>;
}

impl StationSearch for OebbClient {
    async fn search_stations(
        &self,
        name: &str,
        session: &AuthSession,
    ) -> Result<Vec<Station>, OebbError> {
        self.stations(name, session).await
    }
}

/// Resolves human-entered names to stations.
pub struct StationResolver<'a, S> {
    search: &'a S,
}

impl<'a, S: StationSearch> StationResolver<'a, S> {
    /// Create a new resolver.
    pub fn new(search: &'a S) -> Self {
        Self { search }
    }

    /// Resolve a name to candidates, best match first.
    ///
    /// The list is returned exactly as ranked by the provider. A blank name
    /// or an empty result is [`OebbError::StationNotFound`], so a successful
    /// result always has at least one element.
    pub async fn resolve(
        &self,
        name: &str,
        session: &AuthSession,
    ) -> Result<Vec<Station>, OebbError> {
        if name.trim().is_empty() {
            return Err(OebbError::StationNotFound(name.to_string()));
        }

        let stations = self.search.search_stations(name, session).await?;
        debug!(name, candidates = stations.len(), "resolved station");

        if stations.is_empty() {
            return Err(OebbError::StationNotFound(name.to_string()));
        }
        Ok(stations)
    }

    /// Resolve a name to its best match.
    pub async fn best_match(&self, name: &str, session: &AuthSession) -> Result<Station, OebbError> {
        self.resolve(name, session)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OebbError::StationNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn session() -> AuthSession {
        AuthSession {
            channel: "inet".into(),
            access_token: "t".into(),
            session_id: "s".into(),
            support_id: "p".into(),
            cookie: "c".into(),
        }
    }

    fn station(name: &str, number: i64) -> Station {
        Station {
            name: name.to_string(),
            meta: None,
            number,
            latitude: 0,
            longitude: 0,
        }
    }

    /// Mock search backend for testing.
    #[derive(Default)]
    struct MockSearch {
        results: HashMap<String, Vec<Station>>,
        queries: RefCell<Vec<String>>,
    }

    impl StationSearch for MockSearch {
        async fn search_stations(
            &self,
            name: &str,
            _session: &AuthSession,
        ) -> Result<Vec<Station>, OebbError> {
            self.queries.borrow_mut().push(name.to_string());
            Ok(self.results.get(name).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn preserves_provider_order() {
        let mut search = MockSearch::default();
        search.results.insert(
            "Wien".into(),
            vec![
                station("Wien Hbf", 1290401),
                station("Wien Meidling", 1191201),
                station("Wien Hbf", 1290401),
            ],
        );

        let resolver = StationResolver::new(&search);
        let stations = resolver.resolve("Wien", &session()).await.unwrap();

        let numbers: Vec<_> = stations.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1290401, 1191201, 1290401]);
        assert_eq!(*search.queries.borrow(), vec!["Wien".to_string()]);
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let search = MockSearch::default();
        let resolver = StationResolver::new(&search);

        let err = resolver.resolve("Atlantis", &session()).await.unwrap_err();
        assert!(matches!(err, OebbError::StationNotFound(name) if name == "Atlantis"));
    }

    #[tokio::test]
    async fn blank_name_is_not_found_without_request() {
        let search = MockSearch::default();
        let resolver = StationResolver::new(&search);

        let err = resolver.resolve("  ", &session()).await.unwrap_err();
        assert!(matches!(err, OebbError::StationNotFound(_)));
        assert!(search.queries.borrow().is_empty());
    }

    #[tokio::test]
    async fn best_match_is_first() {
        let mut search = MockSearch::default();
        search.results.insert(
            "Salzburg".into(),
            vec![station("Salzburg Hbf", 8100002), station("Salzburg Süd", 8101001)],
        );

        let resolver = StationResolver::new(&search);
        let best = resolver.best_match("Salzburg", &session()).await.unwrap();
        assert_eq!(best.number, 8100002);
    }

    #[tokio::test]
    async fn synchronous_backend_is_accepted() {
        struct Fixed;

        impl StationSearch for Fixed {
            fn search_stations(
                &self,
                name: &str,
                _session: &AuthSession,
            ) -> impl Future<Output = Result<Vec<Station>, OebbError>> {
                std::future::ready(Ok(vec![station(name, 42)]))
            }
        }

        let best = StationResolver::new(&Fixed)
            .best_match("Graz Hbf", &session())
            .await
            .unwrap();
        assert_eq!(best.name, "Graz Hbf");
        assert_eq!(best.number, 42);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        struct Failing;

        impl StationSearch for Failing {
            async fn search_stations(
                &self,
                _name: &str,
                _session: &AuthSession,
            ) -> Result<Vec<Station>, OebbError> {
                Err(OebbError::json("expected value at line 1 column 1", "<html>"))
            }
        }

        let resolver = StationResolver::new(&Failing);
        let err = resolver.resolve("Wien", &session()).await.unwrap_err();
        assert!(matches!(err, OebbError::Json { .. }));
    }
}
