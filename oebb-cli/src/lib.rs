//! ÖBB journey search client.
//!
//! Authenticates against the ÖBB tickets API (caching the session between
//! runs), resolves station names, and searches train connections.
//!
//! The flow is strictly sequential: [`session::SessionManager`] yields an
//! [`domain::AuthSession`], which is passed to [`stations::StationResolver`]
//! for origin and destination and then to [`journeys::JourneyQuery`].

pub mod cache;
pub mod display;
pub mod domain;
pub mod journeys;
pub mod oebb;
pub mod session;
pub mod stations;
