//! Domain types for the ÖBB journey client.
//!
//! These are the validated forms of the provider's JSON: optional fields are
//! `Option`, timestamps are parsed, and fallbacks are applied once during
//! conversion rather than at every use site.

mod connection;
mod request;
mod session;
mod station;
mod time;

pub use connection::{Category, Connection, Section, StationLeg};
pub use request::{
    ChallengedFlags, DEFAULT_RESULT_COUNT, DebugFilter, JourneySearchRequest, Passenger,
    PassengerType, SearchFilter, SortType,
};
pub use session::{AuthSession, SUPPORT_ID_PREFIX, SessionGrant};
pub use station::Station;
pub use time::{TIMESTAMP_FORMAT, TimeError, format_timestamp, parse_optional_timestamp, parse_timestamp};
