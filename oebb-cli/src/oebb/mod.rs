//! ÖBB tickets API client.
//!
//! This module provides an HTTP client for the `tickets.oebb.at` API used by
//! the ÖBB web shop.
//!
//! Key characteristics of the API:
//! - Every call except the session init needs the `Channel`, `AccessToken`
//!   and `SessionId` headers from the init response
//! - The timetable search additionally needs the support id header and the
//!   `ts-cookie` session cookie
//! - Timestamps are local wall-clock time without an offset
//! - Optional fields are omitted, `null`, or empty strings interchangeably

mod client;
mod convert;
mod error;
mod types;

pub use client::{OebbClient, OebbConfig, SESSION_COOKIE};
pub use convert::ConversionError;
pub use error::OebbError;
pub use types::{
    ArrivalDto, AuthResponse, CategoryDto, ConnectionDto, ConnectionsResponse, DepartureDto,
    JourneyRequestDto, SectionDto, StationDto,
};
