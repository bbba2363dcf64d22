//! Journey search request envelope.

use chrono::NaiveDateTime;

use super::Station;

/// Default number of connections requested.
pub const DEFAULT_RESULT_COUNT: u32 = 5;

/// Passenger id the web client sends for an anonymous adult.
const ANONYMOUS_PASSENGER_ID: i64 = 1554277150;

/// Ordering of the returned connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    /// Soonest departure first.
    Departure,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Departure => "DEPARTURE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerType {
    Adult,
}

impl PassengerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerType::Adult => "ADULT",
        }
    }
}

/// Accessibility needs of a passenger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChallengedFlags {
    pub has_handicapped_pass: bool,
    pub has_assistance_dog: bool,
    pub has_wheelchair: bool,
    pub has_attendant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passenger {
    pub kind: PassengerType,
    pub id: i64,
    pub challenged: ChallengedFlags,
}

impl Passenger {
    /// An adult with no discount cards and no accessibility flags.
    pub fn anonymous_adult() -> Self {
        Self {
            kind: PassengerType::Adult,
            id: ANONYMOUS_PASSENGER_ID,
            challenged: ChallengedFlags::default(),
        }
    }
}

/// Connection filters. All disabled means "any train, any change".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub regional_trains: bool,
    pub direct: bool,
    pub change_time: bool,
    pub wheelchair: bool,
    pub bikes: bool,
    pub trains: bool,
    pub motorail: bool,
    pub dropped_connections: bool,
}

/// Provider-internal result filters; always left disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFilter {
    pub no_aggregation_filter: bool,
    pub no_eqclass_filter: bool,
    pub no_nrtpath_filter: bool,
    pub no_payment_filter: bool,
    pub use_tripart_filter: bool,
    pub no_vbx_filter: bool,
    pub no_categories_filter: bool,
}

/// A timetable search between two resolved stations.
///
/// Only the stations, departure time and count vary; the passenger list and
/// filters are fixed by [`JourneySearchRequest::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneySearchRequest {
    from: Station,
    to: Station,
    departure: NaiveDateTime,
    count: u32,
    sort: SortType,
    passengers: Vec<Passenger>,
    filter: SearchFilter,
    debug_filter: DebugFilter,
}

impl JourneySearchRequest {
    /// Build a request with the fixed defaults.
    ///
    /// A `count` of zero is raised to one; the provider rejects empty
    /// searches.
    pub fn build(from: Station, to: Station, departure: NaiveDateTime, count: u32) -> Self {
        Self {
            from,
            to,
            departure,
            count: count.max(1),
            sort: SortType::Departure,
            passengers: vec![Passenger::anonymous_adult()],
            filter: SearchFilter::default(),
            debug_filter: DebugFilter::default(),
        }
    }

    pub fn from(&self) -> &Station {
        &self.from
    }

    pub fn to(&self) -> &Station {
        &self.to
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sort(&self) -> SortType {
        self.sort
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn debug_filter(&self) -> &DebugFilter {
        &self.debug_filter
    }
}
