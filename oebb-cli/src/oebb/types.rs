//! ÖBB API request and response DTOs.
//!
//! These types map directly to the JSON of the `tickets.oebb.at` API.
//! Responses use `Option` liberally because the provider omits fields,
//! sends `null`, or sends empty strings depending on the connection.

use serde::{Deserialize, Deserializer, Serialize};

/// Response from the session init endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub access_token: Option<String>,
    pub token: Option<TokenPair>,
    pub channel: Option<String>,
    pub support_id: Option<String>,
    pub session_id: Option<String>,

    /// Session lifetime in seconds as reported by the provider.
    pub session_timeout: Option<u64>,

    /// When the provider created the session (ISO 8601).
    pub session_created_at: Option<String>,

    /// Not normally part of the body; the cookie arrives as `Set-Cookie`.
    pub cookie: Option<String>,
}

/// Nested token object; the top-level `accessToken` is preferred.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// A station as returned by the station search and echoed in journey
/// requests.
///
/// Every field is echoed back verbatim, so `null` and missing values are
/// read as the type's default instead of being kept as `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationDto {
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of the timetable search POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRequestDto {
    pub reverse: bool,
    pub datetime_departure: String,
    pub filter: FilterDto,
    pub passengers: Vec<PassengerDto>,
    pub count: u32,
    pub debug_filter: DebugFilterDto,
    pub sort_type: String,
    pub from: StationDto,
    pub to: StationDto,
    pub timeout: EmptyObject,
}

/// Serialises as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyObject {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDto {
    pub regionaltrains: bool,
    pub direct: bool,
    pub change_time: bool,
    pub wheelchair: bool,
    pub bikes: bool,
    pub trains: bool,
    pub motorail: bool,
    pub dropped_connections: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFilterDto {
    pub no_aggregation_filter: bool,
    pub no_eqclass_filter: bool,
    pub no_nrtpath_filter: bool,
    pub no_payment_filter: bool,
    pub use_tripart_filter: bool,
    pub no_vbx_filter: bool,
    pub no_categories_filter: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengedFlagsDto {
    pub has_handicapped_pass: bool,
    pub has_assistance_dog: bool,
    pub has_wheelchair: bool,
    pub has_attendant: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub me: bool,
    pub remembered: bool,
    pub challenged_flags: ChallengedFlagsDto,
    pub relations: Vec<serde_json::Value>,
    pub cards: Vec<serde_json::Value>,
    pub birthdate_changeable: bool,
    pub birthdate_deletable: bool,
    pub name_changeable: bool,
    pub passenger_deletable: bool,
    pub is_selected: bool,
}

/// Response from the timetable search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionsResponse {
    pub connections: Option<Vec<ConnectionDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionDto {
    pub id: Option<String>,
    pub from: Option<DepartureDto>,
    pub to: Option<ArrivalDto>,
    pub sections: Option<Vec<SectionDto>>,
    pub switches: Option<u32>,
    pub duration: Option<i64>,
}

/// Origin end of a connection or section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartureDto {
    pub name: Option<String>,
    pub esn: Option<i64>,
    pub departure: Option<String>,
    /// Realtime departure; empty or absent when on time or unknown.
    pub departure_delay: Option<String>,
    pub departure_platform: Option<String>,
    pub departure_platform_deviation: Option<String>,
}

/// Destination end of a connection or section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrivalDto {
    pub name: Option<String>,
    pub esn: Option<i64>,
    pub arrival: Option<String>,
    /// Realtime arrival; empty or absent when on time or unknown.
    pub arrival_delay: Option<String>,
    pub arrival_platform: Option<String>,
    pub arrival_platform_deviation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionDto {
    pub from: Option<DepartureDto>,
    pub to: Option<ArrivalDto>,
    pub duration: Option<i64>,
    pub category: Option<CategoryDto>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub has_realtime: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDto {
    pub name: Option<String>,
    pub number: Option<String>,
    pub short_name: Option<String>,
    pub display_name: Option<String>,
    pub long_name: Option<LocalizedText>,
    pub background_color: Option<String>,
    pub font_color: Option<String>,
    pub bar_color: Option<String>,
    pub train: Option<bool>,
}

/// Text in the provider's three UI languages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub de: Option<String>,
    pub en: Option<String>,
    pub it: Option<String>,
}
