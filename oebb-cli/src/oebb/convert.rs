//! Conversion between ÖBB DTOs and domain types.
//!
//! Fallback rules for optional fields live here and nowhere else: empty
//! delay strings become `None`, empty category names fall back to the short
//! code, and a station's meta label is kept only when non-empty.

use std::time::Duration;

use crate::domain::{
    AuthSession, Category, Connection, JourneySearchRequest, Section, SessionGrant, Station,
    StationLeg, TimeError, format_timestamp, parse_optional_timestamp, parse_timestamp,
};

use super::error::OebbError;
use super::types::{
    ArrivalDto, AuthResponse, CategoryDto, ChallengedFlagsDto, ConnectionDto,
    ConnectionsResponse, DebugFilterDto, DepartureDto, EmptyObject, FilterDto,
    JourneyRequestDto, PassengerDto, SectionDto, StationDto,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl From<ConversionError> for OebbError {
    fn from(err: ConversionError) -> Self {
        let message = err.to_string();
        match err {
            ConversionError::InvalidTime(e) => OebbError::Time(e),
            ConversionError::MissingField(_) => OebbError::Json {
                message,
                body: None,
            },
        }
    }
}

/// Convert the init response into a session grant.
///
/// `set_cookie` is the `ts-cookie` value from the response headers, which
/// takes precedence over a `cookie` field in the body. Missing credentials
/// become empty strings; the caller decides whether the session is usable.
pub fn convert_auth(resp: AuthResponse, set_cookie: Option<String>) -> SessionGrant {
    let access_token = non_empty(resp.access_token)
        .or_else(|| resp.token.and_then(|t| non_empty(t.access_token)))
        .unwrap_or_default();

    let session = AuthSession {
        channel: resp.channel.unwrap_or_default(),
        access_token,
        session_id: resp.session_id.unwrap_or_default(),
        support_id: resp.support_id.unwrap_or_default(),
        cookie: non_empty(set_cookie)
            .or_else(|| non_empty(resp.cookie))
            .unwrap_or_default(),
    };

    SessionGrant {
        session,
        lifetime: resp
            .session_timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
    }
}

/// Convert a station search result.
pub fn convert_station(dto: StationDto) -> Station {
    Station {
        name: dto.name,
        meta: non_empty(Some(dto.meta)),
        number: dto.number,
        latitude: dto.latitude,
        longitude: dto.longitude,
    }
}

/// Convert a station back to the shape the timetable endpoint expects.
pub fn station_to_dto(station: &Station) -> StationDto {
    StationDto {
        latitude: station.latitude,
        longitude: station.longitude,
        name: station.name.clone(),
        meta: station.meta.clone().unwrap_or_default(),
        number: station.number,
    }
}

/// Build the wire body for a timetable search.
pub fn request_to_dto(req: &JourneySearchRequest) -> JourneyRequestDto {
    let filter = req.filter();
    let debug = req.debug_filter();

    JourneyRequestDto {
        reverse: false,
        datetime_departure: format_timestamp(&req.departure()),
        filter: FilterDto {
            regionaltrains: filter.regional_trains,
            direct: filter.direct,
            change_time: filter.change_time,
            wheelchair: filter.wheelchair,
            bikes: filter.bikes,
            trains: filter.trains,
            motorail: filter.motorail,
            dropped_connections: filter.dropped_connections,
        },
        passengers: req
            .passengers()
            .iter()
            .map(|p| PassengerDto {
                kind: p.kind.as_str().to_string(),
                id: p.id,
                me: false,
                remembered: false,
                challenged_flags: ChallengedFlagsDto {
                    has_handicapped_pass: p.challenged.has_handicapped_pass,
                    has_assistance_dog: p.challenged.has_assistance_dog,
                    has_wheelchair: p.challenged.has_wheelchair,
                    has_attendant: p.challenged.has_attendant,
                },
                relations: Vec::new(),
                cards: Vec::new(),
                birthdate_changeable: true,
                birthdate_deletable: true,
                name_changeable: true,
                passenger_deletable: true,
                is_selected: false,
            })
            .collect(),
        count: req.count(),
        debug_filter: DebugFilterDto {
            no_aggregation_filter: debug.no_aggregation_filter,
            no_eqclass_filter: debug.no_eqclass_filter,
            no_nrtpath_filter: debug.no_nrtpath_filter,
            no_payment_filter: debug.no_payment_filter,
            use_tripart_filter: debug.use_tripart_filter,
            no_vbx_filter: debug.no_vbx_filter,
            no_categories_filter: debug.no_categories_filter,
        },
        sort_type: req.sort().as_str().to_string(),
        from: station_to_dto(req.from()),
        to: station_to_dto(req.to()),
        timeout: EmptyObject {},
    }
}

/// Convert a timetable response, preserving the provider's ordering.
///
/// An absent `connections` key is the same as an empty list.
pub fn convert_connections(resp: ConnectionsResponse) -> Result<Vec<Connection>, ConversionError> {
    resp.connections
        .unwrap_or_default()
        .into_iter()
        .map(convert_connection)
        .collect()
}

fn convert_connection(dto: ConnectionDto) -> Result<Connection, ConversionError> {
    let from = convert_departure(dto.from.ok_or(ConversionError::MissingField("connection.from"))?)?;
    let to = convert_arrival(dto.to.ok_or(ConversionError::MissingField("connection.to"))?)?;

    let sections = dto
        .sections
        .unwrap_or_default()
        .into_iter()
        .map(convert_section)
        .collect::<Result<Vec<_>, _>>()?;

    let duration_ms = dto
        .duration
        .unwrap_or_else(|| (to.scheduled - from.scheduled).num_milliseconds());

    let switches = dto
        .switches
        .unwrap_or_else(|| sections_with_category(&sections).saturating_sub(1));

    Ok(Connection {
        id: non_empty(dto.id),
        from,
        to,
        sections,
        switches,
        duration_ms,
    })
}

fn sections_with_category(sections: &[Section]) -> u32 {
    sections.iter().filter(|s| s.category.is_some()).count() as u32
}

fn convert_section(dto: SectionDto) -> Result<Section, ConversionError> {
    let from = convert_departure(dto.from.ok_or(ConversionError::MissingField("section.from"))?)?;
    let to = convert_arrival(dto.to.ok_or(ConversionError::MissingField("section.to"))?)?;

    let duration_ms = dto
        .duration
        .unwrap_or_else(|| (to.scheduled - from.scheduled).num_milliseconds());

    Ok(Section {
        from,
        to,
        duration_ms,
        category: dto.category.and_then(convert_category),
        kind: non_empty(dto.kind),
        has_realtime: dto.has_realtime.unwrap_or(false),
    })
}

fn convert_departure(dto: DepartureDto) -> Result<StationLeg, ConversionError> {
    let scheduled = dto
        .departure
        .as_deref()
        .ok_or(ConversionError::MissingField("departure"))?;

    Ok(StationLeg {
        name: dto.name.unwrap_or_default(),
        scheduled: parse_timestamp(scheduled)?,
        delayed: parse_optional_timestamp(dto.departure_delay.as_deref())?,
        platform: non_empty(dto.departure_platform_deviation).or(non_empty(dto.departure_platform)),
    })
}

fn convert_arrival(dto: ArrivalDto) -> Result<StationLeg, ConversionError> {
    let scheduled = dto
        .arrival
        .as_deref()
        .ok_or(ConversionError::MissingField("arrival"))?;

    Ok(StationLeg {
        name: dto.name.unwrap_or_default(),
        scheduled: parse_timestamp(scheduled)?,
        delayed: parse_optional_timestamp(dto.arrival_delay.as_deref())?,
        platform: non_empty(dto.arrival_platform_deviation).or(non_empty(dto.arrival_platform)),
    })
}

/// Convert a category, or `None` if it carries no usable name.
///
/// The generic `name` field (e.g. `"RJ"` for all Railjets) stands in for a
/// missing short code.
fn convert_category(dto: CategoryDto) -> Option<Category> {
    let short = non_empty(dto.short_name).or(non_empty(dto.name));
    let display = non_empty(dto.display_name);

    let mut category = Category::new(
        short.as_deref().unwrap_or_default(),
        display.as_deref().unwrap_or_default(),
    )?;

    category.long_name = dto
        .long_name
        .and_then(|l| non_empty(l.de).or(non_empty(l.en)).or(non_empty(l.it)));
    category.background_color = non_empty(dto.background_color);
    category.font_color = non_empty(dto.font_color);
    category.bar_color = non_empty(dto.bar_color);

    Some(category)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JourneySearchRequest;
    use crate::oebb::types::{LocalizedText, TokenPair};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn departure(name: &str, time: &str, delay: Option<&str>) -> DepartureDto {
        DepartureDto {
            name: Some(name.into()),
            departure: Some(time.into()),
            departure_delay: delay.map(str::to_string),
            ..Default::default()
        }
    }

    fn arrival(name: &str, time: &str, delay: Option<&str>) -> ArrivalDto {
        ArrivalDto {
            name: Some(name.into()),
            arrival: Some(time.into()),
            arrival_delay: delay.map(str::to_string),
            ..Default::default()
        }
    }

    fn category(short: &str, display: &str) -> CategoryDto {
        CategoryDto {
            short_name: Some(short.into()),
            display_name: Some(display.into()),
            bar_color: Some("#e2002a".into()),
            ..Default::default()
        }
    }

    #[test]
    fn auth_prefers_header_cookie() {
        let resp = AuthResponse {
            access_token: Some("tok".into()),
            channel: Some("inet".into()),
            support_id: Some("sup".into()),
            session_id: Some("sid".into()),
            session_timeout: Some(1800),
            cookie: Some("body-cookie".into()),
            ..Default::default()
        };

        let grant = convert_auth(resp, Some("header-cookie".into()));
        assert_eq!(grant.session.cookie, "header-cookie");
        assert_eq!(grant.lifetime, Some(Duration::from_secs(1800)));
        assert!(grant.session.is_usable());
    }

    #[test]
    fn auth_falls_back_to_nested_token_and_body_cookie() {
        let resp = AuthResponse {
            access_token: Some(String::new()),
            token: Some(TokenPair {
                access_token: Some("nested".into()),
                refresh_token: None,
            }),
            cookie: Some("body-cookie".into()),
            session_timeout: Some(0),
            ..Default::default()
        };

        let grant = convert_auth(resp, None);
        assert_eq!(grant.session.access_token, "nested");
        assert_eq!(grant.session.cookie, "body-cookie");
        assert_eq!(grant.lifetime, None);
        assert_eq!(
            grant.session.missing_fields(),
            vec!["channel", "sessionId", "supportId"]
        );
    }

    #[test]
    fn station_meta_empty_is_none() {
        let station = convert_station(StationDto {
            name: "Wien Hbf".into(),
            meta: String::new(),
            number: 1290401,
            ..Default::default()
        });
        assert_eq!(station.meta, None);
        assert_eq!(station_to_dto(&station).meta, "");
    }

    #[test]
    fn request_body_shape() {
        let from = convert_station(StationDto {
            name: "Wien Hbf".into(),
            number: 1290401,
            latitude: 48185184,
            longitude: 16376413,
            ..Default::default()
        });
        let to = convert_station(StationDto {
            name: "Salzburg Hbf".into(),
            number: 8100002,
            ..Default::default()
        });
        let req = JourneySearchRequest::build(from, to, at(9, 30), 5);

        let json = serde_json::to_value(request_to_dto(&req)).unwrap();

        assert_eq!(json["reverse"], false);
        assert_eq!(json["datetimeDeparture"], "2024-03-15T09:30:00.000");
        assert_eq!(json["count"], 5);
        assert_eq!(json["sortType"], "DEPARTURE");
        assert_eq!(json["from"]["number"], 1290401);
        assert_eq!(json["from"]["latitude"], 48185184);
        assert_eq!(json["to"]["name"], "Salzburg Hbf");
        assert_eq!(json["timeout"], serde_json::json!({}));

        let passengers = json["passengers"].as_array().unwrap();
        assert_eq!(passengers.len(), 1);
        assert_eq!(passengers[0]["type"], "ADULT");
        assert_eq!(passengers[0]["challengedFlags"]["hasWheelchair"], false);
        assert_eq!(passengers[0]["cards"], serde_json::json!([]));

        let filter = json["filter"].as_object().unwrap();
        assert_eq!(filter.len(), 8);
        assert!(filter.values().all(|v| v == false));
        assert!(filter.contains_key("regionaltrains"));
        assert!(filter.contains_key("droppedConnections"));

        let debug = json["debugFilter"].as_object().unwrap();
        assert!(debug.values().all(|v| v == false));
    }

    #[test]
    fn connection_delays_optional() {
        let resp = ConnectionsResponse {
            connections: Some(vec![ConnectionDto {
                id: Some("c1".into()),
                from: Some(departure("Wien Hbf", "2024-03-15T10:00:00.000", Some(""))),
                to: Some(arrival(
                    "Salzburg Hbf",
                    "2024-03-15T12:30:00.000",
                    Some("2024-03-15T12:36:00.000"),
                )),
                sections: None,
                switches: Some(0),
                duration: Some(9_000_000),
            }]),
        };

        let conns = convert_connections(resp).unwrap();
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].from.delayed, None);
        assert_eq!(conns[0].to.delayed, Some(at(12, 36)));
        assert!(conns[0].sections.is_empty());
    }

    #[test]
    fn absent_connections_is_empty() {
        let conns = convert_connections(ConnectionsResponse { connections: None }).unwrap();
        assert!(conns.is_empty());
    }

    #[test]
    fn section_category_fallbacks() {
        let section = convert_section(SectionDto {
            from: Some(departure("Wien Hbf", "2024-03-15T10:00:00.000", None)),
            to: Some(arrival("Linz Hbf", "2024-03-15T11:15:00.000", None)),
            duration: None,
            category: Some(CategoryDto {
                long_name: Some(LocalizedText {
                    de: Some(String::new()),
                    en: Some("Railjet Xpress".into()),
                    it: None,
                }),
                ..category("RJX", "")
            }),
            kind: Some("journey".into()),
            has_realtime: Some(true),
        })
        .unwrap();

        let cat = section.category.unwrap();
        assert_eq!(cat.display_name(), "RJX");
        assert_eq!(cat.long_name.as_deref(), Some("Railjet Xpress"));
        assert_eq!(cat.bar_color.as_deref(), Some("#e2002a"));
        assert_eq!(section.duration_ms, 75 * 60 * 1000);
        assert!(section.has_realtime);
    }

    #[test]
    fn walk_section_has_no_category() {
        let section = convert_section(SectionDto {
            from: Some(departure("Linz Hbf", "2024-03-15T11:15:00.000", None)),
            to: Some(arrival("Linz Hbf", "2024-03-15T11:20:00.000", None)),
            category: Some(category("", "")),
            kind: Some("walk".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(section.category.is_none());
        assert_eq!(section.kind.as_deref(), Some("walk"));
        assert!(!section.has_realtime);
    }

    #[test]
    fn category_name_stands_in_for_short_name() {
        let cat = convert_category(CategoryDto {
            name: Some("REX".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cat.display_name(), "REX");
    }

    #[test]
    fn missing_departure_is_error() {
        let resp = ConnectionsResponse {
            connections: Some(vec![ConnectionDto {
                from: Some(DepartureDto::default()),
                to: Some(arrival("x", "2024-03-15T12:30:00.000", None)),
                ..Default::default()
            }]),
        };

        let err = convert_connections(resp).unwrap_err();
        assert!(matches!(err, ConversionError::MissingField("departure")));
    }

    #[test]
    fn bad_delay_is_time_error() {
        let resp = ConnectionsResponse {
            connections: Some(vec![ConnectionDto {
                from: Some(departure("a", "2024-03-15T10:00:00.000", Some("late"))),
                to: Some(arrival("b", "2024-03-15T12:30:00.000", None)),
                ..Default::default()
            }]),
        };

        let err: OebbError = convert_connections(resp).unwrap_err().into();
        assert!(matches!(err, OebbError::Time(_)));
    }

    #[test]
    fn switches_inferred_from_sections() {
        let leg = |h: u32| SectionDto {
            from: Some(departure("a", &format!("2024-03-15T{h:02}:00:00.000"), None)),
            to: Some(arrival("b", &format!("2024-03-15T{h:02}:30:00.000"), None)),
            category: Some(category("RJ", "")),
            ..Default::default()
        };
        let resp = ConnectionsResponse {
            connections: Some(vec![ConnectionDto {
                from: Some(departure("a", "2024-03-15T10:00:00.000", None)),
                to: Some(arrival("b", "2024-03-15T12:30:00.000", None)),
                sections: Some(vec![leg(10), leg(11), leg(12)]),
                ..Default::default()
            }]),
        };

        let conns = convert_connections(resp).unwrap();
        assert_eq!(conns[0].switches, 2);
        assert_eq!(conns[0].duration_ms, 150 * 60 * 1000);
    }
}
