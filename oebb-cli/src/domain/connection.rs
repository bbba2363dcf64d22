//! Connections returned by the timetable search.
//!
//! These are the validated counterparts of the timetable DTOs: timestamps are
//! parsed, absent realtime data is `None` rather than an empty string, and
//! category names carry an explicit fallback.

use chrono::NaiveDateTime;

/// One end of a connection or section.
///
/// `scheduled` is the departure time for an origin leg and the arrival time
/// for a destination leg. `delayed` is the realtime estimate, present only
/// when the provider reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationLeg {
    pub name: String,
    pub scheduled: NaiveDateTime,
    pub delayed: Option<NaiveDateTime>,
    pub platform: Option<String>,
}

impl StationLeg {
    /// Whether a realtime estimate is present.
    pub fn is_delayed(&self) -> bool {
        self.delayed.is_some()
    }
}

/// Display metadata for the transport line of a section.
///
/// `short_name` is never empty; construction goes through [`Category::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    short_name: String,
    display_name: Option<String>,
    pub long_name: Option<String>,
    pub background_color: Option<String>,
    pub font_color: Option<String>,
    pub bar_color: Option<String>,
}

impl Category {
    /// Build a category from the provider's short and display names.
    ///
    /// Returns `None` when both are empty. If only the display name is
    /// present it doubles as the short code.
    ///
    /// # Examples
    ///
    /// ```
    /// use oebb_cli::domain::Category;
    ///
    /// let rj = Category::new("RJ", "").unwrap();
    /// assert_eq!(rj.display_name(), "RJ");
    ///
    /// let rj = Category::new("RJ", "Railjet").unwrap();
    /// assert_eq!(rj.display_name(), "Railjet");
    ///
    /// assert!(Category::new("", " ").is_none());
    /// ```
    pub fn new(short_name: &str, display_name: &str) -> Option<Self> {
        let short_name = short_name.trim();
        let display_name = Some(display_name.trim()).filter(|s| !s.is_empty());

        let short_name = match (short_name.is_empty(), display_name) {
            (false, _) => short_name.to_string(),
            (true, Some(display)) => display.to_string(),
            (true, None) => return None,
        };

        Some(Self {
            short_name,
            display_name: display_name.map(str::to_string),
            long_name: None,
            background_color: None,
            font_color: None,
            bar_color: None,
        })
    }

    /// Name to show: the display name, falling back to the short code.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.short_name)
    }
}

/// One uninterrupted leg of a connection on a single service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub from: StationLeg,
    pub to: StationLeg,
    pub duration_ms: i64,
    /// Absent for walks and transfers.
    pub category: Option<Category>,
    /// Provider section type (`"journey"`, `"walk"`, ...).
    pub kind: Option<String>,
    pub has_realtime: bool,
}

/// One complete itinerary between two stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: Option<String>,
    pub from: StationLeg,
    pub to: StationLeg,
    pub sections: Vec<Section>,
    /// Number of changes.
    pub switches: u32,
    pub duration_ms: i64,
}
