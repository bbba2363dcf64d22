//! Resolved station records.

use std::fmt;

/// A station returned by the station search endpoint.
///
/// Coordinates are integer micro-degrees, exactly as the provider sends
/// them; they are passed back unchanged in journey requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Display name. May be empty for meta stations.
    pub name: String,

    /// Label for meta stations ("Wien (alle Bahnhöfe)"), used when `name`
    /// is empty.
    pub meta: Option<String>,

    /// Provider station number (EVA/IBNR style).
    pub number: i64,

    pub latitude: i64,
    pub longitude: i64,
}

impl Station {
    /// Name for display, falling back to the meta label.
    ///
    /// # Examples
    ///
    /// ```
    /// use oebb_cli::domain::Station;
    ///
    /// let mut station = Station {
    ///     name: String::new(),
    ///     meta: Some("Wien".into()),
    ///     number: 1190100,
    ///     latitude: 48208548,
    ///     longitude: 16372132,
    /// };
    /// assert_eq!(station.name_or_meta(), "Wien");
    ///
    /// station.name = "Wien Hbf".into();
    /// assert_eq!(station.name_or_meta(), "Wien Hbf");
    /// ```
    pub fn name_or_meta(&self) -> &str {
        if self.name.is_empty() {
            self.meta.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_or_meta())
    }
}
