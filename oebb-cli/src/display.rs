//! Terminal rendering of connections and stations.

use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

use crate::domain::{Category, Connection, Section, Station, StationLeg};

/// Station name colour.
const STATION_RGB: (u8, u8, u8) = (0xcc, 0x66, 0x66);

/// Section time colour.
const TIMES_RGB: (u8, u8, u8) = (0x55, 0x55, 0x55);

/// Format a duration in milliseconds as `HH:MM`.
///
/// Seconds are truncated; hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use oebb_cli::display::format_duration;
///
/// assert_eq!(format_duration(5_415_000), "01:30");
/// assert_eq!(format_duration(0), "00:00");
/// ```
pub fn format_duration(ms: i64) -> String {
    let minutes = ms.max(0) / 1000 / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Format a timestamp as `HH:MM`.
pub fn format_clock(t: &NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}

/// Label for a category: the display name, or the short code when the
/// provider sent no display name.
pub fn category_label(category: &Category) -> String {
    category.display_name().to_uppercase()
}

/// Parse `#rrggbb` or `#rgb` colours.
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();

    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

fn station_name(name: &str) -> ColoredString {
    let (r, g, b) = STATION_RGB;
    name.truecolor(r, g, b).bold()
}

/// Scheduled departure/arrival strings plus an optional line of realtime
/// estimates printed above them. Delayed scheduled times are struck through.
fn times_with_delays(from: &StationLeg, to: &StationLeg) -> (String, String, Option<String>) {
    let dep = format_clock(&from.scheduled);
    let arr = format_clock(&to.scheduled);

    if !from.is_delayed() && !to.is_delayed() {
        return (dep, arr, None);
    }

    let mut line = String::new();
    let dep_out = match &from.delayed {
        Some(t) => {
            line.push_str(&format!("{} ", format_clock(t).red()));
            dep.strikethrough().to_string()
        }
        None => {
            line.push_str(&" ".repeat(dep.len() + 1));
            dep
        }
    };
    let arr_out = match &to.delayed {
        Some(t) => {
            line.push_str(&format_clock(t).red().to_string());
            arr.strikethrough().to_string()
        }
        None => arr,
    };

    (dep_out, arr_out, Some(line.trim_end().to_string()))
}

/// Render one section as an indented line (plus its delay line, if any).
pub fn render_section(section: &Section) -> String {
    let (dep, arr, delay_line) = times_with_delays(&section.from, &section.to);
    let (r, g, b) = TIMES_RGB;

    let mut out = String::new();
    if let Some(line) = delay_line {
        out.push_str(&format!("\t{line}\n"));
    }

    let times = format!(
        "{}{}{}",
        dep.truecolor(r, g, b),
        "-".truecolor(r, g, b),
        arr.truecolor(r, g, b)
    );

    let label = match &section.category {
        Some(category) => {
            let text = format!("{:<3}", category_label(category)).bold().white();
            match category.bar_color.as_deref().and_then(parse_hex_color) {
                Some((br, bg, bb)) => format!("{} ", text.on_truecolor(br, bg, bb)),
                None => format!("{text} "),
            }
        }
        None => String::new(),
    };

    out.push_str(&format!(
        "\t{times} {label}{} -> {}\n",
        section.from.name, section.to.name
    ));
    out
}

/// Render a connection header line followed by its sections.
pub fn render_connection(conn: &Connection) -> String {
    let (dep, arr, delay_line) = times_with_delays(&conn.from, &conn.to);

    let mut out = String::new();
    if let Some(line) = delay_line {
        out.push_str(&format!("{line}\n"));
    }

    out.push_str(&format!(
        "{dep}-{arr} ({}) {} -> {}\n",
        format_duration(conn.duration_ms).yellow(),
        station_name(&conn.from.name),
        station_name(&conn.to.name),
    ));

    for section in &conn.sections {
        out.push_str(&render_section(section));
    }
    out
}

/// Message shown when a search found nothing.
pub fn render_no_connections(from: &Station, to: &Station) -> String {
    format!(
        "No connections found from {} to {}\n",
        station_name(from.name_or_meta()),
        station_name(to.name_or_meta())
    )
}

/// Render station candidates, best match first.
pub fn render_stations(stations: &[Station]) -> String {
    stations
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let name = if i == 0 {
                station_name(s.name_or_meta()).to_string()
            } else {
                s.name_or_meta().to_string()
            };
            format!("{name} ({})\n", s.number)
        })
        .collect()
}
