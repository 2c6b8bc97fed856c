//! Episode summary page extraction for TV.com
//!
//! The vitals trio (episode number, season number, air date) comes from
//! one fixed-format label line and is captured in a single pass; credit
//! lists come from labeled table rows.

use regex_lite::Regex;

use crate::types::{AirDate, Vitals};

use super::strip_tags;

/// Month names used to normalize air dates, January first.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Episode number, season number and raw air-date phrase from the vitals
/// line, captured together. `None` when the line is absent.
pub(crate) fn extract_vitals(doc: &str) -> Option<Vitals> {
    let re = Regex::new(
        r"Episode Number:\s*(\d+)\s*(?:&nbsp;)*\s*Season:\s*(\d+)\s*(?:&nbsp;)*\s*First Aired:\s*([^<\n]+)",
    )
    .ok()?;
    let caps = re.captures(doc)?;
    let episode_number: u32 = caps.get(1)?.as_str().parse().ok()?;
    let season_number: u32 = caps.get(2)?.as_str().parse().ok()?;
    let first_aired = parse_air_date(caps.get(3)?.as_str().trim());
    Some(Vitals {
        season_number,
        episode_number,
        first_aired,
    })
}

/// Normalize an air-date phrase (`Month D, YYYY`, weekday prefix
/// optional) to `YYYY-MM-DD`. The site's literal `n/a` is kept as the
/// not-applicable marker, as is any phrase the month table cannot
/// resolve.
pub(crate) fn parse_air_date(phrase: &str) -> AirDate {
    if phrase.eq_ignore_ascii_case("n/a") {
        return AirDate::NotApplicable;
    }
    let Ok(re) = Regex::new(r"(?:[A-Za-z]+,?\s+)?([A-Za-z]+)\s+(\d{1,2}),\s*(\d{4})") else {
        return AirDate::NotApplicable;
    };
    let Some(caps) = re.captures(phrase) else {
        return AirDate::NotApplicable;
    };
    let month = match MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(&caps[1]))
    {
        Some(index) => index + 1,
        None => return AirDate::NotApplicable,
    };
    let day: u32 = match caps[2].parse() {
        Ok(day) => day,
        Err(_) => return AirDate::NotApplicable,
    };
    AirDate::Date(format!("{}-{:02}-{:02}", &caps[3], month, day))
}

/// Names from the credit row with the given label (`Star:`, `Writer:`,
/// …): the cell after the label is split on commas and anchor markup is
/// dropped. With `strip_role` set, a trailing parenthetical role note is
/// removed from each name.
pub(crate) fn extract_people(doc: &str, label: &str, strip_role: bool) -> Vec<String> {
    let Ok(re) = Regex::new(&format!(r"(?s)>{}</td>\s*<td[^>]*>(.*?)</td>", label)) else {
        return Vec::new();
    };
    let Some(caps) = re.captures(doc) else {
        return Vec::new();
    };
    let Ok(role_re) = Regex::new(r"\s*\([^)]*\)\s*$") else {
        return Vec::new();
    };
    caps[1]
        .split(',')
        .filter_map(|token| {
            let mut name = strip_tags(token);
            if strip_role {
                name = role_re.replace(&name, "").trim().to_string();
            }
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Id of the parent show, recovered from the anchor to its cast page.
pub(crate) fn extract_series_id(doc: &str) -> Option<u32> {
    let re = Regex::new(r#"href="[^"]*/show/(\d+)/cast\.html"#).ok()?;
    let caps = re.captures(doc)?;
    let id: u32 = caps.get(1)?.as_str().parse().ok()?;
    if id > 0 {
        Some(id)
    } else {
        None
    }
}
