use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// ISO week identifier, rendered as `YYYY-WNN` (e.g. `2024-W41`).
///
/// Ordering follows the calendar: first by ISO year, then by week number,
/// so `BTreeMap<Week, _>` iterates weeks chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week {
    year: i32,
    week: u32,
}

/// A season is identified by the week it opens with (e.g. season `2024-W41`
/// starts on that week). Week ordinals within the season count from it.
pub type Season = Week;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed week identifier: {0:?}")]
pub struct WeekParseError(pub String);

impl Week {
    pub fn new(year: i32, week: u32) -> Option<Self> {
        // Validates the week number against the ISO calendar (52/53 weeks).
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|_| Self { year, week })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    fn monday(&self) -> NaiveDate {
        // Invariant: constructors only produce weeks valid in the ISO calendar.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The week immediately before this one, crossing year boundaries.
    pub fn previous(&self) -> Option<Week> {
        self.monday()
            .checked_sub_days(Days::new(7))
            .map(Week::from_date)
    }

    /// The week immediately after this one.
    pub fn next(&self) -> Option<Week> {
        self.monday()
            .checked_add_days(Days::new(7))
            .map(Week::from_date)
    }

    /// 1-based ordinal of this week within a season, `None` if the week
    /// predates the season's opening week.
    pub fn number_in(&self, season: Season) -> Option<u32> {
        let days = self.monday().signed_duration_since(season.monday()).num_days();
        if days < 0 {
            return None;
        }
        Some((days / 7) as u32 + 1)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for Week {
    type Err = WeekParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || WeekParseError(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let week: u32 = week.parse().map_err(|_| err())?;
        Week::new(year, week).ok_or_else(err)
    }
}

impl Serialize for Week {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Week {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
