//! Time windows for scene selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CommonError, CommonResult};

/// A half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window for a year and season.
    pub fn for_season(year: i32, season: Season) -> CommonResult<Self> {
        let ymd = |y: i32, m: u32, d: u32| {
            NaiveDate::from_ymd_opt(y, m, d).ok_or(CommonError::InvalidDate(year))
        };

        let next = year.checked_add(1).ok_or(CommonError::InvalidDate(year))?;

        let (start, end) = match season {
            Season::FullYear => (ymd(year, 1, 1)?, ymd(next, 1, 1)?),
            Season::Kharif => (ymd(year, 6, 1)?, ymd(year, 11, 1)?),
            Season::Rabi => (ymd(year, 11, 1)?, ymd(next, 4, 1)?),
            Season::PreMonsoon => (ymd(year, 4, 1)?, ymd(year, 6, 1)?),
        };
        Ok(Self { start, end })
    }

    /// Full calendar year.
    pub fn year(year: i32) -> CommonResult<Self> {
        Self::for_season(year, Season::FullYear)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date >= &self.start && date < &self.end
    }
}

/// Fixed season table relative to the monsoon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    FullYear,
    /// Jun-Oct
    Kharif,
    /// Nov-Mar, spilling into the next year
    Rabi,
    /// Apr-May
    PreMonsoon,
}

impl Season {
    /// Resolve a season name; anything unrecognized is the full year.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        if lower.starts_with("kharif") {
            Season::Kharif
        } else if lower.starts_with("rabi") {
            Season::Rabi
        } else if lower.starts_with("pre-monsoon") || lower.starts_with("pre_monsoon") {
            Season::PreMonsoon
        } else {
            Season::FullYear
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::FullYear => "Full Year",
            Season::Kharif => "Kharif (Jun-Oct)",
            Season::Rabi => "Rabi (Nov-Mar)",
            Season::PreMonsoon => "Pre-monsoon (Apr-May)",
        }
    }

    pub fn all() -> &'static [Season] {
        &[
            Season::FullYear,
            Season::Kharif,
            Season::Rabi,
            Season::PreMonsoon,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_full_year_is_half_open() {
        let w = TimeWindow::year(2019).unwrap();
        assert!(w.contains(&d(2019, 1, 1)));
        assert!(w.contains(&d(2019, 12, 31)));
        assert!(!w.contains(&d(2020, 1, 1)));
    }

    #[test]
    fn test_rabi_spills_into_next_year() {
        let w = TimeWindow::for_season(2019, Season::Rabi).unwrap();
        assert_eq!(w.start, d(2019, 11, 1));
        assert_eq!(w.end, d(2020, 4, 1));
        assert!(w.contains(&d(2020, 3, 31)));
    }

    #[test]
    fn test_year_past_calendar_range() {
        for season in Season::all() {
            let err = TimeWindow::for_season(i32::MAX, *season).unwrap_err();
            assert!(matches!(err, CommonError::InvalidDate(y) if y == i32::MAX));
        }
        assert!(TimeWindow::year(i32::MIN).is_err());
    }

    #[test]
    fn test_season_names() {
        assert_eq!(Season::from_name("Kharif (Jun-Oct)"), Season::Kharif);
        assert_eq!(Season::from_name("Pre-monsoon (Apr-May)"), Season::PreMonsoon);
        assert_eq!(Season::from_name("monsoon-ish"), Season::FullYear);
        for season in Season::all() {
            assert_eq!(Season::from_name(season.label()), *season);
        }
    }
}
