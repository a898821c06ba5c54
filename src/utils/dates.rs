//! Calendar-day axis and weekly tick selection

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, TimeZone, Utc, Weekday};

use crate::models::plan::AxisTick;
use crate::utils::errors::{ChartError, Result};

/// Ordered, inclusive run of consecutive calendar days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis {
    days: Vec<NaiveDate>,
}

impl DateAxis {
    /// Build the axis between two UTC timestamps, both truncated to their civil date
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::from_dates(start.date_naive(), end.date_naive())
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Ok(DateAxis {
            days: date_range(start, end)?,
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn first(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    /// Index of `day` on the axis, if it falls inside the range
    pub fn position(&self, day: NaiveDate) -> Option<usize> {
        let offset = (day - self.first()).num_days();
        if offset < 0 {
            return None;
        }
        let offset = offset as usize;
        (offset < self.days.len()).then_some(offset)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.position(day).is_some()
    }
}

/// Consecutive days from `start` to `end`, both inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if end < start {
        return Err(ChartError::InvalidRange { start, end });
    }
    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Zone used to decide which axis days count as Mondays and how tick labels read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickTimezone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TickTimezone {
    /// Civil date of `day`'s UTC midnight as seen from this zone
    pub fn localize(&self, day: NaiveDate) -> NaiveDate {
        let midnight = Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN));
        match self {
            TickTimezone::Local => midnight.with_timezone(&Local).date_naive(),
            TickTimezone::Utc => day,
            TickTimezone::Fixed(offset) => midnight.with_timezone(offset).date_naive(),
        }
    }
}

impl FromStr for TickTimezone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(TickTimezone::Local),
            "utc" | "z" => Ok(TickTimezone::Utc),
            other => parse_offset(other)
                .map(TickTimezone::Fixed)
                .ok_or_else(|| format!("Unknown timezone '{}'. Use: local, utc, +HH:MM", s)),
        }
    }
}

impl fmt::Display for TickTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickTimezone::Local => write!(f, "local"),
            TickTimezone::Utc => write!(f, "utc"),
            TickTimezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Parse "+HH:MM" / "-HH:MM" / "+HHMM"
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Ascending axis indices whose localized day is a Monday
pub fn monday_indices(axis: &DateAxis, tz: TickTimezone) -> Vec<usize> {
    axis.days()
        .iter()
        .enumerate()
        .filter(|(_, day)| tz.localize(**day).weekday() == Weekday::Mon)
        .map(|(i, _)| i)
        .collect()
}

/// Monday tick marks labelled with the localized ISO date
pub fn monday_ticks(axis: &DateAxis, tz: TickTimezone) -> Vec<AxisTick> {
    monday_indices(axis, tz)
        .into_iter()
        .map(|position| AxisTick {
            position,
            label: tz.localize(axis.days()[position]).format("%Y-%m-%d").to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_axis_is_inclusive_and_consecutive() {
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 14)).unwrap();
        assert_eq!(axis.len(), 14);
        assert_eq!(axis.first(), day(2024, 1, 1));
        assert_eq!(axis.last(), day(2024, 1, 14));
        for pair in axis.days().windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 1);
        }
    }

    #[test]
    fn test_axis_spans_month_and_leap_day() {
        let axis = DateAxis::from_dates(day(2024, 2, 27), day(2024, 3, 2)).unwrap();
        assert_eq!(axis.len(), 5);
        assert!(axis.contains(day(2024, 2, 29)));
    }

    #[test]
    fn test_single_day_axis() {
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(axis.len(), 1);
        assert!(!axis.is_empty());
        assert_eq!(axis.position(day(2024, 1, 1)), Some(0));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = date_range(day(2024, 1, 14), day(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidRange { .. }));
    }

    #[test]
    fn test_between_truncates_time_of_day() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 18, 30, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 1, 0, 0).unwrap();
        let axis = DateAxis::between(start, end).unwrap();
        assert_eq!(axis.days(), &[day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 3)]);
    }

    #[test]
    fn test_position_outside_axis() {
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 14)).unwrap();
        assert_eq!(axis.position(day(2023, 12, 31)), None);
        assert_eq!(axis.position(day(2024, 1, 15)), None);
        assert_eq!(axis.position(day(2024, 1, 8)), Some(7));
    }

    #[test]
    fn test_monday_indices_utc() {
        // 2024-01-01 is a Monday
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        let mondays = monday_indices(&axis, TickTimezone::Utc);
        assert_eq!(mondays, vec![0, 7, 14, 21, 28]);
        for i in &mondays {
            assert_eq!(axis.days()[*i].weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn test_monday_ticks_labels() {
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 14)).unwrap();
        let ticks = monday_ticks(&axis, TickTimezone::Utc);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-01-08"]);
    }

    #[test]
    fn test_negative_offset_shifts_weekday() {
        // UTC midnight Tuesday is still Monday evening at -05:00
        let tz: TickTimezone = "-05:00".parse().unwrap();
        let axis = DateAxis::from_dates(day(2024, 1, 1), day(2024, 1, 7)).unwrap();
        assert_eq!(monday_indices(&axis, tz), vec![1]);
        assert_eq!(monday_ticks(&axis, tz)[0].label, "2024-01-01");
    }

    #[test]
    fn test_timezone_parsing() {
        assert_eq!("UTC".parse::<TickTimezone>().unwrap(), TickTimezone::Utc);
        assert_eq!("local".parse::<TickTimezone>().unwrap(), TickTimezone::Local);
        assert_eq!(
            "+0530".parse::<TickTimezone>().unwrap(),
            TickTimezone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert!("mars".parse::<TickTimezone>().is_err());
        assert!("+25:00".parse::<TickTimezone>().is_err());
    }
}
