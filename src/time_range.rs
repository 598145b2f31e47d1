use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading a 24-hour `HH:MM` clock value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("'{0}' is not a time in HH:MM form")]
    Malformed(String),

    #[error("hour {0} is out of range (00-23)")]
    HourOutOfRange(u8),

    #[error("minute {0} is out of range (00-59)")]
    MinuteOutOfRange(u8),
}

/// A 24-hour wall-clock time, zero-padded `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeRangeError> {
        if hour > 23 {
            return Err(TimeRangeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeRangeError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Render as a 12-hour endpoint: `9:05 AM`, `12:00 PM`
    pub fn to_twelve_hour(&self) -> String {
        let suffix = if self.hour >= 12 { "PM" } else { "AM" };
        let display_hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute, suffix)
    }
}

impl FromStr for ClockTime {
    type Err = TimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeRangeError::Malformed(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(malformed)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(malformed());
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let hour: u8 = hour.parse().map_err(|_| malformed())?;
        let minute: u8 = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Human-readable meeting window, e.g. `9:00 AM - 2:30 PM`
///
/// Computed once when a course is defined and stored verbatim with the
/// course record. Values coming back from the backend are kept as-is and
/// never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TimeRange(String);

impl TimeRange {
    /// Format a pair of clock times as a 12-hour range
    pub fn format(from: ClockTime, to: ClockTime) -> Self {
        Self(format!("{} - {}", from.to_twelve_hour(), to.to_twelve_hour()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse two `HH:MM` strings and format them as a [`TimeRange`]
pub fn format_time_range(from: &str, to: &str) -> Result<TimeRange, TimeRangeError> {
    let from: ClockTime = from.parse()?;
    let to: ClockTime = to.parse()?;
    Ok(TimeRange::format(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(from: &str, to: &str) -> String {
        format_time_range(from, to).unwrap().to_string()
    }

    #[test]
    fn midnight_displays_as_twelve_am() {
        assert_eq!(fmt("00:00", "00:00"), "12:00 AM - 12:00 AM");
    }

    #[test]
    fn noon_displays_as_twelve_pm() {
        assert_eq!(fmt("12:00", "13:05"), "12:00 PM - 1:05 PM");
    }

    #[test]
    fn morning_to_late_evening() {
        assert_eq!(fmt("09:07", "23:59"), "9:07 AM - 11:59 PM");
    }

    #[test]
    fn minutes_are_zero_padded() {
        assert_eq!(fmt("09:05", "14:30"), "9:05 AM - 2:30 PM");
    }

    #[test]
    fn every_valid_time_has_consistent_suffix_and_hour() {
        for hour in 0..24u8 {
            for minute in 0..60u8 {
                let rendered = ClockTime::new(hour, minute).unwrap().to_twelve_hour();
                let (clock, suffix) = rendered.split_once(' ').unwrap();
                let (display_hour, display_minute) = clock.split_once(':').unwrap();
                let display_hour: u8 = display_hour.parse().unwrap();

                assert_eq!(suffix == "AM", hour < 12, "suffix for {}", rendered);
                assert_eq!(suffix == "PM", hour >= 12, "suffix for {}", rendered);
                assert!((1..=12).contains(&display_hour), "hour in {}", rendered);
                assert_eq!(display_minute.len(), 2);
                assert!(!clock.starts_with('0'));
            }
        }
    }

    #[test]
    fn format_is_deterministic() {
        let first = fmt("08:15", "10:45");
        let second = fmt("08:15", "10:45");
        assert_eq!(first, second);
    }

    #[test]
    fn clock_time_rejects_malformed_input() {
        for input in ["", "9:00", "0900", "09:0", "ab:cd", "09:00:00", "+9:00", "09-00"] {
            assert!(
                matches!(input.parse::<ClockTime>(), Err(TimeRangeError::Malformed(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn clock_time_rejects_out_of_range_values() {
        assert_eq!("24:00".parse::<ClockTime>(), Err(TimeRangeError::HourOutOfRange(24)));
        assert_eq!("25:10".parse::<ClockTime>(), Err(TimeRangeError::HourOutOfRange(25)));
        assert_eq!("10:60".parse::<ClockTime>(), Err(TimeRangeError::MinuteOutOfRange(60)));
    }

    #[test]
    fn clock_time_displays_zero_padded() {
        let time: ClockTime = "07:03".parse().unwrap();
        assert_eq!(time.to_string(), "07:03");
        assert_eq!(time.hour(), 7);
        assert_eq!(time.minute(), 3);
    }

    #[test]
    fn time_range_serializes_as_plain_string() {
        let range = format_time_range("09:00", "10:30").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"9:00 AM - 10:30 AM\"");
    }
}
