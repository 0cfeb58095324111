use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Epoch convention used by a workbook for date serials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateMode {
    /// Day 1 is 1900-01-01 and day 60 is the phantom 1900-02-29.
    #[default]
    #[serde(rename = "1900")]
    Windows1900,
    /// Day 0 is 1904-01-01.
    #[serde(rename = "1904")]
    Mac1904,
}

impl fmt::Display for DateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows1900 => f.write_str("1900"),
            Self::Mac1904 => f.write_str("1904"),
        }
    }
}

impl FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1900" | "0" => Ok(Self::Windows1900),
            "1904" | "1" => Ok(Self::Mac1904),
            other => Err(format!("unknown date mode '{}', expected 1900 or 1904", other)),
        }
    }
}

/// Converts a spreadsheet date serial to a calendar date, discarding any
/// time-of-day fraction. Returns `None` for negative, non-finite or
/// out-of-range serials.
pub fn date_from_serial(serial: f64, mode: DateMode) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc() as u64;

    let epoch = match mode {
        // Serials from 61 on are offset by the phantom leap day.
        DateMode::Windows1900 if days < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        DateMode::Windows1900 => NaiveDate::from_ymd_opt(1899, 12, 30)?,
        DateMode::Mac1904 => NaiveDate::from_ymd_opt(1904, 1, 1)?,
    };

    epoch.checked_add_days(Days::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_1900_serials() {
        assert_eq!(date_from_serial(43479.0, DateMode::Windows1900), ymd(2019, 1, 14));
        assert_eq!(date_from_serial(43479.75, DateMode::Windows1900), ymd(2019, 1, 14));
        assert_eq!(date_from_serial(1.0, DateMode::Windows1900), ymd(1900, 1, 1));
        assert_eq!(date_from_serial(59.0, DateMode::Windows1900), ymd(1900, 2, 28));
        assert_eq!(date_from_serial(60.0, DateMode::Windows1900), ymd(1900, 2, 28));
        assert_eq!(date_from_serial(61.0, DateMode::Windows1900), ymd(1900, 3, 1));
    }

    #[test]
    fn test_1904_serials() {
        assert_eq!(date_from_serial(0.0, DateMode::Mac1904), ymd(1904, 1, 1));
        assert_eq!(date_from_serial(42017.0, DateMode::Mac1904), ymd(2019, 1, 14));
    }

    #[test]
    fn test_invalid_serials() {
        assert_eq!(date_from_serial(-1.0, DateMode::Windows1900), None);
        assert_eq!(date_from_serial(f64::NAN, DateMode::Windows1900), None);
        assert_eq!(date_from_serial(f64::INFINITY, DateMode::Mac1904), None);
        assert_eq!(date_from_serial(1e300, DateMode::Windows1900), None);
    }

    #[test]
    fn test_date_mode_parsing() {
        assert_eq!("1904".parse::<DateMode>(), Ok(DateMode::Mac1904));
        assert_eq!("0".parse::<DateMode>(), Ok(DateMode::Windows1900));
        assert!("1970".parse::<DateMode>().is_err());
        assert_eq!("1".parse::<DateMode>(), Ok(DateMode::Mac1904));
        assert_eq!(DateMode::Mac1904.to_string(), "1904");
    }
}
