// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking dates.
//!
//! A booking date is the calendar day in the canteen's reference timezone.
//! Dates are stored and exchanged as `YYYY-MM-DD`.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::Date;
use time::macros::format_description;

/// Resolves "today" in the canteen's reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingClock {
    tz: Tz,
}

impl Default for BookingClock {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl BookingClock {
    /// Creates a clock for the given IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known timezone.
    pub fn parse(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the configured timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns the booking date for the given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the local calendar date cannot be represented.
    pub fn date_at(&self, now: DateTime<Utc>) -> Result<Date, DomainError> {
        let local = now.with_timezone(&self.tz).date_naive();
        let month: u8 = u8::try_from(local.month()).map_err(|e| DomainError::DateParseError {
            date_string: local.to_string(),
            error: e.to_string(),
        })?;
        let month: time::Month =
            time::Month::try_from(month).map_err(|e| DomainError::DateParseError {
                date_string: local.to_string(),
                error: e.to_string(),
            })?;
        let day: u8 = u8::try_from(local.day()).map_err(|e| DomainError::DateParseError {
            date_string: local.to_string(),
            error: e.to_string(),
        })?;
        Date::from_calendar_date(local.year(), month, day).map_err(|e| {
            DomainError::DateParseError {
                date_string: local.to_string(),
                error: e.to_string(),
            }
        })
    }

    /// Returns today's booking date.
    ///
    /// # Errors
    ///
    /// Returns an error if the local calendar date cannot be represented.
    pub fn today(&self) -> Result<Date, DomainError> {
        self.date_at(Utc::now())
    }
}

/// Parses a `YYYY-MM-DD` booking date.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn parse_booking_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a booking date as `YYYY-MM-DD`.
#[must_use]
pub fn format_booking_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_utc_clock_uses_utc_date() {
        let clock = BookingClock::default();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap();
        let date = clock.date_at(now).unwrap();
        assert_eq!(format_booking_date(date), "2026-03-02");
    }

    #[test]
    fn test_local_clock_rolls_over_before_utc() {
        let clock = BookingClock::parse("Asia/Kolkata").unwrap();
        // 19:00 UTC is 00:30 the next day in India.
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 19, 0, 0).unwrap();
        let date = clock.date_at(now).unwrap();
        assert_eq!(format_booking_date(date), "2026-03-03");
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result = BookingClock::parse("Mars/Olympus_Mons");
        assert!(matches!(result, Err(DomainError::InvalidTimezone(_))));
    }

    #[test]
    fn test_parse_booking_date() {
        let date = parse_booking_date("2026-01-09").unwrap();
        assert_eq!(date.day(), 9);
        assert_eq!(format_booking_date(date), "2026-01-09");
    }

    #[test]
    fn test_parse_booking_date_rejects_garbage() {
        assert!(matches!(
            parse_booking_date("09/01/2026"),
            Err(DomainError::DateParseError { .. })
        ));
        assert!(parse_booking_date("2026-02-30").is_err());
    }
}
