// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use canteen_domain::{DomainError, format_booking_date};
use time::Date;

/// Reasons a pool or menu command is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The command broke a booking or catalog rule.
    DomainViolation(DomainError),
    /// The loaded pool holds a token number above the date's high-water mark.
    ///
    /// Allocating from such a snapshot would reissue a number already held.
    SequenceBehindBookings {
        /// The date of the pool.
        booking_date: Date,
        /// The stored high-water mark.
        last_issued_token: u32,
        /// The highest token number actually held.
        highest_held: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::SequenceBehindBookings {
                booking_date,
                last_issued_token,
                highest_held,
            } => write!(
                f,
                "Token sequence for {} is at #{last_issued_token} but token #{highest_held} is held",
                format_booking_date(*booking_date)
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
