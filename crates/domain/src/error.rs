// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation and token allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Token booking is currently closed.
    BookingClosed,
    /// No tokens remain in the pool for the booking date.
    SoldOut {
        /// The booking date whose pool is exhausted.
        booking_date: Date,
    },
    /// The requester already holds the maximum number of tokens for the date.
    UserLimitReached {
        /// The per-user cap.
        limit: u32,
        /// The number of tokens the requester already holds.
        held: u32,
    },
    /// The grantable quantity for the request is zero, or smaller than the
    /// request under all-or-nothing allocation.
    NothingToAllocate {
        /// The quantity requested.
        requested: u32,
        /// The quantity that could have been granted.
        grantable: u32,
    },
    /// Menu item name is empty or invalid.
    InvalidMenuItemName(String),
    /// Menu item price is invalid.
    InvalidPrice(String),
    /// Menu category is not one of the known categories.
    InvalidCategory(String),
    /// Role is not one of the known roles.
    InvalidRole(String),
    /// E-mail address is malformed.
    InvalidEmail(String),
    /// A token amount supplied by an administrator is invalid.
    InvalidTokenAmount {
        /// The operation the amount was supplied for.
        operation: &'static str,
        /// The rejected amount.
        amount: i64,
    },
    /// Allocation policy name is not recognized.
    InvalidAllocationPolicy(String),
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse a calendar date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Menu item does not exist.
    MenuItemNotFound(i64),
    /// Booking does not exist.
    BookingNotFound(i64),
    /// A booking was addressed by someone other than its owner.
    NotBookingOwner {
        /// The booking identifier.
        booking_id: i64,
    },
    /// A confirmed booking cannot be cancelled.
    BookingAlreadyConfirmed {
        /// The booking identifier.
        booking_id: i64,
    },
    /// Token arithmetic exceeded the supported range.
    TokenCountOverflow,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookingClosed => write!(f, "Token booking is closed"),
            Self::SoldOut { booking_date } => {
                write!(f, "No tokens left for {booking_date}")
            }
            Self::UserLimitReached { limit, held } => {
                write!(
                    f,
                    "Token limit reached: you already hold {held} of {limit} tokens for today"
                )
            }
            Self::NothingToAllocate {
                requested,
                grantable,
            } => {
                write!(
                    f,
                    "Cannot allocate {requested} token(s): only {grantable} can be granted"
                )
            }
            Self::InvalidMenuItemName(msg) => write!(f, "Invalid menu item name: {msg}"),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {msg}"),
            Self::InvalidCategory(value) => {
                write!(
                    f,
                    "Invalid category: '{value}'. Must be Breakfast, Lunch or Snacks"
                )
            }
            Self::InvalidRole(value) => {
                write!(f, "Invalid role: '{value}'. Must be 'student' or 'admin'")
            }
            Self::InvalidEmail(value) => write!(f, "Invalid e-mail address: '{value}'"),
            Self::InvalidTokenAmount { operation, amount } => {
                write!(f, "Invalid token amount {amount} for {operation}")
            }
            Self::InvalidAllocationPolicy(value) => {
                write!(
                    f,
                    "Invalid allocation policy: '{value}'. Must be 'partial' or 'all-or-nothing'"
                )
            }
            Self::InvalidTimezone(value) => write!(f, "Invalid timezone: '{value}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::MenuItemNotFound(id) => write!(f, "Menu item {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::NotBookingOwner { booking_id } => {
                write!(f, "Booking {booking_id} belongs to another user")
            }
            Self::BookingAlreadyConfirmed { booking_id } => {
                write!(
                    f,
                    "Booking {booking_id} has already been confirmed and cannot be cancelled"
                )
            }
            Self::TokenCountOverflow => write!(f, "Token count exceeds the supported range"),
        }
    }
}

impl std::error::Error for DomainError {}
