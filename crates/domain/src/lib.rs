// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocation;
mod calendar;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use allocation::{
    AllocationPlan, AllocationPolicy, MAX_TOKENS_PER_USER, PoolSnapshot, plan_allocation,
    tokens_left,
};
pub use calendar::{BookingClock, format_booking_date, parse_booking_date};

// Re-export public types
pub use error::DomainError;
pub use types::{Booking, MenuCategory, MenuItem, Price, Role, TokenSettings, UserProfile};
pub use validation::{
    display_name_for, is_admin_email, normalize_email, requested_quantity, resolve_role,
    validate_email, validate_menu_item, validate_token_amount, validate_total_tokens,
};
