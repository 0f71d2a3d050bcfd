// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Token allocation rules.
//!
//! The allocator decides how many tokens a request receives and which
//! sequential numbers they carry. It operates on a [`PoolSnapshot`] taken
//! inside the same transaction that will write the result, so the decision
//! and the write are atomic together.
//!
//! ## Precondition order
//!
//! 1. Booking must be open (`BookingClosed`)
//! 2. The pool must have tokens left for the date (`SoldOut`)
//! 3. The requester must hold fewer than [`MAX_TOKENS_PER_USER`] (`UserLimitReached`)
//! 4. The grantable quantity must be positive, and under all-or-nothing
//!    allocation must cover the full request (`NothingToAllocate`)
//!
//! ## Numbering
//!
//! Numbers continue from the per-date high-water mark. Cancelled numbers are
//! never reissued within a pool.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// The maximum number of tokens a single user may hold for one booking date.
pub const MAX_TOKENS_PER_USER: u32 = 3;

/// How a request larger than what remains is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    /// Grant as many tokens as are available, up to the request.
    #[default]
    Partial,
    /// Grant the full request or nothing.
    AllOrNothing,
}

impl AllocationPolicy {
    /// Converts this policy to its configuration name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::AllOrNothing => "all-or-nothing",
        }
    }
}

impl FromStr for AllocationPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "partial" => Ok(Self::Partial),
            "all-or-nothing" | "all_or_nothing" => Ok(Self::AllOrNothing),
            _ => Err(DomainError::InvalidAllocationPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The pool figures the allocator decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Whether booking is open.
    pub is_active: bool,
    /// The authoritative pool size.
    pub total_tokens: u32,
    /// Bookings already held for the date by everyone.
    pub booked_count: u32,
    /// Bookings already held for the date by the requester.
    pub user_booked_count: u32,
    /// The highest token number ever issued for the date.
    pub last_issued_token: u32,
}

impl PoolSnapshot {
    /// Returns the number of tokens left in the pool, never negative.
    #[must_use]
    pub const fn tokens_left(&self) -> u32 {
        tokens_left(self.total_tokens, self.booked_count)
    }
}

/// The outcome of a successful allocation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPlan {
    /// The quantity the requester asked for.
    pub requested: u32,
    /// The quantity granted.
    pub granted: u32,
    /// The first token number issued.
    pub first_token: u32,
}

impl AllocationPlan {
    /// Returns the consecutive token numbers issued by this plan.
    #[must_use]
    pub fn token_numbers(&self) -> Vec<u32> {
        (0..self.granted).map(|i| self.first_token + i).collect()
    }

    /// Returns the highest token number issued by this plan.
    #[must_use]
    pub const fn last_token(&self) -> u32 {
        self.first_token + self.granted - 1
    }

    /// Returns whether fewer tokens were granted than requested.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.granted < self.requested
    }
}

/// Returns `total - booked`, clamped at zero.
#[must_use]
pub const fn tokens_left(total_tokens: u32, booked_count: u32) -> u32 {
    total_tokens.saturating_sub(booked_count)
}

/// Decides how many tokens a request receives and which numbers they carry.
///
/// # Arguments
///
/// * `snapshot` - Pool figures read inside the booking transaction
/// * `booking_date` - The date being booked
/// * `requested` - The quantity asked for
/// * `policy` - The deployment's allocation policy
///
/// # Errors
///
/// Returns the first failed precondition in the documented order, or
/// `TokenCountOverflow` if the numbering would exceed `u32`.
pub fn plan_allocation(
    snapshot: &PoolSnapshot,
    booking_date: Date,
    requested: u32,
    policy: AllocationPolicy,
) -> Result<AllocationPlan, DomainError> {
    if !snapshot.is_active {
        return Err(DomainError::BookingClosed);
    }

    let left: u32 = snapshot.tokens_left();
    if left == 0 {
        return Err(DomainError::SoldOut { booking_date });
    }

    if snapshot.user_booked_count >= MAX_TOKENS_PER_USER {
        return Err(DomainError::UserLimitReached {
            limit: MAX_TOKENS_PER_USER,
            held: snapshot.user_booked_count,
        });
    }

    let user_room: u32 = MAX_TOKENS_PER_USER - snapshot.user_booked_count;
    let allowed: u32 = requested.min(user_room).min(left);

    if allowed == 0 || (policy == AllocationPolicy::AllOrNothing && allowed < requested) {
        return Err(DomainError::NothingToAllocate {
            requested,
            grantable: allowed,
        });
    }

    let first_token: u32 = snapshot
        .last_issued_token
        .checked_add(1)
        .ok_or(DomainError::TokenCountOverflow)?;
    first_token
        .checked_add(allowed - 1)
        .ok_or(DomainError::TokenCountOverflow)?;

    Ok(AllocationPlan {
        requested,
        granted: allowed,
        first_token,
    })
}
