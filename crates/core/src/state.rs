// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use canteen_audit::{AuditEvent, StateSnapshot};
use canteen_domain::{
    AllocationPlan, Booking, MenuItem, PoolSnapshot, TokenSettings, tokens_left,
};
use time::Date;

/// The token pool as seen from one booking date.
///
/// Loaded inside the transaction that applies a command, so the decision
/// and the write see the same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    /// The booking date this state is scoped to.
    pub booking_date: Date,
    /// The authoritative settings.
    pub settings: TokenSettings,
    /// All bookings held for the date.
    pub bookings: Vec<Booking>,
    /// The highest token number ever issued for the date.
    pub last_issued_token: u32,
}

impl PoolState {
    /// Creates a pool state with no bookings.
    #[must_use]
    pub const fn new(booking_date: Date, settings: TokenSettings) -> Self {
        Self {
            booking_date,
            settings,
            bookings: Vec::new(),
            last_issued_token: 0,
        }
    }

    /// Returns the number of bookings held for the date.
    #[must_use]
    pub fn booked_count(&self) -> u32 {
        u32::try_from(self.bookings.len()).unwrap_or(u32::MAX)
    }

    /// Returns the number of bookings a user holds for the date.
    #[must_use]
    pub fn user_booked_count(&self, user_id: &str) -> u32 {
        let count: usize = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Returns the tokens left in the pool, never negative.
    #[must_use]
    pub fn tokens_left(&self) -> u32 {
        tokens_left(self.settings.total_tokens, self.booked_count())
    }

    /// Looks up a booking held for the date.
    #[must_use]
    pub fn find_booking(&self, booking_id: i64) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.booking_id() == Some(booking_id))
    }

    /// Returns the allocator's view of this pool for a requester.
    #[must_use]
    pub fn allocation_snapshot(&self, user_id: &str) -> PoolSnapshot {
        PoolSnapshot {
            is_active: self.settings.is_active,
            total_tokens: self.settings.total_tokens,
            booked_count: self.booked_count(),
            user_booked_count: self.user_booked_count(user_id),
            last_issued_token: self.last_issued_token,
        }
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "is_active={},total_tokens={},booked={},tokens_left={}",
            self.settings.is_active,
            self.settings.total_tokens,
            self.booked_count(),
            self.tokens_left()
        ))
    }
}

/// A single storage change produced by a pool transition.
///
/// The persistence layer applies these in order inside the transaction the
/// state was loaded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolChange {
    /// Insert new bookings.
    InsertBookings(Vec<Booking>),
    /// Delete one booking.
    DeleteBooking {
        /// The booking to delete.
        booking_id: i64,
    },
    /// Mark bookings confirmed.
    ConfirmBookings {
        /// The bookings to confirm.
        booking_ids: Vec<i64>,
    },
    /// Delete every booking for a date.
    DeleteBookingsForDate {
        /// The date to clear.
        booking_date: Date,
    },
    /// Replace the settings record. `settings.version` is the new version.
    WriteSettings(TokenSettings),
    /// Raise the date's high-water mark.
    AdvanceSequence {
        /// The date.
        booking_date: Date,
        /// The highest token number now issued.
        last_token_number: u32,
    },
    /// Forget the date's high-water mark so numbering restarts at 1.
    ClearSequence {
        /// The date.
        booking_date: Date,
    },
}

/// The result of a successful pool transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTransition {
    /// The pool state after the transition.
    pub new_state: PoolState,
    /// The storage changes that produce `new_state`.
    pub changes: Vec<PoolChange>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// The allocation decision, for bookings.
    pub allocation: Option<AllocationPlan>,
    /// The bookings affected by the transition (booked, cancelled or confirmed).
    pub affected_bookings: Vec<Booking>,
}

/// A single storage change produced by a menu transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChange {
    /// Insert a new item.
    Insert(MenuItem),
    /// Overwrite an existing item. The item carries its identifier.
    Update(MenuItem),
    /// Delete an item.
    Delete {
        /// The item to delete.
        menu_item_id: i64,
    },
}

/// The result of a successful menu transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTransition {
    /// The storage change to apply.
    pub change: MenuChange,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Converts a menu item to a snapshot for audit purposes.
#[must_use]
pub fn menu_item_snapshot(item: &MenuItem) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},price={},category={},is_available={}",
        item.name, item.price, item.category, item.is_available
    ))
}

