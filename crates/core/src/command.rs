// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use canteen_domain::MenuItem;

/// A command against the token pool of one booking date.
///
/// Commands are the only way to request pool state changes. Amounts are
/// carried as supplied and validated when the command is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reserve up to `quantity` tokens for a student.
    BookTokens {
        /// The requesting user's identifier.
        user_id: String,
        /// The requester's display name, captured on each booking.
        user_name: String,
        /// The quantity requested.
        quantity: i64,
    },
    /// Delete an unconfirmed booking on behalf of its owner.
    CancelBooking {
        /// The booking to cancel.
        booking_id: i64,
        /// The user asking for the cancellation.
        user_id: String,
    },
    /// Confirm a single booking.
    ConfirmBooking {
        /// The booking to confirm.
        booking_id: i64,
    },
    /// Confirm every unconfirmed booking a user holds for the date.
    ConfirmUserBookings {
        /// The booking owner.
        user_id: String,
    },
    /// Open or close booking.
    SetBookingActive {
        /// The new state.
        is_active: bool,
    },
    /// Clear the date's bookings and open a fresh pool.
    ResetPool {
        /// The new pool size. Must be positive.
        total_tokens: i64,
    },
    /// Grow the pool without touching bookings.
    AddTokens {
        /// The number of tokens to add. Must be positive.
        amount: i64,
    },
    /// Set the pool size directly without touching bookings.
    SetTotalTokens {
        /// The new pool size. Must not be negative.
        total_tokens: i64,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::BookTokens { .. } => "BookTokens",
            Self::CancelBooking { .. } => "CancelBooking",
            Self::ConfirmBooking { .. } => "ConfirmBooking",
            Self::ConfirmUserBookings { .. } => "ConfirmUserBookings",
            Self::SetBookingActive { .. } => "SetBookingActive",
            Self::ResetPool { .. } => "ResetPool",
            Self::AddTokens { .. } => "AddTokens",
            Self::SetTotalTokens { .. } => "SetTotalTokens",
        }
    }
}

/// A command against the menu catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// Add a new item.
    CreateMenuItem {
        /// The item to add.
        item: MenuItem,
    },
    /// Replace an existing item's fields.
    UpdateMenuItem {
        /// The item to update.
        menu_item_id: i64,
        /// The new field values.
        item: MenuItem,
    },
    /// Remove an item.
    DeleteMenuItem {
        /// The item to remove.
        menu_item_id: i64,
    },
    /// Offer or withdraw an item.
    SetMenuItemAvailability {
        /// The item to change.
        menu_item_id: i64,
        /// The new availability.
        is_available: bool,
    },
}

impl MenuCommand {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::CreateMenuItem { .. } => "CreateMenuItem",
            Self::UpdateMenuItem { .. } => "UpdateMenuItem",
            Self::DeleteMenuItem { .. } => "DeleteMenuItem",
            Self::SetMenuItemAvailability { .. } => "SetMenuItemAvailability",
        }
    }

    /// Returns the item this command addresses, if it addresses an existing one.
    #[must_use]
    pub const fn target_id(&self) -> Option<i64> {
        match self {
            Self::CreateMenuItem { .. } => None,
            Self::UpdateMenuItem { menu_item_id, .. }
            | Self::DeleteMenuItem { menu_item_id }
            | Self::SetMenuItemAvailability { menu_item_id, .. } => Some(*menu_item_id),
        }
    }
}
