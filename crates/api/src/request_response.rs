// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These are distinct from domain types and represent the API contract.
//! Dates are `YYYY-MM-DD` strings and prices are decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// The e-mail address.
    pub email: String,
    /// The password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
    /// The display name. Defaults to the e-mail address.
    #[serde(default)]
    pub name: Option<String>,
}

/// API request to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The e-mail address.
    pub email: String,
    /// The password.
    pub password: String,
}

/// A resolved user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The user ID.
    pub user_id: String,
    /// The e-mail address.
    pub email: String,
    /// The display name.
    pub name: String,
    /// The effective role (`student` or `admin`).
    pub role: String,
}

/// API response for a successful signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    /// The new user.
    pub user: UserInfo,
    /// A success message.
    pub message: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// When the session expires (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub expires_at: String,
    /// The signed-in user.
    pub user: UserInfo,
}

// ============================================================================
// Menu
// ============================================================================

/// API request to create or replace a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemRequest {
    /// The item name.
    pub name: String,
    /// The price.
    pub price: Decimal,
    /// The category name (`Breakfast`, `Lunch` or `Snacks`).
    pub category: String,
    /// Whether students can see the item. Defaults to `true`.
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

/// API request to offer or withdraw a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    /// The new availability.
    pub is_available: bool,
}

/// A menu item as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemInfo {
    /// The item ID.
    pub menu_item_id: i64,
    /// The item name.
    pub name: String,
    /// The price.
    pub price: Decimal,
    /// The category name.
    pub category: String,
    /// Whether students can see the item.
    pub is_available: bool,
}

/// The items of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategoryGroup {
    /// The category name.
    pub category: String,
    /// The items, by name.
    pub items: Vec<MenuItemInfo>,
}

/// API response for a menu listing.
///
/// Categories appear in display order; empty categories are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    /// The grouped items.
    pub categories: Vec<MenuCategoryGroup>,
}

/// API response for a menu mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuMutationResponse {
    /// The audit event ID.
    pub event_id: i64,
    /// The item after the change; absent after a delete.
    pub menu_item: Option<MenuItemInfo>,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Token pool and bookings
// ============================================================================

/// API request to book tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTokensRequest {
    /// The number of tokens requested.
    pub quantity: i64,
}

/// API request to open or close booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBookingActiveRequest {
    /// The new state.
    pub is_active: bool,
}

/// API request to reset the pool or set its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalTokensRequest {
    /// The pool size.
    pub total_tokens: i64,
}

/// API request to grow the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTokensRequest {
    /// The number of tokens to add.
    pub amount: i64,
}

/// A booking as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    /// The booking ID.
    pub booking_id: i64,
    /// The owning user's ID.
    pub user_id: String,
    /// The owner's display name at booking time.
    pub user_name: String,
    /// The token number.
    pub token_number: u32,
    /// The booking date.
    pub booking_date: String,
    /// Whether staff confirmed the booking.
    pub is_confirmed: bool,
    /// When the booking was made.
    pub created_at: Option<String>,
}

/// The pool figures for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatusInfo {
    /// The booking date.
    pub booking_date: String,
    /// Whether booking is open.
    pub is_active: bool,
    /// The pool size.
    pub total_tokens: u32,
    /// Bookings held for the date.
    pub booked_count: u32,
    /// Tokens still available, never negative.
    pub tokens_left: u32,
    /// The settings version.
    pub version: i64,
}

/// API response for the token status of today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatusResponse {
    /// The pool figures.
    pub status: PoolStatusInfo,
    /// The per-user limit.
    pub max_tokens_per_user: u32,
    /// The caller's bookings for today.
    pub my_bookings: Vec<BookingInfo>,
}

/// API response for a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTokensResponse {
    /// The quantity requested.
    pub requested: u32,
    /// The quantity granted.
    pub granted: u32,
    /// The token numbers issued.
    pub token_numbers: Vec<u32>,
    /// The new bookings.
    pub bookings: Vec<BookingInfo>,
    /// The pool figures after the booking.
    pub status: PoolStatusInfo,
    /// The audit event ID.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// API response listing one user's bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyBookingsResponse {
    /// The booking date.
    pub booking_date: String,
    /// The bookings, by token number.
    pub bookings: Vec<BookingInfo>,
}

/// API response for a cancelled booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    /// The cancelled booking.
    pub booking: BookingInfo,
    /// The pool figures after the cancellation.
    pub status: PoolStatusInfo,
    /// The audit event ID.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// One user's bookings within a date listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBookingsGroup {
    /// The user ID.
    pub user_id: String,
    /// The display name on the user's first booking.
    pub user_name: String,
    /// The bookings, by token number.
    pub bookings: Vec<BookingInfo>,
    /// Whether every booking is confirmed.
    pub all_confirmed: bool,
}

/// API response listing the bookings for a date grouped by user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingsByUserResponse {
    /// The booking date.
    pub booking_date: String,
    /// The number of bookings.
    pub total_bookings: usize,
    /// The number of confirmed bookings.
    pub confirmed_bookings: usize,
    /// The groups, by each user's lowest token number.
    pub users: Vec<UserBookingsGroup>,
}

/// API response for a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmBookingsResponse {
    /// The bookings that changed to confirmed.
    pub confirmed: Vec<BookingInfo>,
    /// The audit event ID; absent when nothing changed.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// API response for an administrator pool change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUpdateResponse {
    /// The pool figures after the change.
    pub status: PoolStatusInfo,
    /// The audit event ID.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Audit
// ============================================================================

/// An audit event as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The event ID.
    pub event_id: Option<i64>,
    /// The acting user's ID.
    pub actor_id: String,
    /// The acting user's role.
    pub actor_type: String,
    /// The request that caused the event.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action: String,
    /// The action details.
    pub details: Option<String>,
    /// The state before.
    pub before: String,
    /// The state after.
    pub after: String,
    /// The booking date, for pool events.
    pub booking_date: Option<String>,
    /// When the event was recorded.
    pub recorded_at: Option<String>,
}

/// API response for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// The events, newest first.
    pub events: Vec<AuditEventInfo>,
}
