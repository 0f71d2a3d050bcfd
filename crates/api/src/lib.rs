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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the canteen booking service.
//!
//! Translates requests into core commands, enforces authentication and
//! role-based authorization, and maps domain failures onto API errors.

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    add_tokens, book_tokens, cancel_booking, confirm_booking, confirm_user_bookings,
    create_menu_item, delete_menu_item, get_audit_timeline, get_full_menu, get_menu,
    get_my_bookings, get_token_status, list_bookings, login, logout, reset_pool,
    set_booking_active, set_menu_item_availability, set_total_tokens, signup, update_menu_item,
    whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddTokensRequest, AuditEventInfo, AuditTimelineResponse, BookTokensRequest,
    BookTokensResponse, BookingInfo, BookingsByUserResponse, CancelBookingResponse,
    ConfirmBookingsResponse, LoginRequest, LoginResponse, MenuCategoryGroup, MenuItemInfo,
    MenuItemRequest, MenuMutationResponse, MenuResponse, MyBookingsResponse, PoolStatusInfo,
    PoolUpdateResponse, SetAvailabilityRequest, SetBookingActiveRequest, SignupRequest,
    SignupResponse, TokenStatusResponse, TotalTokensRequest, UserBookingsGroup, UserInfo,
};
