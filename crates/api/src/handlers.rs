// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler enforces authorization before touching persistence and
//! returns the authoritative post-transaction state in its response.

use std::str::FromStr;

use canteen::{Command, MenuCommand, PoolState};
use canteen_audit::{AuditEvent, Cause};
use canteen_domain::{
    AllocationPlan, AllocationPolicy, Booking, MAX_TOKENS_PER_USER, MenuCategory, MenuItem,
    Price, Role, display_name_for, format_booking_date, is_admin_email, normalize_email,
    parse_booking_date, validate_email,
};
use canteen_persistence::{MenuCommandOutcome, PoolCommandOutcome, SqlitePersistence};
use time::Date;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AddTokensRequest, AuditEventInfo, AuditTimelineResponse, BookTokensRequest,
    BookTokensResponse, BookingInfo, BookingsByUserResponse, CancelBookingResponse,
    ConfirmBookingsResponse, LoginRequest, LoginResponse, MenuCategoryGroup, MenuItemInfo,
    MenuItemRequest, MenuMutationResponse, MenuResponse, MyBookingsResponse, PoolStatusInfo,
    PoolUpdateResponse, SetAvailabilityRequest, SetBookingActiveRequest, SignupRequest,
    SignupResponse, TokenStatusResponse, TotalTokensRequest, UserBookingsGroup, UserInfo,
};

// ============================================================================
// Identity
// ============================================================================

/// Creates an account and its profile.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The signup request
/// * `admin_emails` - The administrator allow-list
///
/// # Errors
///
/// Returns an error if:
/// - The e-mail address is malformed
/// - The password violates the password policy
/// - The e-mail address is already registered
pub fn signup(
    persistence: &mut SqlitePersistence,
    request: &SignupRequest,
    admin_emails: &[String],
) -> Result<SignupResponse, ApiError> {
    validate_email(&request.email).map_err(translate_domain_error)?;
    let email: String = normalize_email(&request.email);
    let name: String = display_name_for(request.name.as_deref(), &email);

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password_confirmation,
        &email,
        request.name.as_deref().unwrap_or_default(),
    )?;

    let role: Role = if is_admin_email(&email, admin_emails) {
        Role::Admin
    } else {
        Role::Student
    };

    let user_id: String = persistence.create_account(&email, &request.password, &name, role)?;
    info!(user_id = %user_id, role = %role, "Account created");

    Ok(SignupResponse {
        user: UserInfo {
            user_id,
            email,
            name: name.clone(),
            role: String::from(role.as_str()),
        },
        message: format!("Welcome, {name}"),
    })
}

/// Signs in and creates a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be
/// created.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: &LoginRequest,
    admin_emails: &[String],
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, expires_at): (String, AuthenticatedActor, String) =
        AuthenticationService::login(persistence, &request.email, &request.password, admin_emails)?;

    Ok(LoginResponse {
        session_token,
        expires_at,
        user: whoami(&actor),
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut SqlitePersistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the signed-in user.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor) -> UserInfo {
    UserInfo {
        user_id: actor.user_id.clone(),
        email: actor.email.clone(),
        name: actor.name.clone(),
        role: String::from(actor.role.as_str()),
    }
}

// ============================================================================
// Menu
// ============================================================================

/// Returns the items students can order, grouped by category.
///
/// # Errors
///
/// Returns an error if the menu cannot be read.
pub fn get_menu(persistence: &mut SqlitePersistence) -> Result<MenuResponse, ApiError> {
    let items: Vec<MenuItem> = persistence.list_menu_items(true)?;
    group_menu(&items)
}

/// Returns every item, including withdrawn ones, grouped by category.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the menu cannot
/// be read.
pub fn get_full_menu(
    persistence: &mut SqlitePersistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MenuResponse, ApiError> {
    AuthorizationService::authorize_view_full_menu(authenticated_actor)?;
    let items: Vec<MenuItem> = persistence.list_menu_items(false)?;
    group_menu(&items)
}

/// Adds a menu item.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or a field is
/// invalid.
pub fn create_menu_item(
    persistence: &mut SqlitePersistence,
    request: &MenuItemRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MenuMutationResponse, ApiError> {
    AuthorizationService::authorize_manage_menu(authenticated_actor)?;
    let item: MenuItem = menu_item_from_request(request)?;
    let command: MenuCommand = MenuCommand::CreateMenuItem { item };
    let outcome: MenuCommandOutcome =
        persistence.execute_menu_command(command, authenticated_actor.to_audit_actor(), cause)?;
    menu_mutation_response(outcome, "Menu item created")
}

/// Replaces a menu item's fields.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator, the item does not
/// exist, or a field is invalid.
pub fn update_menu_item(
    persistence: &mut SqlitePersistence,
    menu_item_id: i64,
    request: &MenuItemRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MenuMutationResponse, ApiError> {
    AuthorizationService::authorize_manage_menu(authenticated_actor)?;
    let item: MenuItem = menu_item_from_request(request)?;
    let command: MenuCommand = MenuCommand::UpdateMenuItem { menu_item_id, item };
    let outcome: MenuCommandOutcome =
        persistence.execute_menu_command(command, authenticated_actor.to_audit_actor(), cause)?;
    menu_mutation_response(outcome, "Menu item updated")
}

/// Removes a menu item.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the item does
/// not exist.
pub fn delete_menu_item(
    persistence: &mut SqlitePersistence,
    menu_item_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MenuMutationResponse, ApiError> {
    AuthorizationService::authorize_manage_menu(authenticated_actor)?;
    let command: MenuCommand = MenuCommand::DeleteMenuItem { menu_item_id };
    let outcome: MenuCommandOutcome =
        persistence.execute_menu_command(command, authenticated_actor.to_audit_actor(), cause)?;
    menu_mutation_response(outcome, "Menu item deleted")
}

/// Offers or withdraws a menu item.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the item does
/// not exist.
pub fn set_menu_item_availability(
    persistence: &mut SqlitePersistence,
    menu_item_id: i64,
    request: SetAvailabilityRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<MenuMutationResponse, ApiError> {
    AuthorizationService::authorize_manage_menu(authenticated_actor)?;
    let command: MenuCommand = MenuCommand::SetMenuItemAvailability {
        menu_item_id,
        is_available: request.is_available,
    };
    let outcome: MenuCommandOutcome =
        persistence.execute_menu_command(command, authenticated_actor.to_audit_actor(), cause)?;
    let message: &str = if request.is_available {
        "Menu item is now available"
    } else {
        "Menu item is now unavailable"
    };
    menu_mutation_response(outcome, message)
}

fn menu_item_from_request(request: &MenuItemRequest) -> Result<MenuItem, ApiError> {
    let price: Price = Price::new(request.price).map_err(translate_domain_error)?;
    let category: MenuCategory =
        MenuCategory::from_str(&request.category).map_err(translate_domain_error)?;
    Ok(MenuItem::new(
        &request.name,
        price,
        category,
        request.is_available,
    ))
}

fn menu_mutation_response(
    outcome: MenuCommandOutcome,
    message: &str,
) -> Result<MenuMutationResponse, ApiError> {
    let menu_item: Option<MenuItemInfo> = outcome
        .menu_item
        .as_ref()
        .map(menu_item_info)
        .transpose()?;
    Ok(MenuMutationResponse {
        event_id: outcome.event_id,
        menu_item,
        message: String::from(message),
    })
}

fn group_menu(items: &[MenuItem]) -> Result<MenuResponse, ApiError> {
    let mut categories: Vec<MenuCategoryGroup> = Vec::new();
    for category in MenuCategory::DISPLAY_ORDER {
        let grouped: Vec<MenuItemInfo> = items
            .iter()
            .filter(|item| item.category == category)
            .map(menu_item_info)
            .collect::<Result<Vec<MenuItemInfo>, ApiError>>()?;
        if !grouped.is_empty() {
            categories.push(MenuCategoryGroup {
                category: String::from(category.as_str()),
                items: grouped,
            });
        }
    }
    Ok(MenuResponse { categories })
}

fn menu_item_info(item: &MenuItem) -> Result<MenuItemInfo, ApiError> {
    let menu_item_id: i64 = item.menu_item_id().ok_or_else(|| ApiError::Internal {
        message: format!("Menu item '{}' has no identifier", item.name),
    })?;
    Ok(MenuItemInfo {
        menu_item_id,
        name: item.name.clone(),
        price: item.price.amount(),
        category: String::from(item.category.as_str()),
        is_available: item.is_available,
    })
}

// ============================================================================
// Booking
// ============================================================================

/// Returns today's pool figures and the caller's bookings.
///
/// # Errors
///
/// Returns an error if the pool cannot be read.
pub fn get_token_status(
    persistence: &mut SqlitePersistence,
    today: Date,
    authenticated_actor: &AuthenticatedActor,
) -> Result<TokenStatusResponse, ApiError> {
    let state: PoolState = persistence.load_pool_state(today)?;
    let my_bookings: Vec<BookingInfo> = bookings_info(
        state
            .bookings
            .iter()
            .filter(|b| b.user_id == authenticated_actor.user_id),
    )?;

    Ok(TokenStatusResponse {
        status: pool_status_info(&state),
        max_tokens_per_user: MAX_TOKENS_PER_USER,
        my_bookings,
    })
}

/// Books up to `quantity` tokens for today.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `today` - The current booking date
/// * `policy` - The deployment's allocation policy
/// * `request` - The booking request
/// * `authenticated_actor` - The student booking
/// * `cause` - The cause for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a student
/// - Booking is closed
/// - The pool is sold out
/// - The user already holds the maximum
/// - The policy cannot satisfy the request
pub fn book_tokens(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    request: BookTokensRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<BookTokensResponse, ApiError> {
    AuthorizationService::authorize_book_tokens(authenticated_actor)?;

    let command: Command = Command::BookTokens {
        user_id: authenticated_actor.user_id.clone(),
        user_name: authenticated_actor.name.clone(),
        quantity: request.quantity,
    };
    let outcome: PoolCommandOutcome = persistence.execute_pool_command(
        today,
        command,
        policy,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;

    let plan: AllocationPlan = outcome.allocation.ok_or_else(|| ApiError::Internal {
        message: String::from("Booking completed without an allocation"),
    })?;

    let message: String = booking_message(&plan, &outcome.state, &authenticated_actor.user_id);

    Ok(BookTokensResponse {
        requested: plan.requested,
        granted: plan.granted,
        token_numbers: plan.token_numbers(),
        bookings: bookings_info(outcome.affected_bookings.iter())?,
        status: pool_status_info(&outcome.state),
        event_id: outcome.event_id,
        message,
    })
}

/// Words a booking result by the limit that bound it.
///
/// `state` is the pool after the booking.
fn booking_message(plan: &AllocationPlan, state: &PoolState, user_id: &str) -> String {
    if !plan.is_partial() {
        return format!("Booked {} token(s)", plan.granted);
    }

    let held_before: u32 = state.user_booked_count(user_id).saturating_sub(plan.granted);
    let allowance_before: u32 = MAX_TOKENS_PER_USER.saturating_sub(held_before);
    let pool_before: u32 = state.tokens_left().saturating_add(plan.granted);

    if plan.granted == allowance_before && allowance_before < pool_before {
        format!(
            "Booked {} of {} token(s); the limit is {MAX_TOKENS_PER_USER} per student per day",
            plan.granted, plan.requested
        )
    } else {
        format!(
            "Booked {} of {} token(s); only {} were available",
            plan.granted, plan.requested, plan.granted
        )
    }
}

/// Returns the caller's bookings for today.
///
/// # Errors
///
/// Returns an error if the bookings cannot be read.
pub fn get_my_bookings(
    persistence: &mut SqlitePersistence,
    today: Date,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MyBookingsResponse, ApiError> {
    let bookings: Vec<Booking> =
        persistence.list_user_bookings(&authenticated_actor.user_id, today)?;
    Ok(MyBookingsResponse {
        booking_date: format_booking_date(today),
        bookings: bookings_info(bookings.iter())?,
    })
}

/// Cancels one of the caller's unconfirmed bookings.
///
/// # Errors
///
/// Returns an error if the actor is not a student, the booking does not
/// exist, belongs to someone else, or is already confirmed.
pub fn cancel_booking(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    booking_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<CancelBookingResponse, ApiError> {
    AuthorizationService::authorize_cancel_booking(authenticated_actor)?;

    let command: Command = Command::CancelBooking {
        booking_id,
        user_id: authenticated_actor.user_id.clone(),
    };
    let outcome: PoolCommandOutcome = persistence.execute_pool_command(
        today,
        command,
        policy,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;

    let cancelled: &Booking =
        outcome
            .affected_bookings
            .first()
            .ok_or_else(|| ApiError::Internal {
                message: format!("Cancellation of booking {booking_id} returned no booking"),
            })?;
    let booking: BookingInfo = booking_info(cancelled)?;
    let message: String = format!("Cancelled token #{}", booking.token_number);

    Ok(CancelBookingResponse {
        booking,
        status: pool_status_info(&outcome.state),
        event_id: outcome.event_id,
        message,
    })
}

/// Lists the bookings for a date grouped by user.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `today` - The current booking date, used when `date` is absent
/// * `date` - An optional `YYYY-MM-DD` date
/// * `authenticated_actor` - The administrator listing
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the date is
/// malformed.
pub fn list_bookings(
    persistence: &mut SqlitePersistence,
    today: Date,
    date: Option<&str>,
    authenticated_actor: &AuthenticatedActor,
) -> Result<BookingsByUserResponse, ApiError> {
    AuthorizationService::authorize_view_all_bookings(authenticated_actor)?;

    let booking_date: Date = match date {
        Some(value) => parse_booking_date(value).map_err(translate_domain_error)?,
        None => today,
    };
    let bookings: Vec<Booking> = persistence.list_bookings_for_date(booking_date)?;

    let mut users: Vec<UserBookingsGroup> = Vec::new();
    for booking in &bookings {
        let info: BookingInfo = booking_info(booking)?;
        match users.iter_mut().find(|g| g.user_id == booking.user_id) {
            Some(group) => {
                group.all_confirmed &= info.is_confirmed;
                group.bookings.push(info);
            }
            None => users.push(UserBookingsGroup {
                user_id: booking.user_id.clone(),
                user_name: booking.user_name.clone(),
                all_confirmed: info.is_confirmed,
                bookings: vec![info],
            }),
        }
    }

    Ok(BookingsByUserResponse {
        booking_date: format_booking_date(booking_date),
        total_bookings: bookings.len(),
        confirmed_bookings: bookings.iter().filter(|b| b.is_confirmed).count(),
        users,
    })
}

/// Confirms a single booking.
///
/// Confirming an already-confirmed booking changes nothing.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the booking
/// does not exist.
pub fn confirm_booking(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    booking_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ConfirmBookingsResponse, ApiError> {
    AuthorizationService::authorize_confirm_bookings(authenticated_actor)?;
    let command: Command = Command::ConfirmBooking { booking_id };
    let outcome: PoolCommandOutcome = persistence.execute_pool_command(
        today,
        command,
        policy,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    confirm_response(&outcome)
}

/// Confirms every unconfirmed booking a user holds for today.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator.
pub fn confirm_user_bookings(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    user_id: &str,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ConfirmBookingsResponse, ApiError> {
    AuthorizationService::authorize_confirm_bookings(authenticated_actor)?;
    let command: Command = Command::ConfirmUserBookings {
        user_id: String::from(user_id),
    };
    let outcome: PoolCommandOutcome = persistence.execute_pool_command(
        today,
        command,
        policy,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    confirm_response(&outcome)
}

fn confirm_response(outcome: &PoolCommandOutcome) -> Result<ConfirmBookingsResponse, ApiError> {
    let confirmed: Vec<BookingInfo> = bookings_info(outcome.affected_bookings.iter())?;
    let message: String = if confirmed.is_empty() {
        String::from("Nothing to confirm")
    } else {
        format!("Confirmed {} booking(s)", confirmed.len())
    };
    Ok(ConfirmBookingsResponse {
        confirmed,
        event_id: outcome.event_id,
        message,
    })
}

// ============================================================================
// Pool administration
// ============================================================================

/// Opens or closes booking.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator.
pub fn set_booking_active(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    request: SetBookingActiveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PoolUpdateResponse, ApiError> {
    let message: &str = if request.is_active {
        "Token booking is open"
    } else {
        "Token booking is closed"
    };
    update_pool(
        persistence,
        today,
        policy,
        Command::SetBookingActive {
            is_active: request.is_active,
        },
        authenticated_actor,
        cause,
        message,
    )
}

/// Clears today's bookings and opens a fresh pool.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the amount is
/// not positive.
pub fn reset_pool(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    request: TotalTokensRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PoolUpdateResponse, ApiError> {
    update_pool(
        persistence,
        today,
        policy,
        Command::ResetPool {
            total_tokens: request.total_tokens,
        },
        authenticated_actor,
        cause,
        "Token pool reset",
    )
}

/// Grows the pool without touching bookings.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the amount is
/// not positive.
pub fn add_tokens(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    request: AddTokensRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PoolUpdateResponse, ApiError> {
    update_pool(
        persistence,
        today,
        policy,
        Command::AddTokens {
            amount: request.amount,
        },
        authenticated_actor,
        cause,
        "Tokens added",
    )
}

/// Sets the pool size without touching bookings.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the amount is
/// negative.
pub fn set_total_tokens(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    request: TotalTokensRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<PoolUpdateResponse, ApiError> {
    update_pool(
        persistence,
        today,
        policy,
        Command::SetTotalTokens {
            total_tokens: request.total_tokens,
        },
        authenticated_actor,
        cause,
        "Total tokens updated",
    )
}

fn update_pool(
    persistence: &mut SqlitePersistence,
    today: Date,
    policy: AllocationPolicy,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    message: &str,
) -> Result<PoolUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_pool(authenticated_actor)?;
    let outcome: PoolCommandOutcome = persistence.execute_pool_command(
        today,
        command,
        policy,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    Ok(PoolUpdateResponse {
        status: pool_status_info(&outcome.state),
        event_id: outcome.event_id,
        message: String::from(message),
    })
}

// ============================================================================
// Audit
// ============================================================================

/// Returns the audit timeline, newest first.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator, the limit is
/// negative, or the events cannot be read.
pub fn get_audit_timeline(
    persistence: &mut SqlitePersistence,
    limit: Option<i64>,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, ApiError> {
    AuthorizationService::authorize_view_audit(authenticated_actor)?;

    if limit.is_some_and(|l| l < 0) {
        return Err(ApiError::InvalidInput {
            field: String::from("limit"),
            message: String::from("Limit must not be negative"),
        });
    }

    let events: Vec<AuditEvent> = persistence.get_audit_timeline(limit)?;
    Ok(AuditTimelineResponse {
        events: events.iter().map(audit_event_info).collect(),
    })
}

fn audit_event_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action: event.action.name.clone(),
        details: event.action.details.clone(),
        before: event.before.data.clone(),
        after: event.after.data.clone(),
        booking_date: event.booking_date.map(format_booking_date),
        recorded_at: event.recorded_at.clone(),
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn pool_status_info(state: &PoolState) -> PoolStatusInfo {
    PoolStatusInfo {
        booking_date: format_booking_date(state.booking_date),
        is_active: state.settings.is_active,
        total_tokens: state.settings.total_tokens,
        booked_count: state.booked_count(),
        tokens_left: state.tokens_left(),
        version: state.settings.version,
    }
}

fn booking_info(booking: &Booking) -> Result<BookingInfo, ApiError> {
    let booking_id: i64 = booking.booking_id().ok_or_else(|| ApiError::Internal {
        message: format!("Token #{} has no booking identifier", booking.token_number),
    })?;
    Ok(BookingInfo {
        booking_id,
        user_id: booking.user_id.clone(),
        user_name: booking.user_name.clone(),
        token_number: booking.token_number,
        booking_date: format_booking_date(booking.booking_date),
        is_confirmed: booking.is_confirmed,
        created_at: booking.created_at.clone(),
    })
}

fn bookings_info<'a>(
    bookings: impl Iterator<Item = &'a Booking>,
) -> Result<Vec<BookingInfo>, ApiError> {
    bookings.map(booking_info).collect()
}
