// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, MenuCommand};
use crate::error::CoreError;
use crate::state::{
    MenuChange, MenuTransition, PoolChange, PoolState, PoolTransition, menu_item_snapshot,
};
use canteen_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use canteen_domain::{
    AllocationPlan, AllocationPolicy, Booking, DomainError, MenuItem, TokenSettings,
    format_booking_date, plan_allocation, requested_quantity, validate_menu_item,
    validate_token_amount, validate_total_tokens,
};

/// Applies a pool command, producing the new state, the storage changes and
/// an audit event.
///
/// # Arguments
///
/// * `state` - The pool state for the date the command addresses
/// * `command` - The command to apply
/// * `policy` - The deployment's allocation policy
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(PoolTransition)` containing the new state, changes and audit event
/// * `Err(CoreError)` if the command is rejected
///
/// # Errors
///
/// Returns an error if the command violates a booking rule, addresses a
/// booking that does not exist for the date, or carries an invalid amount.
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &PoolState,
    command: Command,
    policy: AllocationPolicy,
    actor: Actor,
    cause: Cause,
) -> Result<PoolTransition, CoreError> {
    let action_name: &'static str = command.action_name();
    let date_label: String = format_booking_date(state.booking_date);

    let (new_state, changes, allocation, affected, details): Outcome = match command {
        Command::BookTokens {
            user_id,
            user_name,
            quantity,
        } => {
            let highest_held: u32 = state
                .bookings
                .iter()
                .map(|b| b.token_number)
                .max()
                .unwrap_or(0);
            if highest_held > state.last_issued_token {
                return Err(CoreError::SequenceBehindBookings {
                    booking_date: state.booking_date,
                    last_issued_token: state.last_issued_token,
                    highest_held,
                });
            }

            let requested: u32 = requested_quantity(quantity);
            let plan: AllocationPlan = plan_allocation(
                &state.allocation_snapshot(&user_id),
                state.booking_date,
                requested,
                policy,
            )?;

            let booked: Vec<Booking> = plan
                .token_numbers()
                .into_iter()
                .map(|n| Booking::new(&user_id, &user_name, n, state.booking_date))
                .collect();

            let mut new_state: PoolState = state.clone();
            new_state.bookings.extend(booked.iter().cloned());
            new_state.last_issued_token = plan.last_token();

            let details: String = format!(
                "{user_name} ({user_id}) booked {} of {requested} token(s) #{}-#{} for {date_label}",
                plan.granted,
                plan.first_token,
                plan.last_token()
            );
            let changes: Vec<PoolChange> = vec![
                PoolChange::InsertBookings(booked.clone()),
                PoolChange::AdvanceSequence {
                    booking_date: state.booking_date,
                    last_token_number: plan.last_token(),
                },
            ];
            (new_state, changes, Some(plan), booked, details)
        }
        Command::CancelBooking {
            booking_id,
            user_id,
        } => {
            let booking: &Booking = state
                .find_booking(booking_id)
                .ok_or(DomainError::BookingNotFound(booking_id))?;
            if booking.user_id != user_id {
                return Err(DomainError::NotBookingOwner { booking_id }.into());
            }
            if booking.is_confirmed {
                return Err(DomainError::BookingAlreadyConfirmed { booking_id }.into());
            }

            let cancelled: Booking = booking.clone();
            let mut new_state: PoolState = state.clone();
            new_state
                .bookings
                .retain(|b| b.booking_id() != Some(booking_id));

            let details: String = format!(
                "{} cancelled token #{} for {date_label}",
                cancelled.user_name, cancelled.token_number
            );
            let changes: Vec<PoolChange> = vec![PoolChange::DeleteBooking { booking_id }];
            (new_state, changes, None, vec![cancelled], details)
        }
        Command::ConfirmBooking { booking_id } => {
            let booking: &Booking = state
                .find_booking(booking_id)
                .ok_or(DomainError::BookingNotFound(booking_id))?;

            if booking.is_confirmed {
                let details: String = format!(
                    "Token #{} for {date_label} was already confirmed",
                    booking.token_number
                );
                (state.clone(), Vec::new(), None, Vec::new(), details)
            } else {
                let details: String = format!(
                    "Confirmed token #{} of {} for {date_label}",
                    booking.token_number, booking.user_name
                );
                confirm(state, &[booking_id], details)
            }
        }
        Command::ConfirmUserBookings { user_id } => {
            let booking_ids: Vec<i64> = state
                .bookings
                .iter()
                .filter(|b| b.user_id == user_id && !b.is_confirmed)
                .filter_map(Booking::booking_id)
                .collect();
            let details: String = format!(
                "Confirmed {} booking(s) of {user_id} for {date_label}",
                booking_ids.len()
            );
            confirm(state, &booking_ids, details)
        }
        Command::SetBookingActive { is_active } => {
            let settings: TokenSettings = state
                .settings
                .next(is_active, state.settings.total_tokens);
            let details: String = if is_active {
                String::from("Opened token booking")
            } else {
                String::from("Closed token booking")
            };
            write_settings(state, settings, details)
        }
        Command::ResetPool { total_tokens } => {
            let total_tokens: u32 = validate_token_amount("reset", total_tokens)?;
            let settings: TokenSettings = state.settings.next(true, total_tokens);

            let mut new_state: PoolState = state.clone();
            new_state.settings = settings;
            new_state.bookings.clear();
            new_state.last_issued_token = 0;

            let details: String = format!(
                "Reset pool for {date_label} to {total_tokens} token(s), cleared {} booking(s)",
                state.booked_count()
            );
            let changes: Vec<PoolChange> = vec![
                PoolChange::DeleteBookingsForDate {
                    booking_date: state.booking_date,
                },
                PoolChange::ClearSequence {
                    booking_date: state.booking_date,
                },
                PoolChange::WriteSettings(settings),
            ];
            (new_state, changes, None, Vec::new(), details)
        }
        Command::AddTokens { amount } => {
            let amount: u32 = validate_token_amount("add tokens", amount)?;
            let total_tokens: u32 = state
                .settings
                .total_tokens
                .checked_add(amount)
                .ok_or(DomainError::TokenCountOverflow)?;
            let settings: TokenSettings = state.settings.next(state.settings.is_active, total_tokens);
            let details: String = format!("Added {amount} token(s), total now {total_tokens}");
            write_settings(state, settings, details)
        }
        Command::SetTotalTokens { total_tokens } => {
            let total_tokens: u32 = validate_total_tokens(total_tokens)?;
            let settings: TokenSettings = state.settings.next(state.settings.is_active, total_tokens);
            let details: String = format!(
                "Set total tokens from {} to {total_tokens}",
                state.settings.total_tokens
            );
            write_settings(state, settings, details)
        }
    };

    let audit_event: AuditEvent = AuditEvent::for_booking_date(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        state.to_snapshot(),
        new_state.to_snapshot(),
        state.booking_date,
    );

    Ok(PoolTransition {
        new_state,
        changes,
        audit_event,
        allocation,
        affected_bookings: affected,
    })
}

type Outcome = (
    PoolState,
    Vec<PoolChange>,
    Option<AllocationPlan>,
    Vec<Booking>,
    String,
);

fn confirm(state: &PoolState, booking_ids: &[i64], details: String) -> Outcome {
    let mut new_state: PoolState = state.clone();
    let mut confirmed: Vec<Booking> = Vec::new();
    for booking in &mut new_state.bookings {
        if booking
            .booking_id()
            .is_some_and(|id| booking_ids.contains(&id))
        {
            booking.is_confirmed = true;
            confirmed.push(booking.clone());
        }
    }

    let changes: Vec<PoolChange> = if booking_ids.is_empty() {
        Vec::new()
    } else {
        vec![PoolChange::ConfirmBookings {
            booking_ids: booking_ids.to_vec(),
        }]
    };
    (new_state, changes, None, confirmed, details)
}

fn write_settings(state: &PoolState, settings: TokenSettings, details: String) -> Outcome {
    let mut new_state: PoolState = state.clone();
    new_state.settings = settings;
    (
        new_state,
        vec![PoolChange::WriteSettings(settings)],
        None,
        Vec::new(),
        details,
    )
}

/// Applies a menu command, producing the storage change and an audit event.
///
/// # Arguments
///
/// * `existing` - The stored item the command addresses, if it exists
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the addressed item does not exist or the new item
/// fields are invalid.
pub fn apply_menu(
    existing: Option<&MenuItem>,
    command: MenuCommand,
    actor: Actor,
    cause: Cause,
) -> Result<MenuTransition, CoreError> {
    let action_name: &'static str = command.action_name();

    if let Some(menu_item_id) = command
        .target_id()
        .filter(|id| existing.and_then(MenuItem::menu_item_id) != Some(*id))
    {
        return Err(DomainError::MenuItemNotFound(menu_item_id).into());
    }

    let (change, before, after, details): (MenuChange, StateSnapshot, StateSnapshot, String) =
        match (command, existing) {
            (MenuCommand::CreateMenuItem { item }, _) => {
                validate_menu_item(&item)?;
                let details: String = format!("Created '{}' in {}", item.name, item.category);
                let after: StateSnapshot = menu_item_snapshot(&item);
                (MenuChange::Insert(item), StateSnapshot::absent(), after, details)
            }
            (MenuCommand::UpdateMenuItem { menu_item_id, item }, Some(current)) => {
                validate_menu_item(&item)?;
                let updated: MenuItem = MenuItem::with_id(
                    menu_item_id,
                    &item.name,
                    item.price,
                    item.category,
                    item.is_available,
                );
                let details: String = format!("Updated menu item {menu_item_id}");
                (
                    MenuChange::Update(updated.clone()),
                    menu_item_snapshot(current),
                    menu_item_snapshot(&updated),
                    details,
                )
            }
            (MenuCommand::DeleteMenuItem { menu_item_id }, Some(current)) => {
                let details: String = format!("Deleted '{}'", current.name);
                (
                    MenuChange::Delete { menu_item_id },
                    menu_item_snapshot(current),
                    StateSnapshot::absent(),
                    details,
                )
            }
            (
                MenuCommand::SetMenuItemAvailability {
                    menu_item_id,
                    is_available,
                },
                Some(current),
            ) => {
                let mut updated: MenuItem = current.clone();
                updated.is_available = is_available;
                let details: String = format!(
                    "Marked '{}' {}",
                    current.name,
                    if is_available {
                        "available"
                    } else {
                        "unavailable"
                    }
                );
                (
                    MenuChange::Update(updated.clone()),
                    menu_item_snapshot(current),
                    menu_item_snapshot(&updated),
                    details,
                )
            }
            (
                MenuCommand::UpdateMenuItem { menu_item_id, .. }
                | MenuCommand::DeleteMenuItem { menu_item_id }
                | MenuCommand::SetMenuItemAvailability { menu_item_id, .. },
                None,
            ) => return Err(DomainError::MenuItemNotFound(menu_item_id).into()),
        };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        before,
        after,
    );

    Ok(MenuTransition {
        change,
        audit_event,
    })
}
