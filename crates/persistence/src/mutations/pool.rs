// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Token pool mutations.
//!
//! `execute_pool_command` is the only writer of bookings, settings and
//! sequences. It must run inside an immediate transaction: the state is
//! loaded, the command decided and the resulting changes written while the
//! database write lock is held, so concurrent writers serialize and never
//! over-allocate or reuse a token number.

use canteen::{Command, CoreError, PoolChange, PoolState, PoolTransition, apply};
use canteen_audit::{Actor, Cause};
use canteen_domain::{
    AllocationPlan, AllocationPolicy, Booking, DomainError, TokenSettings, format_booking_date,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{booking_sequences, bookings, token_settings};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::pool::{SETTINGS_ID, get_booking, load_pool_state};

/// The result of a persisted pool command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCommandOutcome {
    /// The audit event recording the change; `None` when nothing changed.
    pub event_id: Option<i64>,
    /// The authoritative pool state after commit.
    pub state: PoolState,
    /// The allocation decision, for bookings.
    pub allocation: Option<AllocationPlan>,
    /// The bookings the command created, cancelled or confirmed.
    pub affected_bookings: Vec<Booking>,
}

/// Resolves the booking date a command addresses.
///
/// Commands naming a booking by ID address that booking's date; all others
/// address today.
fn scope_date(
    conn: &mut SqliteConnection,
    today: Date,
    command: &Command,
) -> Result<Date, PersistenceError> {
    match command {
        Command::CancelBooking { booking_id, .. } | Command::ConfirmBooking { booking_id } => {
            get_booking(conn, *booking_id)?.map_or_else(
                || {
                    Err(PersistenceError::CommandRejected(CoreError::from(
                        DomainError::BookingNotFound(*booking_id),
                    )))
                },
                |booking| Ok(booking.booking_date),
            )
        }
        _ => Ok(today),
    }
}

/// Loads the pool, applies a command and writes the result.
///
/// # Arguments
///
/// * `conn` - A connection inside an immediate transaction
/// * `today` - The current booking date
/// * `command` - The command to apply
/// * `policy` - The deployment's allocation policy
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `CommandRejected` when a booking rule rejects the command, or an
/// error if any read or write fails. The caller's transaction rolls back in
/// both cases.
pub fn execute_pool_command(
    conn: &mut SqliteConnection,
    today: Date,
    command: Command,
    policy: AllocationPolicy,
    actor: Actor,
    cause: Cause,
) -> Result<PoolCommandOutcome, PersistenceError> {
    let action_name: &'static str = command.action_name();
    let booking_date: Date = scope_date(conn, today, &command)?;
    let state: PoolState = load_pool_state(conn, booking_date)?;

    let transition: PoolTransition = apply(&state, command, policy, actor, cause)?;

    if transition.changes.is_empty() {
        debug!(action = action_name, "Pool command changed nothing");
        return Ok(PoolCommandOutcome {
            event_id: None,
            state,
            allocation: transition.allocation,
            affected_bookings: transition.affected_bookings,
        });
    }

    let inserted: Vec<Booking> = apply_pool_changes(conn, &transition.changes)?;
    let event_id: i64 = persist_audit_event(conn, &transition.audit_event)?;
    let state: PoolState = load_pool_state(conn, booking_date)?;

    info!(
        event_id,
        action = action_name,
        booking_date = %format_booking_date(booking_date),
        booked = state.booked_count(),
        tokens_left = state.tokens_left(),
        "Pool command applied"
    );

    let affected_bookings: Vec<Booking> = if inserted.is_empty() {
        transition.affected_bookings
    } else {
        inserted
    };

    Ok(PoolCommandOutcome {
        event_id: Some(event_id),
        state,
        allocation: transition.allocation,
        affected_bookings,
    })
}

/// Writes pool changes in order.
///
/// # Returns
///
/// The inserted bookings, carrying their new IDs.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the settings version moved, or an
/// error if a write fails.
pub fn apply_pool_changes(
    conn: &mut SqliteConnection,
    changes: &[PoolChange],
) -> Result<Vec<Booking>, PersistenceError> {
    let mut inserted: Vec<Booking> = Vec::new();

    for change in changes {
        match change {
            PoolChange::InsertBookings(new_bookings) => {
                for booking in new_bookings {
                    inserted.push(insert_booking(conn, booking)?);
                }
            }
            PoolChange::DeleteBooking { booking_id } => {
                let rows_affected: usize = diesel::delete(bookings::table)
                    .filter(bookings::booking_id.eq(*booking_id))
                    .execute(conn)?;
                if rows_affected == 0 {
                    return Err(PersistenceError::NotFound(format!("Booking {booking_id}")));
                }
            }
            PoolChange::ConfirmBookings { booking_ids } => {
                diesel::update(bookings::table)
                    .filter(bookings::booking_id.eq_any(booking_ids.clone()))
                    .set(bookings::is_confirmed.eq(1))
                    .execute(conn)?;
            }
            PoolChange::DeleteBookingsForDate { booking_date } => {
                let rows_affected: usize = diesel::delete(bookings::table)
                    .filter(bookings::booking_date.eq(format_booking_date(*booking_date)))
                    .execute(conn)?;
                debug!(rows_affected, "Cleared bookings for date");
            }
            PoolChange::WriteSettings(settings) => write_settings(conn, settings)?,
            PoolChange::AdvanceSequence {
                booking_date,
                last_token_number,
            } => {
                diesel::replace_into(booking_sequences::table)
                    .values((
                        booking_sequences::booking_date.eq(format_booking_date(*booking_date)),
                        booking_sequences::last_token_number.eq(i64::from(*last_token_number)),
                    ))
                    .execute(conn)?;
            }
            PoolChange::ClearSequence { booking_date } => {
                diesel::delete(booking_sequences::table)
                    .filter(booking_sequences::booking_date.eq(format_booking_date(*booking_date)))
                    .execute(conn)?;
            }
        }
    }

    Ok(inserted)
}

fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &Booking,
) -> Result<Booking, PersistenceError> {
    diesel::insert_into(bookings::table)
        .values((
            bookings::user_id.eq(&booking.user_id),
            bookings::user_name.eq(&booking.user_name),
            bookings::token_number.eq(i64::from(booking.token_number)),
            bookings::booking_date.eq(format_booking_date(booking.booking_date)),
            bookings::is_confirmed.eq(i32::from(booking.is_confirmed)),
        ))
        .execute(conn)?;

    let booking_id: i64 = conn.get_last_insert_rowid()?;
    get_booking(conn, booking_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("Booking {booking_id}")))
}

/// Replaces the settings record if it is still at the prior version.
fn write_settings(
    conn: &mut SqliteConnection,
    settings: &TokenSettings,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(token_settings::table)
        .filter(token_settings::settings_id.eq(SETTINGS_ID))
        .filter(token_settings::version.eq(settings.version - 1))
        .set((
            token_settings::is_active.eq(i32::from(settings.is_active)),
            token_settings::total_tokens.eq(i64::from(settings.total_tokens)),
            token_settings::version.eq(settings.version),
            token_settings::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ConcurrentModification);
    }

    info!(
        is_active = settings.is_active,
        total_tokens = settings.total_tokens,
        version = settings.version,
        "Token settings updated"
    );
    Ok(())
}
