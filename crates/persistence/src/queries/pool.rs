// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Token pool queries.
//!
//! When called inside the immediate transaction that applies a pool command,
//! these reads see exactly the data the command's writes will build on.

use canteen::PoolState;
use canteen_domain::{Booking, TokenSettings, format_booking_date, parse_booking_date};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;

use crate::diesel_schema::{booking_sequences, bookings, token_settings};
use crate::error::PersistenceError;

/// The primary key of the single settings record.
pub const SETTINGS_ID: i32 = 1;

/// Diesel Queryable struct for settings rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = token_settings)]
struct TokenSettingsRow {
    is_active: i32,
    total_tokens: i64,
    version: i64,
}

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
struct BookingRow {
    booking_id: i64,
    user_id: String,
    user_name: String,
    token_number: i64,
    booking_date: String,
    is_confirmed: i32,
    created_at: String,
}

fn row_to_booking(row: BookingRow) -> Result<Booking, PersistenceError> {
    let token_number: u32 = u32::try_from(row.token_number).map_err(|_| {
        PersistenceError::ReconstructionError(format!(
            "Token number {} out of range for booking {}",
            row.token_number, row.booking_id
        ))
    })?;
    let booking_date: Date = parse_booking_date(&row.booking_date)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    Ok(Booking::with_id(
        row.booking_id,
        &row.user_id,
        &row.user_name,
        token_number,
        booking_date,
        row.is_confirmed != 0,
        Some(row.created_at),
    ))
}

/// Retrieves the authoritative settings record.
///
/// # Errors
///
/// Returns an error if the record is missing or holds an out-of-range total.
pub fn get_token_settings(conn: &mut SqliteConnection) -> Result<TokenSettings, PersistenceError> {
    let row: TokenSettingsRow = token_settings::table
        .filter(token_settings::settings_id.eq(SETTINGS_ID))
        .select(TokenSettingsRow::as_select())
        .first(conn)?;

    let total_tokens: u32 = u32::try_from(row.total_tokens).map_err(|_| {
        PersistenceError::ReconstructionError(format!(
            "Stored total_tokens {} out of range",
            row.total_tokens
        ))
    })?;

    Ok(TokenSettings::new(
        row.is_active != 0,
        total_tokens,
        row.version,
    ))
}

/// Lists the bookings held for a date, ordered by token number.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_bookings_for_date(
    conn: &mut SqliteConnection,
    booking_date: Date,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::booking_date.eq(format_booking_date(booking_date)))
        .select(BookingRow::as_select())
        .order(bookings::token_number.asc())
        .load(conn)?;

    rows.into_iter().map(row_to_booking).collect()
}

/// Lists one user's bookings for a date, ordered by token number.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_user_bookings(
    conn: &mut SqliteConnection,
    user_id: &str,
    booking_date: Date,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::user_id.eq(user_id))
        .filter(bookings::booking_date.eq(format_booking_date(booking_date)))
        .select(BookingRow::as_select())
        .order(bookings::token_number.asc())
        .load(conn)?;

    rows.into_iter().map(row_to_booking).collect()
}

/// Retrieves a booking by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the booking does not exist.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    let result: Result<BookingRow, diesel::result::Error> = bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row_to_booking(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Returns the highest token number recorded in the date's sequence, or 0.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_token_number(
    conn: &mut SqliteConnection,
    booking_date: Date,
) -> Result<u32, PersistenceError> {
    let result: Result<i64, diesel::result::Error> = booking_sequences::table
        .filter(booking_sequences::booking_date.eq(format_booking_date(booking_date)))
        .select(booking_sequences::last_token_number)
        .first(conn);

    match result {
        Ok(value) => u32::try_from(value).map_err(|_| {
            PersistenceError::ReconstructionError(format!("Stored sequence {value} out of range"))
        }),
        Err(diesel::result::Error::NotFound) => Ok(0),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Loads the pool state for a date.
///
/// The last issued token is the larger of the sequence and the highest
/// booked number, so rows written without a sequence still count. States
/// loaded here therefore never trip `CoreError::SequenceBehindBookings`;
/// that check only guards pool states built elsewhere.
///
/// # Errors
///
/// Returns an error if any read fails.
pub fn load_pool_state(
    conn: &mut SqliteConnection,
    booking_date: Date,
) -> Result<PoolState, PersistenceError> {
    let settings: TokenSettings = get_token_settings(conn)?;
    let booked: Vec<Booking> = list_bookings_for_date(conn, booking_date)?;
    let sequence: u32 = get_last_token_number(conn, booking_date)?;
    let highest_booked: u32 = booked.iter().map(|b| b.token_number).max().unwrap_or(0);

    let mut state: PoolState = PoolState::new(booking_date, settings);
    state.bookings = booked;
    state.last_issued_token = sequence.max(highest_booked);
    Ok(state)
}
