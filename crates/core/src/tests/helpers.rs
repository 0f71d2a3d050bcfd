// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, PoolChange, PoolState, PoolTransition, apply};
use canteen_audit::{Actor, Cause};
use canteen_domain::{AllocationPolicy, Booking, TokenSettings};
use time::Date;

pub fn create_test_date() -> Date {
    Date::from_calendar_date(2026, time::Month::March, 2).unwrap()
}

pub fn create_test_admin() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_student(user_id: &str) -> Actor {
    Actor::new(String::from(user_id), String::from("student"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn create_open_pool(total_tokens: u32) -> PoolState {
    PoolState::new(create_test_date(), TokenSettings::new(true, total_tokens, 1))
}

pub fn book(state: &PoolState, user_id: &str, quantity: i64) -> PoolTransition {
    apply(
        state,
        Command::BookTokens {
            user_id: String::from(user_id),
            user_name: format!("Student {user_id}"),
            quantity,
        },
        AllocationPolicy::Partial,
        create_test_student(user_id),
        create_test_cause(),
    )
    .unwrap()
}

/// Assigns storage identifiers to freshly inserted bookings, the way the
/// persistence layer would.
pub fn persist_ids(state: &PoolState) -> PoolState {
    let mut persisted: PoolState = state.clone();
    persisted.bookings = state
        .bookings
        .iter()
        .map(|b| {
            Booking::with_id(
                i64::from(b.token_number) * 100,
                &b.user_id,
                &b.user_name,
                b.token_number,
                b.booking_date,
                b.is_confirmed,
                None,
            )
        })
        .collect();
    persisted
}

pub fn token_numbers(state: &PoolState) -> Vec<u32> {
    let mut numbers: Vec<u32> = state.bookings.iter().map(|b| b.token_number).collect();
    numbers.sort_unstable();
    numbers
}

pub fn writes_settings(transition: &PoolTransition) -> Option<TokenSettings> {
    transition.changes.iter().find_map(|c| match c {
        PoolChange::WriteSettings(settings) => Some(*settings),
        _ => None,
    })
}
