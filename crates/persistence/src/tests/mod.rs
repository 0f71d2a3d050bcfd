// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod concurrency_tests;
mod initialization_tests;

use crate::{Persistence, PersistenceError, PoolCommandOutcome};
use canteen::Command;
use canteen_audit::{Actor, Cause};
use canteen_domain::{AllocationPolicy, Role};
use time::Date;

pub fn create_test_admin() -> Actor {
    Actor::new(String::from("admin-1"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Returns March 2, 2026 as the booking date under test.
pub fn create_test_date() -> Date {
    Date::from_calendar_date(2026, time::Month::March, 2).expect("Valid test date")
}

/// Creates a student account and returns its user ID.
pub fn create_test_student(persistence: &mut Persistence, email: &str) -> String {
    persistence
        .create_account(email, "Secret#2026", email, Role::Student)
        .unwrap()
}

/// Resets the pool for the test date and opens it with `total` tokens.
pub fn open_pool(persistence: &mut Persistence, total: i64) {
    persistence
        .execute_pool_command(
            create_test_date(),
            Command::ResetPool {
                total_tokens: total,
            },
            AllocationPolicy::Partial,
            create_test_admin(),
            create_test_cause(),
        )
        .unwrap();
}

/// Books tokens for a student on the test date.
pub fn book(
    persistence: &mut Persistence,
    user_id: &str,
    quantity: i64,
    policy: AllocationPolicy,
) -> Result<PoolCommandOutcome, PersistenceError> {
    persistence.execute_pool_command(
        create_test_date(),
        Command::BookTokens {
            user_id: user_id.to_string(),
            user_name: format!("Student {user_id}"),
            quantity,
        },
        policy,
        Actor::new(user_id.to_string(), String::from("student")),
        create_test_cause(),
    )
}

/// Returns the token numbers of a command's affected bookings.
pub fn token_numbers(outcome: &PoolCommandOutcome) -> Vec<u32> {
    outcome
        .affected_bookings
        .iter()
        .map(|b| b.token_number)
        .collect()
}
