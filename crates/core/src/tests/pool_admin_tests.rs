// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    book, create_open_pool, create_test_admin, create_test_cause, create_test_date,
    persist_ids, writes_settings,
};
use crate::{Command, CoreError, PoolChange, PoolState, PoolTransition, apply};
use canteen_domain::{AllocationPolicy, DomainError, TokenSettings};

fn admin_apply(state: &PoolState, command: Command) -> Result<PoolTransition, CoreError> {
    apply(
        state,
        command,
        AllocationPolicy::Partial,
        create_test_admin(),
        create_test_cause(),
    )
}

#[test]
fn test_reset_clears_bookings_and_restarts_numbering() {
    let state: PoolState = book(&create_open_pool(5), "u1", 3).new_state;
    let mut closed: PoolState = persist_ids(&state);
    closed.settings.is_active = false;

    let transition: PoolTransition =
        admin_apply(&closed, Command::ResetPool { total_tokens: 40 }).unwrap();

    assert!(transition.new_state.bookings.is_empty());
    assert_eq!(transition.new_state.tokens_left(), 40);
    assert_eq!(transition.new_state.last_issued_token, 0);
    assert_eq!(
        transition.changes,
        vec![
            PoolChange::DeleteBookingsForDate {
                booking_date: create_test_date()
            },
            PoolChange::ClearSequence {
                booking_date: create_test_date()
            },
            PoolChange::WriteSettings(TokenSettings::new(true, 40, 2)),
        ]
    );

    let rebooked: PoolTransition = book(&transition.new_state, "u2", 1);
    assert_eq!(rebooked.allocation.unwrap().first_token, 1);
}

#[test]
fn test_reset_rejects_non_positive_amount() {
    let result: Result<PoolTransition, CoreError> =
        admin_apply(&create_open_pool(5), Command::ResetPool { total_tokens: 0 });

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTokenAmount {
            operation: "reset",
            amount: 0
        }))
    );
}

#[test]
fn test_add_tokens_keeps_bookings() {
    let state: PoolState = book(&create_open_pool(5), "u1", 2).new_state;

    let transition: PoolTransition =
        admin_apply(&state, Command::AddTokens { amount: 10 }).unwrap();

    assert_eq!(transition.new_state.bookings, state.bookings);
    assert_eq!(transition.new_state.settings.total_tokens, 15);
    assert_eq!(transition.new_state.tokens_left(), state.tokens_left() + 10);
    assert_eq!(
        writes_settings(&transition),
        Some(TokenSettings::new(true, 15, 2))
    );
    assert_eq!(
        transition.audit_event.after.data,
        "is_active=true,total_tokens=15,booked=2,tokens_left=13"
    );
}

#[test]
fn test_add_tokens_rejects_negative_amount() {
    let result: Result<PoolTransition, CoreError> =
        admin_apply(&create_open_pool(5), Command::AddTokens { amount: -5 });

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidTokenAmount { .. }
        ))
    ));
}

#[test]
fn test_add_tokens_overflow() {
    let state: PoolState =
        PoolState::new(create_test_date(), TokenSettings::new(true, u32::MAX, 1));

    let result: Result<PoolTransition, CoreError> =
        admin_apply(&state, Command::AddTokens { amount: 1 });

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::TokenCountOverflow))
    );
}

#[test]
fn test_set_booking_active_toggles_only_the_flag() {
    let transition: PoolTransition = admin_apply(
        &create_open_pool(7),
        Command::SetBookingActive { is_active: false },
    )
    .unwrap();

    assert_eq!(
        writes_settings(&transition),
        Some(TokenSettings::new(false, 7, 2))
    );
    assert_eq!(transition.audit_event.action.name, "SetBookingActive");
}

#[test]
fn test_set_total_tokens_below_booked_reports_zero_left() {
    let state: PoolState = book(&create_open_pool(5), "u1", 3).new_state;

    let transition: PoolTransition =
        admin_apply(&state, Command::SetTotalTokens { total_tokens: 1 }).unwrap();

    assert_eq!(transition.new_state.bookings.len(), 3);
    assert_eq!(transition.new_state.tokens_left(), 0);
}

#[test]
fn test_set_total_tokens_rejects_negative() {
    let result: Result<PoolTransition, CoreError> = admin_apply(
        &create_open_pool(5),
        Command::SetTotalTokens { total_tokens: -1 },
    );

    assert!(result.is_err());
}
