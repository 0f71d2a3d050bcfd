// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use canteen::CoreError;
use canteen_domain::DomainError;
use canteen_persistence::PersistenceError;

use super::helpers::create_test_date;
use crate::{
    ApiError, AuthError, PasswordPolicyError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};

#[test]
fn test_booking_failures_are_rule_violations() {
    let cases: Vec<(DomainError, &str)> = vec![
        (DomainError::BookingClosed, "booking_open"),
        (
            DomainError::SoldOut {
                booking_date: create_test_date(),
            },
            "tokens_available",
        ),
        (
            DomainError::UserLimitReached { limit: 3, held: 3 },
            "user_token_limit",
        ),
        (
            DomainError::NothingToAllocate {
                requested: 3,
                grantable: 1,
            },
            "allocation_possible",
        ),
    ];

    for (err, expected_rule) in cases {
        match translate_domain_error(err) {
            ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, expected_rule),
            other => panic!("Expected DomainRuleViolation, got {other:?}"),
        }
    }
}

#[test]
fn test_lookup_failures_are_not_found() {
    assert!(matches!(
        translate_domain_error(DomainError::BookingNotFound(4)),
        ApiError::ResourceNotFound { .. }
    ));
    assert!(matches!(
        translate_core_error(CoreError::DomainViolation(DomainError::MenuItemNotFound(2))),
        ApiError::ResourceNotFound { .. }
    ));
}

#[test]
fn test_persistence_errors() {
    let rejected: ApiError = translate_persistence_error(PersistenceError::CommandRejected(
        CoreError::DomainViolation(DomainError::BookingClosed),
    ));
    assert_eq!(
        rejected,
        ApiError::DomainRuleViolation {
            rule: String::from("booking_open"),
            message: String::from("Token booking is closed"),
        }
    );

    assert!(matches!(
        translate_persistence_error(PersistenceError::EmailAlreadyRegistered(String::from(
            "asha@college.edu"
        ))),
        ApiError::Conflict { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::DatabaseError(String::from("disk I/O"))),
        ApiError::Internal { .. }
    ));
}

#[test]
fn test_conversions_into_api_error() {
    let auth: ApiError = ApiError::from(AuthError::Unauthorized {
        action: String::from("manage_menu"),
        required_role: String::from("admin"),
    });
    assert_eq!(
        auth.to_string(),
        "Unauthorized: 'manage_menu' requires admin role"
    );

    let policy: ApiError = ApiError::from(PasswordPolicyError::ConfirmationMismatch);
    assert_eq!(
        policy.to_string(),
        "Password policy violation: Password and confirmation do not match"
    );
}

#[test]
fn test_stale_sequence_is_internal() {
    let err: ApiError = translate_core_error(CoreError::SequenceBehindBookings {
        booking_date: time::Date::from_calendar_date(2026, time::Month::March, 2).unwrap(),
        last_issued_token: 1,
        highest_held: 4,
    });

    assert_eq!(
        err,
        ApiError::Internal {
            message: String::from(
                "Token sequence for 2026-03-02 is at #1 but token #4 is held"
            ),
        }
    );
}
