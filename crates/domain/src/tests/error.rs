// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let date: time::Date =
        time::Date::from_calendar_date(2026, time::Month::March, 2).unwrap();

    let err: DomainError = DomainError::BookingClosed;
    assert_eq!(format!("{err}"), "Token booking is closed");

    let err: DomainError = DomainError::SoldOut { booking_date: date };
    assert_eq!(format!("{err}"), "No tokens left for 2026-03-02");

    let err: DomainError = DomainError::UserLimitReached { limit: 3, held: 3 };
    assert_eq!(
        format!("{err}"),
        "Token limit reached: you already hold 3 of 3 tokens for today"
    );

    let err: DomainError = DomainError::NothingToAllocate {
        requested: 3,
        grantable: 1,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot allocate 3 token(s): only 1 can be granted"
    );

    let err: DomainError = DomainError::MenuItemNotFound(7);
    assert_eq!(format!("{err}"), "Menu item 7 not found");

    let err: DomainError = DomainError::BookingNotFound(9);
    assert_eq!(format!("{err}"), "Booking 9 not found");

    let err: DomainError = DomainError::InvalidTokenAmount {
        operation: "reset",
        amount: -4,
    };
    assert_eq!(format!("{err}"), "Invalid token amount -4 for reset");

    let err: DomainError = DomainError::InvalidCategory(String::from("Dinner"));
    assert_eq!(
        format!("{err}"),
        "Invalid category: 'Dinner'. Must be Breakfast, Lunch or Snacks"
    );
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::BookingClosed);
    assert_eq!(err.to_string(), "Token booking is closed");
}
