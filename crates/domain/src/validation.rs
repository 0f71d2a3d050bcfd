// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{MenuItem, Role};

/// Validates a menu item's field constraints.
///
/// Price and category are validated when their types are constructed.
///
/// # Errors
///
/// Returns an error if the trimmed name is empty.
pub fn validate_menu_item(item: &MenuItem) -> Result<(), DomainError> {
    if item.name.trim().is_empty() {
        return Err(DomainError::InvalidMenuItemName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an administrator-supplied amount that must be positive.
///
/// Used by pool reset and add tokens.
///
/// # Arguments
///
/// * `operation` - The operation name, used in the error
/// * `amount` - The raw amount from the request
///
/// # Errors
///
/// Returns an error if the amount is zero, negative, or exceeds `u32`.
pub fn validate_token_amount(operation: &'static str, amount: i64) -> Result<u32, DomainError> {
    if amount <= 0 {
        return Err(DomainError::InvalidTokenAmount { operation, amount });
    }
    u32::try_from(amount).map_err(|_| DomainError::InvalidTokenAmount { operation, amount })
}

/// Validates a pool size set directly by an administrator.
///
/// Zero is allowed and closes the pool for new bookings.
///
/// # Errors
///
/// Returns an error if the amount is negative or exceeds `u32`.
pub fn validate_total_tokens(amount: i64) -> Result<u32, DomainError> {
    u32::try_from(amount).map_err(|_| DomainError::InvalidTokenAmount {
        operation: "set total tokens",
        amount,
    })
}

/// Converts a requested booking quantity into the allocator's range.
///
/// Negative requests become zero, which the allocator rejects.
#[must_use]
pub fn requested_quantity(quantity: i64) -> u32 {
    if quantity <= 0 {
        return 0;
    }
    u32::try_from(quantity).unwrap_or(u32::MAX)
}

/// Normalizes an e-mail address for storage and comparison.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates the basic shape of an e-mail address.
///
/// # Errors
///
/// Returns an error unless the address has exactly one `@` with a
/// non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let normalized: String = normalize_email(email);
    let mut parts = normalized.split('@');
    let local: &str = parts.next().unwrap_or_default();
    let domain: &str = parts.next().unwrap_or_default();

    let domain_ok: bool = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok || parts.next().is_some() || normalized.contains(' ') {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Returns whether the e-mail address is on the administrator allow-list.
///
/// Comparison is case-insensitive.
#[must_use]
pub fn is_admin_email(email: &str, admin_emails: &[String]) -> bool {
    let normalized: String = normalize_email(email);
    admin_emails
        .iter()
        .any(|candidate| normalize_email(candidate) == normalized)
}

/// Resolves a user's effective role.
///
/// A user is an administrator when the stored profile says so or the
/// e-mail is allow-listed. A missing profile falls back to the allow-list.
#[must_use]
pub fn resolve_role(stored: Option<Role>, email: &str, admin_emails: &[String]) -> Role {
    if stored == Some(Role::Admin) || is_admin_email(email, admin_emails) {
        Role::Admin
    } else {
        Role::Student
    }
}

/// Returns the display name for a user: the given name when present,
/// otherwise the e-mail address.
#[must_use]
pub fn display_name_for(name: Option<&str>, email: &str) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.to_string(),
    }
}
