// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// The role held by a signed-in user.
///
/// Roles gate the administrator console. Students book tokens; administrators
/// manage the menu and the token pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student who views the menu and books tokens.
    #[default]
    Student,
    /// A canteen administrator.
    Admin,
}

impl Role {
    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Menu category.
///
/// The declaration order is the fixed display order of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuCategory {
    Breakfast,
    Lunch,
    Snacks,
}

impl MenuCategory {
    /// All categories in display order.
    pub const DISPLAY_ORDER: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Snacks];

    /// Converts this category to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Snacks => "Snacks",
        }
    }
}

impl FromStr for MenuCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Breakfast" => Ok(Self::Breakfast),
            "Lunch" => Ok(Self::Lunch),
            "Snacks" => Ok(Self::Snacks),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-negative menu price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a validated price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative.
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::InvalidPrice(format!(
                "{amount} is negative; prices must be zero or more"
            )));
        }
        Ok(Self(amount.normalize()))
    }

    /// Parses a price from its decimal string form (e.g. `"45.50"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a decimal or is negative.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let amount: Decimal = Decimal::from_str(value.trim())
            .map_err(|e| DomainError::InvalidPrice(format!("'{value}': {e}")))?;
        Self::new(amount)
    }

    /// Returns the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An item on the canteen menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// The identifier assigned by the database.
    /// `None` indicates the item has not been persisted yet.
    menu_item_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Price in the canteen's currency.
    pub price: Price,
    /// Menu section.
    pub category: MenuCategory,
    /// Whether the item is offered today.
    pub is_available: bool,
}

impl MenuItem {
    /// Creates a new, unpersisted menu item.
    ///
    /// The name is trimmed.
    #[must_use]
    pub fn new(name: &str, price: Price, category: MenuCategory, is_available: bool) -> Self {
        Self {
            menu_item_id: None,
            name: name.trim().to_string(),
            price,
            category,
            is_available,
        }
    }

    /// Creates a menu item with an existing persisted ID.
    #[must_use]
    pub fn with_id(
        menu_item_id: i64,
        name: &str,
        price: Price,
        category: MenuCategory,
        is_available: bool,
    ) -> Self {
        Self {
            menu_item_id: Some(menu_item_id),
            ..Self::new(name, price, category, is_available)
        }
    }

    /// Returns the persisted identifier, if any.
    #[must_use]
    pub const fn menu_item_id(&self) -> Option<i64> {
        self.menu_item_id
    }
}

/// The authoritative token pool settings.
///
/// There is exactly one settings record. Every change increments `version`;
/// the history of changes is kept in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Whether new bookings are accepted.
    pub is_active: bool,
    /// The pool size for the current day.
    pub total_tokens: u32,
    /// Monotonic change counter.
    pub version: i64,
}

impl TokenSettings {
    /// Creates a settings value.
    #[must_use]
    pub const fn new(is_active: bool, total_tokens: u32, version: i64) -> Self {
        Self {
            is_active,
            total_tokens,
            version,
        }
    }

    /// The settings seeded into a fresh database: closed, with an empty pool.
    #[must_use]
    pub const fn initial() -> Self {
        Self::new(false, 0, 0)
    }

    /// Returns the next version of these settings with the given values.
    #[must_use]
    pub const fn next(&self, is_active: bool, total_tokens: u32) -> Self {
        Self::new(is_active, total_tokens, self.version + 1)
    }
}

/// A reserved meal token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The identifier assigned by the database.
    booking_id: Option<i64>,
    /// The owning user's identifier.
    pub user_id: String,
    /// The owner's display name captured at booking time.
    pub user_name: String,
    /// Sequential token number within the booking date.
    pub token_number: u32,
    /// The calendar day this token belongs to.
    pub booking_date: Date,
    /// Whether an administrator has confirmed the booking.
    pub is_confirmed: bool,
    /// Creation timestamp (ISO 8601), when loaded from storage.
    pub created_at: Option<String>,
}

impl Booking {
    /// Creates a new, unpersisted and unconfirmed booking.
    #[must_use]
    pub fn new(user_id: &str, user_name: &str, token_number: u32, booking_date: Date) -> Self {
        Self {
            booking_id: None,
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            token_number,
            booking_date,
            is_confirmed: false,
            created_at: None,
        }
    }

    /// Creates a booking loaded from storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        booking_id: i64,
        user_id: &str,
        user_name: &str,
        token_number: u32,
        booking_date: Date,
        is_confirmed: bool,
        created_at: Option<String>,
    ) -> Self {
        Self {
            booking_id: Some(booking_id),
            is_confirmed,
            created_at,
            ..Self::new(user_id, user_name, token_number, booking_date)
        }
    }

    /// Returns the persisted identifier, if any.
    #[must_use]
    pub const fn booking_id(&self) -> Option<i64> {
        self.booking_id
    }
}

/// A user's profile as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque user identifier from the identity store.
    pub user_id: String,
    /// Normalized e-mail address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Effective role.
    pub role: Role,
}

impl UserProfile {
    /// Creates a new profile.
    #[must_use]
    pub fn new(user_id: &str, email: &str, name: &str, role: Role) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
        }
    }

    /// Returns whether this profile may use the administrator console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
