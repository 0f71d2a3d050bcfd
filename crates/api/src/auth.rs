// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use std::str::FromStr;

use canteen_audit::Actor;
use canteen_domain::{Role, display_name_for, normalize_email, resolve_role};
use canteen_persistence::{AccountData, PersistenceError, SessionData, SqlitePersistence};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, warn};

use crate::error::AuthError;

/// Storage format for session expiry, comparable with SQLite's `CURRENT_TIMESTAMP`.
const SESSION_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A signed-in user with their resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account's user ID.
    pub user_id: String,
    /// The normalized e-mail address.
    pub email: String,
    /// The display name.
    pub name: String,
    /// The effective role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: String, email: String, name: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            name,
            role,
        }
    }

    /// Returns whether this actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Converts this actor into an audit `Actor`.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), String::from(self.role.as_str()))
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Administrators manage the menu and the pool; students book.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may create, edit or remove menu items.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_menu(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "manage_menu")
    }

    /// Checks if an actor may view the full catalog, including withdrawn items.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_full_menu(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "view_full_menu")
    }

    /// Checks if an actor may open, close, reset or resize the token pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_pool(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "manage_pool")
    }

    /// Checks if an actor may confirm bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_confirm_bookings(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "confirm_bookings")
    }

    /// Checks if an actor may list every user's bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_all_bookings(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "view_all_bookings")
    }

    /// Checks if an actor may read the audit timeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_view_audit(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Admin, "view_audit")
    }

    /// Checks if an actor may book tokens.
    ///
    /// Administrators use the console and cannot book.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Student role.
    pub fn authorize_book_tokens(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Student, "book_tokens")
    }

    /// Checks if an actor may cancel their own bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Student role.
    pub fn authorize_cancel_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, Role::Student, "cancel_booking")
    }

    fn require(
        actor: &AuthenticatedActor,
        required: Role,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == required {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from(required.as_str()),
            })
        }
    }
}

/// Authentication service for bearer-session authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and creates a session.
    ///
    /// A missing profile is recreated from the account.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account e-mail address (any case)
    /// * `password` - The plain-text password
    /// * `admin_emails` - The administrator allow-list
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot
    /// be created. Unknown addresses and wrong passwords are not distinguished.
    pub fn login(
        persistence: &mut SqlitePersistence,
        email: &str,
        password: &str,
        admin_emails: &[String],
    ) -> Result<(String, AuthenticatedActor, String), AuthError> {
        let normalized: String = normalize_email(email);
        let account: AccountData = persistence
            .get_account_by_email(&normalized)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::invalid_credentials)?;

        let verified: bool = persistence
            .verify_password(password, &account.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !verified {
            return Err(Self::invalid_credentials());
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(SESSION_TIMESTAMP_FORMAT)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, &account.user_id, &expires_at_str)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to create session: {e}"),
            })?;

        let role: Role = resolve_role(None, &account.email, admin_emails);
        if let Err(e) = persistence.ensure_profile(
            &account.user_id,
            &account.email,
            &account.email,
            role,
        ) {
            warn!(user_id = %account.user_id, error = %e, "Failed to ensure profile at login");
        }

        let actor: AuthenticatedActor = Self::resolve_actor(persistence, &account, admin_emails);
        debug!(user_id = %actor.user_id, role = %actor.role, "Login succeeded");

        Ok((session_token, actor, expires_at_str))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    /// * `admin_emails` - The administrator allow-list
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or its
    /// account no longer exists.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
        admin_emails: &[String],
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            PrimitiveDateTime::parse(&session.expires_at, SESSION_TIMESTAMP_FORMAT)
                .map_err(|e| AuthError::Internal {
                    message: format!("Failed to parse session expiration: {e}"),
                })?
                .assume_utc();

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let account: AccountData = persistence
            .get_account_by_id(&session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(Self::resolve_actor(persistence, &account, admin_emails))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Resolves an account's display name and effective role.
    ///
    /// Profile lookup failures are not fatal: the role falls back to the
    /// allow-list and the name to the e-mail address.
    #[must_use]
    pub fn resolve_actor(
        persistence: &mut SqlitePersistence,
        account: &AccountData,
        admin_emails: &[String],
    ) -> AuthenticatedActor {
        let (name, stored_role): (String, Option<Role>) =
            match persistence.get_profile(&account.user_id) {
                Ok(Some(profile)) => {
                    let stored_role: Option<Role> = match Role::from_str(&profile.role) {
                        Ok(role) => Some(role),
                        Err(e) => {
                            warn!(user_id = %account.user_id, error = %e, "Ignoring stored profile role");
                            None
                        }
                    };
                    (
                        display_name_for(Some(&profile.name), &account.email),
                        stored_role,
                    )
                }
                Ok(None) => {
                    warn!(user_id = %account.user_id, "Profile missing; using allow-list role");
                    (account.email.clone(), None)
                }
                Err(e) => {
                    warn!(user_id = %account.user_id, error = %e, "Profile lookup failed; using allow-list role");
                    (account.email.clone(), None)
                }
            };

        AuthenticatedActor::new(
            account.user_id.clone(),
            account.email.clone(),
            name,
            resolve_role(stored_role, &account.email, admin_emails),
        )
    }

    fn generate_session_token() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid e-mail or password"),
        }
    }

    /// Store failures are not credential failures; they surface as internal errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Internal {
            message: format!("Database error: {err}"),
        }
    }
}
