// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, profile and session mutations.

use canteen_domain::Role;
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{accounts, profiles, sessions};
use crate::error::PersistenceError;
use crate::queries::identity::get_account_by_email;

/// Creates an account and its profile.
///
/// Must run inside a transaction so the account never exists without a profile.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The normalized e-mail address
/// * `password` - The plain-text password (will be hashed)
/// * `name` - The display name
/// * `role` - The profile role
/// * `password_cost` - The bcrypt work factor
///
/// # Returns
///
/// The new user ID.
///
/// # Errors
///
/// Returns `EmailAlreadyRegistered` if the address is taken, or an error if
/// hashing or an insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
    password_cost: u32,
) -> Result<String, PersistenceError> {
    info!(email, role = %role, "Creating account");

    if get_account_by_email(conn, email)?.is_some() {
        return Err(PersistenceError::EmailAlreadyRegistered(email.to_string()));
    }

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, password_cost)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let user_id: String = uuid::Uuid::new_v4().to_string();

    diesel::insert_into(accounts::table)
        .values((
            accounts::user_id.eq(&user_id),
            accounts::email.eq(email),
            accounts::password_hash.eq(&password_hash),
        ))
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::EmailAlreadyRegistered(email.to_string())
            }
            other => PersistenceError::from(other),
        })?;

    diesel::insert_into(profiles::table)
        .values((
            profiles::user_id.eq(&user_id),
            profiles::email.eq(email),
            profiles::name.eq(name),
            profiles::role.eq(role.as_str()),
        ))
        .execute(conn)?;

    info!(user_id, "Account created successfully");
    Ok(user_id)
}

/// Inserts a profile unless one already exists for the user.
///
/// # Returns
///
/// `true` if a profile was created.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn ensure_profile(
    conn: &mut SqliteConnection,
    user_id: &str,
    email: &str,
    name: &str,
    role: Role,
) -> Result<bool, PersistenceError> {
    let rows_affected: usize = diesel::insert_or_ignore_into(profiles::table)
        .values((
            profiles::user_id.eq(user_id),
            profiles::email.eq(email),
            profiles::name.eq(name),
            profiles::role.eq(role.as_str()),
        ))
        .execute(conn)?;

    if rows_affected > 0 {
        info!(user_id, "Created missing profile");
    }
    Ok(rows_affected > 0)
}

/// Creates a new session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The owning user
/// * `expires_at` - The expiration timestamp (`YYYY-MM-DD HH:MM:SS`, UTC)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes all expired sessions.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    debug!("Deleting expired sessions");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(
            sessions::expires_at.lt(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
