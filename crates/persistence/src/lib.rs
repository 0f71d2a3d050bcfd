// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the canteen booking service.
//!
//! This crate stores accounts, sessions, the menu, the token pool and the
//! audit log in `SQLite` via Diesel. Migrations are embedded and applied on
//! startup.
//!
//! ## Atomicity
//!
//! Every pool command (book, cancel, confirm, reset, add, toggle, set total)
//! runs as one `BEGIN IMMEDIATE` transaction: the pool state is loaded, the
//! command is decided by the core crate and the resulting changes plus the
//! audit event are written before commit. A rejected command rolls back
//! without side effects. Several processes sharing one database file
//! therefore serialize their pool writes.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every caller an isolated shared-cache database
//! - File databases run in WAL mode with a busy timeout

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use canteen::{Command, MenuCommand, PoolState};
use canteen_audit::{Actor, AuditEvent, Cause};
use canteen_domain::{AllocationPolicy, Booking, MenuItem, Role, TokenSettings};
use diesel::{Connection, SqliteConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The bcrypt work factor used for in-memory databases.
const IN_MEMORY_PASSWORD_COST: u32 = 4;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, ProfileData, SessionData};
pub use error::PersistenceError;
pub use mutations::{MenuCommandOutcome, PoolCommandOutcome};

use backend::PersistenceBackend;

/// Type alias for the only supported backend.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for the canteen service.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    password_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    /// Passwords are hashed with the minimum bcrypt work factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            password_cost: IN_MEMORY_PASSWORD_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            password_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Accounts, Profiles & Sessions
    // ========================================================================

    /// Creates an account and its profile in one transaction.
    ///
    /// # Arguments
    ///
    /// * `email` - The normalized e-mail address
    /// * `password` - The plain-text password (will be hashed)
    /// * `name` - The display name
    /// * `role` - The profile role
    ///
    /// # Returns
    ///
    /// The new user ID.
    ///
    /// # Errors
    ///
    /// Returns `EmailAlreadyRegistered` if the address is taken.
    pub fn create_account(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<String, PersistenceError> {
        let password_cost: u32 = self.password_cost;
        self.conn.transaction(|conn| {
            mutations::identity::create_account(conn, email, password, name, role, password_cost)
        })
    }

    /// Retrieves an account by normalized e-mail address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::identity::get_account_by_email(&mut self.conn, email)
    }

    /// Retrieves an account by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_account_by_id(
        &mut self,
        user_id: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::identity::get_account_by_id(&mut self.conn, user_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::identity::verify_password(password, password_hash)
    }

    /// Retrieves a user's profile row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_profile(&mut self, user_id: &str) -> Result<Option<ProfileData>, PersistenceError> {
        queries::identity::get_profile(&mut self.conn, user_id)
    }

    /// Inserts a profile unless one already exists.
    ///
    /// # Returns
    ///
    /// `true` if a profile was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn ensure_profile(
        &mut self,
        user_id: &str,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<bool, PersistenceError> {
        mutations::identity::ensure_profile(&mut self.conn, user_id, email, name, role)
    }

    /// Creates a new session.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `user_id` - The owning user
    /// * `expires_at` - The expiration timestamp (`YYYY-MM-DD HH:MM:SS`, UTC)
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::identity::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::identity::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::identity::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::identity::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::identity::delete_expired_sessions(&mut self.conn)
    }

    // ========================================================================
    // Menu
    // ========================================================================

    /// Lists menu items by category, then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_menu_items(&mut self, only_available: bool) -> Result<Vec<MenuItem>, PersistenceError> {
        queries::menu::list_menu_items(&mut self.conn, only_available)
    }

    /// Retrieves a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_menu_item(&mut self, menu_item_id: i64) -> Result<Option<MenuItem>, PersistenceError> {
        queries::menu::get_menu_item(&mut self.conn, menu_item_id)
    }

    /// Applies a menu command and its audit event in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` if the command is invalid for the stored
    /// catalog, or an error if a write fails.
    pub fn execute_menu_command(
        &mut self,
        command: MenuCommand,
        actor: Actor,
        cause: Cause,
    ) -> Result<MenuCommandOutcome, PersistenceError> {
        self.conn.transaction(|conn| {
            mutations::menu::execute_menu_command(conn, command, actor, cause)
        })
    }

    // ========================================================================
    // Token Pool
    // ========================================================================

    /// Retrieves the authoritative token settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_token_settings(&mut self) -> Result<TokenSettings, PersistenceError> {
        queries::pool::get_token_settings(&mut self.conn)
    }

    /// Loads the pool state for a booking date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_pool_state(&mut self, booking_date: Date) -> Result<PoolState, PersistenceError> {
        queries::pool::load_pool_state(&mut self.conn, booking_date)
    }

    /// Lists the bookings for a date by token number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_for_date(
        &mut self,
        booking_date: Date,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::pool::list_bookings_for_date(&mut self.conn, booking_date)
    }

    /// Lists one user's bookings for a date by token number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_user_bookings(
        &mut self,
        user_id: &str,
        booking_date: Date,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::pool::list_user_bookings(&mut self.conn, user_id, booking_date)
    }

    /// Retrieves a booking by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<Option<Booking>, PersistenceError> {
        queries::pool::get_booking(&mut self.conn, booking_id)
    }

    /// Applies a pool command atomically.
    ///
    /// The whole read-decide-write sequence runs in one `BEGIN IMMEDIATE`
    /// transaction.
    ///
    /// # Arguments
    ///
    /// * `today` - The current booking date
    /// * `command` - The command to apply
    /// * `policy` - The deployment's allocation policy
    /// * `actor` - The actor performing this action
    /// * `cause` - The cause or reason for this action
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` when a booking rule rejects the command, or
    /// an error if the transaction fails. Nothing is written in either case.
    pub fn execute_pool_command(
        &mut self,
        today: Date,
        command: Command,
        policy: AllocationPolicy,
        actor: Actor,
        cause: Cause,
    ) -> Result<PoolCommandOutcome, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::pool::execute_pool_command(conn, today, command, policy, actor, cause)
        })
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit timeline, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &mut self,
        limit: Option<i64>,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, limit)
    }
}
