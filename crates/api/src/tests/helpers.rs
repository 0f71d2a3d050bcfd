// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use canteen_audit::Cause;
use canteen_domain::AllocationPolicy;
use canteen_persistence::SqlitePersistence;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use std::path::PathBuf;
use time::Date;

use crate::{
    AuthenticatedActor, AuthenticationService, BookTokensRequest, BookTokensResponse, SignupRequest,
    TotalTokensRequest, book_tokens, reset_pool, signup,
};

pub const TEST_PASSWORD: &str = "Canteen#2026";
pub const ADMIN_EMAIL: &str = "admin@college.edu";

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// A database file removed, with its WAL files, on drop.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let path: PathBuf =
            std::env::temp_dir().join(format!("canteen-api-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    pub fn open(&self) -> SqlitePersistence {
        SqlitePersistence::new_with_file(&self.path).expect("Failed to open file persistence")
    }

    /// Runs a statement on a separate connection, bypassing the persistence layer.
    pub fn execute_raw(&self, sql: &str) {
        let url: &str = self.path.to_str().expect("UTF-8 temp path");
        let mut conn: SqliteConnection =
            SqliteConnection::establish(url).expect("Failed to open raw connection");
        diesel::sql_query(sql)
            .execute(&mut conn)
            .expect("Raw statement should succeed");
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub fn admin_emails() -> Vec<String> {
    vec![String::from(ADMIN_EMAIL)]
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// Returns March 2, 2026 as the booking date under test.
pub fn create_test_date() -> Date {
    Date::from_calendar_date(2026, time::Month::March, 2).expect("Valid test date")
}

pub fn signup_request(email: &str, name: Option<&str>) -> SignupRequest {
    SignupRequest {
        email: String::from(email),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
        name: name.map(String::from),
    }
}

/// Signs up and signs in, returning the resolved actor.
pub fn create_test_user(
    persistence: &mut SqlitePersistence,
    email: &str,
    name: &str,
) -> AuthenticatedActor {
    create_test_session(persistence, email, name).1
}

/// Signs up and signs in, returning the session token and the resolved actor.
pub fn create_test_session(
    persistence: &mut SqlitePersistence,
    email: &str,
    name: &str,
) -> (String, AuthenticatedActor) {
    signup(persistence, &signup_request(email, Some(name)), &admin_emails())
        .expect("Signup should succeed");
    let (token, actor, _expires_at): (String, AuthenticatedActor, String) =
        AuthenticationService::login(persistence, email, TEST_PASSWORD, &admin_emails())
            .expect("Login should succeed");
    (token, actor)
}

pub fn create_test_admin(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    create_test_user(persistence, ADMIN_EMAIL, "Canteen Admin")
}

/// Resets today's pool to `total` tokens and opens booking.
pub fn open_pool(persistence: &mut SqlitePersistence, admin: &AuthenticatedActor, total: i64) {
    reset_pool(
        persistence,
        create_test_date(),
        AllocationPolicy::Partial,
        TotalTokensRequest {
            total_tokens: total,
        },
        admin,
        create_test_cause(),
    )
    .expect("Reset should succeed");
}

pub fn book(
    persistence: &mut SqlitePersistence,
    student: &AuthenticatedActor,
    quantity: i64,
) -> Result<BookTokensResponse, crate::ApiError> {
    book_tokens(
        persistence,
        create_test_date(),
        AllocationPolicy::Partial,
        BookTokensRequest { quantity },
        student,
        create_test_cause(),
    )
}
