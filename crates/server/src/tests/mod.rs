// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

const PASSWORD: &str = "Canteen#2026";
const ADMIN_EMAIL: &str = "admin@college.edu";

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    app_state_with(persistence)
}

fn app_state_with(persistence: SqlitePersistence) -> AppState {
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        live: Arc::new(LiveEventBroadcaster::new()),
        clock: BookingClock::default(),
        policy: AllocationPolicy::Partial,
        admin_emails: Arc::new(vec![String::from(ADMIN_EMAIL)]),
    }
}

/// A database file removed, with its WAL files, on drop.
struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    fn new() -> Self {
        let path: PathBuf =
            std::env::temp_dir().join(format!("canteen-server-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    fn execute_raw(&self, sql: &str) {
        let mut conn: SqliteConnection =
            SqliteConnection::establish(self.path.to_str().unwrap()).unwrap();
        diesel::sql_query(sql).execute(&mut conn).unwrap();
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

/// Sends a request and returns the status and decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, value)
}

/// Signs up and signs in, returning the session token.
async fn sign_in(app: &Router, email: &str, name: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "name": name,
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body["session_token"].as_str().unwrap().to_string()
}

/// Opens today's pool with the given size.
async fn open_pool(app: &Router, admin_token: &str, total: i64) {
    let (status, _) = send(
        app,
        "POST",
        "/admin/tokens/reset",
        Some(admin_token),
        Some(json!({ "total_tokens": total })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
}

#[tokio::test]
async fn test_signup_login_and_whoami() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_in(&app, "Asha@College.edu", "Asha Rao").await;

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["email"], "asha@college.edu");
    assert_eq!(body["name"], "Asha Rao");
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn test_allow_listed_email_signs_in_as_admin() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;

    let (_, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;

    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_missing_session_is_rejected_with_json_error() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "GET", "/tokens/status", None, None).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_session_store_failure_is_internal_error() {
    let db: TempDatabase = TempDatabase::new();
    let persistence: SqlitePersistence = SqlitePersistence::new_with_file(&db.path).unwrap();
    let app: Router = build_router(app_state_with(persistence));
    let token: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    db.execute_raw("DROP TABLE sessions");

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Internal server error");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "asha@college.edu", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication failed: Invalid session token");
}

#[tokio::test]
async fn test_duplicate_signup_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    sign_in(&app, "asha@college.edu", "Asha Rao").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "email": "ASHA@college.edu",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_student_is_forbidden_from_admin_routes() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;

    let (status, _) = send(
        &app,
        "POST",
        "/admin/tokens/reset",
        Some(&token),
        Some(json!({ "total_tokens": 10 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/admin/audit", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_menu_lists_available_items_by_category() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;

    let (status, created) = send(
        &app,
        "POST",
        "/admin/menu",
        Some(&admin),
        Some(json!({ "name": "Veg Thali", "price": "40.50", "category": "Lunch" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(created["menu_item"]["price"], "40.5");

    send(
        &app,
        "POST",
        "/admin/menu",
        Some(&admin),
        Some(json!({
            "name": "Masala Dosa",
            "price": "30",
            "category": "Breakfast",
            "is_available": false,
        })),
    )
    .await;

    let (status, menu) = send(&app, "GET", "/menu", None, None).await;
    assert_eq!(status, HttpStatusCode::OK);
    let categories = menu["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["category"], "Lunch");
    assert_eq!(categories[0]["items"][0]["name"], "Veg Thali");

    let (_, full) = send(&app, "GET", "/admin/menu", Some(&admin), None).await;
    let categories = full["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["category"], "Breakfast");
}

#[tokio::test]
async fn test_unknown_menu_item_is_not_found() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;

    let (status, _) = send(&app, "DELETE", "/admin/menu/999", Some(&admin), None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_flow_updates_status() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    let student: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    open_pool(&app, &admin, 10).await;

    let (status, booked) = send(
        &app,
        "POST",
        "/tokens/book",
        Some(&student),
        Some(json!({ "quantity": 2 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(booked["token_numbers"], json!([1, 2]));
    assert_eq!(booked["status"]["tokens_left"], 8);

    let (status, body) = send(&app, "GET", "/tokens/status", Some(&student), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["status"]["booked_count"], 2);
    assert_eq!(body["max_tokens_per_user"], 3);
    assert_eq!(body["my_bookings"].as_array().unwrap().len(), 2);

    let booking_id: i64 = booked["bookings"][0]["booking_id"].as_i64().unwrap();
    let (status, cancelled) = send(
        &app,
        "DELETE",
        &format!("/bookings/{booking_id}"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(cancelled["status"]["tokens_left"], 9);

    let (_, mine) = send(&app, "GET", "/bookings/mine", Some(&student), None).await;
    assert_eq!(mine["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(mine["bookings"][0]["token_number"], 2);
}

#[tokio::test]
async fn test_booking_when_sold_out_is_unprocessable() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    let first: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    let second: String = sign_in(&app, "ravi@college.edu", "Ravi Kumar").await;
    open_pool(&app, &admin, 1).await;

    let (status, _) = send(
        &app,
        "POST",
        "/tokens/book",
        Some(&first),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/tokens/book",
        Some(&second),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().starts_with("No tokens left"));
}

#[tokio::test]
async fn test_booking_before_pool_opens_is_unprocessable() {
    let app: Router = build_router(create_test_app_state());
    let student: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;

    let (status, _) = send(
        &app,
        "POST",
        "/tokens/book",
        Some(&student),
        Some(json!({ "quantity": 1 })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancelling_unknown_booking_is_not_found() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    let student: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    open_pool(&app, &admin, 5).await;

    let (status, _) = send(&app, "DELETE", "/bookings/4242", Some(&student), None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookings_listing_rejects_bad_date() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;

    let (status, body) = send(
        &app,
        "GET",
        "/admin/bookings?date=02-03-2026",
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_admin_confirms_user_bookings() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    let student: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    open_pool(&app, &admin, 10).await;
    send(
        &app,
        "POST",
        "/tokens/book",
        Some(&student),
        Some(json!({ "quantity": 2 })),
    )
    .await;

    let (_, me) = send(&app, "GET", "/auth/me", Some(&student), None).await;
    let user_id: &str = me["user_id"].as_str().unwrap();

    let (status, confirmed) = send(
        &app,
        "POST",
        &format!("/admin/users/{user_id}/confirm"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(confirmed["confirmed"].as_array().unwrap().len(), 2);

    let (status, listing) = send(&app, "GET", "/admin/bookings", Some(&admin), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(listing["total_bookings"], 2);
    assert_eq!(listing["confirmed_bookings"], 2);
    assert_eq!(listing["users"][0]["all_confirmed"], true);
}

#[tokio::test]
async fn test_audit_timeline_is_newest_first() {
    let app: Router = build_router(create_test_app_state());
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    open_pool(&app, &admin, 10).await;
    send(
        &app,
        "POST",
        "/admin/tokens/add",
        Some(&admin),
        Some(json!({ "amount": 5 })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/admin/audit?limit=1", Some(&admin), None).await;

    assert_eq!(status, HttpStatusCode::OK);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["action"], "AddTokens");
}

#[tokio::test]
async fn test_booking_is_broadcast_to_live_subscribers() {
    let app_state: AppState = create_test_app_state();
    let mut receiver = app_state.live.subscribe();
    let app: Router = build_router(app_state);
    let admin: String = sign_in(&app, ADMIN_EMAIL, "Canteen Office").await;
    let student: String = sign_in(&app, "asha@college.edu", "Asha Rao").await;
    open_pool(&app, &admin, 3).await;

    send(
        &app,
        "POST",
        "/tokens/book",
        Some(&student),
        Some(json!({ "quantity": 1 })),
    )
    .await;

    let reset: LiveEvent = receiver.recv().await.unwrap();
    assert!(matches!(reset, LiveEvent::PoolReset { total_tokens: 3, .. }));
    let booked: LiveEvent = receiver.recv().await.unwrap();
    assert!(matches!(
        booked,
        LiveEvent::TokensBooked { tokens_left: 2, .. }
    ));
}

#[test]
fn test_api_errors_map_to_status_codes() {
    let cases: Vec<(ApiError, StatusCode)> = vec![
        (
            ApiError::AuthenticationFailed {
                reason: String::from("bad"),
            },
            StatusCode::UNAUTHORIZED,
        ),
        (
            ApiError::DomainRuleViolation {
                rule: String::from("booking_open"),
                message: String::from("closed"),
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            ApiError::Conflict {
                message: String::from("taken"),
            },
            StatusCode::CONFLICT,
        ),
        (
            ApiError::PasswordPolicyViolation {
                message: String::from("short"),
            },
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (err, expected) in cases {
        let http: HttpError = HttpError::from(err);
        assert_eq!(http.status, expected);
    }
}

#[test]
fn test_internal_errors_hide_details() {
    let http: HttpError = HttpError::from(ApiError::Internal {
        message: String::from("disk I/O error at /var/lib/canteen.db"),
    });

    assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(http.message, "Internal server error");
}
