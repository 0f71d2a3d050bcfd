// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use canteen_api::{
    AddTokensRequest, ApiError, AuditTimelineResponse, BookTokensRequest, BookTokensResponse,
    BookingsByUserResponse, CancelBookingResponse, ConfirmBookingsResponse, LoginRequest,
    LoginResponse, MenuItemRequest, MenuMutationResponse, MenuResponse, MyBookingsResponse,
    PoolUpdateResponse, SetAvailabilityRequest, SetBookingActiveRequest, SignupRequest,
    SignupResponse, TokenStatusResponse, TotalTokensRequest, UserInfo, add_tokens, book_tokens,
    cancel_booking, confirm_booking, confirm_user_bookings, create_menu_item, delete_menu_item,
    get_audit_timeline, get_full_menu, get_menu, get_my_bookings, get_token_status,
    list_bookings, login, logout, reset_pool, set_booking_active, set_menu_item_availability,
    set_total_tokens, signup, update_menu_item, whoami,
};
use canteen_audit::Cause;
use canteen_domain::{AllocationPolicy, BookingClock, DomainError};
use canteen_persistence::SqlitePersistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use time::Date;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::session::SessionUser;

/// Canteen Server - HTTP server for the college canteen menu and meal-token booking service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "CANTEEN_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "CANTEEN_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "CANTEEN_PORT", default_value_t = 3000)]
    port: u16,

    /// IANA timezone that decides which calendar day is "today"
    #[arg(short, long, env = "CANTEEN_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// How requests larger than the remaining pool are handled (`partial` or `all-or-nothing`)
    #[arg(long, env = "CANTEEN_ALLOCATION_POLICY", default_value = "partial")]
    allocation_policy: String,

    /// Comma-separated e-mail addresses that always resolve to the admin role
    #[arg(long, env = "CANTEEN_ADMIN_EMAILS", value_delimiter = ',')]
    admin_emails: Vec<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; every pool command still runs
/// in its own immediate transaction so separate processes stay consistent.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Live event broadcaster for WebSocket clients.
    live: Arc<LiveEventBroadcaster>,
    /// Resolves today's booking date.
    clock: BookingClock,
    /// The deployment's allocation policy.
    policy: AllocationPolicy,
    /// The administrator allow-list.
    admin_emails: Arc<Vec<String>>,
}

/// Query parameters for the bookings listing.
#[derive(Debug, Deserialize)]
struct BookingsQuery {
    /// Optional `YYYY-MM-DD` date; defaults to today.
    date: Option<String>,
}

/// Query parameters for the audit timeline.
#[derive(Debug, Deserialize)]
struct AuditQuery {
    /// Maximum number of events to return.
    limit: Option<i64>,
}

/// API response for a logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogoutResponse {
    /// A success message.
    message: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { message } => {
                error!(error = %message, "Request failed");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from("Internal server error"),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        error!(error = %err, "Failed to resolve booking date");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Internal server error"),
        }
    }
}

impl AppState {
    fn today(&self) -> Result<Date, HttpError> {
        Ok(self.clock.today()?)
    }
}

/// Builds the audit cause for a request.
fn request_cause(route: &str) -> Cause {
    Cause::new(uuid::Uuid::new_v4().to_string(), format!("HTTP {route}"))
}

// ============================================================================
// Identity
// ============================================================================

async fn handle_signup(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SignupResponse = signup(&mut persistence, &req, &app_state.admin_emails)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req, &app_state.admin_emails)?;
    drop(persistence);

    info!(user_id = %response.user.user_id, "User signed in");
    Ok(Json(response))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, token): SessionUser,
) -> Result<Json<LogoutResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &token)?;
    drop(persistence);

    info!(user_id = %actor.user_id, "User signed out");
    Ok(Json(LogoutResponse {
        message: String::from("Signed out"),
    }))
}

async fn handle_whoami(SessionUser(actor, _token): SessionUser) -> Json<UserInfo> {
    Json(whoami(&actor))
}

// ============================================================================
// Menu
// ============================================================================

async fn handle_get_menu(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MenuResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuResponse = get_menu(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_get_full_menu(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
) -> Result<Json<MenuResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuResponse = get_full_menu(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_create_menu_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<MenuItemRequest>,
) -> Result<Json<MenuMutationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuMutationResponse = create_menu_item(
        &mut persistence,
        &req,
        &actor,
        request_cause("POST /admin/menu"),
    )?;
    drop(persistence);

    if let Some(item) = &response.menu_item {
        app_state.live.broadcast(&LiveEvent::MenuChanged {
            menu_item_id: item.menu_item_id,
        });
    }
    Ok(Json(response))
}

async fn handle_update_menu_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(menu_item_id): Path<i64>,
    Json(req): Json<MenuItemRequest>,
) -> Result<Json<MenuMutationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuMutationResponse = update_menu_item(
        &mut persistence,
        menu_item_id,
        &req,
        &actor,
        request_cause("PUT /admin/menu/{id}"),
    )?;
    drop(persistence);

    app_state
        .live
        .broadcast(&LiveEvent::MenuChanged { menu_item_id });
    Ok(Json(response))
}

async fn handle_delete_menu_item(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(menu_item_id): Path<i64>,
) -> Result<Json<MenuMutationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuMutationResponse = delete_menu_item(
        &mut persistence,
        menu_item_id,
        &actor,
        request_cause("DELETE /admin/menu/{id}"),
    )?;
    drop(persistence);

    app_state
        .live
        .broadcast(&LiveEvent::MenuChanged { menu_item_id });
    Ok(Json(response))
}

async fn handle_set_menu_item_availability(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(menu_item_id): Path<i64>,
    Json(req): Json<SetAvailabilityRequest>,
) -> Result<Json<MenuMutationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MenuMutationResponse = set_menu_item_availability(
        &mut persistence,
        menu_item_id,
        req,
        &actor,
        request_cause("POST /admin/menu/{id}/availability"),
    )?;
    drop(persistence);

    app_state
        .live
        .broadcast(&LiveEvent::MenuChanged { menu_item_id });
    Ok(Json(response))
}

// ============================================================================
// Booking
// ============================================================================

async fn handle_token_status(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
) -> Result<Json<TokenStatusResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: TokenStatusResponse = get_token_status(&mut persistence, today, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_book_tokens(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<BookTokensRequest>,
) -> Result<Json<BookTokensResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: BookTokensResponse = book_tokens(
        &mut persistence,
        today,
        app_state.policy,
        req,
        &actor,
        request_cause("POST /tokens/book"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::TokensBooked {
        booking_date: response.status.booking_date.clone(),
        token_numbers: response.token_numbers.clone(),
        tokens_left: response.status.tokens_left,
    });
    Ok(Json(response))
}

async fn handle_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
) -> Result<Json<MyBookingsResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: MyBookingsResponse = get_my_bookings(&mut persistence, today, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<CancelBookingResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: CancelBookingResponse = cancel_booking(
        &mut persistence,
        today,
        app_state.policy,
        booking_id,
        &actor,
        request_cause("DELETE /bookings/{id}"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::BookingCancelled {
        booking_date: response.booking.booking_date.clone(),
        token_number: response.booking.token_number,
        tokens_left: response.status.tokens_left,
    });
    Ok(Json(response))
}

async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsByUserResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: BookingsByUserResponse =
        list_bookings(&mut persistence, today, query.date.as_deref(), &actor)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_confirm_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<ConfirmBookingsResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: ConfirmBookingsResponse = confirm_booking(
        &mut persistence,
        today,
        app_state.policy,
        booking_id,
        &actor,
        request_cause("POST /admin/bookings/{id}/confirm"),
    )?;
    drop(persistence);

    broadcast_confirmed(&app_state, &response);
    Ok(Json(response))
}

async fn handle_confirm_user_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Path(user_id): Path<String>,
) -> Result<Json<ConfirmBookingsResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: ConfirmBookingsResponse = confirm_user_bookings(
        &mut persistence,
        today,
        app_state.policy,
        &user_id,
        &actor,
        request_cause("POST /admin/users/{user_id}/confirm"),
    )?;
    drop(persistence);

    broadcast_confirmed(&app_state, &response);
    Ok(Json(response))
}

fn broadcast_confirmed(app_state: &AppState, response: &ConfirmBookingsResponse) {
    if !response.confirmed.is_empty() {
        app_state.live.broadcast(&LiveEvent::BookingsConfirmed {
            booking_ids: response.confirmed.iter().map(|b| b.booking_id).collect(),
        });
    }
}

// ============================================================================
// Pool administration
// ============================================================================

async fn handle_set_booking_active(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<SetBookingActiveRequest>,
) -> Result<Json<PoolUpdateResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: PoolUpdateResponse = set_booking_active(
        &mut persistence,
        today,
        app_state.policy,
        req,
        &actor,
        request_cause("POST /admin/tokens/active"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::BookingStatusChanged {
        is_active: response.status.is_active,
    });
    Ok(Json(response))
}

async fn handle_reset_pool(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<TotalTokensRequest>,
) -> Result<Json<PoolUpdateResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: PoolUpdateResponse = reset_pool(
        &mut persistence,
        today,
        app_state.policy,
        req,
        &actor,
        request_cause("POST /admin/tokens/reset"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::PoolReset {
        booking_date: response.status.booking_date.clone(),
        total_tokens: response.status.total_tokens,
    });
    Ok(Json(response))
}

async fn handle_add_tokens(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<AddTokensRequest>,
) -> Result<Json<PoolUpdateResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: PoolUpdateResponse = add_tokens(
        &mut persistence,
        today,
        app_state.policy,
        req,
        &actor,
        request_cause("POST /admin/tokens/add"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::TokensAdded {
        total_tokens: response.status.total_tokens,
        tokens_left: response.status.tokens_left,
    });
    Ok(Json(response))
}

async fn handle_set_total_tokens(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Json(req): Json<TotalTokensRequest>,
) -> Result<Json<PoolUpdateResponse>, HttpError> {
    let today: Date = app_state.today()?;
    let mut persistence = app_state.persistence.lock().await;
    let response: PoolUpdateResponse = set_total_tokens(
        &mut persistence,
        today,
        app_state.policy,
        req,
        &actor,
        request_cause("POST /admin/tokens/total"),
    )?;
    drop(persistence);

    app_state.live.broadcast(&LiveEvent::TotalTokensSet {
        total_tokens: response.status.total_tokens,
        tokens_left: response.status.tokens_left,
    });
    Ok(Json(response))
}

async fn handle_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _token): SessionUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse =
        get_audit_timeline(&mut persistence, query.limit, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(handle_signup))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route("/menu", get(handle_get_menu))
        .route(
            "/admin/menu",
            get(handle_get_full_menu).post(handle_create_menu_item),
        )
        .route(
            "/admin/menu/{id}",
            put(handle_update_menu_item).delete(handle_delete_menu_item),
        )
        .route(
            "/admin/menu/{id}/availability",
            post(handle_set_menu_item_availability),
        )
        .route("/tokens/status", get(handle_token_status))
        .route("/tokens/book", post(handle_book_tokens))
        .route("/bookings/mine", get(handle_my_bookings))
        .route("/bookings/{id}", delete(handle_cancel_booking))
        .route("/admin/bookings", get(handle_list_bookings))
        .route("/admin/bookings/{id}/confirm", post(handle_confirm_booking))
        .route(
            "/admin/users/{user_id}/confirm",
            post(handle_confirm_user_bookings),
        )
        .route("/admin/tokens/active", post(handle_set_booking_active))
        .route("/admin/tokens/reset", post(handle_reset_pool))
        .route("/admin/tokens/add", post(handle_add_tokens))
        .route("/admin/tokens/total", post(handle_set_total_tokens))
        .route("/admin/audit", get(handle_audit_timeline))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Canteen Server");

    let clock: BookingClock = BookingClock::parse(&args.timezone)?;
    let policy: AllocationPolicy = AllocationPolicy::from_str(&args.allocation_policy)?;
    let admin_emails: Vec<String> = args
        .admin_emails
        .iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    info!(
        timezone = %clock.timezone(),
        policy = %policy,
        admins = admin_emails.len(),
        "Booking configuration loaded"
    );

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let expired: usize = persistence.delete_expired_sessions()?;
    if expired > 0 {
        info!(expired, "Removed expired sessions");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        live: Arc::new(LiveEventBroadcaster::new()),
        clock,
        policy,
        admin_emails: Arc::new(admin_emails),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
