// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use canteen_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use canteen_domain::parse_booking_date;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    booking_date: Option<String>,
    created_at: String,
}

fn row_to_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let actor: Actor = Actor::new(actor_data.id, actor_data.actor_type);
    let cause: Cause = Cause::new(cause_data.id, cause_data.description);
    let action: Action = Action::new(action_data.name, action_data.details);
    let before: StateSnapshot = StateSnapshot::new(before_data.data);
    let after: StateSnapshot = StateSnapshot::new(after_data.data);

    let event: AuditEvent = match row.booking_date {
        Some(value) => {
            let booking_date: Date = parse_booking_date(&value)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
            AuditEvent::for_booking_date(actor, cause, action, before, after, booking_date)
        }
        None => AuditEvent::new(actor, cause, action, before, after),
    };

    Ok(event.persisted(row.event_id, row.created_at))
}

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let result: Result<AuditEventRow, diesel::result::Error> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row_to_event(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Audit event {event_id}"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the audit timeline, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - The maximum number of events to return, if any
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    limit: Option<i64>,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .order(audit_events::event_id.desc())
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows: Vec<AuditEventRow> = query.load(conn)?;
    rows.into_iter().map(row_to_event).collect()
}
