// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Menu catalog mutations.

use canteen::{MenuChange, MenuCommand, MenuTransition, apply_menu};
use canteen_audit::{Actor, Cause};
use canteen_domain::MenuItem;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::menu_items;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::menu::get_menu_item;

/// The result of a persisted menu command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCommandOutcome {
    /// The audit event recording the change.
    pub event_id: i64,
    /// The item as stored after the change; `None` after a delete.
    pub menu_item: Option<MenuItem>,
}

/// Applies a menu command and its audit event.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns `CommandRejected` if the item does not exist or its fields are
/// invalid, or an error if a write fails.
pub fn execute_menu_command(
    conn: &mut SqliteConnection,
    command: MenuCommand,
    actor: Actor,
    cause: Cause,
) -> Result<MenuCommandOutcome, PersistenceError> {
    let existing: Option<MenuItem> = match command.target_id() {
        Some(menu_item_id) => get_menu_item(conn, menu_item_id)?,
        None => None,
    };

    let transition: MenuTransition = apply_menu(existing.as_ref(), command, actor, cause)?;
    let menu_item_id: Option<i64> = apply_menu_change(conn, &transition.change)?;
    let event_id: i64 = persist_audit_event(conn, &transition.audit_event)?;

    let menu_item: Option<MenuItem> = match menu_item_id {
        Some(id) => get_menu_item(conn, id)?,
        None => None,
    };

    Ok(MenuCommandOutcome {
        event_id,
        menu_item,
    })
}

/// Writes a single menu change.
///
/// # Returns
///
/// The ID of the inserted or updated item, or `None` for a delete.
///
/// # Errors
///
/// Returns an error if the write fails or the item vanished.
pub fn apply_menu_change(
    conn: &mut SqliteConnection,
    change: &MenuChange,
) -> Result<Option<i64>, PersistenceError> {
    match change {
        MenuChange::Insert(item) => {
            diesel::insert_into(menu_items::table)
                .values((
                    menu_items::name.eq(&item.name),
                    menu_items::price.eq(item.price.to_string()),
                    menu_items::category.eq(item.category.as_str()),
                    menu_items::is_available.eq(i32::from(item.is_available)),
                ))
                .execute(conn)?;

            let menu_item_id: i64 = conn.get_last_insert_rowid()?;
            info!(menu_item_id, name = %item.name, "Created menu item");
            Ok(Some(menu_item_id))
        }
        MenuChange::Update(item) => {
            let menu_item_id: i64 = item.menu_item_id().ok_or_else(|| {
                PersistenceError::Other(String::from("Menu item update without an ID"))
            })?;

            let rows_affected: usize = diesel::update(menu_items::table)
                .filter(menu_items::menu_item_id.eq(menu_item_id))
                .set((
                    menu_items::name.eq(&item.name),
                    menu_items::price.eq(item.price.to_string()),
                    menu_items::category.eq(item.category.as_str()),
                    menu_items::is_available.eq(i32::from(item.is_available)),
                ))
                .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Menu item {menu_item_id}"
                )));
            }

            info!(menu_item_id, "Updated menu item");
            Ok(Some(menu_item_id))
        }
        MenuChange::Delete { menu_item_id } => {
            let rows_affected: usize = diesel::delete(menu_items::table)
                .filter(menu_items::menu_item_id.eq(*menu_item_id))
                .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Menu item {menu_item_id}"
                )));
            }

            info!(menu_item_id, "Deleted menu item");
            Ok(None)
        }
    }
}
