// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Menu catalog queries.

use canteen_domain::{MenuCategory, MenuItem, Price};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::str::FromStr;

use crate::diesel_schema::menu_items;
use crate::error::PersistenceError;

/// Diesel Queryable struct for menu item rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = menu_items)]
struct MenuItemRow {
    menu_item_id: i64,
    name: String,
    price: String,
    category: String,
    is_available: i32,
    #[allow(dead_code)]
    created_at: String,
}

fn row_to_menu_item(row: MenuItemRow) -> Result<MenuItem, PersistenceError> {
    let price: Price = Price::parse(&row.price)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
    let category: MenuCategory = MenuCategory::from_str(&row.category)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    Ok(MenuItem::with_id(
        row.menu_item_id,
        &row.name,
        price,
        category,
        row.is_available != 0,
    ))
}

/// Lists menu items in display order: by category, then by name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `only_available` - Restrict to items currently offered
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_menu_items(
    conn: &mut SqliteConnection,
    only_available: bool,
) -> Result<Vec<MenuItem>, PersistenceError> {
    let mut query = menu_items::table
        .select(MenuItemRow::as_select())
        .order((menu_items::name.asc(), menu_items::menu_item_id.asc()))
        .into_boxed();

    if only_available {
        query = query.filter(menu_items::is_available.eq(1));
    }

    let rows: Vec<MenuItemRow> = query.load(conn)?;
    let mut items: Vec<MenuItem> = rows
        .into_iter()
        .map(row_to_menu_item)
        .collect::<Result<Vec<MenuItem>, PersistenceError>>()?;

    // Stable: names stay ordered within a category.
    items.sort_by_key(|item| item.category);
    Ok(items)
}

/// Retrieves a menu item by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the item does not exist.
pub fn get_menu_item(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> Result<Option<MenuItem>, PersistenceError> {
    let result: Result<MenuItemRow, diesel::result::Error> = menu_items::table
        .filter(menu_items::menu_item_id.eq(menu_item_id))
        .select(MenuItemRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row_to_menu_item(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
