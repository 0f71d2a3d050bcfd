// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use crate::SqlitePersistence;
use canteen_domain::TokenSettings;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_enforced() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_settings_seeded_closed_and_empty() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let settings = persistence.get_token_settings().unwrap();
    assert_eq!(settings, TokenSettings::initial());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    super::create_test_student(&mut db1, "one@college.edu");

    assert!(
        db1.get_account_by_email("one@college.edu")
            .unwrap()
            .is_some()
    );
    assert!(
        db2.get_account_by_email("one@college.edu")
            .unwrap()
            .is_none(),
        "db2 should not see db1's account"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.list_menu_items(false).unwrap().is_empty());
    assert!(persistence.get_audit_timeline(None).unwrap().is_empty());
}
