// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use canteen_persistence::SqlitePersistence;
use rust_decimal::Decimal;

use super::helpers::{create_test_admin, create_test_cause, create_test_persistence};
use crate::{
    ApiError, AuthenticatedActor, MenuItemRequest, MenuMutationResponse, MenuResponse,
    SetAvailabilityRequest, create_menu_item, delete_menu_item, get_full_menu, get_menu,
    set_menu_item_availability, update_menu_item,
};

fn item(name: &str, price: Decimal, category: &str, is_available: bool) -> MenuItemRequest {
    MenuItemRequest {
        name: String::from(name),
        price,
        category: String::from(category),
        is_available,
    }
}

fn create(
    persistence: &mut SqlitePersistence,
    admin: &AuthenticatedActor,
    request: &MenuItemRequest,
) -> i64 {
    create_menu_item(persistence, request, admin, create_test_cause())
        .unwrap()
        .menu_item
        .unwrap()
        .menu_item_id
}

fn names(menu: &MenuResponse) -> Vec<(String, Vec<String>)> {
    menu.categories
        .iter()
        .map(|group| {
            (
                group.category.clone(),
                group.items.iter().map(|i| i.name.clone()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_create_menu_item_returns_stored_item() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);

    let response: MenuMutationResponse = create_menu_item(
        &mut persistence,
        &item("  Masala Dosa ", Decimal::new(4050, 2), "Breakfast", true),
        &admin,
        create_test_cause(),
    )
    .unwrap();

    let stored = response.menu_item.unwrap();
    assert_eq!(stored.name, "Masala Dosa");
    assert_eq!(stored.price, Decimal::new(4050, 2));
    assert_eq!(stored.category, "Breakfast");
    assert!(response.event_id > 0);
}

#[test]
fn test_menu_groups_by_category_then_name() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    create(&mut persistence, &admin, &item("Veg Thali", Decimal::new(80, 0), "Lunch", true));
    create(&mut persistence, &admin, &item("Poha", Decimal::new(25, 0), "Breakfast", true));
    create(&mut persistence, &admin, &item("Idli", Decimal::new(30, 0), "Breakfast", true));
    create(&mut persistence, &admin, &item("Samosa", Decimal::new(15, 0), "Snacks", false));

    let student_menu: MenuResponse = get_menu(&mut persistence).unwrap();
    assert_eq!(
        names(&student_menu),
        vec![
            (
                String::from("Breakfast"),
                vec![String::from("Idli"), String::from("Poha")]
            ),
            (String::from("Lunch"), vec![String::from("Veg Thali")]),
        ]
    );

    let full_menu: MenuResponse = get_full_menu(&mut persistence, &admin).unwrap();
    assert_eq!(full_menu.categories.len(), 3);
    assert_eq!(full_menu.categories[2].category, "Snacks");
    assert!(!full_menu.categories[2].items[0].is_available);
}

#[test]
fn test_invalid_fields_are_rejected() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);

    let cases: Vec<(MenuItemRequest, &str)> = vec![
        (item("   ", Decimal::new(10, 0), "Lunch", true), "name"),
        (item("Vada", Decimal::new(-5, 0), "Snacks", true), "price"),
        (item("Vada", Decimal::new(5, 0), "Dinner", true), "category"),
    ];

    for (request, expected_field) in cases {
        match create_menu_item(&mut persistence, &request, &admin, create_test_cause()) {
            Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput for {expected_field}, got {other:?}"),
        }
    }
    assert!(persistence.list_menu_items(false).unwrap().is_empty());
}

#[test]
fn test_update_menu_item() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let id: i64 = create(&mut persistence, &admin, &item("Tea", Decimal::new(10, 0), "Snacks", true));

    let response: MenuMutationResponse = update_menu_item(
        &mut persistence,
        id,
        &item("Masala Tea", Decimal::new(12, 0), "Breakfast", true),
        &admin,
        create_test_cause(),
    )
    .unwrap();

    let updated = response.menu_item.unwrap();
    assert_eq!(updated.menu_item_id, id);
    assert_eq!(updated.name, "Masala Tea");
    assert_eq!(updated.price, Decimal::new(12, 0));
    assert_eq!(updated.category, "Breakfast");
}

#[test]
fn test_unknown_item_is_not_found() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);

    let update = update_menu_item(
        &mut persistence,
        999,
        &item("Tea", Decimal::new(10, 0), "Snacks", true),
        &admin,
        create_test_cause(),
    );
    let delete = delete_menu_item(&mut persistence, 999, &admin, create_test_cause());
    let toggle = set_menu_item_availability(
        &mut persistence,
        999,
        SetAvailabilityRequest {
            is_available: false,
        },
        &admin,
        create_test_cause(),
    );

    assert!(matches!(update, Err(ApiError::ResourceNotFound { .. })));
    assert!(matches!(delete, Err(ApiError::ResourceNotFound { .. })));
    assert!(matches!(toggle, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_availability_toggle_hides_item_from_students() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let id: i64 = create(&mut persistence, &admin, &item("Tea", Decimal::new(10, 0), "Snacks", true));

    let response: MenuMutationResponse = set_menu_item_availability(
        &mut persistence,
        id,
        SetAvailabilityRequest {
            is_available: false,
        },
        &admin,
        create_test_cause(),
    )
    .unwrap();

    assert!(!response.menu_item.unwrap().is_available);
    assert!(get_menu(&mut persistence).unwrap().categories.is_empty());
    assert_eq!(
        get_full_menu(&mut persistence, &admin)
            .unwrap()
            .categories
            .len(),
        1
    );
}

#[test]
fn test_delete_menu_item() {
    let mut persistence: SqlitePersistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    let id: i64 = create(&mut persistence, &admin, &item("Tea", Decimal::new(10, 0), "Snacks", true));

    let response: MenuMutationResponse =
        delete_menu_item(&mut persistence, id, &admin, create_test_cause()).unwrap();

    assert!(response.menu_item.is_none());
    assert!(persistence.get_menu_item(id).unwrap().is_none());
}
