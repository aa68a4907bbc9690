use budget_core::db::open_db_in_memory;
use budget_core::{
    BudgetError, FixedClock, ItemAttribute, ItemDraft, ItemService, NewService, Period,
    ServiceRepository, SqliteItemRepository, SqliteServiceRepository, ValidationError,
};
use chrono::{TimeZone, Utc};
use rusqlite::Connection;

fn items_at(
    conn: &Connection,
) -> ItemService<SqliteServiceRepository<'_>, SqliteItemRepository<'_>, FixedClock> {
    ItemService::new(
        SqliteServiceRepository::new(conn),
        SqliteItemRepository::new(conn),
        FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 15, 3, 0, 0).unwrap()),
    )
}

fn seed_current_service(conn: &Connection) {
    SqliteServiceRepository::new(conn)
        .create_service(&NewService {
            period: "2024-05".parse().unwrap(),
            service_name: "Books".to_string(),
            upper_limit: 4000,
        })
        .unwrap();
}

fn draft(date: &str, item_name: &str, price: &str) -> ItemDraft {
    ItemDraft {
        purchase_date: date.to_string(),
        service_name: "Books".to_string(),
        item_name: item_name.to_string(),
        item_price: price.to_string(),
        item_attribute: "hobby".to_string(),
    }
}

fn p_may() -> Period {
    "2024-05".parse().unwrap()
}

#[test]
fn register_requires_a_current_period_service() {
    let conn = open_db_in_memory().unwrap();
    let items = items_at(&conn);

    let err = items
        .register_item(&draft("2024-05-02", "Novel", "1200"))
        .unwrap_err();
    assert!(matches!(err, BudgetError::NoServicesInPeriod(period) if period == p_may()));
    assert_eq!(err.code(), "no_services");
}

#[test]
fn register_validates_and_stores() {
    let conn = open_db_in_memory().unwrap();
    seed_current_service(&conn);
    let items = items_at(&conn);

    let item = items
        .register_item(&draft("2024-05-02", "Novel", "1200"))
        .unwrap();
    assert_eq!(item.item_attribute, ItemAttribute::Hobby);
    assert_eq!(items.get_item(item.item_id).unwrap(), item);
    assert_eq!(items.list_items(p_may()).unwrap(), vec![item]);

    let err = items
        .register_item(&draft("2024-05-02", "Other", "-1"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::InvalidPrice(_))
    ));

    let err = items
        .register_item(&draft("2024-13-02", "Other", "1"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::InvalidPurchaseDate(_))
    ));
}

#[test]
fn duplicate_item_name_per_service_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    seed_current_service(&conn);
    let items = items_at(&conn);

    items
        .register_item(&draft("2024-05-02", "Novel", "1200"))
        .unwrap();
    let err = items
        .register_item(&draft("2024-05-09", "Novel", "800"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::DuplicateItem { .. })
    ));
    assert_eq!(items.list_items(p_may()).unwrap().len(), 1);
}

#[test]
fn edit_may_keep_its_own_name_but_not_take_another() {
    let conn = open_db_in_memory().unwrap();
    seed_current_service(&conn);
    let items = items_at(&conn);
    let novel = items
        .register_item(&draft("2024-05-02", "Novel", "1200"))
        .unwrap();
    items
        .register_item(&draft("2024-05-03", "Comic", "600"))
        .unwrap();

    let edited = items
        .edit_item(novel.item_id, &draft("2024-05-04", "Novel", "1500"))
        .unwrap();
    assert_eq!(edited.item_price, 1500);

    let err = items
        .edit_item(novel.item_id, &draft("2024-05-04", "Comic", "1500"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::DuplicateItem { .. })
    ));

    let err = items
        .edit_item(9999, &draft("2024-05-04", "Novel", "1"))
        .unwrap_err();
    assert!(matches!(err, BudgetError::ItemNotFound(9999)));
}

#[test]
fn delete_returns_item_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    seed_current_service(&conn);
    let items = items_at(&conn);
    let novel = items
        .register_item(&draft("2024-05-02", "Novel", "1200"))
        .unwrap();

    let deleted = items.delete_item(novel.item_id).unwrap();
    assert_eq!(deleted, novel);
    assert!(matches!(
        items.delete_item(novel.item_id),
        Err(BudgetError::ItemNotFound(_))
    ));
    assert!(matches!(
        items.get_item(novel.item_id),
        Err(BudgetError::ItemNotFound(_))
    ));
}

#[test]
fn attribute_catalogue_is_fixed() {
    let conn = open_db_in_memory().unwrap();
    let attributes = items_at(&conn).item_attributes();
    assert_eq!(attributes.len(), 8);
    assert_eq!(attributes[0], ItemAttribute::Food);
    assert!(attributes.contains(&ItemAttribute::Other));
}
