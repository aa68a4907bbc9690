use budget_core::db::open_db_in_memory;
use budget_core::{
    BudgetError, BudgetService, FixedClock, ItemAttribute, ItemRepository, NewItem, Period,
    ServiceDraft, ServiceEdit, SqliteItemRepository, SqliteServiceRepository, ValidationError,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::Connection;

/// 2024-05-15 12:00 at UTC+9.
fn may_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 15, 3, 0, 0).unwrap())
}

/// 2024-06-01 01:00 at UTC+9, still May in UTC.
fn june_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 31, 16, 0, 0).unwrap())
}

fn service_at(
    conn: &Connection,
    clock: FixedClock,
) -> BudgetService<SqliteServiceRepository<'_>, SqliteItemRepository<'_>, FixedClock> {
    BudgetService::new(
        SqliteServiceRepository::new(conn),
        SqliteItemRepository::new(conn),
        clock,
    )
}

fn buy(conn: &Connection, date: &str, service_name: &str, item_name: &str, price: i64) {
    SqliteItemRepository::new(conn)
        .create_item(&NewItem {
            purchase_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            service_name: service_name.to_string(),
            item_name: item_name.to_string(),
            item_price: price,
            item_attribute: ItemAttribute::Other,
        })
        .unwrap();
}

fn period(text: &str) -> Period {
    text.parse().unwrap()
}

#[test]
fn first_use_dashboard_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());

    let dashboard = budget.dashboard().unwrap();
    assert_eq!(dashboard.period, period("2024-05"));
    assert!(!dashboard.has_any_service);
    assert_eq!(dashboard.rolled_over_from, None);
    assert!(dashboard.summary.services.is_empty());
    assert_eq!(dashboard.summary.total_upper_limit, 0);
    assert_eq!(dashboard.summary.total_usage_ratio_text, "-");
    assert!(!budget.has_any_service().unwrap());
}

#[test]
fn dashboard_aggregates_registered_services() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());
    budget
        .register_service(&ServiceDraft::new("Books", "4000"))
        .unwrap();
    budget
        .register_service(&ServiceDraft::new("Cafe", "2000"))
        .unwrap();
    buy(&conn, "2024-05-02", "Books", "Novel", 1000);
    buy(&conn, "2024-05-20", "Cafe", "Latte", 500);
    buy(&conn, "2024-04-30", "Cafe", "April latte", 9999);

    let dashboard = budget.dashboard().unwrap();
    assert!(dashboard.has_any_service);
    let summary = &dashboard.summary;
    assert_eq!(summary.services.len(), 2);
    assert_eq!(summary.services[0].service_name, "Books");
    assert_eq!(summary.services[0].usage_ratio_text, "25.0%");
    assert_eq!(summary.services[1].current_usage, 500);
    assert_eq!(summary.total_upper_limit, 6000);
    assert_eq!(summary.total_current_usage, 1500);
    assert_eq!(summary.total_usage_ratio_text, "25.0%");
    assert_eq!(summary.total_width_style, "width:25.0%");
}

#[test]
fn new_month_rolls_services_forward() {
    let conn = open_db_in_memory().unwrap();
    let may = service_at(&conn, may_clock());
    may.register_service(&ServiceDraft::new("Books", "4000"))
        .unwrap();
    may.register_service(&ServiceDraft::new("Cafe", "2000"))
        .unwrap();

    let june = service_at(&conn, june_clock());
    assert_eq!(june.current_period(), period("2024-06"));
    assert!(june.list_services().unwrap().is_empty());

    let dashboard = june.dashboard().unwrap();
    assert_eq!(dashboard.rolled_over_from, Some(period("2024-05")));
    let names: Vec<&str> = dashboard
        .summary
        .services
        .iter()
        .map(|usage| usage.service_name.as_str())
        .collect();
    assert_eq!(names, ["Books", "Cafe"]);
    assert_eq!(dashboard.summary.total_current_usage, 0);

    let again = june.dashboard().unwrap();
    assert_eq!(again.rolled_over_from, None);
    assert_eq!(june.list_services().unwrap().len(), 2);
}

#[test]
fn register_rejects_bad_input_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());

    let err = budget
        .register_service(&ServiceDraft::new("  ", "100"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::EmptyField(_))
    ));

    let err = budget
        .register_service(&ServiceDraft::new("Books", "0"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::InvalidUpperLimit(_))
    ));

    budget
        .register_service(&ServiceDraft::new("Books", "100"))
        .unwrap();
    let err = budget
        .register_service(&ServiceDraft::new("Books", "200"))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::DuplicateService { .. })
    ));
    assert_eq!(budget.list_services().unwrap().len(), 1);
}

#[test]
fn edit_updates_limit_and_renames() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());
    budget
        .register_service(&ServiceDraft::new("Books", "100"))
        .unwrap();
    budget
        .register_service(&ServiceDraft::new("Cafe", "100"))
        .unwrap();

    let edited = budget
        .edit_service(
            "Books",
            &ServiceEdit {
                new_name: Some("Books".to_string()),
                upper_limit: "250".to_string(),
            },
        )
        .unwrap();
    assert_eq!(edited.upper_limit, 250);

    let err = budget
        .edit_service(
            "Books",
            &ServiceEdit {
                new_name: Some("Cafe".to_string()),
                upper_limit: "250".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetError::Validation(ValidationError::DuplicateService { .. })
    ));

    let renamed = budget
        .edit_service(
            "Books",
            &ServiceEdit {
                new_name: Some("Comics".to_string()),
                upper_limit: "300".to_string(),
            },
        )
        .unwrap();
    assert_eq!(renamed.service_name, "Comics");

    let err = budget
        .edit_service(
            "Books",
            &ServiceEdit {
                new_name: None,
                upper_limit: "1".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, BudgetError::ServiceNotFound { .. }));
}

#[test]
fn delete_leaves_items_visible_as_pseudo_service() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());
    budget
        .register_service(&ServiceDraft::new("Books", "4000"))
        .unwrap();
    buy(&conn, "2024-05-02", "Books", "Novel", 1000);

    budget.delete_service("Books").unwrap();
    assert!(matches!(
        budget.delete_service("Books"),
        Err(BudgetError::ServiceNotFound { .. })
    ));

    let detail = budget.service_detail(period("2024-05"), "Books").unwrap();
    assert!(!detail.registered);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.usage.current_usage, 1000);
    assert_eq!(detail.usage.upper_limit, 0);
    assert_eq!(detail.usage.usage_ratio, None);
    assert_eq!(detail.usage.usage_ratio_text, "-");
    assert_eq!(detail.usage.width_style, "width:0.0%");
}

#[test]
fn service_detail_for_registered_service() {
    let conn = open_db_in_memory().unwrap();
    let budget = service_at(&conn, may_clock());
    budget
        .register_service(&ServiceDraft::new("Books", "400"))
        .unwrap();
    buy(&conn, "2024-05-02", "Books", "Novel", 1);
    buy(&conn, "2024-05-03", "Cafe", "Latte", 500);

    let detail = budget.service_detail(period("2024-05"), "Books").unwrap();
    assert!(detail.registered);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.usage.usage_ratio_text, "0.2%");
}

#[test]
fn history_pads_and_totals_across_periods() {
    let conn = open_db_in_memory().unwrap();
    let may = service_at(&conn, may_clock());
    may.register_service(&ServiceDraft::new("Books", "4000"))
        .unwrap();
    buy(&conn, "2024-05-02", "Books", "Novel", 1000);

    let june = service_at(&conn, june_clock());
    june.dashboard().unwrap();
    buy(&conn, "2024-06-02", "Books", "Comic", 3000);
    buy(&conn, "2024-06-03", "Unregistered", "Snack", 777);

    let history = june.history().unwrap();
    assert_eq!(
        history.periods,
        [period("2024-04"), period("2024-05"), period("2024-06")]
    );
    assert_eq!(history.upper_limits, [0, 4000, 4000]);
    assert_eq!(history.usages, [0, 1000, 3777]);
    assert_eq!(history.total_upper_limit, 8000);
    assert_eq!(history.total_usage, 4777);
    assert_eq!(history.total_usage_ratio_text, "59.7%");
}

#[test]
fn history_of_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let history = service_at(&conn, may_clock()).history().unwrap();
    assert!(history.periods.is_empty());
    assert_eq!(history.total_usage_ratio, None);
    assert_eq!(history.total_usage_ratio_text, "-");
}
