//! End-to-end list screen scenarios.

use backoffice_view::{
    paginate, Direction, ExportSpec, FacetValue, FieldPath, FilterConfig, PageConfig, PageSize,
    Reconfigure, SortConfig, SortKey, ValueKind, ViewConfig, ViewEngine,
};
use serde_json::{json, Value};

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn ids(rows: &[&Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

// ============================================================================
// Facets
// ============================================================================

#[test]
fn twelve_users_five_active() {
    let users: Vec<Value> = (0..12)
        .map(|i| {
            json!({
                "id": i,
                "status": if i < 5 { "active" } else { "inactive" },
            })
        })
        .collect();

    let mut engine = ViewEngine::new(users, vec![]);
    engine.set_facet(path("status"), FacetValue::equals("active"));

    let view = engine.view();
    assert_eq!(view.filtered_sorted_count, 5);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.visible_rows.len(), 5);
}

#[test]
fn facet_on_embedded_record_excludes_unlinked_rows() {
    let deposits = vec![
        json!({"id": 1, "user": {"country": "DE"}}),
        json!({"id": 2, "user": null}),
        json!({"id": 3, "user": {"country": "FR"}}),
        json!({"id": 4}),
    ];
    let mut engine = ViewEngine::new(deposits, vec![]);
    engine.set_facet(path("user.country"), "DE");
    assert_eq!(ids(&engine.view().visible_rows), [1]);

    engine.set_facet(path("user.country"), "all");
    assert_eq!(engine.view().filtered_sorted_count, 4);
}

// ============================================================================
// Paging
// ============================================================================

#[test]
fn twenty_three_rows_page_five_clamps_to_three() {
    let rows: Vec<Value> = (1..=23).map(|i| json!({"id": i})).collect();
    let config = ViewConfig {
        page: PageConfig::new(PageSize::new(10).unwrap()).at(5),
        ..ViewConfig::default()
    };
    let engine = ViewEngine::with_config(rows, vec![], config);

    let view = engine.view();
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.current_page, 3);
    assert_eq!(ids(&view.visible_rows), [21, 22, 23]);
}

#[test]
fn narrowing_search_from_a_late_page_lands_on_a_full_page() {
    let users: Vec<Value> = (1..=50)
        .map(|i| json!({"id": i, "email": format!("user{}@{}.io", i, if i <= 12 { "corp" } else { "mail" })}))
        .collect();
    let mut engine = ViewEngine::new(users, vec![path("email")]);
    engine.set_page(5);
    assert_eq!(engine.view().current_page, 5);

    engine.set_query("CORP");
    let view = engine.view();
    assert_eq!(view.filtered_sorted_count, 12);
    assert_eq!(view.current_page, 1);
    assert_eq!(view.visible_rows.len(), 10);
}

#[test]
fn refetch_with_fewer_rows_clamps_without_reset() {
    let mut engine = ViewEngine::new((1..=30).map(|i| json!({"id": i})).collect(), vec![]);
    engine.set_page(2);

    engine.reconfigure(Reconfigure::Collection(
        (1..=25).map(|i| json!({"id": i})).collect(),
    ));
    assert_eq!(engine.view().current_page, 2);

    engine.replace_collection((1..=4).map(|i| json!({"id": i})).collect());
    let view = engine.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(ids(&view.visible_rows), [1, 2, 3, 4]);
}

#[test]
fn paginate_works_on_plain_slices() {
    let letters = ['a', 'b', 'c', 'd', 'e'];
    let page = paginate(&letters, &PageConfig::new(PageSize::new(2).unwrap()).at(3));
    assert_eq!(page.rows, &['e']);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn money_strings_sort_numerically_with_stable_ties() {
    let trades = vec![
        json!({"id": 1, "amount": "10.00"}),
        json!({"id": 2, "amount": "2.50"}),
        json!({"id": 3, "amount": "10.00"}),
    ];
    let mut engine = ViewEngine::new(trades, vec![]);
    engine.set_sort(SortConfig::by(SortKey::asc(path("amount"), ValueKind::Number)));
    assert_eq!(ids(&engine.view().visible_rows), [2, 1, 3]);

    engine.toggle_sort(path("amount"), ValueKind::Number);
    assert_eq!(engine.sort().primary().unwrap().direction, Direction::Desc);
    assert_eq!(ids(&engine.view().visible_rows), [1, 3, 2]);
}

#[test]
fn sort_then_filter_keeps_order_of_survivors() {
    let orders = vec![
        json!({"id": 1, "side": "buy", "createdAt": "2024-05-03T09:00:00Z"}),
        json!({"id": 2, "side": "sell", "createdAt": "2024-05-01T09:00:00Z"}),
        json!({"id": 3, "side": "buy", "createdAt": "2024-05-02T09:00:00Z"}),
        json!({"id": 4, "side": "buy"}),
    ];
    let mut engine = ViewEngine::new(orders, vec![]);
    engine.set_sort(SortConfig::by(SortKey::desc(path("createdAt"), ValueKind::Date)));
    engine.set_filter(FilterConfig::new().facet(path("side"), "buy"));
    assert_eq!(ids(&engine.view().visible_rows), [1, 3, 4]);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn smith_matches_smithson_only() {
    let users = vec![
        json!({"id": 1, "firstName": "Ann", "lastName": "Smithson", "email": "ann@x.io"}),
        json!({"id": 2, "firstName": "Bob", "lastName": "Jones", "email": "bob@x.io"}),
    ];
    let mut engine = ViewEngine::new(
        users,
        vec![path("firstName"), path("lastName"), path("email")],
    );
    engine.set_query("smith");
    assert_eq!(ids(&engine.view().visible_rows), [1]);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn export_covers_every_filtered_row_in_order() {
    let withdrawals: Vec<Value> = (1..=35)
        .map(|i| {
            json!({
                "id": i,
                "amount": format!("{}.00", 100 - i),
                "status": if i % 2 == 0 { "approved" } else { "pending" },
                "user": {"email": format!("u{}@x.io", i)},
            })
        })
        .collect();

    let mut engine = ViewEngine::new(withdrawals, vec![]);
    engine.set_facet(path("status"), "pending");
    engine.set_sort(SortConfig::by(SortKey::asc(path("amount"), ValueKind::Number)));
    engine.set_page_size(PageSize::new(10).unwrap());
    engine.set_page(2);

    let spec = ExportSpec::new()
        .column("Id", path("id"))
        .column("Email", path("user.email"))
        .column("Amount", path("amount"));
    let table = engine.export(&spec);

    assert_eq!(table.len(), engine.view().filtered_sorted_count);
    assert_eq!(table.len(), 18);
    assert_eq!(table.rows[0], ["35", "u35@x.io", "65.00"]);
    assert_eq!(table.rows[17], ["1", "u1@x.io", "99.00"]);
}

#[test]
fn large_integer_ids_survive_search_and_export() {
    let accounts = vec![
        json!({"id": 9_007_199_254_740_993_u64, "acct": 12_345_678_901_234_567_890_u64}),
        json!({"id": 9_007_199_254_740_992_u64, "acct": 1}),
    ];
    let mut engine = ViewEngine::new(accounts, vec![path("id"), path("acct")]);

    let spec = ExportSpec::new()
        .column("Id", path("id"))
        .column("Account", path("acct"));
    assert_eq!(
        engine.export(&spec).rows[0],
        ["9007199254740993", "12345678901234567890"]
    );

    engine.set_query("9007199254740993");
    assert_eq!(engine.view().filtered_sorted_count, 1);
    engine.set_facet(path("acct"), "12345678901234567890");
    assert_eq!(engine.view().filtered_sorted_count, 1);
}
