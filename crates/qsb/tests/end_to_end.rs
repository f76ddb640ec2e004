//! Complete statements through the public API.

use qsb::{NoopLogger, Projection, QsbError, QueryStringBuilder, SortOrder, Value};
use std::sync::Arc;

fn builder() -> QueryStringBuilder {
    QueryStringBuilder::with_logger(Arc::new(NoopLogger))
}

#[test]
fn select_by_id() {
    let mut q = builder();
    q.select(Projection::All)
        .from("users", None)
        .where_("id", "=", 5)
        .build()
        .unwrap();
    assert_eq!(q.to_string(), "SELECT * FROM `users` WHERE `id` = 5;");
}

#[test]
fn insert_escapes_quotes() {
    let mut q = builder();
    q.insert(Some("users"))
        .values(&["name", "age"], Some(vec![Value::from("O'Brien"), Value::from(30)]))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        q.to_string(),
        r"INSERT INTO `users` (`name`, `age`) VALUES ('O\'Brien', 30);"
    );
}

#[test]
fn update_with_boolean() {
    let mut q = builder();
    q.update("users")
        .set("active", true)
        .where_("id", "=", 7)
        .build()
        .unwrap();
    assert_eq!(q.to_string(), "UPDATE `users` SET `active`=true WHERE `id` = 7;");
}

#[test]
fn delete_where_is_null() {
    let mut q = builder();
    q.delete("users").where_("id", "is", "NULL").build().unwrap();
    assert_eq!(q.to_string(), "DELETE FROM `users` WHERE `id` is NULL;");
}

#[test]
fn bulk_insert_leaves_rows_to_driver() {
    let mut q = builder();
    q.insert(Some("users"))
        .values(&["name"], None::<Vec<Value>>)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(q.to_string(), "INSERT INTO `users` (`name`) VALUES ?");
}

#[test]
fn select_in_list() {
    let mut q = builder();
    q.select(Projection::All)
        .from("t", None)
        .where_("n", "in", vec![1, 2, 3])
        .build()
        .unwrap();
    assert_eq!(q.to_string(), "SELECT * FROM `t` WHERE `n` in (1,2,3);");
}

#[test]
fn paginated_report_query() {
    let mut q = qsb::select("COUNT(*) AS cnt");
    q.get("o.status")
        .from("orders", Some("o"))
        .join("customers", Some("c"))
        .on("o.customer_id", "=", "c.id")
        .unwrap()
        .where_("o.created_at", ">=", "2024-01-01")
        .where_or("o.priority", "=", 1)
        .order_by("cnt", SortOrder::Desc)
        .group_by("o.status")
        .limit(Some(40), 20)
        .build()
        .unwrap();
    assert_eq!(
        q.to_string(),
        "SELECT COUNT(*) AS cnt,`o`.`status` FROM `orders` `o` JOIN `customers` `c` \
         ON 'o.customer_id' = 'c.id' WHERE `o`.`created_at` >= '2024-01-01' \
         OR `o`.`priority` = 1 ORDER BY `cnt` DESC GROUP BY `o`.`status` LIMIT 40, 20;"
    );
}

#[test]
fn upsert_with_placeholders() {
    let mut q = builder();
    q.insert(Some("counters"))
        .values(&["key", "hits"], Some(vec!["?", "?"]))
        .unwrap()
        .on_duplicate_key_update(&["key", "hits"], vec!["?", "hits + 1"], &["key"])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        q.to_string(),
        "INSERT INTO `counters` (`key`, `hits`) VALUES (?, ?) ON DUPLICATE KEY UPDATE `hits`='hits + 1';"
    );
}

#[test]
fn errors_are_reported_not_rendered() {
    let mut q = builder();
    q.delete("users").limit(None, 1);
    let err = q.build().unwrap_err();
    assert_eq!(err.to_string(), "LIMIT is not valid in a DELETE statement");
    assert_eq!(q.to_string(), qsb::NOT_BUILT);

    let mut q = builder();
    q.insert(Some("users"));
    let err = q.values(&["id", " "], Some(vec![1, 2])).unwrap_err();
    assert!(matches!(err, QsbError::MissingColumn { index: 1, .. }));
    assert!(err.is_input_error());
}

#[test]
fn rendering_is_repeatable() {
    let mut q = builder();
    q.update("users")
        .set_placeholders(&["name", "email"])
        .where_("id", "=", "?");
    let first = q.build().unwrap().to_string();
    let second = q.build().unwrap().to_string();
    assert_eq!(first, "UPDATE `users` SET `name`=?,`email`=? WHERE `id` = ?;");
    assert_eq!(first, second);
}
