/// Orm facade tests
///
/// Tests the end-to-end path (render, execute, materialize) against a
/// recording executor.
/// Run with: cargo test --test orm_facade_tests
mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{RecordingExecutor, rows};
use rowbind::{
    DbError, Entity, FieldCache, NotEqualBinding, Orm, OrmConfig, ScalarColumn, ScalarKind,
    Select, Update, Value,
};

#[derive(Debug, Default, Clone, PartialEq, Entity)]
#[entity(table = "users")]
struct User {
    id: i64,
    name: String,
    email: Option<String>,
}

#[derive(Debug, Default, Entity)]
struct Ghost {
    #[db(skip)]
    state: Vec<u8>,
}

fn orm(executor: &Arc<RecordingExecutor>) -> Orm<Arc<RecordingExecutor>> {
    Orm::new(Arc::clone(executor)).with_cache(Arc::new(FieldCache::new()))
}

#[tokio::test]
async fn test_fetch_renders_and_materializes() {
    let executor = RecordingExecutor::with_rows(rows(
        &["id", "name", "email"],
        vec![
            vec![Value::Integer(1), Value::from("ann"), Value::Null],
            vec![Value::Integer(2), Value::from("bob"), Value::from("bob@example.com")],
        ],
    ));
    let orm = orm(&executor);

    let select = orm.select().model::<User>().filter("name", "ann").limit(2);
    let users: Vec<User> = orm.fetch(&select).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email, None);
    assert_eq!(users[1].email.as_deref(), Some("bob@example.com"));

    let call = executor.last().unwrap();
    assert_eq!(call.sql, "SELECT id, name, email FROM users WHERE name=$1 LIMIT $2");
    assert_eq!(call.args, vec![Value::from("ann"), Value::Integer(2)]);
    assert!(orm.cache().contains::<User>());
}

#[tokio::test]
async fn test_query_raw_sql() {
    let executor = RecordingExecutor::with_rows(rows(
        &["id", "name"],
        vec![vec![Value::Integer(9), Value::from("root")]],
    ));
    let orm = orm(&executor);

    let users: Vec<User> = orm
        .query("SELECT id, name FROM users WHERE id = $1", &[Value::Integer(9)])
        .await
        .unwrap();

    assert_eq!(users[0].id, 9);
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_query_rejects_unmapped_entity_before_executing() {
    let executor = RecordingExecutor::new();
    let orm = orm(&executor);

    let err = orm.query::<Ghost>("SELECT 1", &[]).await.unwrap_err();

    assert!(matches!(err, DbError::InvalidFieldCount(_)));
    assert!(executor.calls().is_empty());
    assert!(Ghost::default().state.is_empty());
}

#[tokio::test]
async fn test_query_scalar_dispatches_on_kind() {
    let executor = RecordingExecutor::new();
    executor.push_rows(rows(&["count"], vec![vec![Value::Integer(42)]]));
    executor.push_rows(rows(&["name"], vec![vec![Value::from("a")], vec![Value::from("b")]]));
    executor.push_rows(rows(&["flag"], vec![vec![Value::from("f")]]));
    executor.push_rows(rows(&["avg"], vec![vec![Value::Float(1.5)]]));
    let orm = orm(&executor);

    let ints = orm
        .query_scalar(ScalarKind::Integer, "SELECT count(*) FROM users", &[])
        .await
        .unwrap();
    let strings = orm
        .query_scalar(ScalarKind::String, "SELECT name FROM users", &[])
        .await
        .unwrap();
    let bools = orm
        .query_scalar(ScalarKind::Boolean, "SELECT flag FROM users", &[])
        .await
        .unwrap();
    let floats = orm
        .query_scalar(ScalarKind::Float, "SELECT avg(x) FROM users", &[])
        .await
        .unwrap();

    assert_eq!(ints, ScalarColumn::Integers(vec![42]));
    assert_eq!(strings, ScalarColumn::Strings(vec!["a".into(), "b".into()]));
    assert_eq!(bools, ScalarColumn::Booleans(vec![false]));
    assert_eq!(floats, ScalarColumn::Floats(vec![1.5]));
    assert_eq!(executor.calls().len(), 4);
}

#[tokio::test]
async fn test_fetch_strings_and_maps() {
    let executor = RecordingExecutor::new();
    executor.push_rows(rows(&["name"], vec![vec![Value::from("ann")], vec![Value::Integer(7)]]));
    executor.push_rows(rows(
        &["id", "name"],
        vec![vec![Value::Integer(1), Value::from("ann")]],
    ));
    let orm = orm(&executor);
    let select = Select::new().table_name("users").columns(["name"]);

    let names = orm.fetch_strings(&select).await.unwrap();
    assert_eq!(names, vec!["ann".to_string(), "7".to_string()]);

    let maps = orm
        .fetch_maps(&orm.select().model::<User>())
        .await
        .unwrap();
    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].get("name"), Some(&Value::from("ann")));
    assert_eq!(maps[0].get("id"), Some(&Value::Integer(1)));
}

#[tokio::test]
async fn test_update_returns_affected_rows() {
    let executor = RecordingExecutor::new();
    executor.set_affected(3);
    let orm = orm(&executor);

    let data: HashMap<String, Value> = [("name".to_string(), Value::from("zed"))].into();
    let conditions: HashMap<String, Value> = [("id".to_string(), Value::Integer(4))].into();
    let affected = orm.update::<User>(&data, &conditions).await.unwrap();

    assert_eq!(affected, 3);
    let call = executor.last().unwrap();
    assert_eq!(call.sql, "UPDATE users SET name=$1 WHERE id=$2");
    assert_eq!(call.args, vec![Value::from("zed"), Value::Integer(4)]);

    let affected = orm
        .execute_update(&Update::model::<User>().set("email", Value::Null))
        .await
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(executor.last().unwrap().sql, "UPDATE users SET email=$1");
}

#[tokio::test]
async fn test_invalid_update_is_not_executed() {
    let executor = RecordingExecutor::new();
    let orm = orm(&executor);

    let err = orm
        .update::<User>(&HashMap::new(), &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::InvalidUpdateShape(_)));
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_executor_errors_pass_through() {
    let executor = RecordingExecutor::new();
    executor.fail_next("connection reset");
    let orm = orm(&executor);

    let err = orm
        .fetch::<User>(&orm.select().model::<User>())
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Executor(_)));
    assert_eq!(err.to_string(), "connection reset");
}

#[tokio::test]
async fn test_config_controls_rendering_and_timestamps() {
    #[derive(Debug, Default, Entity)]
    #[entity(table = "logins")]
    struct Login {
        user_id: i64,
        at: Option<chrono::DateTime<chrono::Utc>>,
    }

    let executor = RecordingExecutor::with_rows(rows(
        &["user_id", "at"],
        vec![vec![Value::Integer(1), Value::from("2024-01-31 23:59")]],
    ));
    let config = OrmConfig::new()
        .timestamp_format("%Y-%m-%d %H:%M")
        .not_equal_binding(NotEqualBinding::Legacy)
        .log_statements(true);
    let orm = orm(&executor).with_config(config);

    let select = orm.select().model::<Login>().not_equal("user_id", 0);
    let logins: Vec<Login> = orm.fetch(&select).await.unwrap();

    let call = executor.last().unwrap();
    assert_eq!(call.sql, "SELECT user_id, at FROM logins WHERE user_id!=$1");
    assert!(call.args.is_empty());
    assert_eq!(logins[0].user_id, 1);
    assert_eq!(
        logins[0].at.map(|ts| ts.to_rfc3339()),
        Some("2024-01-31T23:59:00+00:00".to_string())
    );
}

#[tokio::test]
async fn test_render_does_not_execute() {
    let executor = RecordingExecutor::new();
    let orm = orm(&executor);

    let stmt = orm.render(&orm.select().model::<User>().offset(10)).unwrap();

    assert_eq!(stmt.to_string(), stmt.sql);
    assert_eq!(stmt.sql, "SELECT id, name, email FROM users OFFSET $1");
    assert!(executor.calls().is_empty());
    assert!(!orm.config().log_statements);
}
