use super::*;
use crate::table::Table;

// ==================== InsertBuilder Tests ====================

#[test]
fn test_insert_pads_missing_values() {
    let sql = build_insert(
        "teste",
        &["string", "id"],
        &[vec!["Hello"], vec!["World"]],
        0,
    )
    .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO teste(string, id) VALUES ('Hello', NULL), ('World', NULL)"
    );
}

#[test]
fn test_insert_single_row() {
    let mut ib = InsertBuilder::new("users");
    ib.columns(["username", "age"]).row(["alice", "25"]);
    assert_eq!(
        ib.build_sql().unwrap(),
        "INSERT INTO users(username, age) VALUES ('alice', '25')"
    );
}

#[test]
fn test_insert_null_sentinel_is_unquoted() {
    let mut ib = InsertBuilder::new("t");
    ib.columns(["a", "b"]).row(["%NULL%", "x"]);
    let sql = ib.build_sql().unwrap();
    assert_eq!(sql, "INSERT INTO t(a, b) VALUES (NULL, 'x')");
    assert!(!sql.contains("'%NULL%'"));
}

#[test]
fn test_insert_empty_row_is_all_null() {
    let rows: Vec<Vec<&str>> = vec![vec![]];
    let sql = build_insert("t", &["a", "b"], &rows, 0).unwrap();
    assert_eq!(sql, "INSERT INTO t(a, b) VALUES (NULL, NULL)");
}

#[test]
fn test_insert_skip_rows() {
    let rows = vec![vec!["id"], vec!["75"], vec!["76"]];
    let sql = build_insert("teste", &["id"], &rows, 1).unwrap();
    assert_eq!(sql, "INSERT INTO teste(id) VALUES ('75'), ('76')");
}

#[test]
fn test_insert_from_select_result() {
    let result = Table::new(
        ["string"],
        vec![vec!["TEST".to_string()], vec!["%NULL%".to_string()]],
    )
    .unwrap();
    let ib = InsertBuilder::from_table("teste", &result);
    assert_eq!(
        ib.build_sql().unwrap(),
        "INSERT INTO teste(string) VALUES ('TEST'), (NULL)"
    );
}

#[test]
fn test_insert_argument_errors() {
    let rows = vec![vec!["1"]];
    let none: Vec<Vec<&str>> = vec![];
    let no_cols: [&str; 0] = [];

    assert_eq!(build_insert("", &["id"], &rows, 0).unwrap_err().code(), 6);
    assert_eq!(build_insert("t", &no_cols, &rows, 0).unwrap_err().code(), 7);
    assert_eq!(build_insert("t", &["id", " "], &rows, 0).unwrap_err().code(), 3);
    assert_eq!(build_insert("t", &["id"], &none, 0).unwrap_err().code(), 8);
    assert_eq!(build_insert("t", &["id"], &rows, 1).unwrap_err().code(), 8);
    assert_eq!(
        build_insert("t", &["id"], &[vec!["1", "2"]], 0)
            .unwrap_err()
            .code(),
        14
    );
}

#[test]
fn test_insert_error_messages() {
    let err = build_insert("", &["id"], &[vec!["1"]], 0).unwrap_err();
    assert!(err.is_argument());
    assert_eq!(err.message(), "Cannot insert. Table not specified.");
}

// ==================== DeleteBuilder Tests ====================

#[test]
fn test_delete_with_condition() {
    assert_eq!(
        build_delete("teste", "id = 73").unwrap(),
        "DELETE FROM teste WHERE id = 73"
    );
}

#[test]
fn test_delete_strips_where_prefix() {
    let mut db = DeleteBuilder::new("teste");
    db.condition("  WHERE id = 73 ");
    assert_eq!(db.build_sql().unwrap(), "DELETE FROM teste WHERE id = 73");
}

#[test]
fn test_delete_all_rows() {
    assert_eq!(build_delete("teste", "").unwrap(), "DELETE FROM teste WHERE TRUE");
}

#[test]
fn test_delete_requires_table() {
    let err = build_delete("  ", "id = 1").unwrap_err();
    assert_eq!(err.code(), 6);
    assert_eq!(err.message(), "Cannot delete. Table not specified.");
}

// ==================== UpdateBuilder Tests ====================

#[test]
fn test_update_basic() {
    assert_eq!(
        build_update("teste", &["string"], &["TEST"], "id = 73").unwrap(),
        "UPDATE teste SET string = 'TEST' WHERE id = 73"
    );
}

#[test]
fn test_update_missing_values_become_null() {
    assert_eq!(
        build_update("t", &["a", "b", "c"], &["1"], "").unwrap(),
        "UPDATE t SET a = '1', b = NULL, c = NULL WHERE TRUE"
    );
}

#[test]
fn test_update_extra_values_are_ignored() {
    assert_eq!(
        build_update("t", &["a"], &["1", "2"], "").unwrap(),
        "UPDATE t SET a = '1' WHERE TRUE"
    );
}

#[test]
fn test_update_null_sentinel() {
    let sql = build_update("t", &["a"], &["%NULL%"], "b = '%NULL%'").unwrap();
    assert_eq!(sql, "UPDATE t SET a = NULL WHERE b = NULL");
}

#[test]
fn test_update_set_pairs() {
    let mut ub = UpdateBuilder::new("users");
    ub.set("status", "inactive").set("note", "%NULL%").condition("id = 1");
    assert_eq!(
        ub.build_sql().unwrap(),
        "UPDATE users SET status = 'inactive', note = NULL WHERE id = 1"
    );
}

#[test]
fn test_update_argument_errors() {
    let no_cols: [&str; 0] = [];
    let no_vals: [&str; 0] = [];
    assert_eq!(build_update("", &["a"], &["1"], "").unwrap_err().code(), 6);
    assert_eq!(build_update("t", &no_cols, &["1"], "").unwrap_err().code(), 7);
    assert_eq!(build_update("t", &["a"], &no_vals, "").unwrap_err().code(), 8);
}

// ==================== SelectBuilder Tests ====================

#[test]
fn test_select_defaults() {
    assert_eq!(
        build_select("t", &["a"], "", "", "").unwrap(),
        "SELECT a FROM t WHERE TRUE"
    );
}

#[test]
fn test_select_with_complement() {
    assert_eq!(
        build_select("teste", &["string"], "id < 77", "ORDER BY id DESC", "").unwrap(),
        "SELECT string FROM teste WHERE id < 77 ORDER BY id DESC"
    );
}

#[test]
fn test_select_with_inner_clause() {
    assert_eq!(
        build_select(
            "users u",
            &["u.id", "r.name"],
            "WHERE r.name <> '%NULL%'",
            "LIMIT 10",
            "INNER JOIN roles r ON u.role_id = r.id",
        )
        .unwrap(),
        "SELECT u.id, r.name FROM users u INNER JOIN roles r ON u.role_id = r.id WHERE r.name <> NULL LIMIT 10"
    );
}

#[test]
fn test_select_joins() {
    let mut qb = SelectBuilder::new("users u");
    qb.columns(["u.*"])
        .left_join("roles r", "u.role_id = r.id")
        .inner_join("teams t", "u.team_id = t.id");
    assert_eq!(
        qb.build_sql().unwrap(),
        "SELECT u.* FROM users u LEFT JOIN roles r ON u.role_id = r.id INNER JOIN teams t ON u.team_id = t.id WHERE TRUE"
    );
}

#[test]
fn test_select_argument_errors() {
    let no_cols: [&str; 0] = [];
    assert_eq!(build_select("", &["a"], "", "", "").unwrap_err().code(), 6);
    assert_eq!(build_select("t", &no_cols, "", "", "").unwrap_err().code(), 7);
}

// ==================== SqlBuilder Tests ====================

#[test]
fn test_kind_per_builder() {
    use crate::validate::StatementKind;
    assert_eq!(InsertBuilder::new("t").kind(), StatementKind::Insert);
    assert_eq!(DeleteBuilder::new("t").kind(), StatementKind::Delete);
    assert_eq!(UpdateBuilder::new("t").kind(), StatementKind::Update);
    assert_eq!(SelectBuilder::new("t").kind(), StatementKind::Select);
}
