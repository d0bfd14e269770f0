mod common;

use common::{exec_ok, first_error, first_relation, load_table, rows_as_text};
use cql_db::core::error::CqlError;
use cql_db::core::session::Session;

fn session_with_table() -> Session {
    let mut session = Session::new();
    load_table(
        &mut session,
        "t",
        "a,b\n\
         1,x\n\
         2,y\n",
    );
    session
}

#[test]
fn test_rename_rebinds_relation() {
    let mut session = session_with_table();
    exec_ok(&mut session, "RENAME TABLE t u;");

    // 新名字可查询, 旧名字不再存在
    let diag = exec_ok(&mut session, "SELECT * FROM u;");
    assert_eq!(first_relation(&diag).rows.len(), 2);

    let diag = session.execute("SELECT * FROM t;");
    assert!(matches!(first_error(&diag), CqlError::TableNotFound(_)));
}

#[test]
fn test_rename_missing_table() {
    let mut session = Session::new();
    let diag = session.execute("RENAME TABLE missing other;");
    match first_error(&diag) {
        CqlError::TableNotFound(name) => assert_eq!(name, "missing"),
        other => panic!("expected TableNotFound, got {:?}", other),
    }
}

#[test]
fn test_rename_overwrites_existing_target() {
    let mut session = session_with_table();
    load_table(&mut session, "u", "c\nalt\n");
    exec_ok(&mut session, "RENAME TABLE t u;");

    let diag = exec_ok(&mut session, "SELECT * FROM u;");
    assert_eq!(first_relation(&diag).headers, vec!["a", "b"]);
}

#[test]
fn test_discard_removes_table() {
    let mut session = session_with_table();
    exec_ok(&mut session, "DISCARD TABLE t;");

    let diag = session.execute("PRINT TABLE t;");
    assert!(matches!(first_error(&diag), CqlError::TableNotFound(_)));
}

#[test]
fn test_discard_missing_table() {
    let mut session = Session::new();
    let diag = session.execute("DISCARD TABLE missing;");
    assert!(matches!(first_error(&diag), CqlError::TableNotFound(_)));
}

#[test]
fn test_print_emits_relation() {
    let mut session = session_with_table();
    let diag = exec_ok(&mut session, "PRINT TABLE t;");
    let result = first_relation(&diag);
    assert_eq!(result.headers, vec!["a", "b"]);
    assert_eq!(rows_as_text(result), vec![vec!["1", "x"], vec!["2", "y"]]);
}

#[test]
fn test_create_from_select_stores_result() {
    let mut session = session_with_table();
    exec_ok(&mut session, "CREATE TABLE big SELECT b FROM t WHERE a > 1;");

    let diag = exec_ok(&mut session, "SELECT * FROM big;");
    let result = first_relation(&diag);
    assert_eq!(result.headers, vec!["b"]);
    assert_eq!(rows_as_text(result), vec![vec!["y"]]);
}

#[test]
fn test_create_from_select_replaces_existing() {
    let mut session = session_with_table();
    exec_ok(&mut session, "CREATE TABLE copy SELECT * FROM t;");
    exec_ok(&mut session, "CREATE TABLE copy SELECT a FROM t LIMIT 1;");

    let diag = exec_ok(&mut session, "SELECT * FROM copy;");
    let result = first_relation(&diag);
    assert_eq!(result.headers, vec!["a"]);
    assert_eq!(result.rows.len(), 1);
}

#[test]
fn test_failed_create_leaves_state_untouched() {
    let mut session = session_with_table();
    let diag = session.execute("CREATE TABLE bad SELECT missing FROM t;");

    assert!(matches!(
        first_error(&diag),
        CqlError::FieldNotFound { .. }
    ));
    assert!(!session.tables().contains("bad"));
}
