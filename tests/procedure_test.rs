mod common;

use common::{exec_ok, first_relation, load_table, root_cause, rows_as_text};
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
fn test_declaration_does_not_execute_body() {
    let mut session = session_with_table();
    let diag = exec_ok(
        &mut session,
        "PROCEDURE copia DO CREATE TABLE c SELECT * FROM t; END;",
    );

    // 声明只捕获语句, 不执行
    assert_eq!(diag.relations().count(), 0);
    assert!(!session.tables().contains("c"));
}

#[test]
fn test_call_replays_body_in_order() {
    let mut session = session_with_table();
    exec_ok(
        &mut session,
        "PROCEDURE copia DO CREATE TABLE c SELECT * FROM t; SELECT a FROM c; END;",
    );
    let diag = exec_ok(&mut session, "CALL copia;");

    assert!(session.tables().contains("c"));
    assert_eq!(
        rows_as_text(first_relation(&diag)),
        vec![vec!["1"], vec!["2"]]
    );
}

#[test]
fn test_call_unknown_procedure() {
    let mut session = Session::new();
    let diag = session.execute("CALL missing;");
    let mut errors = diag.errors();
    match errors.next().expect("expected an error") {
        CqlError::ProcedureNotFound(name) => assert_eq!(name, "missing"),
        other => panic!("expected ProcedureNotFound, got {:?}", other),
    }
}

#[test]
fn test_redeclaration_replaces_body() {
    let mut session = session_with_table();
    exec_ok(&mut session, "PROCEDURE p DO SELECT a FROM t; END;");
    exec_ok(&mut session, "PROCEDURE p DO SELECT b FROM t LIMIT 1; END;");

    // 后声明的过程体覆盖先前的, 调用只执行最新版本
    let diag = exec_ok(&mut session, "CALL p;");
    assert_eq!(diag.relations().count(), 1);
    assert_eq!(rows_as_text(first_relation(&diag)), vec![vec!["x"]]);
}

#[test]
fn test_body_sees_current_state_not_snapshot() {
    let mut session = Session::new();
    exec_ok(&mut session, "PROCEDURE mostra DO SELECT * FROM dados; END;");

    // 声明时表还不存在, 调用时针对当前状态执行
    load_table(&mut session, "dados", "v\n7\n");
    let diag = exec_ok(&mut session, "CALL mostra;");
    assert_eq!(rows_as_text(first_relation(&diag)), vec![vec!["7"]]);
}

#[test]
fn test_body_error_reported_with_index_and_execution_continues() {
    let mut session = session_with_table();
    exec_ok(
        &mut session,
        "PROCEDURE p DO SELECT * FROM missing; SELECT a FROM t LIMIT 1; END;",
    );
    let diag = session.execute("CALL p;");

    // 第1条语句失败, 第2条照常执行
    match diag.errors().next().expect("expected an error") {
        CqlError::ProcedureStep { name, index, source } => {
            assert_eq!(name, "p");
            assert_eq!(*index, 1);
            assert!(matches!(**source, CqlError::TableNotFound(_)));
        }
        other => panic!("expected ProcedureStep, got {:?}", other),
    }
    assert_eq!(rows_as_text(first_relation(&diag)), vec![vec!["1"]]);
}

#[test]
fn test_nested_calls_resolve_latest_definitions() {
    let mut session = session_with_table();
    exec_ok(&mut session, "PROCEDURE inner DO SELECT a FROM t; END;");
    exec_ok(&mut session, "PROCEDURE outer DO CALL inner; END;");
    // 重新定义inner后, outer的调用使用新定义
    exec_ok(&mut session, "PROCEDURE inner DO SELECT b FROM t LIMIT 1; END;");

    let diag = exec_ok(&mut session, "CALL outer;");
    assert_eq!(rows_as_text(first_relation(&diag)), vec![vec!["x"]]);
}

#[test]
fn test_recursion_hits_depth_ceiling() {
    let mut session = Session::with_max_call_depth(4);
    exec_ok(&mut session, "PROCEDURE loop_p DO CALL loop_p; END;");
    let diag = session.execute("CALL loop_p;");

    let error = diag.errors().next().expect("expected an error");
    match root_cause(error) {
        CqlError::RecursionLimitExceeded(limit) => assert_eq!(*limit, 4),
        other => panic!("expected RecursionLimitExceeded, got {:?}", other),
    }
}

#[test]
fn test_mutual_recursion_hits_depth_ceiling() {
    let mut session = Session::with_max_call_depth(6);
    exec_ok(&mut session, "PROCEDURE ping DO CALL pong; END;");
    exec_ok(&mut session, "PROCEDURE pong DO CALL ping; END;");
    let diag = session.execute("CALL ping;");

    let error = diag.errors().next().expect("expected an error");
    assert!(matches!(
        root_cause(error),
        CqlError::RecursionLimitExceeded(_)
    ));
}

#[test]
fn test_depth_ceiling_allows_shallow_nesting() {
    let mut session = session_with_table();
    exec_ok(&mut session, "PROCEDURE leaf DO SELECT a FROM t LIMIT 1; END;");
    exec_ok(&mut session, "PROCEDURE mid DO CALL leaf; END;");
    exec_ok(&mut session, "PROCEDURE top DO CALL mid; END;");

    let diag = exec_ok(&mut session, "CALL top;");
    assert_eq!(diag.relations().count(), 1);
}
