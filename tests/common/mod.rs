#![allow(dead_code)]

use cql_db::core::diag::Diagnostics;
use cql_db::core::error::CqlError;
use cql_db::core::session::Session;
use cql_db::core::types::Relation;

// 把一段CSV文本写入临时文件并导入会话
pub fn load_table(session: &mut Session, name: &str, content: &str) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(format!("{}.csv", name));
    std::fs::write(&path, content).expect("write csv fixture");

    let diag = session.execute(&format!("IMPORT TABLE {} FROM \"{}\";", name, path.display()));
    assert!(
        !diag.has_errors(),
        "import of '{}' failed: {:?}",
        name,
        diag.outputs
    );
}

pub fn exec_ok(session: &mut Session, text: &str) -> Diagnostics {
    let diag = session.execute(text);
    assert!(!diag.has_errors(), "'{}' failed: {:?}", text, diag.outputs);
    diag
}

pub fn first_relation(diag: &Diagnostics) -> &Relation {
    diag.relations().next().expect("expected a relation output")
}

pub fn first_error(diag: &Diagnostics) -> &CqlError {
    diag.errors().next().expect("expected an error output")
}

// 以文本形式取出关系的所有行, 便于断言
pub fn rows_as_text(relation: &Relation) -> Vec<Vec<String>> {
    relation
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

// 解开嵌套的过程语句错误, 返回最内层的原因
pub fn root_cause(error: &CqlError) -> &CqlError {
    match error {
        CqlError::ProcedureStep { source, .. } => root_cause(source),
        other => other,
    }
}
