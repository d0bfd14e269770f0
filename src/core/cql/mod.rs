mod executor;
mod formatter;
mod lexer;
mod parser;

pub use executor::Executor;
pub use formatter::TableFormatter;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::core::types::Value;

// 比较操作符
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

// WHERE子句里的单个条件
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

// 投影: 星号或按顺序排列的字段列表
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    All,
    Fields(Vec<String>),
}

// 一次SELECT的完整描述
#[derive(Debug, Clone, PartialEq)]
pub struct SelectSpec {
    pub projection: Projection,
    pub table: String,
    pub conditions: Vec<Condition>,
    pub limit: Option<usize>,
}

// CQL语句类型, 每个变体携带重放所需的全部字段
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import {
        table: String,
        path: String,
    },
    Export {
        table: String,
        path: String,
    },
    Discard {
        table: String,
    },
    Rename {
        old: String,
        new: String,
    },
    Print {
        table: String,
    },
    Select(SelectSpec),
    CreateFromSelect {
        table: String,
        select: SelectSpec,
    },
    CreateFromJoin {
        table: String,
        left: String,
        right: String,
        column: String,
    },
    ProcedureDecl {
        name: String,
        body: Vec<Statement>,
    },
    ProcedureCall {
        name: String,
    },
}
