use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CqlError {
    #[error("非法字符 '{ch}' (第 {line} 行)")]
    Lexical { ch: char, line: usize },

    #[error("语法错误: 期望 {expected}, 实际 {found} (第 {line} 行)")]
    Syntax {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("表 '{0}' 不存在")]
    TableNotFound(String),

    #[error("字段 '{field}' 在表 '{table}' 中不存在")]
    FieldNotFound { table: String, field: String },

    #[error("连接列 '{column}' 在表 '{table}' 中不存在")]
    ColumnNotFound { table: String, column: String },

    #[error("过程 '{0}' 未定义")]
    ProcedureNotFound(String),

    #[error("过程调用超出最大深度 {0}")]
    RecursionLimitExceeded(usize),

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("CSV错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("列 '{column}' 的值 '{value}' 不能参与大小比较")]
    NotComparable { column: String, value: String },

    #[error("列数不匹配: 期望 {expected}, 实际 {actual}")]
    RowWidthMismatch { expected: usize, actual: usize },

    #[error("列名 '{0}' 重复")]
    DuplicateColumn(String),

    #[error("文件 '{0}' 缺少表头行")]
    MissingHeader(String),

    #[error("过程 '{name}' 第 {index} 条语句执行失败: {source}")]
    ProcedureStep {
        name: String,
        index: usize,
        #[source]
        source: Box<CqlError>,
    },
}

// 为CqlError实现详细错误信息输出
impl CqlError {
    // 获取详细的错误信息
    pub fn detailed_message(&self) -> String {
        format!("{}", self)
    }

    // 获取简略的错误信息
    pub fn brief_message(&self) -> String {
        match self {
            CqlError::Lexical { .. } => "Error: Illegal character".to_string(),
            CqlError::Syntax { .. } => "Error: Syntax error".to_string(),
            CqlError::TableNotFound(_) => "Error: Table not found".to_string(),
            CqlError::FieldNotFound { .. } => "Error: Field not found".to_string(),
            CqlError::ColumnNotFound { .. } => "Error: Column not found".to_string(),
            CqlError::ProcedureNotFound(_) => "Error: Procedure not found".to_string(),
            CqlError::RecursionLimitExceeded(_) => "Error: Recursion limit exceeded".to_string(),
            CqlError::Io(_) => "Error: IO error".to_string(),
            CqlError::Csv(_) => "Error: CSV error".to_string(),
            CqlError::NotComparable { .. } => "Error: Values not comparable".to_string(),
            CqlError::RowWidthMismatch { .. } => "Error: Row width mismatch".to_string(),
            CqlError::DuplicateColumn(_) => "Error: Duplicate column".to_string(),
            CqlError::MissingHeader(_) => "Error: Missing header".to_string(),
            CqlError::ProcedureStep { index, source, .. } => {
                format!("Error: Statement {} failed ({})", index, source.brief_message())
            }
        }
    }
}
