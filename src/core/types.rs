use std::fmt;

use crate::core::error::CqlError;

// 单元格或字面量的值，字符串或数字
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    // 尝试按数字解释，文本内容可解析为数字时同样成立
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

// 关系：有序且不重复的列名，加上若干行
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Relation {
    pub fn new(headers: Vec<String>) -> Result<Self, CqlError> {
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(CqlError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Relation {
            headers,
            rows: Vec::new(),
        })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn validate_row(&self, row: &[Value]) -> Result<(), CqlError> {
        if row.len() != self.headers.len() {
            return Err(CqlError::RowWidthMismatch {
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), CqlError> {
        self.validate_row(&row)?;
        self.rows.push(row);
        Ok(())
    }
}
