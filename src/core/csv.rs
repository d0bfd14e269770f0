use std::fs::File;
use std::path::Path;

use crate::core::error::CqlError;
use crate::core::types::{Relation, Value};

// 导入时被忽略的行: 文件行号与期望/实际列数
#[derive(Debug)]
pub struct SkippedRow {
    pub line: usize,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug)]
pub struct ImportOutcome {
    pub relation: Relation,
    pub skipped: Vec<SkippedRow>,
}

// 读取分隔文本文件: 首行为表头, 之后每行一条数据
// 首字段以#开头的行按注释跳过; 列数不匹配的行跳过并记录, 不影响其余导入
pub fn import_relation(path: &Path) -> Result<ImportOutcome, CqlError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(CqlError::MissingHeader(path.display().to_string()));
    }

    let mut relation = Relation::new(headers)?;
    let mut skipped = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.get(0).map_or(false, |f| f.trim().starts_with('#')) {
            continue;
        }
        if record.len() != relation.headers.len() {
            skipped.push(SkippedRow {
                line,
                expected: relation.headers.len(),
                actual: record.len(),
            });
            continue;
        }

        let row: Vec<Value> = record
            .iter()
            .map(|field| Value::Text(strip_quotes(field).to_string()))
            .collect();
        relation.push_row(row)?;
    }

    Ok(ImportOutcome { relation, skipped })
}

// 写出分隔文本文件: 表头行加数据行, 仅在必要时加引号
pub fn export_relation(path: &Path, relation: &Relation) -> Result<(), CqlError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&relation.headers)?;
    for row in &relation.rows {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

// 剥掉字段两端成对的引号
fn strip_quotes(field: &str) -> &str {
    let bytes = field.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'\'' || first == b'"') {
            return &field[1..field.len() - 1];
        }
    }
    field
}
