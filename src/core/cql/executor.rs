use std::collections::HashMap;
use std::path::Path;

use crate::core::csv::{export_relation, import_relation};
use crate::core::diag::Diagnostics;
use crate::core::error::CqlError;
use crate::core::procedure::{Procedure, ProcedureRegistry};
use crate::core::store::TableStore;
use crate::core::types::{Relation, Value};
use super::{CompareOp, Condition, Projection, SelectSpec, Statement};

pub struct Executor<'a> {
    tables: &'a mut TableStore,
    procedures: &'a mut ProcedureRegistry,
    max_call_depth: usize,
}

impl<'a> Executor<'a> {
    pub fn new(
        tables: &'a mut TableStore,
        procedures: &'a mut ProcedureRegistry,
        max_call_depth: usize,
    ) -> Self {
        Executor {
            tables,
            procedures,
            max_call_depth,
        }
    }

    // 一条语句要么完整生效, 要么返回错误且状态不变
    pub fn execute(
        &mut self,
        statement: Statement,
        diag: &mut Diagnostics,
    ) -> Result<(), CqlError> {
        self.execute_at_depth(statement, diag, 0)
    }

    fn execute_at_depth(
        &mut self,
        statement: Statement,
        diag: &mut Diagnostics,
        depth: usize,
    ) -> Result<(), CqlError> {
        match statement {
            Statement::Import { table, path } => {
                let outcome = import_relation(Path::new(&path))?;
                for skipped in &outcome.skipped {
                    diag.notice(format!(
                        "警告: 第 {} 行被忽略, 列数不匹配 (期望 {}, 实际 {})",
                        skipped.line, skipped.expected, skipped.actual
                    ));
                }
                let count = outcome.relation.rows.len();
                self.tables.insert(table.clone(), outcome.relation);
                diag.notice(format!(
                    "表 '{}' 从 '{}' 导入成功, 共 {} 行有效数据",
                    table, path, count
                ));
                Ok(())
            }
            Statement::Export { table, path } => {
                let relation = self.tables.get(&table)?;
                export_relation(Path::new(&path), relation)?;
                diag.notice(format!("表 '{}' 已导出到 '{}'", table, path));
                Ok(())
            }
            Statement::Discard { table } => {
                self.tables.remove(&table)?;
                diag.notice(format!("表 '{}' 已丢弃", table));
                Ok(())
            }
            Statement::Rename { old, new } => {
                self.tables.rename(&old, &new)?;
                diag.notice(format!("表 '{}' 已重命名为 '{}'", old, new));
                Ok(())
            }
            Statement::Print { table } => {
                let relation = self.tables.get(&table)?.clone();
                diag.relation(relation);
                Ok(())
            }
            Statement::Select(select) => {
                let result = self.eval_select(&select)?;
                diag.relation(result);
                Ok(())
            }
            Statement::CreateFromSelect { table, select } => {
                let result = self.eval_select(&select)?;
                let count = result.rows.len();
                if self.tables.contains(&table) {
                    diag.notice(format!("警告: 覆盖已有表 '{}'", table));
                }
                self.tables.insert(table.clone(), result);
                diag.notice(format!("表 '{}' 创建成功, 共 {} 行", table, count));
                Ok(())
            }
            Statement::CreateFromJoin {
                table,
                left,
                right,
                column,
            } => {
                let result = self.eval_join(&left, &right, &column)?;
                let count = result.rows.len();
                self.tables.insert(table.clone(), result);
                diag.notice(format!(
                    "表 '{}' 由 '{}' 和 '{}' 连接创建, 共 {} 行",
                    table, left, right, count
                ));
                Ok(())
            }
            Statement::ProcedureDecl { name, body } => {
                let count = body.len();
                self.procedures.define(Procedure {
                    name: name.clone(),
                    body,
                });
                diag.notice(format!("过程 '{}' 已定义, 共 {} 条语句", name, count));
                Ok(())
            }
            Statement::ProcedureCall { name } => self.call_procedure(&name, diag, depth),
        }
    }

    // 重放时针对当前会话状态执行, 不使用声明时的快照
    // 单条语句失败只作为诊断记录, 不中止整个过程体
    fn call_procedure(
        &mut self,
        name: &str,
        diag: &mut Diagnostics,
        depth: usize,
    ) -> Result<(), CqlError> {
        if depth + 1 > self.max_call_depth {
            return Err(CqlError::RecursionLimitExceeded(self.max_call_depth));
        }
        let body = self.procedures.get(name)?.body.clone();

        for (i, statement) in body.into_iter().enumerate() {
            if let Err(e) = self.execute_at_depth(statement, diag, depth + 1) {
                diag.error(CqlError::ProcedureStep {
                    name: name.to_string(),
                    index: i + 1,
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }

    // SELECT求值: 先解析投影和条件的列索引, 再过滤, 最后截断
    fn eval_select(&self, select: &SelectSpec) -> Result<Relation, CqlError> {
        let source = self.tables.get(&select.table)?;

        let indices: Vec<usize> = match &select.projection {
            Projection::All => (0..source.headers.len()).collect(),
            Projection::Fields(fields) => {
                let mut indices = Vec::with_capacity(fields.len());
                for field in fields {
                    let index = source.column_index(field).ok_or_else(|| {
                        CqlError::FieldNotFound {
                            table: select.table.clone(),
                            field: field.clone(),
                        }
                    })?;
                    indices.push(index);
                }
                indices
            }
        };
        let headers: Vec<String> = indices
            .iter()
            .map(|&i| source.headers[i].clone())
            .collect();

        // 条件的列索引在扫描之前全部解析, 未知字段直接中止
        let mut conditions = Vec::with_capacity(select.conditions.len());
        for condition in &select.conditions {
            let index = source.column_index(&condition.field).ok_or_else(|| {
                CqlError::FieldNotFound {
                    table: select.table.clone(),
                    field: condition.field.clone(),
                }
            })?;
            conditions.push((index, condition));
        }

        let mut result = Relation::new(headers)?;
        for row in &source.rows {
            let mut keep = true;
            for (index, condition) in &conditions {
                if !eval_condition(&row[*index], condition)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                let projected: Vec<Value> = indices.iter().map(|&i| row[i].clone()).collect();
                result.push_row(projected)?;
            }
        }

        // LIMIT在过滤之后生效, 超过行数时返回全部
        if let Some(limit) = select.limit {
            result.rows.truncate(limit);
        }

        Ok(result)
    }

    // 单列等值内连接: 右表按连接列建哈希索引, 左表按原始顺序扫描
    fn eval_join(
        &self,
        left_name: &str,
        right_name: &str,
        column: &str,
    ) -> Result<Relation, CqlError> {
        let left = self.tables.get(left_name)?;
        let right = self.tables.get(right_name)?;

        let left_index = left
            .column_index(column)
            .ok_or_else(|| CqlError::ColumnNotFound {
                table: left_name.to_string(),
                column: column.to_string(),
            })?;
        let right_index = right
            .column_index(column)
            .ok_or_else(|| CqlError::ColumnNotFound {
                table: right_name.to_string(),
                column: column.to_string(),
            })?;

        // 同键的右表行保持原始相对顺序
        let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            lookup
                .entry(row[right_index].to_string())
                .or_default()
                .push(i);
        }

        // 连接列只保留左表的一份
        let mut headers = left.headers.clone();
        for (i, header) in right.headers.iter().enumerate() {
            if i != right_index {
                headers.push(header.clone());
            }
        }
        let mut result = Relation::new(headers)?;

        // 没有匹配的左表行不产生输出
        for left_row in &left.rows {
            if let Some(matches) = lookup.get(&left_row[left_index].to_string()) {
                for &m in matches {
                    let mut combined = left_row.clone();
                    for (i, cell) in right.rows[m].iter().enumerate() {
                        if i != right_index {
                            combined.push(cell.clone());
                        }
                    }
                    result.push_row(combined)?;
                }
            }
        }

        Ok(result)
    }
}

// 单个条件的求值
// 两侧都能按数字解释时六种操作符都做数值比较;
// 否则等值比较退回文本, 大小比较返回类型错误
fn eval_condition(cell: &Value, condition: &Condition) -> Result<bool, CqlError> {
    if let (Some(a), Some(b)) = (cell.as_number(), condition.value.as_number()) {
        return Ok(match condition.op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Lt => a < b,
            CompareOp::Ge => a >= b,
            CompareOp::Le => a <= b,
        });
    }

    match condition.op {
        CompareOp::Eq => Ok(cell.to_string() == condition.value.to_string()),
        CompareOp::Ne => Ok(cell.to_string() != condition.value.to_string()),
        _ => {
            let offender = if cell.as_number().is_none() {
                cell
            } else {
                &condition.value
            };
            Err(CqlError::NotComparable {
                column: condition.field.clone(),
                value: offender.to_string(),
            })
        }
    }
}
