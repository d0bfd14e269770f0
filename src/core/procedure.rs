use std::collections::HashMap;

use crate::core::cql::Statement;
use crate::core::error::CqlError;

// 声明时捕获的语句序列，重放时不再重新解析
#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub body: Vec<Statement>,
}

// 会话级的过程注册表，重名声明直接覆盖，不保留旧版本
pub struct ProcedureRegistry {
    procedures: HashMap<String, Procedure>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        ProcedureRegistry {
            procedures: HashMap::new(),
        }
    }

    pub fn define(&mut self, procedure: Procedure) {
        self.procedures.insert(procedure.name.clone(), procedure);
    }

    pub fn get(&self, name: &str) -> Result<&Procedure, CqlError> {
        self.procedures
            .get(name)
            .ok_or_else(|| CqlError::ProcedureNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ProcedureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
