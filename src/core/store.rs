use std::collections::HashMap;

use crate::core::error::CqlError;
use crate::core::types::Relation;

// 会话级的表存储，表名到关系的唯一映射
pub struct TableStore {
    tables: HashMap<String, Relation>,
}

impl TableStore {
    pub fn new() -> Self {
        TableStore {
            tables: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Relation, CqlError> {
        self.tables
            .get(name)
            .ok_or_else(|| CqlError::TableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    // 整体绑定关系，已有同名表被替换
    pub fn insert(&mut self, name: String, relation: Relation) {
        self.tables.insert(name, relation);
    }

    pub fn remove(&mut self, name: &str) -> Result<Relation, CqlError> {
        self.tables
            .remove(name)
            .ok_or_else(|| CqlError::TableNotFound(name.to_string()))
    }

    // 旧键解除绑定，同一关系绑定到新键
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), CqlError> {
        let relation = self.remove(old)?;
        self.tables.insert(new.to_string(), relation);
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new()
    }
}
