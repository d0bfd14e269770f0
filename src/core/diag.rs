use crate::core::error::CqlError;
use crate::core::types::Relation;

// 一条语句产生的输出，核心不直接打印，由前端决定如何呈现
#[derive(Debug)]
pub enum Output {
    Relation(Relation),
    Notice(String),
    Error(CqlError),
}

// execute 的返回值：按产生顺序排列的输出序列
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub outputs: Vec<Output>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            outputs: Vec::new(),
        }
    }

    pub fn relation(&mut self, relation: Relation) {
        self.outputs.push(Output::Relation(relation));
    }

    pub fn notice(&mut self, message: String) {
        self.outputs.push(Output::Notice(message));
    }

    pub fn error(&mut self, error: CqlError) {
        self.outputs.push(Output::Error(error));
    }

    pub fn has_errors(&self) -> bool {
        self.outputs
            .iter()
            .any(|o| matches!(o, Output::Error(_)))
    }

    pub fn errors(&self) -> impl Iterator<Item = &CqlError> {
        self.outputs.iter().filter_map(|o| match o {
            Output::Error(e) => Some(e),
            _ => None,
        })
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.outputs.iter().filter_map(|o| match o {
            Output::Relation(r) => Some(r),
            _ => None,
        })
    }
}
