use crate::core::cql::{Executor, Lexer, Parser};
use crate::core::diag::Diagnostics;
use crate::core::error::CqlError;
use crate::core::procedure::ProcedureRegistry;
use crate::core::store::TableStore;

// 过程调用的默认最大嵌套深度
pub const DEFAULT_MAX_CALL_DEPTH: usize = 32;

// 错误显示模式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorDisplayMode {
    Brief,    // 简略错误信息
    Detailed, // 详细错误信息
}

// 一次解释器会话: 表存储和过程注册表的唯一持有者
pub struct Session {
    tables: TableStore,
    procedures: ProcedureRegistry,
    lexer: Lexer,
    max_call_depth: usize,
    error_mode: ErrorDisplayMode,
}

impl Session {
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Session {
            tables: TableStore::new(),
            procedures: ProcedureRegistry::new(),
            lexer: Lexer::new(),
            max_call_depth,
            error_mode: ErrorDisplayMode::Detailed,
        }
    }

    // 设置错误显示模式
    pub fn set_error_mode(&mut self, mode: ErrorDisplayMode) {
        self.error_mode = mode;
    }

    // 获取当前错误显示模式
    pub fn error_mode(&self) -> ErrorDisplayMode {
        self.error_mode
    }

    // 根据当前模式格式化错误信息
    pub fn format_error(&self, error: &CqlError) -> String {
        match self.error_mode {
            ErrorDisplayMode::Brief => error.brief_message(),
            ErrorDisplayMode::Detailed => error.detailed_message(),
        }
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    pub fn procedures(&self) -> &ProcedureRegistry {
        &self.procedures
    }

    // 会话边界的唯一操作: 执行一段CQL文本, 返回按顺序排列的输出
    // 任何错误都在语句边界被捕获, 之前的语句不回滚, 之后的语句照常执行
    pub fn execute(&mut self, text: &str) -> Diagnostics {
        let mut diag = Diagnostics::new();

        let (tokens, lex_errors) = self.lexer.tokenize(text);
        for error in lex_errors {
            diag.error(error);
        }

        let mut parser = Parser::new(tokens);
        loop {
            parser.skip_semicolons();
            if parser.is_at_end() {
                break;
            }
            match parser.parse_statement() {
                Ok(statement) => {
                    let mut executor = Executor::new(
                        &mut self.tables,
                        &mut self.procedures,
                        self.max_call_depth,
                    );
                    if let Err(e) = executor.execute(statement, &mut diag) {
                        diag.error(e);
                    }
                }
                Err(e) => {
                    diag.error(e);
                    parser.synchronize();
                }
            }
        }

        diag
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
