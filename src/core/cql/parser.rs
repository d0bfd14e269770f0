use crate::core::error::CqlError;
use crate::core::types::Value;
use super::lexer::{Token, TokenKind};
use super::{CompareOp, Condition, Projection, SelectSpec, Statement};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    // 连续的分号视为空语句, 直接跳过
    pub fn skip_semicolons(&mut self) {
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
            self.position += 1;
        }
    }

    // 语法错误后丢弃到下一个语句边界
    pub fn synchronize(&mut self) {
        while let Some(token) = self.peek() {
            let is_boundary = token.kind == TokenKind::Semicolon;
            self.position += 1;
            if is_boundary {
                return;
            }
        }
    }

    // 每次调用解析一条完整语句, 以分号或输入结束为界
    pub fn parse_statement(&mut self) -> Result<Statement, CqlError> {
        let statement = self.parse_statement_body()?;
        self.expect_statement_end()?;
        Ok(statement)
    }

    fn parse_statement_body(&mut self) -> Result<Statement, CqlError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Import) => self.parse_import(),
            Some(TokenKind::Export) => self.parse_export(),
            Some(TokenKind::Discard) => self.parse_discard(),
            Some(TokenKind::Rename) => self.parse_rename(),
            Some(TokenKind::Print) => self.parse_print(),
            Some(TokenKind::Select) => Ok(Statement::Select(self.parse_select()?)),
            Some(TokenKind::Create) => self.parse_create(),
            Some(TokenKind::Procedure) => self.parse_procedure_decl(),
            Some(TokenKind::Call) => self.parse_procedure_call(),
            _ => Err(self.syntax_error("语句开始")),
        }
    }

    // import := IMPORT TABLE name FROM path
    fn parse_import(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Import)?;
        self.expect(TokenKind::Table)?;
        let table = self.expect_identifier("表名")?;
        self.expect(TokenKind::From)?;
        let path = self.expect_string("文件路径")?;
        Ok(Statement::Import { table, path })
    }

    // export := EXPORT TABLE name AS path
    fn parse_export(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Export)?;
        self.expect(TokenKind::Table)?;
        let table = self.expect_identifier("表名")?;
        self.expect(TokenKind::As)?;
        let path = self.expect_string("文件路径")?;
        Ok(Statement::Export { table, path })
    }

    // discard := DISCARD TABLE name
    fn parse_discard(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Discard)?;
        self.expect(TokenKind::Table)?;
        let table = self.expect_identifier("表名")?;
        Ok(Statement::Discard { table })
    }

    // rename := RENAME TABLE name name
    fn parse_rename(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Rename)?;
        self.expect(TokenKind::Table)?;
        let old = self.expect_identifier("表名")?;
        let new = self.expect_identifier("新表名")?;
        Ok(Statement::Rename { old, new })
    }

    // print := PRINT TABLE name
    fn parse_print(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::Table)?;
        let table = self.expect_identifier("表名")?;
        Ok(Statement::Print { table })
    }

    // select := SELECT projection FROM name [WHERE cond (AND cond)*] [LIMIT number]
    // 不消耗结尾分号, CREATE TABLE ... SELECT 会复用本方法
    fn parse_select(&mut self) -> Result<SelectSpec, CqlError> {
        self.expect(TokenKind::Select)?;

        let projection = if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Star)) {
            self.next();
            Projection::All
        } else {
            let mut fields = vec![self.expect_identifier("字段名")?];
            while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Comma)) {
                self.next();
                fields.push(self.expect_identifier("字段名")?);
            }
            Projection::Fields(fields)
        };

        self.expect(TokenKind::From)?;
        let table = self.expect_identifier("表名")?;

        let mut conditions = Vec::new();
        if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Where)) {
            self.next();
            conditions.push(self.parse_condition()?);
            while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::And)) {
                self.next();
                conditions.push(self.parse_condition()?);
            }
        }

        let limit = if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Limit)) {
            self.next();
            match self.next() {
                Some(Token {
                    kind: TokenKind::Int(n),
                    ..
                }) => Some(n as usize),
                _ => {
                    self.position = self.position.saturating_sub(1);
                    return Err(self.syntax_error("整数"));
                }
            }
        } else {
            None
        };

        Ok(SelectSpec {
            projection,
            table,
            conditions,
            limit,
        })
    }

    // cond := name op (string | number)
    fn parse_condition(&mut self) -> Result<Condition, CqlError> {
        let field = self.expect_identifier("字段名")?;

        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Ge) => CompareOp::Ge,
            Some(TokenKind::Le) => CompareOp::Le,
            _ => return Err(self.syntax_error("比较操作符")),
        };
        self.next();

        let value = match self.next() {
            Some(Token {
                kind: TokenKind::Str(s),
                ..
            }) => Value::Text(s),
            Some(Token {
                kind: TokenKind::Int(n),
                ..
            }) => Value::Int(n),
            Some(Token {
                kind: TokenKind::Float(f),
                ..
            }) => Value::Float(f),
            _ => {
                self.position = self.position.saturating_sub(1);
                return Err(self.syntax_error("字符串或数字"));
            }
        };

        Ok(Condition { field, op, value })
    }

    // create_from_select := CREATE TABLE name select
    // create_from_join   := CREATE TABLE name FROM name JOIN name USING (name)
    fn parse_create(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Create)?;
        self.expect(TokenKind::Table)?;
        let table = self.expect_identifier("表名")?;

        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Select) => {
                let select = self.parse_select()?;
                Ok(Statement::CreateFromSelect { table, select })
            }
            Some(TokenKind::From) => {
                self.next();
                let left = self.expect_identifier("表名")?;
                self.expect(TokenKind::Join)?;
                let right = self.expect_identifier("表名")?;
                self.expect(TokenKind::Using)?;
                self.expect(TokenKind::LParen)?;
                let column = self.expect_identifier("列名")?;
                self.expect(TokenKind::RParen)?;
                Ok(Statement::CreateFromJoin {
                    table,
                    left,
                    right,
                    column,
                })
            }
            _ => Err(self.syntax_error("SELECT 或 FROM")),
        }
    }

    // procedure_decl := PROCEDURE name DO statement (';' statement)* END
    // 声明体在此处捕获为语句记录, 重放时不再解析
    fn parse_procedure_decl(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Procedure)?;
        let name = self.expect_identifier("过程名")?;
        self.expect(TokenKind::Do)?;

        let mut body = vec![self.parse_statement_body()?];
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
            self.next();
            // END前允许一个多余的分号
            if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::End)) {
                break;
            }
            body.push(self.parse_statement_body()?);
        }
        self.expect(TokenKind::End)?;

        Ok(Statement::ProcedureDecl { name, body })
    }

    // procedure_call := CALL name
    fn parse_procedure_call(&mut self) -> Result<Statement, CqlError> {
        self.expect(TokenKind::Call)?;
        let name = self.expect_identifier("过程名")?;
        Ok(Statement::ProcedureCall { name })
    }

    // 语句以分号结束, 整段输入的最后一条语句允许省略分号
    fn expect_statement_end(&mut self) -> Result<(), CqlError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Semicolon) => {
                self.next();
                Ok(())
            }
            None => Ok(()),
            _ => Err(self.syntax_error("';'")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), CqlError> {
        match self.peek() {
            Some(token) if token.kind == expected => {
                self.next();
                Ok(())
            }
            _ => Err(self.syntax_error(&format!("{:?}", expected))),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, CqlError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(self.syntax_error(what)),
        }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, CqlError> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Str(s),
                ..
            }) => {
                let s = s.clone();
                self.next();
                Ok(s)
            }
            _ => Err(self.syntax_error(what)),
        }
    }

    // 带当前词法单元和行号的语法错误
    fn syntax_error(&self, expected: &str) -> CqlError {
        match self.peek() {
            Some(token) => CqlError::Syntax {
                expected: expected.to_string(),
                found: format!("'{}'", token.lexeme),
                line: token.line,
            },
            None => CqlError::Syntax {
                expected: expected.to_string(),
                found: "输入结束".to_string(),
                line: self.tokens.last().map(|t| t.line).unwrap_or(1),
            },
        }
    }
}
