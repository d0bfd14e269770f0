use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::core::cql::{Lexer, TableFormatter, TokenKind};
use crate::core::diag::{Diagnostics, Output};
use crate::core::session::{ErrorDisplayMode, Session, DEFAULT_MAX_CALL_DEPTH};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 要执行的CQL脚本文件, 扩展名必须是.fca; 不提供则进入交互模式
    script: Option<PathBuf>,

    /// 只显示简略错误信息
    #[arg(short, long)]
    brief_errors: bool,

    /// 过程调用的最大嵌套深度
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
}

impl Cli {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut session = Session::with_max_call_depth(self.max_call_depth);
        if self.brief_errors {
            session.set_error_mode(ErrorDisplayMode::Brief);
        }

        match &self.script {
            Some(path) => self.run_script(&mut session, path),
            None => self.run_interactive(&mut session),
        }
    }

    // 脚本模式: 整个文件作为一段输入执行
    fn run_script(&self, session: &mut Session, path: &Path) -> anyhow::Result<()> {
        if path.extension().map_or(true, |ext| ext != "fca") {
            anyhow::bail!("脚本文件必须以 .fca 结尾: {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取脚本文件 '{}'", path.display()))?;
        let diag = session.execute(&content);
        render(session, &diag);
        Ok(())
    }

    // 交互模式: 语句以分号结束, 可以跨多行输入
    fn run_interactive(&self, session: &mut Session) -> anyhow::Result<()> {
        println!("CQL解释器 (Comma Query Language)");
        println!("输入 'help' 获取帮助信息");
        println!("输入 'exit' 退出程序");
        println!("CQL语句以分号(;)结束, 可以跨多行输入");

        // 用于缓存多行CQL语句
        let mut buffer = String::new();

        loop {
            // 根据是否在继续输入语句显示不同的提示符
            if buffer.is_empty() {
                print!("CQL> ");
            } else {
                print!("...> ");
            }
            std::io::stdout().flush()?;

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                // 输入结束
                break;
            }
            let input = line.trim();

            // 特殊命令不需要分号, 并且会清空当前缓冲区
            match input {
                "exit" => break,
                "help" => {
                    print_help();
                    buffer.clear();
                    continue;
                }
                "list" => {
                    print_list(session);
                    buffer.clear();
                    continue;
                }
                "clear" => {
                    println!("已清除当前语句缓冲区");
                    buffer.clear();
                    continue;
                }
                "" if buffer.is_empty() => continue,
                _ => {
                    buffer.push_str(&line);
                }
            }

            // 语句以分号结束且所有DO都有匹配的END时, 执行整段输入
            if chunk_complete(&buffer) {
                let chunk = std::mem::take(&mut buffer);
                let diag = session.execute(&chunk);
                render(session, &diag);
            }
        }

        Ok(())
    }
}

// 判断缓冲区是否构成完整的输入段:
// 词法上以分号结束, 并且过程声明的DO/END已配对, 过程体因此可以跨行
fn chunk_complete(buffer: &str) -> bool {
    let mut lexer = Lexer::new();
    let (tokens, _) = lexer.tokenize(buffer);
    if tokens.is_empty() {
        // 只有注释或空白, 执行也无副作用
        return true;
    }

    let mut depth: usize = 0;
    for token in &tokens {
        match token.kind {
            TokenKind::Do => depth += 1,
            TokenKind::End => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth == 0 && matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Semicolon))
}

// 按产生顺序呈现一段输入的全部输出
fn render(session: &Session, diag: &Diagnostics) {
    for output in &diag.outputs {
        match output {
            Output::Relation(relation) => {
                print!("{}", TableFormatter::format_relation(relation));
            }
            Output::Notice(message) => println!("{}", message),
            Output::Error(error) => println!("错误: {}", session.format_error(error)),
        }
    }
}

fn print_help() {
    println!("可用命令:");
    println!("  help - 显示帮助信息");
    println!("  exit - 退出程序");
    println!("  list - 列出所有表和过程");
    println!("  clear - 清除当前语句缓冲区");
    println!("CQL语句: (以分号结束)");
    println!("  -- 这是行注释, {{- 这是块注释 -}}");
    println!("  IMPORT TABLE table_name FROM \"file.csv\";");
    println!("  EXPORT TABLE table_name AS \"file.csv\";");
    println!("  DISCARD TABLE table_name;");
    println!("  RENAME TABLE old_name new_name;");
    println!("  PRINT TABLE table_name;");
    println!("  SELECT * FROM table_name WHERE field = value LIMIT n;");
    println!("  CREATE TABLE new_name SELECT ... ;");
    println!("  CREATE TABLE new_name FROM left JOIN right USING (column);");
    println!("  PROCEDURE proc_name DO stmt1; stmt2; END;");
    println!("  CALL proc_name;");
}

fn print_list(session: &Session) {
    let tables = session.tables().names();
    if tables.is_empty() {
        println!("没有表");
    } else {
        println!("表列表:");
        for table in tables {
            println!("  {}", table);
        }
    }
    let procedures = session.procedures().names();
    if !procedures.is_empty() {
        println!("过程列表:");
        for procedure in procedures {
            println!("  {}", procedure);
        }
    }
}
