pub mod cli;
pub mod core;

pub use crate::core::session::Session;

/// 执行一段CQL文本的统一接口
///
/// # 参数
/// * `source` - 要执行的CQL文本, 可以包含多条语句
///
/// # 返回值
/// * `bool` - 全部语句执行成功返回true, 任何语句失败返回false
pub fn execute_source(source: &str) -> bool {
    let mut session = Session::new();
    let diag = session.execute(source);
    !diag.has_errors()
}
