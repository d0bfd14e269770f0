use std::fs;

use cql_db::core::cql::TableFormatter;
use cql_db::core::diag::Output;
use cql_db::core::session::Session;

fn main() {
    // 准备测试数据文件
    let dir = std::env::temp_dir().join("cql_db_test");
    fs::create_dir_all(&dir).expect("无法创建临时目录");

    let users = dir.join("users.csv");
    fs::write(
        &users,
        "id,name,age,city\n\
         1,Alice,25,Lisboa\n\
         2,Bob,30,Porto\n\
         # 这一行是注释\n\
         3,Charlie,35,Lisboa\n\
         4,David,28\n\
         5,Eve,32,Braga\n",
    )
    .expect("无法写入测试数据");

    let orders = dir.join("orders.csv");
    fs::write(
        &orders,
        "order_id,id,amount\n\
         100,1,999\n\
         101,1,29\n\
         102,3,299\n\
         103,9,79\n",
    )
    .expect("无法写入测试数据");

    let exported = dir.join("result.csv");

    let mut session = Session::new();

    // 第一组测试: 基本语句
    println!("\n=== 基本语句测试 ===");
    let basic_tests = vec![
        format!("IMPORT TABLE users FROM \"{}\";", users.display()),
        format!("IMPORT TABLE orders FROM \"{}\";", orders.display()),
        "PRINT TABLE users;".to_string(),
        "SELECT name, city FROM users WHERE age >= 30;".to_string(),
        "SELECT * FROM users LIMIT 2;".to_string(),
        "CREATE TABLE lisboa SELECT name FROM users WHERE city = \"Lisboa\";".to_string(),
        "PRINT TABLE lisboa;".to_string(),
        "CREATE TABLE user_orders FROM users JOIN orders USING (id);".to_string(),
        "PRINT TABLE user_orders;".to_string(),
        "RENAME TABLE lisboa capital;".to_string(),
        format!("EXPORT TABLE capital AS \"{}\";", exported.display()),
        "DISCARD TABLE capital;".to_string(),
    ];

    // 第二组测试: 过程
    println!("\n=== 过程测试 ===");
    let procedure_tests = vec![
        "PROCEDURE resumo DO SELECT name FROM users LIMIT 3; PRINT TABLE orders; END;".to_string(),
        "CALL resumo;".to_string(),
        // 重新声明后只执行最新的过程体
        "PROCEDURE resumo DO SELECT city FROM users WHERE age > 26; END;".to_string(),
        "CALL resumo;".to_string(),
    ];

    // 第三组测试: 错误处理, 会话不会因错误而中止
    println!("\n=== 错误处理测试 ===");
    let error_tests = vec![
        "SELECT * FROM unknown_table;".to_string(),
        "SELECT unknown_field FROM users;".to_string(),
        "CALL unknown_proc;".to_string(),
        "SELEC * FROM users;".to_string(),
        "SELECT name FROM users WHERE city > 10;".to_string(),
        "PROCEDURE boom DO CALL boom; END;".to_string(),
        "CALL boom;".to_string(),
    ];

    for (i, statement) in basic_tests
        .iter()
        .chain(procedure_tests.iter())
        .chain(error_tests.iter())
        .enumerate()
    {
        println!("\n测试 #{}: {}", i + 1, statement);
        let diag = session.execute(statement);
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
}
