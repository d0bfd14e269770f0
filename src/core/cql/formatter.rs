use crate::core::types::Relation;

pub struct TableFormatter;

impl TableFormatter {
    /// 格式化关系输出
    /// 每列宽度取表头与所有单元格中最长者, 内容左对齐, 左右各留1个空格
    /// 每列内容宽度至少为3个字符, 加上两侧空格即每个单元格至少5个字符
    pub fn format_relation(relation: &Relation) -> String {
        let headers = &relation.headers;
        let rows: Vec<Vec<String>> = relation
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        let mut result = String::new();

        // 计算每列的最大宽度
        let mut max_widths: Vec<usize> = vec![0; headers.len()];
        for (i, header) in headers.iter().enumerate() {
            max_widths[i] = max_widths[i].max(header.chars().count());
        }
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < max_widths.len() {
                    max_widths[i] = max_widths[i].max(cell.chars().count());
                }
            }
        }
        for width in &mut max_widths {
            *width = (*width).max(3);
        }

        // 表头
        result.push_str(&Self::format_row(headers, &max_widths));
        result.push('\n');

        // 分隔线
        let mut separator = String::new();
        separator.push('|');
        for width in &max_widths {
            separator.push(' ');
            separator.push_str(&"-".repeat(*width));
            separator.push(' ');
            separator.push('|');
        }
        result.push_str(&separator);
        result.push('\n');

        // 数据行
        for row in &rows {
            result.push_str(&Self::format_row(row, &max_widths));
            result.push('\n');
        }

        result
    }

    // 格式化单行数据
    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::new();
        line.push('|');
        for (i, cell) in cells.iter().enumerate() {
            if i < widths.len() {
                let padding = widths[i] - cell.chars().count();
                line.push(' ');
                line.push_str(cell);
                line.push_str(&" ".repeat(padding + 1));
                line.push('|');
            }
        }
        line
    }
}
