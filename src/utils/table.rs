//! Table rendering for CLI listings.
//! Widths are measured in terminal columns so accented or CJK names line up.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    /// Wrap cells wider than this many columns (None = never wrap).
    pub max_width: Option<usize>,
}

impl Column {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            max_width: None,
        }
    }

    pub fn wrapped(header: &str, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            max_width: Some(max_width),
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn cell_lines(&self, col: usize, value: &str) -> Vec<String> {
        match self.columns.get(col).and_then(|c| c.max_width) {
            Some(w) if value.width() > w => textwrap::wrap(value, w)
                .into_iter()
                .map(|l| l.into_owned())
                .collect(),
            _ => vec![value.to_string()],
        }
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cells = self.rows.iter().filter_map(|r| r.get(i)).flat_map(|v| {
                    self.cell_lines(i, v)
                        .into_iter()
                        .map(|l| l.width())
                        .collect::<Vec<_>>()
                });
                cells.chain(std::iter::once(col.header.width())).max().unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        push_line(&mut out, &header, &widths);

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);

        for row in &self.rows {
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .enumerate()
                .map(|(i, v)| self.cell_lines(i, v))
                .collect();
            let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

            for line_no in 0..height {
                let line: Vec<String> = wrapped
                    .iter()
                    .map(|cell| cell.get(line_no).cloned().unwrap_or_default())
                    .collect();
                push_line(&mut out, &line, &widths);
            }
        }

        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width()) + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_display_width() {
        let mut t = Table::new(vec![Column::new("Person"), Column::new("Status")]);
        t.add_row(vec!["Zoë".into(), "Pending".into()]);
        t.add_row(vec!["Bob".into(), "Compensated".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Person  Status");
        assert_eq!(lines[2], "Zoë     Pending");
        assert_eq!(lines[3], "Bob     Compensated");
    }

    #[test]
    fn wraps_long_cells() {
        let mut t = Table::new(vec![Column::new("Id"), Column::wrapped("Description", 10)]);
        t.add_row(vec!["1".into(), "deploy the new billing service".into()]);

        let out = t.render();
        assert!(out.lines().count() > 3);
        assert!(out.lines().all(|l| l.width() <= 15));
    }
}
