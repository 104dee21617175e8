use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const OP_COLUMN_MAX: usize = 60;

static ANSI_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "edit" => Colour::Yellow,
        "status" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `op (target)`, operation colored, cut to `max` visible characters.
fn render_operation(row: &LogRow, max: usize) -> String {
    let plain = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let visible = if plain.chars().count() > max {
        let mut s: String = plain.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&row.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let rows = load_log(&pool.conn)?;
        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);

        let rendered: Vec<(String, usize)> = rows
            .iter()
            .map(|r| {
                let op = render_operation(r, OP_COLUMN_MAX);
                let len = strip_ansi(&op).chars().count();
                (op, len)
            })
            .collect();
        let op_w = rendered.iter().map(|(_, len)| *len).max().unwrap_or(0);

        println!("📜 Internal log:\n");

        for (row, (op, visible_len)) in rows.iter().zip(rendered) {
            let padding = " ".repeat(op_w.saturating_sub(visible_len));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id,
                row.date,
                op,
                padding,
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
