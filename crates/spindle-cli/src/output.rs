//! Output formatting utilities

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use spindle_sdk::Lp;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;

/// Output data as JSON
pub fn json_output<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message with red X
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Print an informational message with blue info icon
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

#[derive(Tabled)]
struct LpRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Published")]
    published: &'static str,
    #[tabled(rename = "Likes")]
    likes: usize,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Lp> for LpRow {
    fn from(lp: &Lp) -> Self {
        Self {
            id: lp.id,
            title: truncate(&lp.title, 40),
            published: if lp.published { "yes" } else { "no" },
            likes: lp.likes.len(),
            tags: lp
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            updated: format_timestamp(&lp.updated_at),
        }
    }
}

/// Render a list of LPs as a table
pub fn print_lp_table(lps: &[Lp]) {
    let rows: Vec<LpRow> = lps.iter().map(LpRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// Print one LP in full
pub fn print_lp_detail(lp: &Lp) {
    println!("{} {}", style("LP").cyan().bold(), style(lp.id).bold());
    println!("  Title:     {}", lp.title);
    println!("  Published: {}", if lp.published { "yes" } else { "no" });
    println!("  Author:    {}", lp.author_id);
    println!("  Created:   {}", format_timestamp(&lp.created_at));
    println!("  Updated:   {}", format_timestamp(&lp.updated_at));
    if !lp.tags.is_empty() {
        let tags: Vec<&str> = lp.tags.iter().map(|t| t.name.as_str()).collect();
        println!("  Tags:      {}", tags.join(", "));
    }
    println!("  Likes:     {}", lp.likes.len());
    println!();
    println!("{}", lp.content);
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("short", 40), "short");
        let long = "x".repeat(50);
        let cut = truncate(&long, 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with('…'));
    }
}
