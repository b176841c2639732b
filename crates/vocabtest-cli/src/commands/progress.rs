//! The `vocabtest progress` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use vocabtest_core::Category;

use super::Context;

pub fn execute(ctx: &Context, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => print_set(ctx, name),
        None => {
            print_overview(ctx);
            Ok(())
        }
    }
}

fn print_overview(ctx: &Context) {
    let summaries = ctx.store.summarize_all();
    if summaries.is_empty() {
        println!(">> No vocab sets detected!");
        return;
    }

    let mut table = Table::new();
    let mut header = vec!["Set".to_string()];
    header.extend(Category::ALL.iter().map(|c| capitalize(&c.to_string())));
    header.push("Total".to_string());
    table.set_header(header);

    let mut broken = Vec::new();
    for (name, summary) in summaries {
        match summary {
            Ok(summary) => {
                let mut row = vec![Cell::new(&name)];
                row.extend(Category::ALL.iter().map(|c| Cell::new(summary.count(*c))));
                row.push(Cell::new(summary.total()));
                table.add_row(row);
            }
            Err(e) => broken.push((name, e)),
        }
    }

    println!("{table}");
    for (name, e) in broken {
        println!(">> {name}: {e}");
    }
}

fn print_set(ctx: &Context, name: &str) -> Result<()> {
    let set = ctx.store.load_set(name)?;
    let partitions = set.partitions();
    let total = partitions.total();

    println!("Progress for: {name}");
    let mut table = Table::new();
    table.set_header(vec!["Category", "Words", "Members"]);
    for (category, words) in partitions.iter() {
        table.add_row(vec![
            Cell::new(capitalize(&category.to_string())),
            Cell::new(format!("{}/{}", words.len(), total)),
            Cell::new(words.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
