use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    log::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(tidak ada data)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}
