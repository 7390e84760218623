//! Inspect command implementation.

use super::read_batch;
use entindex_core::{Batch, Value, DEFAULT_INDEX_PREFIX};
use serde::Serialize;
use std::path::Path;

/// Batch inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// File path.
    pub path: String,
    /// Number of rows.
    pub row_count: usize,
    /// Per-column statistics.
    pub columns: Vec<ColumnStats>,
    /// First rows of the batch.
    pub preview: Batch,
}

/// Statistics for a single column.
#[derive(Debug, Serialize)]
pub struct ColumnStats {
    /// Column name.
    pub name: String,
    /// Number of null values.
    pub null_count: usize,
    /// Whether the column is an index column.
    pub is_index: bool,
}

/// Runs the inspect command.
pub fn run(path: &Path, rows: usize, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let batch = read_batch(path)?;
    let result = inspect(path, &batch, rows);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => print_text_output(&result),
    }

    Ok(())
}

fn inspect(path: &Path, batch: &Batch, rows: usize) -> InspectResult {
    let columns = batch
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnStats {
            name: name.clone(),
            null_count: batch.rows().iter().filter(|r| r[i].is_null()).count(),
            is_index: name.starts_with(DEFAULT_INDEX_PREFIX),
        })
        .collect();

    InspectResult {
        path: path.display().to_string(),
        row_count: batch.num_rows(),
        columns,
        preview: batch.head(rows),
    }
}

fn print_text_output(result: &InspectResult) {
    println!("entindex Batch Inspection");
    println!("=========================");
    println!();
    println!("Path: {}", result.path);
    println!("Rows: {}", result.row_count);
    println!();
    println!("Columns:");
    for col in &result.columns {
        let marker = if col.is_index { " [index]" } else { "" };
        println!("  {}{} ({} nulls)", col.name, marker, col.null_count);
    }

    if !result.preview.is_empty() {
        println!();
        println!("Preview:");
        println!("  {}", result.preview.columns().join(" | "));
        for row in result.preview.rows() {
            let cells: Vec<String> = row.iter().map(Value::to_string).collect();
            println!("  {}", cells.join(" | "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nulls_and_index_columns() {
        let batch = Batch::new(
            ["code", "index__code"],
            vec![
                vec!["a".into(), Value::Integer(1)],
                vec!["b".into(), Value::Null],
                vec!["c".into(), Value::Null],
            ],
        )
        .unwrap();

        let result = inspect(Path::new("orders.json"), &batch, 2);

        assert_eq!(result.row_count, 3);
        assert_eq!(result.preview.num_rows(), 2);
        assert!(!result.columns[0].is_index);
        assert!(result.columns[1].is_index);
        assert_eq!(result.columns[1].null_count, 2);
    }
}
