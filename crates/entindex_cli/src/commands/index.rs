//! Index command implementation.

use super::{read_batch, write_batch};
use entindex_core::{EntityIndexer, EntityKind, IndexSpec, IndexStats, IndexerConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of the index command.
#[derive(Debug, Clone)]
pub struct IndexArgs {
    /// Batch to index.
    pub input: PathBuf,
    /// Entity kind name.
    pub kind: String,
    /// Key columns, in order.
    pub keys: Vec<String>,
    /// Prior mapping file.
    pub mapping: Option<PathBuf>,
    /// Whether unseen keys may receive new indices.
    pub allow_new: bool,
    /// First index for an empty mapping.
    pub floor: Option<i64>,
    /// Output path of the mapping.
    pub mapping_out: Option<PathBuf>,
    /// Output path of the focal view.
    pub focal_out: Option<PathBuf>,
    /// Output path of the indexed view.
    pub indexed_out: Option<PathBuf>,
    /// Output path of the filtered view.
    pub filtered_out: Option<PathBuf>,
}

/// Summary of one index run.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    /// Entity kind.
    pub kind: String,
    /// Index column added to the views.
    pub output_column: String,
    /// Call counters.
    pub stats: IndexStats,
    /// Newly minted pairs, keys rendered with a printable delimiter.
    pub minted: Vec<MintedKey>,
    /// Files written.
    pub written: Vec<String>,
}

/// One minted `(key, index)` pair.
#[derive(Debug, Serialize)]
pub struct MintedKey {
    /// Display form of the canonical key.
    pub key: String,
    /// Assigned index.
    pub index: i64,
}

/// Runs the index command.
pub fn run(args: &IndexArgs) -> Result<IndexReport, Box<dyn std::error::Error>> {
    info!("Indexing {:?} as {}", args.input, args.kind);

    let base = read_batch(&args.input)?;
    let prior = match &args.mapping {
        Some(path) => {
            info!("Extending mapping {:?}", path);
            Some(read_batch(path)?)
        }
        None => None,
    };

    let mut config = IndexerConfig::default();
    if let Some(floor) = args.floor {
        config = config.index_floor(floor);
    }

    let mut indexer = EntityIndexer::with_config(base, config);
    let mut spec = IndexSpec::new(EntityKind::from(args.kind.as_str()), args.keys.clone())
        .allow_new(args.allow_new);
    spec.existing_mapping = prior;
    let outcome = indexer.index(spec)?;

    let mut written = Vec::new();
    let outputs = [
        (&args.mapping_out, &outcome.mapping_batch),
        (&args.focal_out, indexer.focal()),
        (&args.indexed_out, indexer.indexed()),
        (&args.filtered_out, indexer.filtered_indexed()),
    ];
    for (path, batch) in outputs {
        if let Some(path) = path {
            write(path, batch, &mut written)?;
        }
    }

    let normalizer = indexer.normalizer();
    let minted = outcome
        .minted
        .iter()
        .map(|(key, index)| MintedKey {
            key: normalizer.display_key(key),
            index: *index,
        })
        .collect();

    info!(
        "Indexed {} rows: {} matched, {} minted",
        outcome.stats.rows, outcome.stats.matched_rows, outcome.stats.minted_keys
    );

    Ok(IndexReport {
        kind: outcome.kind.to_string(),
        output_column: outcome.output_column,
        stats: outcome.stats,
        minted,
        written,
    })
}

fn write(
    path: &Path,
    batch: &entindex_core::Batch,
    written: &mut Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    write_batch(path, batch)?;
    written.push(path.display().to_string());
    Ok(())
}

/// Prints a report in the requested format.
pub fn print_report(report: &IndexReport, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        _ => print_text_output(report),
    }
    Ok(())
}

fn print_text_output(report: &IndexReport) {
    let stats = &report.stats;

    println!("entindex: {}", report.kind);
    println!("==========================");
    println!();
    println!("Column: {}", report.output_column);
    println!();
    println!("Rows:");
    println!("  Total:     {}", stats.rows);
    println!(
        "  Matched:   {} ({:.1}%)",
        stats.matched_rows,
        stats.match_ratio() * 100.0
    );
    println!("  Unmatched: {}", stats.unmatched_rows);
    println!();
    println!("Keys:");
    println!("  Distinct: {}", stats.distinct_keys);
    println!("  Reused:   {}", stats.reused_keys);
    println!("  Minted:   {}", stats.minted_keys);
    println!("  Excluded: {}", stats.excluded_keys);
    println!("  Mapping:  {}", stats.mapping_size);

    if !report.minted.is_empty() {
        println!();
        println!("Minted:");
        for minted in &report.minted {
            println!("  [{}] {}", minted.index, minted.key);
        }
    }

    if !report.written.is_empty() {
        println!();
        println!("Written:");
        for path in &report.written {
            println!("  {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entindex_core::{Batch, Value};
    use tempfile::TempDir;

    fn orders(dir: &Path) -> PathBuf {
        let path = dir.join("orders.json");
        let batch = Batch::new(
            ["zsource", "customer_code"],
            vec![
                vec!["erp".into(), "0007".into()],
                vec!["erp".into(), "12".into()],
            ],
        )
        .unwrap();
        write_batch(&path, &batch).unwrap();
        path
    }

    fn args(dir: &Path) -> IndexArgs {
        IndexArgs {
            input: orders(dir),
            kind: "customer".into(),
            keys: vec!["zsource".into(), "customer_code".into()],
            mapping: None,
            allow_new: true,
            floor: None,
            mapping_out: Some(dir.join("mapping.json")),
            focal_out: Some(dir.join("focal.json")),
            indexed_out: None,
            filtered_out: Some(dir.join("filtered.json")),
        }
    }

    #[test]
    fn writes_mapping_and_views() {
        let dir = TempDir::new().unwrap();
        let report = run(&args(dir.path())).unwrap();

        assert_eq!(report.output_column, "index__zsource_customer_code");
        assert_eq!(report.stats.minted_keys, 2);
        assert_eq!(report.minted[0].key, "erp|7");
        assert_eq!(report.written.len(), 3);

        let mapping = read_batch(&dir.path().join("mapping.json")).unwrap();
        assert_eq!(mapping.columns(), ["customer", "customer_index"]);
        assert_eq!(mapping.num_rows(), 2);

        let focal = read_batch(&dir.path().join("focal.json")).unwrap();
        assert_eq!(
            focal.value(1, "index__zsource_customer_code"),
            Some(&Value::Integer(2))
        );
    }

    #[test]
    fn closed_run_against_stored_mapping() {
        let dir = TempDir::new().unwrap();
        run(&args(dir.path())).unwrap();

        let stored = dir.path().join("mapping.json");
        let extra = dir.path().join("more.json");
        let batch = Batch::new(
            ["zsource", "customer_code"],
            vec![
                vec!["ERP".into(), "7".into()],
                vec!["erp".into(), "99".into()],
            ],
        )
        .unwrap();
        write_batch(&extra, &batch).unwrap();

        let mut closed = args(dir.path());
        closed.input = extra;
        closed.mapping = Some(stored);
        closed.allow_new = false;
        closed.filtered_out = Some(dir.path().join("closed_filtered.json"));

        let report = run(&closed).unwrap();
        assert_eq!(report.stats.matched_rows, 1);
        assert_eq!(report.stats.excluded_keys, 1);

        let filtered = read_batch(&dir.path().join("closed_filtered.json")).unwrap();
        assert_eq!(filtered.num_rows(), 1);
        assert_eq!(
            filtered.value(0, "index__zsource_customer_code"),
            Some(&Value::Integer(1))
        );
    }

    #[test]
    fn floor_override() {
        let dir = TempDir::new().unwrap();
        let mut custom = args(dir.path());
        custom.floor = Some(1000);
        let report = run(&custom).unwrap();
        assert_eq!(report.minted[0].index, 1000);
    }

    #[test]
    fn missing_key_column_fails() {
        let dir = TempDir::new().unwrap();
        let mut bad = args(dir.path());
        bad.keys = vec!["plant_code".into()];
        assert!(run(&bad).is_err());
    }
}
