//! Polish command implementation.

use super::{read_batch, write_batch};
use std::path::Path;
use tracing::info;

/// Runs the polish command.
pub fn run(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Polishing {:?}", input);

    let batch = read_batch(input)?;
    let polished = entindex_core::polish(&batch)?;
    write_batch(output, &polished)?;

    println!(
        "Polished {} rows x {} columns -> {}",
        polished.num_rows(),
        polished.num_columns(),
        output.display()
    );
    Ok(())
}
