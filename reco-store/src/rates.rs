use reco_core::RateTable;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

use crate::{StoreError, StoreResult};

/// Load the latest rate snapshot from a CSV file.
///
/// A missing or unreadable file is an error. A degenerate file yields
/// `Ok(None)`; callers then convert with the default rate.
pub fn load_rates(path: &Path) -> StoreResult<Option<RateTable>> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    match RateTable::from_reader(BufReader::new(file))? {
        Some(table) => {
            info!(
                "Loaded {} rates effective {} from {}",
                table.rates.len(),
                table.effective_date(),
                path.display()
            );
            Ok(Some(table))
        }
        None => {
            warn!("Rate snapshot {} is empty or degenerate", path.display());
            Ok(None)
        }
    }
}
