//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorKind, FailureStats};

/// Logs the per-kind failure counts of a finished batch.
///
/// Kinds with a zero count are left out; nothing is logged for a clean run.
pub fn print_error_statistics(stats: &FailureStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    info!("Failure Counts ({} total):", total);
    for kind in ErrorKind::iter() {
        let count = stats.get(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}
