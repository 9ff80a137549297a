//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Logs how many domains of the batch have finished so far.
///
/// # Arguments
///
/// * `start_time` - When the batch started
/// * `completed` - Domains finished, successful or not
/// * `failed` - Domains that failed
/// * `total` - Domains in the batch
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, failed: &AtomicUsize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = completed.load(Ordering::SeqCst);
    let failed = failed.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Resolved {}/{} domains ({} failed) in {:.2} seconds (~{:.2} domains/sec)",
        completed, total, failed, elapsed_secs, rate
    );
}
