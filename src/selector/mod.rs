//! Best-candidate selection.

use std::net::IpAddr;

use crate::probe::ProbeResult;

/// A candidate address together with its probe outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub ip: IpAddr,
    pub result: ProbeResult,
}

/// Returns the index of the best candidate, or `None` for an empty slice.
///
/// A candidate beats the current best if its success rate is strictly higher,
/// or if the rates are equal and its latency is strictly lower. Full ties keep
/// the earlier candidate, so the choice only depends on input order.
pub fn select_best(candidates: &[Candidate]) -> Option<usize> {
    let first = candidates.first()?;
    let mut best = 0;
    let mut best_result = first.result;

    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        let result = candidate.result;
        let better_rate = result.success_rate > best_result.success_rate;
        #[allow(clippy::float_cmp)]
        let faster_at_same_rate =
            result.success_rate == best_result.success_rate && result.latency < best_result.latency;
        if better_rate || faster_at_same_rate {
            best = index;
            best_result = result;
        }
    }

    Some(best)
}
