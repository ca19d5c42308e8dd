//! Resume bookkeeping shared by the harvest and scrape stages

use std::collections::HashSet;

/// Work still to do: every distinct non-empty unit of `total` that is not in
/// `done`, in first-seen order
///
/// For every unit `u` of `total`: `u` is returned exactly once if and only if
/// `u` is not in `done`.
pub fn remaining_work(total: &[String], done: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    total
        .iter()
        .map(|unit| unit.trim())
        .filter(|unit| !unit.is_empty() && !done.contains(*unit))
        .filter(|unit| seen.insert(*unit))
        .map(str::to_string)
        .collect()
}
