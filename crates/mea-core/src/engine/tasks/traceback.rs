use crate::core::models::structure::BasePair;
use crate::engine::config::SplitSearch;
use crate::engine::error::EngineError;
use crate::engine::tables::{Branch, DpTables};
use tracing::{instrument, trace};

/// Reconstructs the optimal base-pair set from filled tables, starting at `(0, N-1)`.
///
/// Intervals are visited depth-first with the 5' half of a split before the 3' half, so
/// pairs come out sorted by their 5' index.
#[instrument(
    skip_all,
    name = "mea_traceback_task",
    fields(n = tables.size(), split_search = ?search)
)]
pub fn run(tables: &DpTables, search: SplitSearch) -> Result<Vec<BasePair>, EngineError> {
    let n = tables.size();
    let mut pairs = Vec::new();
    if n == 0 {
        return Ok(pairs);
    }

    let mut stack = vec![(0, n - 1)];
    while let Some((i, j)) = stack.pop() {
        if j <= i {
            continue;
        }
        match tables.branch(i, j) {
            Branch::FivePrimeUnpaired => {
                trace!(i = i, j = j, "5' unpaired");
                stack.push((i + 1, j));
            }
            Branch::ThreePrimeUnpaired => {
                trace!(i = i, j = j, "3' unpaired");
                stack.push((i, j - 1));
            }
            Branch::Pair => {
                trace!(i = i, j = j, "base pair");
                pairs.push((i, j));
                stack.push((i + 1, j - 1));
            }
            Branch::Split => {
                let k = split_point(tables, search, i, j)?;
                trace!(i = i, j = j, k = k, "split");
                stack.push((k + 1, j));
                stack.push((i, k));
            }
        }
    }

    Ok(pairs)
}

fn split_point(
    tables: &DpTables,
    search: SplitSearch,
    i: usize,
    j: usize,
) -> Result<usize, EngineError> {
    let found = match search {
        SplitSearch::Stored => tables.split(i, j),
        SplitSearch::Equality => {
            let target = tables.weight(i, j);
            ((i + 1)..j).find(|&k| target == tables.weight(i, k) + tables.weight(k + 1, j))
        }
    };
    found.ok_or_else(|| EngineError::Traceback {
        i,
        j,
        reason: format!("no split point reproduces W = {}", tables.weight(i, j)),
    })
}
