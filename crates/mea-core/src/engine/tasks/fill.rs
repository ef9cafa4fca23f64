use crate::core::models::matrix::ProbabilityMatrix;
use crate::engine::config::{HairpinRule, MeaConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tables::{Branch, DpTables};
use tracing::{debug, instrument};

/// Fills the weight and traceback tables for every interval `[i, j]` with
/// `j - i >= min_hairpin_span`, in order of increasing interval length.
///
/// Each interval depends only on strictly shorter ones, so a single pass by length
/// visits every cell exactly once. The caller is expected to have validated `config`.
#[instrument(
    skip_all,
    name = "mea_fill_task",
    fields(n = matrix.size(), gamma = config.gamma)
)]
pub fn run(
    matrix: &ProbabilityMatrix,
    config: &MeaConfig,
    reporter: &ProgressReporter,
) -> DpTables {
    let n = matrix.size();
    let span = config.min_hairpin_span;
    let mut tables = DpTables::new(n);

    if n <= span {
        debug!(
            "Sequence length {} does not exceed the minimum hairpin span {}; nothing to fill.",
            n, span
        );
        return tables;
    }

    reporter.report(Progress::TaskStart {
        total_steps: (n - span) as u64,
    });
    for length in span..n {
        for i in 0..(n - length) {
            fill_cell(&mut tables, matrix, config, i, i + length);
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    debug!(
        "Filled {} intervals; optimal weight W[0, {}] = {:.6}",
        (n - span) * (n - span + 1) / 2,
        n - 1,
        tables.optimal_weight()
    );
    tables
}

fn fill_cell(
    tables: &mut DpTables,
    matrix: &ProbabilityMatrix,
    config: &MeaConfig,
    i: usize,
    j: usize,
) {
    let five_prime = tables.weight(i + 1, j);
    let three_prime = tables.weight(i, j - 1);
    let pair = pair_weight(tables, matrix, config, i, j);
    let (split, split_at) = best_split(tables, i, j);

    // Sequential first-wins comparison keeps the fixed tie-break precedence.
    let mut best = five_prime;
    let mut branch = Branch::FivePrimeUnpaired;
    if three_prime > best {
        best = three_prime;
        branch = Branch::ThreePrimeUnpaired;
    }
    if pair > best {
        best = pair;
        branch = Branch::Pair;
    }
    if split > best {
        best = split;
        branch = Branch::Split;
    }

    let split_at = match branch {
        Branch::Split => split_at,
        _ => None,
    };
    tables.set(i, j, best, branch, split_at);
}

fn pair_weight(
    tables: &DpTables,
    matrix: &ProbabilityMatrix,
    config: &MeaConfig,
    i: usize,
    j: usize,
) -> f64 {
    if config.hairpin_rule == HairpinRule::Strict && j - i - 1 < config.min_hairpin_span {
        return f64::NEG_INFINITY;
    }
    // For j == i + 1 the inner interval is empty and reads a zero lower-triangle cell.
    (config.gamma + 1.0) * matrix.get(i, j) + tables.weight(i + 1, j - 1) - 1.0
}

/// Best bifurcation `max_k W[i,k] + W[k+1,j]` over `i < k < j`, with the first
/// maximizing `k`. Returns negative infinity when the range is empty.
fn best_split(tables: &DpTables, i: usize, j: usize) -> (f64, Option<usize>) {
    let mut best = f64::NEG_INFINITY;
    let mut best_k = None;
    for k in (i + 1)..j {
        let candidate = tables.weight(i, k) + tables.weight(k + 1, j);
        if candidate > best {
            best = candidate;
            best_k = Some(k);
        }
    }
    (best, best_k)
}
