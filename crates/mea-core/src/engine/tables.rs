use nalgebra::DMatrix;

/// The recurrence branch that attained the maximum for an interval, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Branch {
    /// The 5' position `i` is left unpaired.
    #[default]
    FivePrimeUnpaired = 0,
    /// The 3' position `j` is left unpaired.
    ThreePrimeUnpaired = 1,
    /// `i` pairs with `j`.
    Pair = 2,
    /// The interval splits into `[i, k]` and `[k + 1, j]`.
    Split = 3,
}

impl Branch {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Dense DP state for one prediction: the weight table `W`, the traceback table and the
/// split point recorded for every interval whose best branch is [`Branch::Split`].
///
/// Only the upper triangle is ever written. Cells for intervals shorter than the minimum
/// hairpin span keep their initial weight of zero and the default branch.
#[derive(Debug, Clone, PartialEq)]
pub struct DpTables {
    weights: DMatrix<f64>,
    branches: DMatrix<Branch>,
    splits: DMatrix<Option<usize>>,
}

impl DpTables {
    pub fn new(n: usize) -> Self {
        Self {
            weights: DMatrix::zeros(n, n),
            branches: DMatrix::from_element(n, n, Branch::default()),
            splits: DMatrix::from_element(n, n, None),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[(i, j)]
    }

    #[inline]
    pub fn branch(&self, i: usize, j: usize) -> Branch {
        self.branches[(i, j)]
    }

    #[inline]
    pub fn split(&self, i: usize, j: usize) -> Option<usize> {
        self.splits[(i, j)]
    }

    pub(crate) fn set(
        &mut self,
        i: usize,
        j: usize,
        weight: f64,
        branch: Branch,
        split: Option<usize>,
    ) {
        self.weights[(i, j)] = weight;
        self.branches[(i, j)] = branch;
        self.splits[(i, j)] = split;
    }

    /// `W[0, N-1]`, the best expected-accuracy score over the whole sequence.
    pub fn optimal_weight(&self) -> f64 {
        match self.size() {
            0 => 0.0,
            n => self.weights[(0, n - 1)],
        }
    }

    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    /// The traceback table as integer codes in `{0, 1, 2, 3}`.
    pub fn branch_codes(&self) -> DMatrix<u8> {
        self.branches.map(Branch::code)
    }
}
