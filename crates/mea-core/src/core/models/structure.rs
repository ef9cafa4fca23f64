use nalgebra::DMatrix;
use std::fmt;
use thiserror::Error;

/// An ordered index pair `(i, j)` with `i < j`.
pub type BasePair = (usize, usize);

#[derive(Debug, Error, PartialEq)]
pub enum StructureError {
    #[error("Invalid character '{character}' at position {position} in dot-bracket string")]
    InvalidCharacter { character: char, position: usize },

    #[error("Unbalanced dot-bracket: unmatched '(' at position {0}")]
    UnmatchedOpen(usize),

    #[error("Unbalanced dot-bracket: unmatched ')' at position {0}")]
    UnmatchedClose(usize),

    #[error("Base pair ({i}, {j}) is out of bounds for a sequence of length {length}")]
    PairOutOfBounds { i: usize, j: usize, length: usize },

    #[error("Base pair ({i}, {j}) is not ordered as i < j")]
    UnorderedPair { i: usize, j: usize },

    #[error("Position {0} participates in more than one base pair")]
    ConflictingPair(usize),

    #[error("Pairing matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Pairing matrix entry ({i}, {j}) = {value} is not 0 or 1")]
    NonBinary { i: usize, j: usize, value: f64 },

    #[error("Pairing matrix is not symmetric at ({i}, {j})")]
    Asymmetric { i: usize, j: usize },
}

/// A binary, symmetric N×N matrix with a 1 at `(i, j)` and `(j, i)` for every base pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingMatrix {
    data: DMatrix<f64>,
}

impl PairingMatrix {
    /// Validates an externally supplied pairing matrix.
    pub fn new(data: DMatrix<f64>) -> Result<Self, StructureError> {
        let (rows, cols) = data.shape();
        if rows != cols {
            return Err(StructureError::NotSquare { rows, cols });
        }
        for i in 0..rows {
            for j in 0..cols {
                let value = data[(i, j)];
                if value != 0.0 && value != 1.0 {
                    return Err(StructureError::NonBinary { i, j, value });
                }
                if i == j && value != 0.0 {
                    return Err(StructureError::ConflictingPair(i));
                }
                if value != data[(j, i)] {
                    return Err(StructureError::Asymmetric { i, j });
                }
            }
        }
        let matrix = Self { data };
        if let Some(index) = (0..rows).find(|&i| matrix.partner_count(i) > 1) {
            return Err(StructureError::ConflictingPair(index));
        }
        Ok(matrix)
    }

    pub fn from_pairs(length: usize, pairs: &[BasePair]) -> Result<Self, StructureError> {
        check_pairs(length, pairs)?;
        Ok(Self::from_checked_pairs(length, pairs))
    }

    fn from_checked_pairs(length: usize, pairs: &[BasePair]) -> Self {
        let mut data = DMatrix::zeros(length, length);
        for &(i, j) in pairs {
            data[(i, j)] = 1.0;
            data[(j, i)] = 1.0;
        }
        Self { data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[(i, j)]
    }

    #[inline]
    pub fn is_paired(&self, i: usize, j: usize) -> bool {
        self.data[(i, j)] != 0.0
    }

    /// Row sum at `index`: 1 if the position is paired, 0 otherwise.
    pub fn partner_count(&self, index: usize) -> usize {
        self.data.row(index).iter().filter(|&&v| v != 0.0).count()
    }

    /// Base pairs sorted by their 5' index.
    pub fn pairs(&self) -> Vec<BasePair> {
        let n = self.size();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.is_paired(i, j))
            .collect()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}

/// A secondary structure in its three equivalent views: the base-pair list, the binary
/// pairing matrix and the dot-bracket string. All three are built together and agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pairs: Vec<BasePair>,
    pairing_matrix: PairingMatrix,
    dot_bracket: String,
}

impl Structure {
    /// Builds a structure from a pair list, keeping the list's order.
    pub fn from_pairs(length: usize, pairs: Vec<BasePair>) -> Result<Self, StructureError> {
        check_pairs(length, &pairs)?;

        let mut symbols = vec!['.'; length];
        for &(i, j) in &pairs {
            symbols[i] = '(';
            symbols[j] = ')';
        }

        Ok(Self {
            pairing_matrix: PairingMatrix::from_checked_pairs(length, &pairs),
            dot_bracket: symbols.into_iter().collect(),
            pairs,
        })
    }

    /// The all-unpaired structure of the given length.
    pub fn unpaired(length: usize) -> Self {
        Self {
            pairs: Vec::new(),
            pairing_matrix: PairingMatrix::from_checked_pairs(length, &[]),
            dot_bracket: ".".repeat(length),
        }
    }

    /// Decodes a dot-bracket string by matching each ')' with the nearest open '('.
    /// The resulting pair list is sorted by 5' index.
    pub fn from_dot_bracket(dot_bracket: &str) -> Result<Self, StructureError> {
        let mut open = Vec::new();
        let mut pairs = Vec::new();
        let mut length = 0;

        for (position, character) in dot_bracket.chars().enumerate() {
            match character {
                '(' => open.push(position),
                ')' => {
                    let i = open
                        .pop()
                        .ok_or(StructureError::UnmatchedClose(position))?;
                    pairs.push((i, position));
                }
                '.' => {}
                _ => {
                    return Err(StructureError::InvalidCharacter {
                        character,
                        position,
                    });
                }
            }
            length = position + 1;
        }

        if let Some(&position) = open.last() {
            return Err(StructureError::UnmatchedOpen(position));
        }

        pairs.sort_unstable();
        Self::from_pairs(length, pairs)
    }

    pub fn pairs(&self) -> &[BasePair] {
        &self.pairs
    }

    pub fn pairing_matrix(&self) -> &PairingMatrix {
        &self.pairing_matrix
    }

    pub fn dot_bracket(&self) -> &str {
        &self.dot_bracket
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.pairing_matrix.size()
    }

    #[inline]
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dot_bracket)
    }
}

fn check_pairs(length: usize, pairs: &[BasePair]) -> Result<(), StructureError> {
    let mut used = vec![false; length];
    for &(i, j) in pairs {
        if i >= j {
            return Err(StructureError::UnorderedPair { i, j });
        }
        if j >= length {
            return Err(StructureError::PairOutOfBounds { i, j, length });
        }
        for index in [i, j] {
            if used[index] {
                return Err(StructureError::ConflictingPair(index));
            }
            used[index] = true;
        }
    }
    Ok(())
}
