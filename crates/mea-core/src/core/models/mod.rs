//! # Core Models Module
//!
//! Value types shared by every layer of the library.
//!
//! - [`matrix`] - The validated, read-only base-pairing probability matrix
//! - [`structure`] - Base-pair lists, binary pairing matrices and dot-bracket strings
//!
//! ```ignore
//! use meafold::core::models::{matrix::ProbabilityMatrix, structure::Structure};
//!
//! let probabilities = ProbabilityMatrix::from_pairs(8, &[(0, 7, 0.9), (1, 6, 0.8)])?;
//! let structure = Structure::from_dot_bracket("((....))")?;
//! ```

pub mod matrix;
pub mod structure;
