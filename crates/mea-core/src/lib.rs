//! # meafold Core Library
//!
//! Maximum expected accuracy (MEA) secondary structure prediction for nucleic acids,
//! driven entirely by a base-pairing probability matrix, together with an
//! expected-accuracy scorer that evaluates any structure against that matrix.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ProbabilityMatrix`,
//!   `PairingMatrix`, `Structure`) and the expected-accuracy scorer.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, progress reporting,
//!   the dense dynamic-programming tables, and the two algorithmic tasks: the interval
//!   fill and the traceback.
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `engine` and `core` together:
//!   prediction, scoring, and batch prediction over many matrices.
//!
//! The library performs no file or process I/O. Probability matrices are produced
//! elsewhere (by a partition-function folding engine) and handed in as values.

pub mod core;
pub mod engine;
pub mod workflows;
