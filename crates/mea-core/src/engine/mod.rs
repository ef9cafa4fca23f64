//! # Engine Module
//!
//! The computational core of MEA prediction: a dynamic program over every subsequence
//! interval of the probability matrix, followed by a traceback through the recorded
//! decisions.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The trade-off parameter γ, the minimum hairpin span,
//!   the hairpin rule and the split-search strategy
//! - **Tables** ([`tables`]) - Dense weight, traceback and split-point tables
//! - **Progress Monitoring** ([`progress`]) - Optional progress callbacks for long fills
//! - **Error Handling** ([`error`]) - The umbrella error type returned by every workflow
//!
//! The fill costs O(N³) time and O(N²) space. There is no internal cancellation; callers
//! with latency bounds should cap sequence length before invoking a prediction.

pub mod config;
pub mod error;
pub mod progress;
pub mod tables;
pub(crate) mod tasks;
