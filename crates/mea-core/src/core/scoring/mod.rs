//! # Scoring Module
//!
//! Expected-accuracy statistics of a predicted structure, computed with probabilistic
//! confusion-matrix counts drawn from the base-pairing probability matrix rather than
//! from a single reference structure.
//!
//! The main entry point is [`accuracy::AccuracyScorer`]:
//!
//! ```ignore
//! use meafold::core::scoring::accuracy::AccuracyScorer;
//!
//! let stats = AccuracyScorer::new(&probabilities).score(structure.pairing_matrix())?;
//! println!("MCC = {:.3}", stats.mcc);
//! ```

pub mod accuracy;
