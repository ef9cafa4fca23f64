//! # Core Module
//!
//! Fundamental data structures and the expected-accuracy scorer.
//!
//! - **Data Models** ([`models`]) - Probability matrices, base pairs, pairing matrices
//!   and dot-bracket structures
//! - **Scoring** ([`scoring`]) - Expected sensitivity, PPV, MCC and F-score of a structure
//!   against the pairing-probability ensemble

pub mod models;
pub mod scoring;
