//! # Workflows Module
//!
//! The public entry points of the library.
//!
//! - **Prediction** ([`predict`]) - The lazily evaluated [`predict::MeaPredictor`] and the
//!   one-shot [`predict::predict`] / [`predict::run`] functions
//! - **Evaluation** ([`evaluate`]) - Expected-accuracy scoring of predicted or external
//!   structures, and predict-then-score in one call
//! - **Batch** ([`batch`]) - Independent predictions over many matrices
//!
//! Every call is a synchronous, deterministic function of its inputs; no state is shared
//! between calls.

pub mod batch;
pub mod evaluate;
pub mod predict;
