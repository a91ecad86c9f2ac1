//! Tab classification: a pure cascade over rules, scores and staleness.

mod classifier;
mod config;
mod scoring;

pub use classifier::{Basis, Classification, ClassificationContext, Classifier};
pub use config::ClassifierConfig;
pub use scoring::{compute_scores, decide, CategoryScores, ScoringInput};
