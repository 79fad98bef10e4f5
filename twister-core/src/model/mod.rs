//! Top-level module for the twister models.
//!
//! This module provides:
//! - The generic K-gram frequency chain (`KgramChain`) and its states
//! - The feature-distance model (`FeatureModel`)
//! - The Markov-chain model (`MarkovModel`)
//! - The uniform random baseline (`RandomModel`)
//! - A tagged variant over the three (`Generator`)

/// Single interface over the three strategies, plus model loading.
pub mod generator;

/// Greedy generation driven by the phonetic edit distance.
pub mod feature_model;

/// Greedy generation and sentence scoring driven by two K-gram chains
/// (syllables and phonemes). Supports snapshots.
pub mod markov_model;

/// Uniform sampling baseline.
pub mod random_model;

/// Order-k frequency chain with break-aware training.
pub mod kgram_chain;

/// Successor counts of a single chain prefix.
///
/// Not exposed publicly.
mod state;

/// Twist modes and model kinds.
pub mod mode;

/// Generated word sequences.
pub mod twister;

pub use feature_model::FeatureModel;
pub use generator::{Generator, ModelSource};
pub use kgram_chain::{KgramChain, Token};
pub use markov_model::MarkovModel;
pub use mode::{ModelKind, TwistMode};
pub use random_model::RandomModel;
pub use twister::Twister;
