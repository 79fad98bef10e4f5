//! Tongue twister generation and scoring.
//!
//! This crate provides:
//! - A distinctive-feature table for English phonemes and the
//!   feature-weighted edit distance between pronunciations
//! - A generic order-k frequency chain
//! - Three twister generators (feature distance, Markov chain, random)
//! - Sentence "twistiness" scoring with the Markov model
//! - Loading of unilex dictionaries and plain-text corpora
//!
//! Generation never does I/O: dictionaries and corpora are loaded first,
//! then handed to a model constructor.

/// Phoneme features and the pronunciation distance.
pub mod phonetic;

/// Twister models and the generic K-gram chain.
pub mod model;

/// Pronunciation dictionary shared by the models.
pub mod lexicon;

/// Model constants, loadable from JSON.
pub mod config;

/// Error type and result alias.
pub mod error;

/// Dictionary/corpus loading, tokenization and path helpers.
pub mod io;

pub use config::TwisterConfig;
pub use error::{Result, TwisterError};
pub use lexicon::{Lexicon, LexiconEntry, Pronunciation};
pub use model::{Generator, ModelKind, ModelSource, Twister, TwistMode};
