//! Phonetic primitives: the distinctive feature table and the
//! feature-weighted edit distance built on top of it.

/// Feature matrix, per-phoneme lookups and the phoneme-to-phoneme distance.
pub mod features;

/// Alignment distance between phoneme sequences.
pub mod distance;

pub use distance::{INDEL_COST, pronunciation_distance, strip_vowels};
pub use features::{FEATURE_COUNT, FeatureVector, Phoneme, feature_distance, feature_distance_scalar};
