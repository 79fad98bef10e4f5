use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunable constants of the models.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "max_spelling_len": 6 }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TwisterConfig {
	/// Feature model: words must have strictly fewer spelling characters.
	pub max_spelling_len: usize,

	/// Markov model: words must have strictly fewer syllables.
	pub max_syllables: usize,

	/// Order `k` of both Markov chains.
	pub chain_order: usize,

	/// The character likelihood is divided by this before being added to
	/// the syllable likelihood.
	pub character_divisor: f64,
}

impl Default for TwisterConfig {
	fn default() -> Self {
		Self {
			max_spelling_len: 8,
			max_syllables: 3,
			chain_order: 2,
			character_divisor: 10.0,
		}
	}
}

impl TwisterConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a JSON configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let contents = std::fs::read_to_string(path)?;
		Self::from_json(&contents)
	}
}
