use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TwisterError;

/// How the next word is picked from the chain statistics.
///
/// # Variants
/// - `Normal`: follow the most likely successor (twisty phrases).
/// - `Reverse`: follow the least likely successor (smooth phrases).
/// - `Random`: follow a randomly chosen observed prefix.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TwistMode {
	#[default]
	Normal,
	Reverse,
	Random,
}

impl TwistMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			TwistMode::Normal => "normal",
			TwistMode::Reverse => "reverse",
			TwistMode::Random => "random",
		}
	}
}

impl fmt::Display for TwistMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TwistMode {
	type Err = TwisterError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"normal" => Ok(TwistMode::Normal),
			"reverse" => Ok(TwistMode::Reverse),
			"random" => Ok(TwistMode::Random),
			_ => Err(TwisterError::InvalidMode(s.to_owned())),
		}
	}
}

/// The generation strategies available.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
	Feature,
	Markov,
	Random,
}

impl ModelKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ModelKind::Feature => "feature",
			ModelKind::Markov => "markov",
			ModelKind::Random => "random",
		}
	}
}

impl fmt::Display for ModelKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ModelKind {
	type Err = TwisterError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"feature" => Ok(ModelKind::Feature),
			"markov" => Ok(ModelKind::Markov),
			"random" => Ok(ModelKind::Random),
			_ => Err(TwisterError::InvalidModelKind(s.to_owned())),
		}
	}
}
