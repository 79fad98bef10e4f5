use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexicon::Pronunciation;

/// A generated word sequence: pronunciations and matching spellings, in order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Twister {
	pub pronunciations: Vec<Pronunciation>,
	pub spellings: Vec<String>,
}

impl Twister {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			pronunciations: Vec::with_capacity(capacity),
			spellings: Vec::with_capacity(capacity),
		}
	}

	pub(crate) fn push(&mut self, pronunciation: Pronunciation, spelling: &str) {
		self.pronunciations.push(pronunciation);
		self.spellings.push(spelling.to_owned());
	}

	pub fn last(&self) -> Option<&Pronunciation> {
		self.pronunciations.last()
	}

	pub fn len(&self) -> usize {
		self.pronunciations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pronunciations.is_empty()
	}
}

/// `spelling spelling ==> pronunciation pronunciation`
impl fmt::Display for Twister {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let pronunciations: Vec<String> = self.pronunciations.iter().map(ToString::to_string).collect();
		write!(f, "{} ==> {}", self.spellings.join(" "), pronunciations.join(" "))
	}
}
