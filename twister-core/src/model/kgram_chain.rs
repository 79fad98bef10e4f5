use std::collections::{BTreeMap, VecDeque};
use std::hash::Hash;

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::{Result, TwisterError};

/// One element of a training stream.
///
/// `Break` marks a hole in the stream (a corpus word missing from the
/// lexicon): the chain forgets its context instead of linking the symbols
/// on both sides of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<S> {
	Symbol(S),
	Break,
}

/// Order-k empirical Markov chain over a stream of symbols.
///
/// Each prefix of `k - 1` consecutive symbols maps to a [`State`] counting
/// the symbols observed right after it.
///
/// # Responsibilities
/// - Slide a `k - 1` context window over the training stream
/// - Accumulate successor counts per prefix
/// - Answer most/least likely successor and likelihood queries
///
/// # Invariants
/// - `k` is always >= 2
/// - Every key in `states` has exactly `k - 1` symbols
/// - Counts only grow; nothing is ever removed
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(
	serialize = "S: Serialize",
	deserialize = "S: Deserialize<'de> + Ord + Hash"
))]
pub struct KgramChain<S> {
	/// The order of the chain (context length + 1)
	k: usize,

	/// Mapping from a prefix (length k-1) to its successor counts
	states: BTreeMap<Vec<S>, State<S>>,

	/// Sliding context window, only meaningful while training
	#[serde(skip)]
	window: VecDeque<S>,
}

impl<S: Eq + Hash + Ord + Clone> KgramChain<S> {
	/// Creates an empty chain of order `k`.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `k < 2`.
	pub fn new(k: usize) -> Result<Self> {
		if k < 2 {
			return Err(TwisterError::InvalidOrder(k));
		}
		Ok(Self {
			k,
			states: BTreeMap::new(),
			window: VecDeque::with_capacity(k - 1),
		})
	}

	/// The order `k` of the chain.
	pub fn order(&self) -> usize {
		self.k
	}

	/// Number of distinct prefixes observed.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Feeds one token of the training stream.
	///
	/// - `Break` clears the context window and records nothing.
	/// - A symbol arriving on a full window is counted as a successor of the
	///   window content, then the window slides.
	/// - A symbol arriving on a partial window is only appended.
	pub fn insert(&mut self, token: Token<S>) {
		let symbol = match token {
			Token::Break => {
				self.window.clear();
				return;
			}
			Token::Symbol(symbol) => symbol,
		};

		if self.window.len() == self.k - 1 {
			let prefix: Vec<S> = self.window.iter().cloned().collect();
			self.states.entry(prefix).or_default().add_transition(symbol.clone());
			self.window.pop_front();
		}
		self.window.push_back(symbol);
	}

	/// Feeds a whole stream, in order.
	pub fn extend<I>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = Token<S>>,
	{
		for token in tokens {
			self.insert(token);
		}
	}

	/// Returns the state for the last `k - 1` symbols of `prefix`.
	///
	/// `None` if `prefix` is too short or was never observed.
	fn state_for(&self, prefix: &[S]) -> Option<&State<S>> {
		if prefix.len() + 1 < self.k {
			return None;
		}
		self.states.get(&prefix[prefix.len() + 1 - self.k..])
	}

	/// Most frequent successor of `prefix`, ties resolved to the smallest symbol.
	pub fn most_likely_successor(&self, prefix: &[S]) -> Option<&S> {
		self.state_for(prefix)?.most_likely()
	}

	/// Least frequent successor of `prefix`, ties resolved to the smallest symbol.
	pub fn least_likely_successor(&self, prefix: &[S]) -> Option<&S> {
		self.state_for(prefix)?.least_likely()
	}

	/// Uniformly chosen observed prefix.
	///
	/// Returns `None` if the chain has never recorded a transition.
	pub fn random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[S]> {
		self.states.keys().choose(rng).map(Vec::as_slice)
	}

	/// Observed probability of `symbol` following `prefix`.
	///
	/// `None` means "unknown prefix", which is different from a zero
	/// probability on a known prefix.
	pub fn likelihood(&self, prefix: &[S], symbol: &S) -> Option<f64> {
		self.state_for(prefix)?.likelihood(symbol)
	}
}
