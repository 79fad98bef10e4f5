use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Represents a state in a K-gram chain.
///
/// A `State` belongs to one prefix key of the chain and stores every
/// successor observed right after that prefix, with its occurrence count.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - `total` is the sum of all occurrence counts
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(
	serialize = "S: Serialize",
	deserialize = "S: Deserialize<'de> + Eq + Hash"
))]
pub struct State<S> {
	/// Outgoing transitions indexed by the successor symbol.
	/// Example: { "tə" => 42, "bɪ" => 3 }
	transitions: HashMap<S, usize>,
	/// Number of observations across all transitions.
	total: usize,
}

impl<S: Eq + Hash + Ord + Clone> State<S> {
	/// Creates a new state with no transitions.
	pub fn new() -> Self {
		Self {
			transitions: HashMap::new(),
			total: 0,
		}
	}

	/// Records an occurrence of a transition toward `successor`.
	pub fn add_transition(&mut self, successor: S) {
		*self.transitions.entry(successor).or_insert(0) += 1;
		self.total += 1;
	}

	/// Occurrence count of `successor` (0 if never observed).
	pub fn count(&self, successor: &S) -> usize {
		self.transitions.get(successor).copied().unwrap_or(0)
	}

	pub fn total(&self) -> usize {
		self.total
	}

	/// Successor with the highest count.
	///
	/// Equal counts resolve to the smallest symbol so results do not depend
	/// on hash iteration order.
	pub fn most_likely(&self) -> Option<&S> {
		self.transitions
			.iter()
			.max_by(|(sa, ca), (sb, cb)| ca.cmp(cb).then_with(|| sb.cmp(sa)))
			.map(|(s, _)| s)
	}

	/// Successor with the lowest count, ties resolved to the smallest symbol.
	pub fn least_likely(&self) -> Option<&S> {
		self.transitions
			.iter()
			.min_by(|(sa, ca), (sb, cb)| ca.cmp(cb).then_with(|| sa.cmp(sb)))
			.map(|(s, _)| s)
	}

	/// Observed frequency of `successor` among all transitions of this state.
	///
	/// Returns `None` if the state has never been observed.
	pub fn likelihood(&self, successor: &S) -> Option<f64> {
		match self.total() {
			0 => None,
			total => Some(self.count(successor) as f64 / total as f64),
		}
	}
}

impl<S: Eq + Hash + Ord + Clone> Default for State<S> {
	fn default() -> Self {
		Self::new()
	}
}
