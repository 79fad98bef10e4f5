//! Error type shared by every part of the crate.

use thiserror::Error;

/// Errors raised by the phonetic primitives, the models and the I/O glue.
///
/// Sparse training data is never an error: chain lookups on unseen prefixes
/// return `None` and the caller decides what "no signal" means.
#[derive(Debug, Error)]
pub enum TwisterError {
	/// The model has no capability for the requested operation
	/// (e.g. scoring with the feature model, reverse mode on the feature model).
	#[error("{model} model does not support {operation}")]
	Unsupported {
		model: &'static str,
		operation: String,
	},

	/// A K-gram chain was requested with a context length below 2.
	#[error("chain order must be >= 2, got {0}")]
	InvalidOrder(usize),

	#[error("unknown twist mode '{0}' (expected normal, reverse or random)")]
	InvalidMode(String),

	#[error("unknown model kind '{0}' (expected feature, markov or random)")]
	InvalidModelKind(String),

	/// A phonetic symbol outside the feature table.
	#[error("unknown phonetic symbol '{0}'")]
	UnknownSymbol(char),

	/// A sentence word absent from the lexicon.
	#[error("unknown word '{0}'")]
	UnknownWord(String),

	#[error("lexicon is empty")]
	EmptyLexicon,

	/// No word satisfies the selection constraints at this position.
	#[error("no candidate word for position {position}")]
	NoCandidates { position: usize },

	#[error("malformed dictionary line {line}: {reason}")]
	MalformedLine { line: usize, reason: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("configuration error: {0}")]
	Config(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TwisterError>;
