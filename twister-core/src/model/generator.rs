use std::path::PathBuf;

use log::{info, warn};
use rand::Rng;

use super::feature_model::FeatureModel;
use super::markov_model::MarkovModel;
use super::mode::{ModelKind, TwistMode};
use super::random_model::RandomModel;
use super::twister::Twister;
use crate::config::TwisterConfig;
use crate::error::Result;
use crate::io;
use crate::lexicon::Lexicon;

/// Where a generator gets its data from.
///
/// # Variants
/// - `Snapshot`: a Markov model saved with [`MarkovModel::save`].
/// - `Corpus`: train a Markov model from a unilex dictionary and the first
///   `training_size` tokens of a text corpus (`None` = whole corpus).
/// - `Dictionary`: a feature or random model over a unilex dictionary.
#[derive(Clone, Debug)]
pub enum ModelSource {
	Snapshot(PathBuf),
	Corpus {
		pronunciations: PathBuf,
		corpus: PathBuf,
		training_size: Option<usize>,
	},
	Dictionary {
		kind: ModelKind,
		pronunciations: PathBuf,
	},
}

/// One of the three twister strategies behind a single interface.
///
/// # Responsibilities
/// - Build the right model from a [`ModelSource`]
/// - Dispatch generation and scoring to it
/// - Report unsupported operations as errors instead of degrading silently
#[derive(Clone, Debug)]
pub enum Generator {
	Feature(FeatureModel),
	Markov(MarkovModel),
	Random(RandomModel),
}

impl Generator {
	/// Loads or trains the model described by `source`.
	///
	/// # Errors
	/// Propagates I/O, dictionary parsing and snapshot decoding errors.
	pub fn open(source: &ModelSource, config: &TwisterConfig) -> Result<Self> {
		let generator = match source {
			ModelSource::Snapshot(path) => Generator::Markov(MarkovModel::load(path)?),
			ModelSource::Corpus { pronunciations, corpus, training_size } => {
				let lexicon = io::load_markov_lexicon(pronunciations)?;
				let tokens = io::load_corpus(corpus, *training_size)?;
				Generator::Markov(MarkovModel::train(lexicon, tokens, config.clone())?)
			}
			ModelSource::Dictionary { kind, pronunciations } => match kind {
				ModelKind::Feature => Generator::Feature(FeatureModel::new(
					io::load_feature_lexicon(pronunciations)?,
					config.clone(),
				)),
				ModelKind::Random => Generator::Random(RandomModel::new(io::load_feature_lexicon(pronunciations)?)),
				ModelKind::Markov => {
					warn!("No corpus given, the Markov model will only pick random words");
					let lexicon = io::load_markov_lexicon(pronunciations)?;
					Generator::Markov(MarkovModel::train(lexicon, Vec::<String>::new(), config.clone())?)
				}
			},
		};
		info!("Using the {} model ({} words)", generator.kind(), generator.lexicon().len());
		Ok(generator)
	}

	pub fn kind(&self) -> ModelKind {
		match self {
			Generator::Feature(_) => ModelKind::Feature,
			Generator::Markov(_) => ModelKind::Markov,
			Generator::Random(_) => ModelKind::Random,
		}
	}

	pub fn lexicon(&self) -> &Lexicon {
		match self {
			Generator::Feature(model) => model.lexicon(),
			Generator::Markov(model) => model.lexicon(),
			Generator::Random(model) => model.lexicon(),
		}
	}

	/// The trained Markov model, if this is one (e.g. to save a snapshot).
	pub fn as_markov(&self) -> Option<&MarkovModel> {
		match self {
			Generator::Markov(model) => Some(model),
			_ => None,
		}
	}

	/// Generates a twister of `count` words.
	pub fn generate<R: Rng + ?Sized>(&self, count: usize, mode: TwistMode, rng: &mut R) -> Result<Twister> {
		match self {
			Generator::Feature(model) => model.generate(count, mode, rng),
			Generator::Markov(model) => model.generate(count, mode, rng),
			Generator::Random(model) => model.generate(count, mode, rng),
		}
	}

	/// Scores a tokenized, lowercased sentence.
	///
	/// Only the Markov model supports scoring; the others return
	/// `Unsupported`.
	pub fn score_sentence<T: AsRef<str>>(&self, sentence: &[T]) -> Result<f64> {
		match self {
			Generator::Feature(model) => model.score_sentence(sentence),
			Generator::Markov(model) => model.score_sentence(sentence),
			Generator::Random(model) => model.score_sentence(sentence),
		}
	}
}

impl From<FeatureModel> for Generator {
	fn from(model: FeatureModel) -> Self {
		Generator::Feature(model)
	}
}

impl From<MarkovModel> for Generator {
	fn from(model: MarkovModel) -> Self {
		Generator::Markov(model)
	}
}

impl From<RandomModel> for Generator {
	fn from(model: RandomModel) -> Self {
		Generator::Random(model)
	}
}
