use std::path::Path;

use log::{debug, info};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::kgram_chain::{KgramChain, Token};
use super::mode::TwistMode;
use super::twister::Twister;
use crate::config::TwisterConfig;
use crate::error::{Result, TwisterError};
use crate::lexicon::{Lexicon, Pronunciation};
use crate::phonetic::Phoneme;

/// Empirical twister model trained on a corpus of "normal" text.
///
/// Two chains are learned from the pronunciations of the corpus words:
/// - `syllables`: which syllable tends to follow which
/// - `phonemes`: which sound tends to follow which, across syllable and
///   word boundaries
///
/// The chains drive greedy word choices during generation and give the
/// adjacent-pair likelihoods used for scoring.
///
/// # Invariants
/// - Both chains break together on corpus words missing from the lexicon
/// - The chains are read-only once training is over
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovModel {
	lexicon: Lexicon,
	config: TwisterConfig,
	syllables: KgramChain<String>,
	phonemes: KgramChain<Phoneme>,
}

impl MarkovModel {
	/// Trains the model in one pass over `corpus`.
	///
	/// Each corpus word found in the lexicon streams its syllables into the
	/// syllable chain and its phonemes into the phoneme chain. Any other word
	/// becomes a break in both chains.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `config.chain_order < 2`.
	pub fn train<I, T>(lexicon: Lexicon, corpus: I, config: TwisterConfig) -> Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut syllables = KgramChain::new(config.chain_order)?;
		let mut phonemes = KgramChain::new(config.chain_order)?;

		let (mut known, mut unknown) = (0usize, 0usize);
		for word in corpus {
			match lexicon.pronunciation_of(word.as_ref()) {
				Some(pronunciation) => {
					known += 1;
					for syllable in pronunciation.syllables() {
						syllables.insert(Token::Symbol(syllable.clone()));
						phonemes.extend(syllable.chars().map(Token::Symbol));
					}
				}
				None => {
					unknown += 1;
					syllables.insert(Token::Break);
					phonemes.insert(Token::Break);
				}
			}
		}

		info!("Trained on {known} known words ({unknown} unknown)");
		debug!("{} syllable prefixes, {} phoneme prefixes", syllables.len(), phonemes.len());

		Ok(Self { lexicon, config, syllables, phonemes })
	}

	pub fn lexicon(&self) -> &Lexicon {
		&self.lexicon
	}

	pub fn syllable_chain(&self) -> &KgramChain<String> {
		&self.syllables
	}

	pub fn phoneme_chain(&self) -> &KgramChain<Phoneme> {
		&self.phonemes
	}

	/// Queries a chain according to the twist mode.
	///
	/// - `Normal`: most likely successor
	/// - `Reverse`: least likely successor
	/// - `Random`: last symbol of a random observed prefix
	fn choose_next<S, R>(chain: &KgramChain<S>, prefix: &[S], mode: TwistMode, rng: &mut R) -> Option<S>
	where
		S: Eq + std::hash::Hash + Ord + Clone,
		R: Rng + ?Sized,
	{
		match mode {
			TwistMode::Normal => chain.most_likely_successor(prefix).cloned(),
			TwistMode::Reverse => chain.least_likely_successor(prefix).cloned(),
			TwistMode::Random => chain.random_key(rng).and_then(|key| key.last()).cloned(),
		}
	}

	/// Greedily generates `count` words.
	///
	/// The first word is random. Each following word is chosen by, in order:
	/// 1. a word starting with the syllable predicted from the previous word
	/// 2. a word starting with the phoneme predicted from the previous word
	/// 3. any word
	///
	/// so generation always makes progress, even with empty chains.
	///
	/// # Errors
	/// Returns `EmptyLexicon` if there is no word to pick from.
	pub fn generate<R: Rng + ?Sized>(&self, count: usize, mode: TwistMode, rng: &mut R) -> Result<Twister> {
		let mut twister = Twister::with_capacity(count);
		if count == 0 {
			return Ok(twister);
		}

		let mut words: Vec<&Pronunciation> = self
			.lexicon
			.pronunciations()
			.filter(|p| p.syllables().len() < self.config.max_syllables)
			.collect();
		if words.is_empty() {
			words = self.lexicon.pronunciations().collect();
		}

		let first = *words.choose(rng).ok_or(TwisterError::EmptyLexicon)?;
		self.push_word(&mut twister, first);

		while twister.len() < count {
			let Some(previous) = twister.last() else { break };
			let next = self.next_word(previous, &words, mode, rng)?;
			self.push_word(&mut twister, next);
		}

		Ok(twister)
	}

	fn next_word<'a, R: Rng + ?Sized>(
		&self,
		previous: &Pronunciation,
		words: &[&'a Pronunciation],
		mode: TwistMode,
		rng: &mut R,
	) -> Result<&'a Pronunciation> {
		if let Some(syllable) = Self::choose_next(&self.syllables, previous.syllables(), mode, rng) {
			let matching: Vec<&'a Pronunciation> =
				words.iter().copied().filter(|w| w.first_syllable() == Some(&syllable)).collect();
			if let Some(word) = matching.choose(rng).copied() {
				return Ok(word);
			}
		}

		let sounds: Vec<Phoneme> = previous.phonemes().collect();
		if let Some(sound) = Self::choose_next(&self.phonemes, &sounds, mode, rng) {
			let matching: Vec<&'a Pronunciation> =
				words.iter().copied().filter(|w| w.first_phoneme() == Some(sound)).collect();
			if let Some(word) = matching.choose(rng).copied() {
				return Ok(word);
			}
		}

		debug!("No prediction after '{previous}', picking any word");
		words.choose(rng).copied().ok_or(TwisterError::EmptyLexicon)
	}

	fn push_word(&self, twister: &mut Twister, pronunciation: &Pronunciation) {
		let spelling = self.lexicon.spelling_of(pronunciation).unwrap_or_default();
		twister.push(pronunciation.clone(), spelling);
	}

	/// Scores a tokenized, lowercased sentence for twistiness.
	///
	/// `score = mean syllable-pair likelihood + mean phoneme-pair likelihood / character_divisor`
	///
	/// Pairs whose prefix the chains never observed count as 0.
	///
	/// # Errors
	/// Returns `UnknownWord` for the first token missing from the lexicon.
	pub fn score_sentence<T: AsRef<str>>(&self, sentence: &[T]) -> Result<f64> {
		let mut parts: Vec<String> = Vec::new();
		for word in sentence {
			let word = word.as_ref();
			let pronunciation = self
				.lexicon
				.pronunciation_of(word)
				.ok_or_else(|| TwisterError::UnknownWord(word.to_owned()))?;
			parts.extend(pronunciation.syllables().iter().cloned());
		}
		let sounds: Vec<Phoneme> = parts.iter().flat_map(|s| s.chars()).collect();

		let syllable_score = mean(sequence_likelihoods(&self.syllables, &parts));
		let sound_score = mean(sequence_likelihoods(&self.phonemes, &sounds));

		Ok(syllable_score + sound_score / self.config.character_divisor)
	}

	/// Serializes the trained model into an opaque byte snapshot.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Rebuilds a model from [`MarkovModel::to_bytes`] output.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Writes the snapshot to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		std::fs::write(&path, self.to_bytes()?)?;
		info!("Saved model snapshot to {}", path.as_ref().display());
		Ok(())
	}

	/// Reads a snapshot written by [`MarkovModel::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path)?;
		let model = Self::from_bytes(&bytes)?;
		info!("Loaded model snapshot from {}", path.as_ref().display());
		Ok(model)
	}
}

/// Likelihood of each symbol of `sequence` given the symbols before it,
/// from the second symbol on. Unknown prefixes count as 0.
fn sequence_likelihoods<'a, S>(chain: &'a KgramChain<S>, sequence: &'a [S]) -> impl Iterator<Item = f64> + 'a
where
	S: Eq + std::hash::Hash + Ord + Clone,
{
	(1..sequence.len()).map(move |i| chain.likelihood(&sequence[..i], &sequence[i]).unwrap_or(0.0))
}

/// Arithmetic mean, 0 for an empty sequence.
fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
	let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
	if count > 0 { sum / count as f64 } else { 0.0 }
}
