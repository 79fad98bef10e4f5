use log::{debug, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::mode::{ModelKind, TwistMode};
use super::twister::Twister;
use crate::config::TwisterConfig;
use crate::error::{Result, TwisterError};
use crate::lexicon::{Lexicon, LexiconEntry, Pronunciation};
use crate::phonetic::features::is_known;
use crate::phonetic::{pronunciation_distance, strip_vowels};

/// Theory-driven twister generator.
///
/// Greedily picks each word so that its consonant skeleton is as close as
/// possible (without being identical) to the previous word's, according to
/// the feature-weighted edit distance.
///
/// This model has no frequency data, so it cannot score sentences.
#[derive(Clone, Debug)]
pub struct FeatureModel {
	lexicon: Lexicon,
	config: TwisterConfig,
}

impl FeatureModel {
	/// Builds the model over `lexicon`.
	///
	/// Entries whose consonant skeleton contains a phoneme missing from the
	/// feature table are dropped, since no distance can be computed for them.
	pub fn new(mut lexicon: Lexicon, config: TwisterConfig) -> Self {
		let before = lexicon.len();
		lexicon.retain(|p, _| strip_vowels(p.phonemes()).iter().all(|c| is_known(*c)));
		let dropped = before - lexicon.len();
		if dropped > 0 {
			warn!("Dropped {dropped} of {before} words with phonemes outside the feature table");
		}
		Self { lexicon, config }
	}

	pub fn lexicon(&self) -> &Lexicon {
		&self.lexicon
	}

	/// Generates `count` words. Only `TwistMode::Normal` is supported.
	///
	/// # Errors
	/// - `Unsupported` for any other mode
	/// - `NoCandidates` if a position has no acceptable word left
	pub fn generate<R: Rng + ?Sized>(&self, count: usize, mode: TwistMode, rng: &mut R) -> Result<Twister> {
		if mode != TwistMode::Normal {
			return Err(TwisterError::Unsupported {
				model: ModelKind::Feature.as_str(),
				operation: format!("{mode} twisters"),
			});
		}
		let template = vec![None; count];
		self.generate_with_template(&template, rng)
	}

	/// Generates one word per template slot.
	///
	/// A `Some(tag)` slot restricts that position to words carrying the
	/// part-of-speech `tag`; `None` accepts any word.
	pub fn generate_with_template<R: Rng + ?Sized>(&self, template: &[Option<&str>], rng: &mut R) -> Result<Twister> {
		let mut twister = Twister::with_capacity(template.len());
		for (position, slot) in template.iter().enumerate() {
			let (pronunciation, entry) = self.twistiest_word(&twister, *slot, position, rng)?;
			twister.push(pronunciation.clone(), &entry.spelling);
		}
		Ok(twister)
	}

	/// Picks the word for `position`.
	///
	/// - first word: uniform among the eligible words
	/// - later words: uniform among the eligible words at the smallest
	///   strictly positive distance from the previous word
	fn twistiest_word<'a, R: Rng + ?Sized>(
		&'a self,
		twister: &Twister,
		slot: Option<&str>,
		position: usize,
		rng: &mut R,
	) -> Result<(&'a Pronunciation, &'a LexiconEntry)> {
		let eligible = self.eligible(slot, &twister.pronunciations);

		let words: Vec<(&'a Pronunciation, &'a LexiconEntry)> = match twister.last() {
			None => eligible.collect(),
			Some(previous) => {
				// vowels don't tend to make very twisty words
				let last_word = strip_vowels(previous.phonemes());
				let mut min_nonzero = f64::INFINITY;
				let mut words = Vec::new();

				for (pronunciation, entry) in eligible {
					let this_word = strip_vowels(pronunciation.phonemes());
					let cutoff = min_nonzero.is_finite().then_some(min_nonzero);
					let d = pronunciation_distance(&this_word, &last_word, cutoff)?;

					if d > 0.0 && d < min_nonzero {
						min_nonzero = d;
						words.clear();
						words.push((pronunciation, entry));
					} else if d == min_nonzero {
						words.push((pronunciation, entry));
					}
				}
				debug!("Position {position}: {} candidates at distance {min_nonzero}", words.len());
				words
			}
		};

		words.choose(rng).copied().ok_or(TwisterError::NoCandidates { position })
	}

	/// Words not yet used, short enough, and matching the template slot.
	fn eligible<'a, 'b>(
		&'a self,
		slot: Option<&'b str>,
		used: &'b [Pronunciation],
	) -> impl Iterator<Item = (&'a Pronunciation, &'a LexiconEntry)> + 'b
	where
		'a: 'b,
	{
		self.lexicon.iter().filter(move |&(pronunciation, entry)| {
			entry.spelling.chars().count() < self.config.max_spelling_len
				&& !used.contains(pronunciation)
				&& slot.is_none_or(|tag| entry.pos.contains(tag))
		})
	}

	/// Always fails: the feature model has no frequency basis for scoring.
	pub fn score_sentence<T: AsRef<str>>(&self, _sentence: &[T]) -> Result<f64> {
		Err(TwisterError::Unsupported {
			model: ModelKind::Feature.as_str(),
			operation: "sentence scoring".to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn lexicon() -> Lexicon {
		let mut lexicon = Lexicon::new();
		lexicon.insert("pick", Pronunciation::single("pɪk"), ["VB"]);
		lexicon.insert("big", Pronunciation::single("bɪg"), ["JJ"]);
		lexicon.insert("pig", Pronunciation::single("pɪg"), ["NN"]);
		lexicon.insert("sock", Pronunciation::single("sɑk"), ["NN"]);
		lexicon.insert("extraordinary", Pronunciation::single("ɪkstrɔrdənɛri"), ["JJ"]);
		lexicon
	}

	#[test]
	fn test_long_spellings_are_never_picked() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..20 {
			let twister = model.generate(4, TwistMode::Normal, &mut rng).unwrap();
			assert!(!twister.spellings.contains(&"extraordinary".to_owned()));
		}
	}

	#[test]
	fn test_words_are_not_repeated() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let mut rng = StdRng::seed_from_u64(11);
		let twister = model.generate(4, TwistMode::Normal, &mut rng).unwrap();
		assert_eq!(twister.len(), 4);
		for (i, p) in twister.pronunciations.iter().enumerate() {
			assert!(!twister.pronunciations[i + 1..].contains(p));
		}
	}

	#[test]
	fn test_runs_out_of_words() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let result = model.generate(5, TwistMode::Normal, &mut StdRng::seed_from_u64(1));
		assert!(matches!(result, Err(TwisterError::NoCandidates { position: 4 })));
	}

	#[test]
	fn test_template_slot_filters_by_tag() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let mut rng = StdRng::seed_from_u64(5);
		for _ in 0..10 {
			let twister = model.generate_with_template(&[Some("JJ")], &mut rng).unwrap();
			assert_eq!(twister.spellings, vec!["big".to_owned()]);
		}
	}

	#[test]
	fn test_only_normal_mode() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let mut rng = StdRng::seed_from_u64(0);
		for mode in [TwistMode::Reverse, TwistMode::Random] {
			assert!(matches!(
				model.generate(2, mode, &mut rng),
				Err(TwisterError::Unsupported { model: "feature", .. })
			));
		}
	}

	#[test]
	fn test_scoring_unsupported() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		assert!(matches!(model.score_sentence(&["pick"]), Err(TwisterError::Unsupported { .. })));
	}

	#[test]
	fn test_unknown_phonemes_dropped() {
		let mut lexicon = lexicon();
		lexicon.insert("cute", Pronunciation::single("kjut"), ["JJ"]);
		lexicon.insert("loch", Pronunciation::single("lɒx"), ["NN"]);
		let model = FeatureModel::new(lexicon, TwisterConfig::default());
		assert_eq!(model.lexicon().len(), 6);
		assert!(model.lexicon().pronunciation_of("cute").is_some());
		assert!(model.lexicon().pronunciation_of("loch").is_none());
	}

	#[test]
	fn test_empty_twister() {
		let model = FeatureModel::new(lexicon(), TwisterConfig::default());
		let twister = model.generate(0, TwistMode::Normal, &mut StdRng::seed_from_u64(0)).unwrap();
		assert!(twister.is_empty());
	}
}
