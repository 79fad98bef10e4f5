use rand::Rng;
use rand::seq::IndexedRandom;

use super::mode::{ModelKind, TwistMode};
use super::twister::Twister;
use crate::error::{Result, TwisterError};
use crate::lexicon::{Lexicon, LexiconEntry, Pronunciation};

/// Baseline generator: uniform picks, with replacement.
///
/// Used as a control when comparing the other models.
#[derive(Clone, Debug)]
pub struct RandomModel {
	lexicon: Lexicon,
}

impl RandomModel {
	pub fn new(lexicon: Lexicon) -> Self {
		Self { lexicon }
	}

	pub fn lexicon(&self) -> &Lexicon {
		&self.lexicon
	}

	/// Picks `count` words uniformly. The mode is ignored.
	///
	/// # Errors
	/// Returns `EmptyLexicon` if `count > 0` and there is nothing to pick.
	pub fn generate<R: Rng + ?Sized>(&self, count: usize, _mode: TwistMode, rng: &mut R) -> Result<Twister> {
		let words: Vec<(&Pronunciation, &LexiconEntry)> = self.lexicon.iter().collect();
		let mut twister = Twister::with_capacity(count);
		for _ in 0..count {
			let (pronunciation, entry) = words.choose(rng).ok_or(TwisterError::EmptyLexicon)?;
			twister.push((*pronunciation).clone(), &entry.spelling);
		}
		Ok(twister)
	}

	pub fn score_sentence<T: AsRef<str>>(&self, _sentence: &[T]) -> Result<f64> {
		Err(TwisterError::Unsupported {
			model: ModelKind::Random.as_str(),
			operation: "sentence scoring".to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_samples_with_replacement() {
		let mut lexicon = Lexicon::new();
		lexicon.insert("a", Pronunciation::single("ə"), ["DT"]);
		let model = RandomModel::new(lexicon);
		let twister = model.generate(3, TwistMode::Reverse, &mut StdRng::seed_from_u64(0)).unwrap();
		assert_eq!(twister.spellings, vec!["a", "a", "a"]);
	}

	#[test]
	fn test_empty_lexicon() {
		let model = RandomModel::new(Lexicon::new());
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(model.generate(1, TwistMode::Normal, &mut rng), Err(TwisterError::EmptyLexicon)));
		assert!(model.generate(0, TwistMode::Normal, &mut rng).unwrap().is_empty());
	}

	#[test]
	fn test_scoring_unsupported() {
		let model = RandomModel::new(Lexicon::new());
		assert!(matches!(
			model.score_sentence(&["a"]),
			Err(TwisterError::Unsupported { model: "random", .. })
		));
	}
}
