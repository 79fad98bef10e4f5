use super::features::{FEATURE_COUNT, Phoneme, differing_features, is_vowel};
use crate::error::Result;

/// Cost of inserting or deleting one phoneme.
///
/// Equal to the feature-vector length, so a length change always costs at
/// least as much as the worst possible substitution.
pub const INDEL_COST: u32 = FEATURE_COUNT as u32;

/// Removes the vowel-class phonemes, keeping the consonant skeleton.
pub fn strip_vowels<I>(phonemes: I) -> Vec<Phoneme>
where
	I: IntoIterator<Item = Phoneme>,
{
	phonemes.into_iter().filter(|p| !is_vowel(*p)).collect()
}

/// Feature-weighted Levenshtein distance between two phoneme sequences.
///
/// - insertion and deletion cost [`INDEL_COST`]
/// - substituting `x` for `y` costs `INDEL_COST * feature_distance(x, y)`,
///   i.e. the number of features on which they differ
///
/// When `cutoff` is given and the length difference alone already costs more
/// than `cutoff`, returns `cutoff + 1` without running the alignment. That
/// value only means "above the cutoff" and is not a distance.
///
/// # Errors
/// Returns `UnknownSymbol` if a phoneme needed for a substitution is not in
/// the feature table.
pub fn pronunciation_distance(a: &[Phoneme], b: &[Phoneme], cutoff: Option<f64>) -> Result<f64> {
	// The shorter sequence indexes the row
	let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

	let length_gap = (long.len() - short.len()) as f64 * INDEL_COST as f64;
	if let Some(cutoff) = cutoff {
		if length_gap > cutoff {
			return Ok(cutoff + 1.0);
		}
	}

	if short.is_empty() {
		return Ok(length_gap);
	}

	let mut row: Vec<u32> = (0..=short.len() as u32).map(|j| j * INDEL_COST).collect();

	for (i, &y) in long.iter().enumerate() {
		// previous row at j, read before being overwritten
		let mut diagonal = row[0];
		row[0] = (i as u32 + 1) * INDEL_COST;

		for (j, &x) in short.iter().enumerate() {
			let above = row[j + 1] + INDEL_COST;
			let left = row[j] + INDEL_COST;
			let change = diagonal + differing_features(x, y)?;

			diagonal = row[j + 1];
			row[j + 1] = above.min(left).min(change);
		}
	}

	Ok(row[short.len()] as f64)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn phonemes(s: &str) -> Vec<Phoneme> {
		s.chars().collect()
	}

	#[test]
	fn test_identical_is_zero() {
		for word in ["", "p", "kɪt", "str", "θɪŋk", "ʃʒm"] {
			let word = phonemes(word);
			assert_eq!(pronunciation_distance(&word, &word, None).unwrap(), 0.0);
		}
	}

	#[test]
	fn test_empty_sequences() {
		assert_eq!(pronunciation_distance(&[], &[], None).unwrap(), 0.0);
		assert_eq!(pronunciation_distance(&phonemes("pt"), &[], None).unwrap(), 26.0);
		assert_eq!(pronunciation_distance(&[], &phonemes("ktd"), None).unwrap(), 39.0);
	}

	#[test]
	fn test_single_substitution() {
		// p -> b differs on voicing only
		assert_eq!(pronunciation_distance(&phonemes("pt"), &phonemes("bt"), None).unwrap(), 1.0);
		// a substitution is never worse than delete + insert
		let d = pronunciation_distance(&phonemes("p"), &phonemes("ŋ"), None).unwrap();
		assert!(d <= 2.0 * INDEL_COST as f64);
	}

	#[test]
	fn test_insertion() {
		assert_eq!(pronunciation_distance(&phonemes("st"), &phonemes("stk"), None).unwrap(), 13.0);
	}

	#[test]
	fn test_symmetric() {
		let words = ["pl", "bl", "str", "ʃn", "kwk", "θŋ", ""];
		for a in words {
			for b in words {
				let ab = pronunciation_distance(&phonemes(a), &phonemes(b), None).unwrap();
				let ba = pronunciation_distance(&phonemes(b), &phonemes(a), None).unwrap();
				assert_eq!(ab, ba, "{a} vs {b}");
			}
		}
	}

	#[test]
	fn test_cutoff_early_exit() {
		let a = phonemes("p");
		let b = phonemes("pstr");
		let full = pronunciation_distance(&a, &b, None).unwrap();
		assert_eq!(full, 39.0);

		let pruned = pronunciation_distance(&a, &b, Some(10.0)).unwrap();
		assert_eq!(pruned, 11.0);
		assert!(pruned > 10.0);

		// a cutoff above the length gap runs the full alignment
		assert_eq!(pronunciation_distance(&a, &b, Some(100.0)).unwrap(), full);
	}

	#[test]
	fn test_cutoff_never_undercuts_true_distance() {
		let words = ["pl", "bl", "str", "ʃn", "k", "θŋdz"];
		for a in words {
			for b in words {
				let truth = pronunciation_distance(&phonemes(a), &phonemes(b), None).unwrap();
				for cutoff in [0.5, 5.0, 13.0, 30.0] {
					let d = pronunciation_distance(&phonemes(a), &phonemes(b), Some(cutoff)).unwrap();
					assert!(d > cutoff || d == truth);
				}
			}
		}
	}

	#[test]
	fn test_unknown_symbol() {
		assert!(pronunciation_distance(&phonemes("px"), &phonemes("pt"), None).is_err());
	}

	#[test]
	fn test_strip_vowels() {
		assert_eq!(strip_vowels("kɪtən".chars()), phonemes("ktn"));
		assert_eq!(strip_vowels("aɪ".chars()), Vec::<Phoneme>::new());
	}
}
