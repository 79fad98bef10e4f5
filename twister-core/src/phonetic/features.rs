use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Result, TwisterError};

/// A single phonetic symbol (one IPA code point).
pub type Phoneme = char;

/// Number of distinctive features attached to every phoneme.
pub const FEATURE_COUNT: usize = 13;

/// Names of the features, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
	"son", "cont", "cons", "voice", "nasal", "lab", "dent", "cor",
	"front", "back", "high", "low", "tense",
];

/// Vowel class removed before consonant-skeleton comparisons.
pub const VOWELS: [Phoneme; 12] = ['i', 'ɪ', 'e', 'a', 'ɑ', 'ɔ', 'ʊ', 'u', 'ʌ', 'ə', 'o', 'ɜ'];

/// Distinctive feature matrix for English sounds, `+` marks a present feature.
///
/// Some symbols deliberately share a row: `ɚ` is `r` and `ɾ` is `t`.
const FEATURE_MATRIX: [(Phoneme, &str); 37] = [
	('p', "--+--+-------"), ('b', "--++-+-------"), ('t', "--+----+-----"),
	('d', "--++---+-----"), ('k', "--+------++--"), ('g', "--++-----++--"),
	('f', "-++--++------"), ('v', "-+++-++------"), ('θ', "-++---++-----"),
	('ð', "-+++--++-----"), ('s', "-++----+-----"), ('z', "-+++---+-----"),
	('ʃ', "-++----++-+--"), ('ʒ', "-+++---++-+--"), ('m', "+-++++-------"),
	('n', "+-+++--+-----"), ('ŋ', "+-+++----++--"), ('l', "+-++---+-----"),
	('r', "++++---+-----"), ('j', "++-+----+-+--"), ('w', "++-+-+---++--"),
	('h', "++-----------"), ('i', "++-+----+-+-+"), ('ɪ', "++-+----+-+--"),
	('e', "++-+----+----"), ('a', "++-+----+--++"), ('ɑ', "++-+-----+-++"),
	('ɔ', "++-+-+---+--+"), ('ʊ', "++-+-+---++--"), ('u', "++-+-+---++-+"),
	('ʌ', "++-+-------+-"), ('ə', "++-+---------"), ('o', "++-+-----+---"),
	('ɛ', "++-+--------+"),
	('ɝ', "++++---+----+"), // like 'r', with +tense
	('ɚ', "++++---+-----"), // same as 'r'
	('ɾ', "--+----+-----"), // same as 't'
];

static FEATURES: LazyLock<HashMap<Phoneme, FeatureVector>> = LazyLock::new(|| {
	FEATURE_MATRIX
		.iter()
		.map(|(symbol, row)| (*symbol, FeatureVector::from_row(row)))
		.collect()
});

/// Fixed-width boolean feature vector, packed into a bit mask.
///
/// Bit `i` holds the value of `FEATURE_NAMES[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeatureVector(u16);

impl FeatureVector {
	fn from_row(row: &str) -> Self {
		let bits = row
			.chars()
			.enumerate()
			.filter(|(_, c)| *c == '+')
			.fold(0u16, |acc, (i, _)| acc | (1 << i));
		Self(bits)
	}

	/// Value of the feature at `index`.
	pub fn get(&self, index: usize) -> bool {
		index < FEATURE_COUNT && self.0 & (1 << index) != 0
	}

	/// Iterates over the feature values in vector order.
	pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
		(0..FEATURE_COUNT).map(|i| self.get(i))
	}

	/// Number of positions at which the two vectors disagree.
	pub fn mismatches(&self, other: &Self) -> u32 {
		(self.0 ^ other.0).count_ones()
	}
}

/// Looks up the feature vector of a phoneme.
///
/// # Errors
/// Returns `UnknownSymbol` if the phoneme is not in the feature table.
pub fn features(symbol: Phoneme) -> Result<FeatureVector> {
	FEATURES.get(&symbol).copied().ok_or(TwisterError::UnknownSymbol(symbol))
}

/// Returns `true` if the phoneme belongs to the feature table.
pub fn is_known(symbol: Phoneme) -> bool {
	FEATURES.contains_key(&symbol)
}

pub fn is_vowel(symbol: Phoneme) -> bool {
	VOWELS.contains(&symbol)
}

/// The alphabet covered by the feature table, in table order.
pub fn alphabet() -> impl Iterator<Item = Phoneme> {
	FEATURE_MATRIX.iter().map(|(symbol, _)| *symbol)
}

/// Number of features on which two phonemes differ.
///
/// This is the integer numerator of [`feature_distance`].
pub fn differing_features(a: Phoneme, b: Phoneme) -> Result<u32> {
	Ok(features(a)?.mismatches(&features(b)?))
}

/// Normalized Hamming distance between the feature vectors of two phonemes.
///
/// Symmetric, bounded in `[0, 1]`, and zero for identical symbols.
/// Computed with a single XOR + popcount over the packed vectors.
///
/// # Errors
/// Returns `UnknownSymbol` if either phoneme is outside the table.
pub fn feature_distance(a: Phoneme, b: Phoneme) -> Result<f64> {
	Ok(differing_features(a, b)? as f64 / FEATURE_COUNT as f64)
}

/// Position-by-position version of [`feature_distance`].
///
/// Produces the exact same value; kept for verification and for callers
/// that want to inspect the vectors one feature at a time.
pub fn feature_distance_scalar(a: Phoneme, b: Phoneme) -> Result<f64> {
	let (fa, fb) = (features(a)?, features(b)?);
	let mut different = 0u32;
	for (x, y) in fa.iter().zip(fb.iter()) {
		if x != y {
			different += 1;
		}
	}
	Ok(different as f64 / FEATURE_COUNT as f64)
}

/// Readable representation of a phoneme's features, e.g. `-son -cont +cons ...`.
pub fn feature_string(symbol: Phoneme) -> Result<String> {
	let vector = features(symbol)?;
	Ok(vector
		.iter()
		.zip(FEATURE_NAMES)
		.map(|(present, name)| format!("{}{}", if present { '+' } else { '-' }, name))
		.collect::<Vec<_>>()
		.join(" "))
}
