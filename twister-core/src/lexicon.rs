use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::phonetic::Phoneme;

/// The sound of one word: an ordered sequence of syllables, each syllable a
/// string of phonemes.
///
/// Pronunciations loaded for the feature model carry a single syllable.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pronunciation {
	syllables: Vec<String>,
}

impl Pronunciation {
	pub fn new<I, T>(syllables: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		Self {
			syllables: syllables.into_iter().map(Into::into).collect(),
		}
	}

	/// Pronunciation without syllable boundaries.
	pub fn single(phonemes: &str) -> Self {
		Self::new([phonemes])
	}

	pub fn syllables(&self) -> &[String] {
		&self.syllables
	}

	pub fn first_syllable(&self) -> Option<&String> {
		self.syllables.first()
	}

	/// All phonemes, syllable boundaries dropped.
	pub fn phonemes(&self) -> impl Iterator<Item = Phoneme> + '_ {
		self.syllables.iter().flat_map(|s| s.chars())
	}

	pub fn first_phoneme(&self) -> Option<Phoneme> {
		self.phonemes().next()
	}

	/// Number of phonemes.
	pub fn len(&self) -> usize {
		self.phonemes().count()
	}

	pub fn is_empty(&self) -> bool {
		self.phonemes().next().is_none()
	}
}

impl fmt::Display for Pronunciation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for syllable in &self.syllables {
			f.write_str(syllable)?;
		}
		Ok(())
	}
}

/// What the lexicon knows about one pronunciation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LexiconEntry {
	pub spelling: String,
	/// Part-of-speech tags, e.g. `{"NN", "VB"}`.
	pub pos: BTreeSet<String>,
}

/// Pronunciation dictionary shared by every model.
///
/// Keeps both directions of the mapping:
/// - pronunciation -> entry (spelling, part-of-speech tags)
/// - spelling -> pronunciation
///
/// When several spellings share a pronunciation, the last inserted one wins
/// the pronunciation key. Iteration follows pronunciation order so that a
/// seeded generator always sees the same candidates.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Lexicon {
	entries: BTreeMap<Pronunciation, LexiconEntry>,
	spellings: HashMap<String, Pronunciation>,
}

impl Lexicon {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) a word.
	pub fn insert<I, T>(&mut self, spelling: &str, pronunciation: Pronunciation, pos: I)
	where
		I: IntoIterator<Item = T>,
		T: Into<String>,
	{
		let entry = LexiconEntry {
			spelling: spelling.to_owned(),
			pos: pos.into_iter().map(Into::into).collect(),
		};
		self.spellings.insert(spelling.to_owned(), pronunciation.clone());
		self.entries.insert(pronunciation, entry);
	}

	/// Number of distinct pronunciations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entry(&self, pronunciation: &Pronunciation) -> Option<&LexiconEntry> {
		self.entries.get(pronunciation)
	}

	pub fn spelling_of(&self, pronunciation: &Pronunciation) -> Option<&str> {
		self.entries.get(pronunciation).map(|e| e.spelling.as_str())
	}

	pub fn pronunciation_of(&self, spelling: &str) -> Option<&Pronunciation> {
		self.spellings.get(spelling)
	}

	/// Iterates over `(pronunciation, entry)` pairs in pronunciation order.
	pub fn iter(&self) -> impl Iterator<Item = (&Pronunciation, &LexiconEntry)> {
		self.entries.iter()
	}

	pub fn pronunciations(&self) -> impl Iterator<Item = &Pronunciation> {
		self.entries.keys()
	}

	/// Keeps only the entries for which `keep` returns `true`.
	///
	/// Spellings pointing at a removed pronunciation are dropped too.
	pub fn retain<F>(&mut self, mut keep: F)
	where
		F: FnMut(&Pronunciation, &LexiconEntry) -> bool,
	{
		self.entries.retain(|p, e| keep(p, e));
		let entries = &self.entries;
		self.spellings.retain(|_, p| entries.contains_key(p));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pronunciation_views() {
		let p = Pronunciation::new(["tʌŋ", "twɪs", "tɚ"]);
		assert_eq!(p.syllables().len(), 3);
		assert_eq!(p.first_syllable().map(String::as_str), Some("tʌŋ"));
		assert_eq!(p.first_phoneme(), Some('t'));
		assert_eq!(p.to_string(), "tʌŋtwɪstɚ");
		assert_eq!(p.len(), 9);
		assert!(Pronunciation::new(Vec::<String>::new()).is_empty());
	}

	#[test]
	fn test_both_directions() {
		let mut lexicon = Lexicon::new();
		lexicon.insert("cat", Pronunciation::single("kat"), ["NN"]);
		let p = Pronunciation::single("kat");
		assert_eq!(lexicon.spelling_of(&p), Some("cat"));
		assert_eq!(lexicon.pronunciation_of("cat"), Some(&p));
		assert!(lexicon.entry(&p).unwrap().pos.contains("NN"));
		assert_eq!(lexicon.pronunciation_of("dog"), None);
	}

	#[test]
	fn test_last_spelling_wins_shared_pronunciation() {
		let mut lexicon = Lexicon::new();
		lexicon.insert("there", Pronunciation::single("ðɛr"), ["RB"]);
		lexicon.insert("their", Pronunciation::single("ðɛr"), ["PRP$"]);
		assert_eq!(lexicon.len(), 1);
		assert_eq!(lexicon.spelling_of(&Pronunciation::single("ðɛr")), Some("their"));
	}

	#[test]
	fn test_retain_drops_spellings() {
		let mut lexicon = Lexicon::new();
		lexicon.insert("cat", Pronunciation::single("kat"), ["NN"]);
		lexicon.insert("dog", Pronunciation::single("dɔg"), ["NN"]);
		lexicon.retain(|p, _| p.first_phoneme() == Some('k'));
		assert_eq!(lexicon.len(), 1);
		assert_eq!(lexicon.pronunciation_of("dog"), None);
		assert!(lexicon.pronunciation_of("cat").is_some());
	}
}
