use std::fs::{self, File};
use std::io::{self as stdio, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Result, TwisterError};
use crate::lexicon::{Lexicon, Pronunciation};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> stdio::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> stdio::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| stdio::Error::new(stdio::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Lists the stems of all files with a given extension in a directory.
///
/// Example: `models/brown.bin` → `"brown"`
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> stdio::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				files.push(stem.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Annotation characters of the unilex transcriptions that are not sounds:
/// brackets, stress marks, boundary markers and the syllabic diacritic.
const NON_IPA: [char; 9] = ['<', '>', '{', '}', 'ˈ', 'ˌ', '$', '-', '\u{0329}'];

/// Splits one `spelling:variant:pos:pronunciation:...` line.
fn split_unilex_line(line: &str, number: usize) -> Result<(&str, &str, &str)> {
	let mut fields = line.split(':');
	let (Some(spelling), Some(_variant), Some(pos), Some(pronunciation)) =
		(fields.next(), fields.next(), fields.next(), fields.next())
	else {
		return Err(TwisterError::MalformedLine {
			line: number,
			reason: "expected at least 4 ':'-separated fields".to_owned(),
		});
	};
	if spelling.is_empty() {
		return Err(TwisterError::MalformedLine { line: number, reason: "empty spelling".to_owned() });
	}
	Ok((spelling, pos, pronunciation))
}

fn clean_transcription(raw: &str) -> String {
	raw.chars().filter(|c| !NON_IPA.contains(c) && !c.is_whitespace()).collect()
}

/// Parses one line for the Markov model: syllables are kept.
pub fn parse_syllabified_line(line: &str, number: usize) -> Result<(String, Pronunciation, Vec<String>)> {
	let (spelling, pos, raw) = split_unilex_line(line, number)?;
	let cleaned = clean_transcription(raw);
	let pronunciation = Pronunciation::new(cleaned.split('.').filter(|s| !s.is_empty()));
	Ok((spelling.to_owned(), pronunciation, split_pos(pos)))
}

/// Parses one line for the feature and random models: syllable boundaries
/// are dropped.
pub fn parse_flat_line(line: &str, number: usize) -> Result<(String, Pronunciation, Vec<String>)> {
	let (spelling, pos, raw) = split_unilex_line(line, number)?;
	let cleaned: String = clean_transcription(raw).chars().filter(|c| *c != '.').collect();
	Ok((spelling.to_owned(), Pronunciation::single(&cleaned), split_pos(pos)))
}

fn split_pos(pos: &str) -> Vec<String> {
	pos.split('/').filter(|p| !p.is_empty()).map(str::to_owned).collect()
}

fn load_lexicon<P, F>(path: P, parse: F) -> Result<Lexicon>
where
	P: AsRef<Path>,
	F: Fn(&str, usize) -> Result<(String, Pronunciation, Vec<String>)>,
{
	let reader = BufReader::new(File::open(&path)?);
	let mut lexicon = Lexicon::new();
	let mut lines = 0usize;

	for (i, line) in reader.lines().enumerate() {
		let line = line?;
		if line.trim().is_empty() || line.starts_with('#') {
			continue;
		}
		let (spelling, pronunciation, pos) = parse(&line, i + 1)?;
		lexicon.insert(&spelling, pronunciation, pos);
		lines += 1;
	}

	info!(
		"Loaded {} pronunciations from {} lines of {}",
		lexicon.len(),
		lines,
		path.as_ref().display()
	);
	Ok(lexicon)
}

/// Loads a unilex dictionary for the Markov model (syllables kept).
pub fn load_markov_lexicon<P: AsRef<Path>>(path: P) -> Result<Lexicon> {
	load_lexicon(path, parse_syllabified_line)
}

/// Loads a unilex dictionary for the feature and random models.
pub fn load_feature_lexicon<P: AsRef<Path>>(path: P) -> Result<Lexicon> {
	load_lexicon(path, parse_flat_line)
}

/// Splits text into lowercase word tokens.
///
/// Letters, digits and inner apostrophes belong to words; everything else
/// separates them.
pub fn tokenize(text: &str) -> Vec<String> {
	text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
		.map(|w| w.trim_matches('\''))
		.filter(|w| !w.is_empty())
		.map(str::to_lowercase)
		.collect()
}

/// Reads a plain-text corpus and returns its first `limit` tokens
/// (every token when `limit` is `None`).
pub fn load_corpus<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Vec<String>> {
	let mut tokens = Vec::new();
	for line in read_file(&path)? {
		tokens.extend(tokenize(&line));
		if limit.is_some_and(|n| tokens.len() >= n) {
			break;
		}
	}
	if let Some(n) = limit {
		tokens.truncate(n);
	}
	debug!("Read {} corpus tokens from {}", tokens.len(), path.as_ref().display());
	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_build_output_path() {
		let out = build_output_path("data/brown.txt", "bin").unwrap();
		assert_eq!(out, PathBuf::from("data/brown.bin"));
	}

	#[test]
	fn test_parse_syllabified_line() {
		let (spelling, p, pos) =
			parse_syllabified_line("tongue:1:NN/VB:{ t ˈʌ ŋ }.t w ɪ s:extra", 1).unwrap();
		assert_eq!(spelling, "tongue");
		assert_eq!(pos, vec!["NN", "VB"]);
		assert_eq!(p, Pronunciation::new(["tʌŋ", "twɪs"]));
	}

	#[test]
	fn test_parse_flat_line() {
		let (_, p, _) = parse_flat_line("paper:1:NN:ˈp.eɪ.p.ɚ:", 3).unwrap();
		assert_eq!(p.syllables(), &["peɪpɚ".to_owned()]);
	}

	#[test]
	fn test_malformed_line() {
		match parse_flat_line("broken:line", 7) {
			Err(TwisterError::MalformedLine { line, .. }) => assert_eq!(line, 7),
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn test_tokenize() {
		assert_eq!(tokenize("Peter Piper picked a peck!"), vec!["peter", "piper", "picked", "a", "peck"]);
		assert_eq!(tokenize("  'don't' stop--now "), vec!["don't", "stop", "now"]);
		assert!(tokenize("...").is_empty());
	}

	#[test]
	fn test_load_files() {
		let dir = tempfile::tempdir().unwrap();

		let dict = dir.path().join("unilex");
		let mut f = File::create(&dict).unwrap();
		writeln!(f, "she:1:PRP:ʃ.i:").unwrap();
		writeln!(f).unwrap();
		writeln!(f, "sells:1:VBZ:s.ɛ.l.z:").unwrap();
		drop(f);
		let lexicon = load_feature_lexicon(&dict).unwrap();
		assert_eq!(lexicon.len(), 2);
		assert_eq!(lexicon.pronunciation_of("sells"), Some(&Pronunciation::single("sɛlz")));

		let corpus = dir.path().join("corpus.txt");
		fs::write(&corpus, "She sells\nsea shells by the\nseashore.").unwrap();
		assert_eq!(load_corpus(&corpus, Some(3)).unwrap(), vec!["she", "sells", "sea"]);
		assert_eq!(load_corpus(&corpus, None).unwrap().len(), 7);

		fs::write(dir.path().join("brown.bin"), b"").unwrap();
		assert_eq!(list_files(dir.path(), "bin").unwrap(), vec!["brown"]);
	}
}
