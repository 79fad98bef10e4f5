use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use twister_core::phonetic::features::{alphabet, feature_string};
use twister_core::{Generator, ModelKind, ModelSource, TwistMode, TwisterConfig, TwisterError, io as tio};

/// An empirically-derived tongue twister generator.
#[derive(Debug, Parser)]
#[command(name = "twister", version)]
struct Cli {
	/// Text to train on
	#[arg(short, long)]
	corpus: Option<PathBuf>,

	/// Pre-trained model snapshot
	#[arg(short, long)]
	model: Option<PathBuf>,

	/// Spelling/pronunciation dictionary (unilex format)
	#[arg(short, long)]
	pronounce: Option<PathBuf>,

	/// Number of words from the corpus to train on (-1 to use all)
	#[arg(short, long, default_value_t = 10000, allow_negative_numbers = true)]
	training_size: i64,

	/// Number of tongue twisters to output
	#[arg(short, long, default_value_t = 5)]
	num_twisters: usize,

	/// Number of words per generated twister
	#[arg(short, long, default_value_t = 2)]
	words_per_twister: usize,

	/// Generate especially non-twisty phrases
	#[arg(short, long)]
	reverse_twist: bool,

	/// Generate phrases at random (for testing)
	#[arg(short = 'R', long)]
	random: bool,

	/// Use the model to score a list of sentences from stdin
	#[arg(short, long)]
	score: bool,

	/// JSON file overriding the model constants
	#[arg(long)]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info")]
	log_level: log::LevelFilter,

	/// Seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,

	/// Print the feature table and exit
	#[arg(long)]
	explain: bool,
}

impl Cli {
	fn training_size(&self) -> Option<usize> {
		usize::try_from(self.training_size).ok()
	}

	fn mode(&self) -> TwistMode {
		if self.reverse_twist { TwistMode::Reverse } else { TwistMode::Normal }
	}

	/// Picks the model from the flags, in order: `--random`, `--model`,
	/// `--corpus`, then the feature model.
	fn source(&self) -> Result<ModelSource> {
		if let (Some(model), false) = (&self.model, self.random) {
			return Ok(ModelSource::Snapshot(model.clone()));
		}
		let pronunciations = self
			.pronounce
			.clone()
			.context("a pronunciation dictionary (-p) is required unless a model (-m) is given")?;

		Ok(if self.random {
			ModelSource::Dictionary { kind: ModelKind::Random, pronunciations }
		} else if let Some(corpus) = &self.corpus {
			ModelSource::Corpus { pronunciations, corpus: corpus.clone(), training_size: self.training_size() }
		} else {
			ModelSource::Dictionary { kind: ModelKind::Feature, pronunciations }
		})
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::from_default_env().filter_level(cli.log_level).init();

	if cli.explain {
		for symbol in alphabet() {
			println!("{symbol}  {}", feature_string(symbol)?);
		}
		return Ok(());
	}

	let config = match &cli.config {
		Some(path) => TwisterConfig::load(path).with_context(|| format!("reading {}", path.display()))?,
		None => TwisterConfig::default(),
	};

	let source = cli.source()?;
	let generator = Generator::open(&source, &config)?;

	if let ModelSource::Corpus { corpus, .. } = &source {
		if let Some(model) = generator.as_markov() {
			let output = tio::build_output_path(corpus, "bin")?;
			model.save(&output)?;
			info!("Reuse it with -m {}", output.display());
		}
	}

	let mut rng = match cli.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_rng(&mut rand::rng()),
	};

	if cli.score {
		info!("Scoring sentences from stdin...");
		for line in io::stdin().lock().lines() {
			print_score(&generator, &line?)?;
		}
	} else {
		info!("Making {} twisters...", cli.num_twisters);
		for _ in 0..cli.num_twisters {
			let twister = generator.generate(cli.words_per_twister, cli.mode(), &mut rng)?;
			println!("{twister}");
		}
	}

	Ok(())
}

fn print_score(generator: &Generator, line: &str) -> Result<()> {
	let tokens = tio::tokenize(line);
	if tokens.is_empty() {
		return Ok(());
	}
	match generator.score_sentence(&tokens) {
		Ok(score) => println!("{} => {score}", line.trim()),
		Err(TwisterError::UnknownWord(word)) => println!("Unknown word: {word}"),
		Err(e @ TwisterError::Unsupported { .. }) => bail!(e),
		Err(e) => warn!("Could not score '{}': {e}", line.trim()),
	}
	Ok(())
}
