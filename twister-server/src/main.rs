use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use twister_core::io::list_files;
use twister_core::{Generator, ModelKind, ModelSource, TwistMode, TwisterConfig, TwisterError, io};

/// HTTP API over a tongue twister model.
#[derive(Debug, Parser)]
#[command(name = "twister-server", version)]
struct Args {
	/// Address to bind to
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to listen on
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Directory holding model snapshots (`*.bin`)
	#[arg(long, default_value = "./data")]
	data_dir: PathBuf,

	/// Snapshot to serve at startup (a name from the data directory)
	#[arg(short, long)]
	model: Option<String>,

	/// Spelling/pronunciation dictionary, used when no snapshot is given
	#[arg(short, long)]
	pronounce: Option<PathBuf>,

	/// Text to train on, together with the dictionary
	#[arg(short, long)]
	corpus: Option<PathBuf>,

	/// Number of corpus words to train on (all by default)
	#[arg(short, long)]
	training_size: Option<usize>,

	/// JSON file overriding the model constants
	#[arg(long)]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info")]
	log_level: log::LevelFilter,
}

impl Args {
	fn source(&self) -> Option<ModelSource> {
		if let Some(name) = &self.model {
			return Some(ModelSource::Snapshot(snapshot_path(&self.data_dir, name)));
		}
		let pronunciations = self.pronounce.clone()?;
		Some(match &self.corpus {
			Some(corpus) => ModelSource::Corpus {
				pronunciations,
				corpus: corpus.clone(),
				training_size: self.training_size,
			},
			None => ModelSource::Dictionary { kind: ModelKind::Feature, pronunciations },
		})
	}
}

/// Query parameters of `/v1/generate`
#[derive(Deserialize)]
struct GenerateParams {
	words: Option<usize>,
	mode: Option<String>,
}

#[derive(Deserialize)]
struct ScoreParams {
	sentence: Option<String>,
}

#[derive(Deserialize)]
struct ModelQuery {
	name: Option<String>,
}

#[derive(Serialize)]
struct TwisterResponse<'a> {
	model: ModelKind,
	mode: TwistMode,
	spellings: &'a [String],
	pronunciations: Vec<String>,
	text: String,
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
	sentence: &'a str,
	score: f64,
}

#[derive(Serialize)]
struct ErrorResponse {
	error: String,
}

struct SharedData {
	generator: Option<Generator>,
	config: TwisterConfig,
	data_dir: PathBuf,
}

/// Upper bound on `words`, so one request cannot run away.
const MAX_WORDS: usize = 64;

fn snapshot_path(data_dir: &std::path::Path, name: &str) -> PathBuf {
	data_dir.join(format!("{name}.bin"))
}

fn error_body(status: actix_web::http::StatusCode, message: impl ToString) -> HttpResponse {
	HttpResponse::build(status).json(ErrorResponse { error: message.to_string() })
}

/// Maps a core error to an HTTP response.
///
/// - unsupported operations and bad parameters: 400
/// - words missing from the lexicon: 422
/// - everything else: 500
fn twister_error(e: TwisterError) -> HttpResponse {
	use actix_web::http::StatusCode;
	let status = match e {
		TwisterError::Unsupported { .. } | TwisterError::InvalidMode(_) => StatusCode::BAD_REQUEST,
		TwisterError::UnknownWord(_) => StatusCode::UNPROCESSABLE_ENTITY,
		_ => StatusCode::INTERNAL_SERVER_ERROR,
	};
	error_body(status, e)
}

fn no_model() -> HttpResponse {
	error_body(actix_web::http::StatusCode::SERVICE_UNAVAILABLE, "No model loaded")
}

fn lock_failed() -> HttpResponse {
	error_body(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Model lock failed")
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one twister of `words` words (default 2) in the given `mode`
/// (`normal`, `reverse` or `random`; default `normal`).
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let words = query.words.unwrap_or(2);
	if words > MAX_WORDS {
		return error_body(
			actix_web::http::StatusCode::BAD_REQUEST,
			format!("At most {MAX_WORDS} words per twister"),
		);
	}
	let mode = match query.mode.as_deref().map(str::parse::<TwistMode>).transpose() {
		Ok(mode) => mode.unwrap_or_default(),
		Err(e) => return twister_error(e),
	};

	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return lock_failed(),
	};
	let Some(generator) = &shared_data.generator else {
		return no_model();
	};

	match generator.generate(words, mode, &mut rand::rng()) {
		Ok(twister) => HttpResponse::Ok().json(TwisterResponse {
			model: generator.kind(),
			mode,
			spellings: &twister.spellings,
			pronunciations: twister.pronunciations.iter().map(ToString::to_string).collect(),
			text: twister.to_string(),
		}),
		Err(e) => twister_error(e),
	}
}

/// HTTP GET endpoint `/v1/score`
///
/// Scores a free-text sentence. Only Markov models can score.
#[get("/v1/score")]
async fn get_score(data: web::Data<RwLock<SharedData>>, query: web::Query<ScoreParams>) -> impl Responder {
	let sentence = match &query.sentence {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return error_body(actix_web::http::StatusCode::BAD_REQUEST, "Missing or empty sentence"),
	};
	let tokens = io::tokenize(sentence);

	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return lock_failed(),
	};
	let Some(generator) = &shared_data.generator else {
		return no_model();
	};

	match generator.score_sentence(&tokens) {
		Ok(score) => HttpResponse::Ok().json(ScoreResponse { sentence, score }),
		Err(e) => twister_error(e),
	}
}

/// HTTP GET endpoint `/v1/models`
///
/// Lists the snapshots available in the data directory.
#[get("/v1/models")]
async fn get_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let data_dir = match data.read() {
		Ok(d) => d.data_dir.clone(),
		Err(_) => return lock_failed(),
	};
	match list_files(&data_dir, "bin") {
		Ok(files) => HttpResponse::Ok().json(files),
		Err(e) => {
			error!("Failed to list {}: {e}", data_dir.display());
			error_body(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Failed to list models")
		}
	}
}

/// HTTP PUT endpoint `/v1/load_model`
///
/// Replaces the served model with the snapshot `name` from the data
/// directory. The previous model keeps serving if loading fails.
#[put("/v1/load_model")]
async fn put_model(data: web::Data<RwLock<SharedData>>, query: web::Query<ModelQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return error_body(actix_web::http::StatusCode::BAD_REQUEST, "Missing or empty model name"),
	};
	if name.contains(['/', '\\']) || name.starts_with('.') {
		return error_body(actix_web::http::StatusCode::BAD_REQUEST, "Invalid model name");
	}

	let (path, config) = match data.read() {
		Ok(d) => (snapshot_path(&d.data_dir, name), d.config.clone()),
		Err(_) => return lock_failed(),
	};
	// load outside the lock, requests keep being served meanwhile
	let generator = match Generator::open(&ModelSource::Snapshot(path), &config) {
		Ok(g) => g,
		Err(TwisterError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
			return error_body(actix_web::http::StatusCode::NOT_FOUND, format!("No model named '{name}'"));
		}
		Err(e) => return twister_error(e),
	};

	match data.write() {
		Ok(mut d) => d.generator = Some(generator),
		Err(_) => return lock_failed(),
	}
	info!("Now serving model '{name}'");
	HttpResponse::Ok().json(serde_json::json!({ "loaded": name }))
}

/// Main entry point for the server.
///
/// Builds the initial model from the command line (if any), wraps it in a
/// `RwLock` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let args = Args::parse();
	env_logger::Builder::from_default_env().filter_level(args.log_level).init();

	let config = match &args.config {
		Some(path) => TwisterConfig::load(path).map_err(std::io::Error::other)?,
		None => TwisterConfig::default(),
	};
	let generator = match args.source() {
		Some(source) => Some(Generator::open(&source, &config).map_err(std::io::Error::other)?),
		None => {
			info!("No model given, waiting for PUT /v1/load_model");
			None
		}
	};

	let shared_data = SharedData { generator, config, data_dir: args.data_dir.clone() };
	let shared_model = web::Data::new(RwLock::new(shared_data));

	info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_score)
			.service(get_models)
			.service(put_model)
	})
	.bind((args.host.as_str(), args.port))?
	.run()
	.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;
	use twister_core::model::{MarkovModel, RandomModel};
	use twister_core::{Lexicon, Pronunciation};

	fn lexicon() -> Lexicon {
		let mut lexicon = Lexicon::new();
		lexicon.insert("red", Pronunciation::new(["rɛd"]), ["JJ"]);
		lexicon.insert("lorry", Pronunciation::new(["lɑ", "ri"]), ["NN"]);
		lexicon.insert("yellow", Pronunciation::new(["jɛ", "lo"]), ["JJ"]);
		lexicon
	}

	fn markov_model() -> MarkovModel {
		let corpus = "red lorry yellow lorry".split(' ');
		MarkovModel::train(lexicon(), corpus, TwisterConfig::default()).unwrap()
	}

	fn markov() -> Generator {
		markov_model().into()
	}

	fn shared(generator: Option<Generator>, data_dir: PathBuf) -> web::Data<RwLock<SharedData>> {
		web::Data::new(RwLock::new(SharedData { generator, config: TwisterConfig::default(), data_dir }))
	}

	macro_rules! app {
		($data:expr) => {
			test::init_service(
				App::new()
					.app_data($data.clone())
					.service(get_generated)
					.service(get_score)
					.service(get_models)
					.service(put_model),
			)
			.await
		};
	}

	#[actix_web::test]
	async fn test_generate() {
		let data = shared(Some(markov()), PathBuf::from("."));
		let app = app!(data);

		let req = test::TestRequest::get().uri("/v1/generate?words=3&mode=reverse").to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["model"], "markov");
		assert_eq!(body["mode"], "reverse");
		assert_eq!(body["spellings"].as_array().unwrap().len(), 3);

		let req = test::TestRequest::get().uri("/v1/generate?mode=sideways").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_score() {
		let data = shared(Some(markov()), PathBuf::from("."));
		let app = app!(data);

		let req = test::TestRequest::get().uri("/v1/score?sentence=red%20lorry").to_request();
		let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert!(body["score"].as_f64().unwrap() > 0.0);

		let req = test::TestRequest::get().uri("/v1/score?sentence=blue%20lorry").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNPROCESSABLE_ENTITY);

		let req = test::TestRequest::get().uri("/v1/score").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_score_unsupported() {
		let data = shared(Some(RandomModel::new(lexicon()).into()), PathBuf::from("."));
		let app = app!(data);
		let req = test::TestRequest::get().uri("/v1/score?sentence=red%20lorry").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_no_model() {
		let data = shared(None, PathBuf::from("."));
		let app = app!(data);
		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SERVICE_UNAVAILABLE);
	}

	#[actix_web::test]
	async fn test_list_and_load_models() {
		let dir = tempfile::tempdir().unwrap();
		markov_model().save(dir.path().join("lorry.bin")).unwrap();

		let data = shared(Some(RandomModel::new(lexicon()).into()), dir.path().to_path_buf());
		let app = app!(data);

		let req = test::TestRequest::get().uri("/v1/models").to_request();
		let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body, vec!["lorry"]);

		let req = test::TestRequest::put().uri("/v1/load_model?name=missing").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

		let req = test::TestRequest::put().uri("/v1/load_model?name=lorry").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
		assert_eq!(data.read().unwrap().generator.as_ref().map(Generator::kind), Some(ModelKind::Markov));
	}
}
