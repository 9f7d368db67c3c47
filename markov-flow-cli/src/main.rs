//! Command-line front end for the Markov sentence pipeline.
//!
//! Two modes share one trained model:
//! - **direct**: write generated sentences straight to an output file.
//! - **queued** (`--queue HOST:PORT`): stream sentences through the
//!   flow-controlled pipeline into a remote bounded list, forwarding
//!   what the consumer drains to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use markov_flow_core::chain::builder::ChainBuilder;
use markov_flow_core::chain::generator::SentenceGenerator;
use markov_flow_core::chain::model::ChainModel;
use markov_flow_core::flow::{DEFAULT_BATCH, Pipeline, PipelineConfig};
use markov_flow_core::queue::{
	DEFAULT_QUEUE_KEY, MAX_STORED_STRINGS, MIN_STORED_STRINGS, QueueGauge, RedisQueue,
};

#[derive(Parser, Debug)]
#[command(
	name = "markov-flow",
	about = "Train a prefix-chain model from a corpus and stream generated sentences"
)]
struct Cli {
	/// Corpus file to train on
	#[arg(long, value_name = "PATH", default_value = "corpus.txt")]
	corpus: PathBuf,

	/// Output file (direct mode)
	#[arg(long, value_name = "PATH", default_value = "output.txt")]
	output: PathBuf,

	/// Queue endpoint; selects queued mode
	#[arg(long, value_name = "HOST:PORT")]
	queue: Option<String>,

	/// List key in the queue backend
	#[arg(long, value_name = "KEY", default_value = DEFAULT_QUEUE_KEY)]
	key: String,

	/// Number of sentences to generate (direct) or forward (queued)
	#[arg(long, default_value_t = 100)]
	sentences: usize,

	/// Maximum number of words in generated sentences
	#[arg(long, default_value_t = 8)]
	max_words: usize,

	/// Prefix length in words
	#[arg(long, default_value_t = 2)]
	prefix_len: usize,

	/// Build workers; defaults to the available execution units
	#[arg(long, value_name = "COUNT")]
	workers: Option<usize>,

	/// Occupancy at or below which the consumer halts
	#[arg(long, default_value_t = MIN_STORED_STRINGS)]
	low: usize,

	/// Occupancy at or above which the producer halts
	#[arg(long, default_value_t = MAX_STORED_STRINGS)]
	full: usize,

	/// Sentences pushed per producer tick (queued mode)
	#[arg(long, default_value_t = DEFAULT_BATCH)]
	batch: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let cli = Cli::parse();

	let mut builder = ChainBuilder::new(cli.prefix_len)?;
	if let Some(workers) = cli.workers {
		builder = builder.workers(workers);
	}
	// An unreadable corpus aborts here, before any build work.
	let model = builder.build_from_file(&cli.corpus)?;

	match &cli.queue {
		Some(endpoint) => run_queued(&cli, endpoint, model),
		None => run_direct(&cli, &model),
	}
}

/// Queued mode: pace generation against the remote list's fill level
/// and forward whatever the consumer drains to stdout.
fn run_queued(cli: &Cli, endpoint: &str, model: ChainModel) -> Result<(), Box<dyn std::error::Error>> {
	let queue = RedisQueue::connect(endpoint, &cli.key)?;
	let gauge = QueueGauge::new(queue, cli.low, cli.full)?;

	let config = PipelineConfig { batch: cli.batch, max_words: cli.max_words, seed: None };
	let pipeline = Pipeline::spawn(Arc::new(model), gauge, config);

	let stdout = io::stdout();
	let mut sink = BufWriter::new(stdout.lock());
	let mut forwarded = 0;
	while forwarded < cli.sentences {
		match pipeline.output().recv() {
			Ok(Ok(line)) => {
				writeln!(sink, "{line}")?;
				forwarded += 1;
			}
			Ok(Err(err)) => error!("queue failure: {err}"),
			Err(_) => break,
		}
	}
	sink.flush()?;

	pipeline.shutdown();
	info!("forwarded {forwarded} sentences from the queue");
	Ok(())
}

/// Direct mode: generate straight into the output file.
fn run_direct(cli: &Cli, model: &ChainModel) -> Result<(), Box<dyn std::error::Error>> {
	let mut writer = BufWriter::new(File::create(&cli.output)?);
	let generator = SentenceGenerator::new(model);
	let mut rng = StdRng::from_os_rng();

	generator.write_sentences(&mut rng, cli.sentences, cli.max_words, &mut writer)?;
	writer.flush()?;

	info!("output successfully written to {}", cli.output.display());
	Ok(())
}
