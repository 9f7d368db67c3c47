use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use markov_flow_core::chain::builder::ChainBuilder;
use markov_flow_core::chain::generator::SentenceGenerator;
use markov_flow_core::chain::tokenizer::tokenize;
use markov_flow_core::flow::{Pipeline, PipelineConfig};
use markov_flow_core::queue::{MemoryQueue, QueueGauge};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A tiny corpus; real runs read a file through ChainBuilder::build_from_file
    let corpus = "the cat sat on the mat the dog sat on the rug \
                  the cat ran to the dog and the dog ran to the mat";
    let words = tokenize(corpus);

    // One worker reproduces the lossless sequential build; more workers
    // shard the corpus and drop the transitions spanning shard boundaries
    let model = ChainBuilder::new(1)?.workers(1).build(&words)?;
    println!("model holds {} observations", model.observation_count());

    // Direct generation: the caller owns the RNG, so runs are repeatable
    let generator = SentenceGenerator::new(&model);
    let mut rng = StdRng::seed_from_u64(42);
    for i in 0..5 {
        println!("direct sentence {}: {}", i + 1, generator.sentence(&mut rng, 6));
    }

    // Queued mode against the in-memory backend:
    // - the producer pushes batches until occupancy reaches 'full' (32)
    // - the consumer drains and forwards until occupancy falls to 'low' (0)
    // - each role wakes the other over the shared sync channel
    let gauge = QueueGauge::new(MemoryQueue::new(), 0, 32)?;
    let config = PipelineConfig { batch: 4, max_words: 6, seed: Some(42) };
    let pipeline = Pipeline::spawn(Arc::new(model), gauge, config);

    for i in 0..10 {
        match pipeline.output().recv()? {
            Ok(line) => println!("queued sentence {}: {}", i + 1, line),
            Err(err) => println!("queue failure: {}", err),
        }
    }

    // Cancels both roles, waits for their acknowledgments, joins them
    pipeline.shutdown();

    Ok(())
}
