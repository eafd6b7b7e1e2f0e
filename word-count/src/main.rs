use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use fanout_task_channels::Dispatcher;
use rand::Rng;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(about = "Fan chunks of generated text out to workers and tally word counts")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of workers
    #[arg(long)]
    workers: Option<usize>,

    /// Treat chunks containing this word as failing, to show the
    /// tag-and-continue failure policy
    #[arg(long)]
    fail_on: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Config {
    num_lines: usize,
    words_per_line: usize,
    vocabulary_size: usize,
    word_length: usize,
    chunk_size: usize,
    num_workers: usize,
}

impl Config {
    fn load(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_lines: 100_000,
            words_per_line: 12,
            vocabulary_size: 500,
            word_length: 4,
            chunk_size: 1_000,
            num_workers: 8,
        }
    }
}

#[derive(Debug)]
enum ChunkError {
    Poisoned(String),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::Poisoned(word) => write!(f, "chunk contains poisoned word '{}'", word),
        }
    }
}

impl std::error::Error for ChunkError {}

fn generate_word(rng: &mut impl Rng, length: usize) -> String {
    (0..length)
        .map(|_| {
            let c = rng.random_range(b'a'..=b'z');
            c as char
        })
        .collect()
}

/// Count word occurrences in one chunk of lines
fn count_words(lines: &[String], fail_on: Option<&str>) -> Result<HashMap<String, usize>, ChunkError> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for line in lines {
        for word in line.split_whitespace() {
            if fail_on == Some(word) {
                return Err(ChunkError::Poisoned(word.to_string()));
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let start_time = Instant::now();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(workers) = args.workers {
        config.num_workers = workers;
    }

    println!("=== WORD COUNT ===");
    println!("Configuration:");
    println!("  - Lines: {}", config.num_lines);
    println!("  - Words per line: {}", config.words_per_line);
    println!("  - Vocabulary: {}", config.vocabulary_size);
    println!("  - Chunk size: {}", config.chunk_size);
    println!("  - Workers: {}", config.num_workers);
    println!("\nGenerating data...");

    let mut rng = rand::rng();

    let vocabulary: Vec<String> = (0..config.vocabulary_size)
        .map(|_| generate_word(&mut rng, config.word_length))
        .collect();

    let lines: Vec<String> = (0..config.num_lines)
        .map(|_| {
            (0..config.words_per_line)
                .map(|_| vocabulary[rng.random_range(0..vocabulary.len())].as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let chunks: Vec<Vec<String>> = lines
        .chunks(config.chunk_size)
        .map(|chunk| chunk.to_vec())
        .collect();

    println!(
        "Generated {} lines in {} chunks",
        config.num_lines,
        chunks.len()
    );
    println!("\nDispatching...");

    let dispatcher = Dispatcher::new(config.num_workers)?;
    let cancel_token = dispatcher.cancellation_token();

    // Ctrl+C stops the feed and lets in-flight chunks finish
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n\n=== Ctrl+C received, stopping dispatch ===");
            ctrl_c_token.cancel();
        }
    });

    let fail_on = args.fail_on.clone();
    let mut results = dispatcher.dispatch(chunks, move |chunk: Vec<String>| {
        count_words(&chunk, fail_on.as_deref())
    });

    let mut totals: HashMap<String, usize> = HashMap::new();
    let mut failures: Vec<(u64, ChunkError)> = Vec::new();

    while let Some(outcome) = results.recv().await {
        match outcome.outcome {
            Ok(counts) => {
                for (word, count) in counts {
                    *totals.entry(word).or_insert(0) += count;
                }
            }
            Err(e) => failures.push((outcome.seq, e)),
        }
    }

    println!("\n=== RESULTS ===");
    let mut sorted_totals: Vec<_> = totals.iter().collect();
    sorted_totals.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (word, count) in sorted_totals.iter().take(20) {
        println!("{}: {}", word, count);
    }
    if sorted_totals.len() > 20 {
        println!("... ({} more words)", sorted_totals.len() - 20);
    }

    if !failures.is_empty() {
        println!("\n{} chunks failed:", failures.len());
        for (seq, error) in &failures {
            println!("  chunk {}: {}", seq, error);
        }
    }

    let elapsed = start_time.elapsed();
    println!("\n=== DONE ===");
    println!("Total time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
