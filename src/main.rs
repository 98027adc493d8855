use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use spam_bayes::{Corpus, TrainedModel, dataset, evaluate};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Naive Bayes email spam filter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on part of each dataset and report accuracy on the rest
    Evaluate {
        /// Dataset directories (or CSV files with --csv)
        #[arg(required = true)]
        datasets: Vec<PathBuf>,
        #[command(flatten)]
        source: Source,
        /// Share of each class used for training
        #[arg(long, default_value_t = 0.7)]
        train_ratio: f64,
        /// Seed for the shuffle; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Train on a whole dataset and score the given messages
    Score {
        #[arg(value_name = "DATASET")]
        path: PathBuf,
        #[command(flatten)]
        source: Source,
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

#[derive(Args)]
struct Source {
    /// Read datasets as `content,category` CSV files
    #[arg(long)]
    csv: bool,
}

impl Source {
    fn load(&self, path: &Path) -> anyhow::Result<Corpus> {
        let corpus = if self.csv {
            dataset::load_csv(path)
        } else {
            dataset::load_dir(path)
        };
        corpus.with_context(|| format!("failed to load dataset {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spam_bayes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Command::Evaluate {
            datasets,
            source,
            train_ratio,
            seed,
        } => {
            let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
            info!("Shuffle seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);

            for path in &datasets {
                let start = Instant::now();
                let corpus = source.load(path)?;

                let (spam_train, spam_test) = dataset::split(corpus.spam, train_ratio, &mut rng)?;
                let (ham_train, ham_test) = dataset::split(corpus.ham, train_ratio, &mut rng)?;
                println!("Ham (train:test) -> {}:{}", ham_train.len(), ham_test.len());
                println!("Spam (train:test) -> {}:{}", spam_train.len(), spam_test.len());

                let model = TrainedModel::train(&spam_train, &ham_train)
                    .with_context(|| format!("failed to train on {}", path.display()))?;
                let matrix = evaluate(&model, &spam_test, &ham_test);

                println!("\n{matrix}");
                println!("Elapsed time: {} seconds.\n", start.elapsed().as_secs());
            }
        }
        Command::Score {
            path,
            source,
            messages,
        } => {
            let corpus = source.load(&path)?;
            let model = TrainedModel::train(&corpus.spam, &corpus.ham)
                .with_context(|| format!("failed to train on {}", path.display()))?;

            for message in &messages {
                let probability = model.classify(message);
                let verdict = if probability > spam_bayes::THRESHOLD { "spam" } else { "ham" };
                println!("{probability:.4}\t{verdict}\t{message}");
            }
        }
    }

    Ok(())
}
