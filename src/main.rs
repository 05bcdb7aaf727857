//! spam-sieve CLI: Naive Bayes comment spam filter.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use spam_sieve::classify::{ClassificationResult, Classifier};
use spam_sieve::config::SieveConfig;
use spam_sieve::dataset::{self, DatasetStats};
use spam_sieve::model::NaiveBayes;
use spam_sieve::pipeline::{self, EvaluationReport};

/// Outcome for one input to `classify`.
enum Verdict {
    Classified(ClassificationResult),
    /// The input was not a comment; holds the reason.
    Rejected(String),
}

impl Verdict {
    fn to_json(&self, input: &str) -> serde_json::Value {
        match self {
            Self::Classified(result) => serde_json::json!({ "input": input, "result": result }),
            Self::Rejected(reason) => serde_json::json!({ "input": input, "error": reason }),
        }
    }
}

#[derive(Parser)]
#[command(name = "spam-sieve", version, about = "Naive Bayes comment spam filter")]
struct Cli {
    /// TOML config file; CLI flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that trains a model.
#[derive(Args)]
struct TrainArgs {
    /// Labeled CSV dataset.
    #[arg(long)]
    data: PathBuf,

    /// Shuffle seed for a reproducible train/test split.
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows used for training.
    #[arg(long)]
    ratio: Option<f64>,

    /// Laplace smoothing strength.
    #[arg(long)]
    alpha: Option<f64>,
}

impl TrainArgs {
    fn apply(&self, config: &mut SieveConfig) {
        if let Some(seed) = self.seed {
            config.split.seed = Some(seed);
        }
        if let Some(ratio) = self.ratio {
            config.split.train_ratio = ratio;
        }
        if let Some(alpha) = self.alpha {
            config.model.alpha = alpha;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train on the train split and report metrics on the test split.
    Evaluate {
        #[command(flatten)]
        train: TrainArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Train on the train split, then classify the given texts.
    Classify {
        #[command(flatten)]
        train: TrainArgs,

        /// JSON file holding an array of comments to classify.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,

        /// Comments to classify.
        texts: Vec<String>,
    },

    /// Show dataset class balance, vocabulary size and top spam words.
    ///
    /// The word ranking comes from a model trained on every row.
    Stats {
        /// Labeled CSV dataset.
        #[arg(long)]
        data: PathBuf,

        /// Laplace smoothing strength.
        #[arg(long)]
        alpha: Option<f64>,

        /// Number of most spam-indicative words to list.
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Write the default configuration to a TOML file.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SieveConfig::load(path)?,
        None => SieveConfig::default(),
    };

    match cli.command {
        Commands::Evaluate { train, json } => {
            train.apply(&mut config);
            let report = pipeline::run_file(&train.data, &config)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).into_diagnostic()?
                );
            } else {
                print_report(&report);
            }
        }

        Commands::Classify {
            train,
            input,
            json,
            texts,
        } => {
            train.apply(&mut config);
            config.validate()?;
            let examples = dataset::load_csv(&train.data, config.dataset_options())?;
            let mut rng = pipeline::rng_from_seed(config.split.seed);
            let run = pipeline::train_on_split(examples, &config, &mut rng)?;
            let classifier =
                Classifier::new(&run.model).with_options(config.normalize_options());

            let mut outputs: Vec<(String, Verdict)> = texts
                .iter()
                .map(|t| (t.clone(), Verdict::Classified(classifier.classify(t))))
                .collect();

            if let Some(path) = input {
                outputs.extend(classify_json_file(&classifier, &path)?);
            }

            if outputs.is_empty() {
                miette::bail!("nothing to classify: pass comments as arguments or via --input");
            }

            if json {
                let rows: Vec<serde_json::Value> = outputs
                    .iter()
                    .map(|(text, verdict)| verdict.to_json(text))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
            } else {
                for (text, verdict) in &outputs {
                    match verdict {
                        Verdict::Classified(r) => {
                            println!("{text:?}");
                            println!("  label:            {}", r.decision);
                            println!("  P(spam|comment) ∝ {:e}", r.p_spam);
                            println!("  P(ham|comment)  ∝ {:e}", r.p_ham);
                        }
                        Verdict::Rejected(reason) => println!("{text}: {reason}"),
                    }
                }
            }
        }

        Commands::Stats { data, alpha, top } => {
            if let Some(alpha) = alpha {
                config.model.alpha = alpha;
            }
            config.validate()?;
            let examples = dataset::load_csv(&data, config.dataset_options())?;
            let stats = DatasetStats::of(&examples);
            println!("Rows:  {}", stats.rows);
            println!("Spam:  {}", stats.spam);
            println!("Ham:   {}", stats.ham);

            let model = NaiveBayes::train(&examples, config.model.alpha)?;
            println!("Vocabulary: {} words", model.vocabulary().len());
            println!("Spam tokens: {}", model.constants().n_spam);
            println!("Ham tokens:  {}", model.constants().n_ham);

            let indicative = model.most_indicative(top);
            if !indicative.is_empty() {
                println!("\nMost spam-indicative words (spam/ham likelihood ratio):");
                for (i, (word, ratio)) in indicative.iter().enumerate() {
                    println!("  {}. {word} ({ratio:.3})", i + 1);
                }
            }
        }

        Commands::InitConfig { path } => {
            config.save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Classify every entry of a JSON array; non-string entries become errors.
fn classify_json_file(
    classifier: &Classifier<'_>,
    path: &Path,
) -> Result<Vec<(String, Verdict)>> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&content).into_diagnostic()?;

    Ok(values
        .iter()
        .map(|value| {
            let shown = value.to_string();
            match classifier.classify_value(value) {
                Ok(result) => (shown, Verdict::Classified(result)),
                Err(e) => {
                    tracing::warn!(input = %shown, error = %e, "skipping comment");
                    (shown, Verdict::Rejected(e.to_string()))
                }
            }
        })
        .collect())
}

fn print_report(report: &EvaluationReport) {
    let fmt_metric = |m: Option<f64>| match m {
        Some(v) => format!("{v:.4}"),
        None => "undefined".to_string(),
    };

    println!(
        "Dataset: {} rows ({} spam, {} ham)",
        report.dataset.rows, report.dataset.spam, report.dataset.ham
    );
    println!(
        "Split:   {} train / {} test{}",
        report.train_size,
        report.test_size,
        report
            .seed
            .map(|s| format!(" (seed {s})"))
            .unwrap_or_default()
    );
    println!(
        "Model:   {} words, P(spam) = {:.4}, P(ham) = {:.4}",
        report.constants.n_vocab, report.constants.p_spam, report.constants.p_ham
    );
    println!();
    println!("Confusion matrix:");
    println!("                 predicted spam  predicted ham");
    println!(
        "  actual spam    {:>14}  {:>13}",
        report.counts.true_positive, report.counts.false_negative
    );
    println!(
        "  actual ham     {:>14}  {:>13}",
        report.counts.false_positive, report.counts.true_negative
    );
    if report.counts.ties > 0 {
        println!("  ({} ties counted as ham)", report.counts.ties);
    }
    println!();
    println!("Accuracy:  {}", fmt_metric(report.metrics.accuracy));
    println!("Precision: {}", fmt_metric(report.metrics.precision));
    println!("Recall:    {}", fmt_metric(report.metrics.recall));
    println!("F1:        {}", fmt_metric(report.metrics.f1));
}
