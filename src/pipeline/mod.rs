//! End-to-end experiment: load → split → train → evaluate.
//!
//! Stages run in a fixed order over in-memory collections:
//!
//! 1. [`Stage::Load`]: read and normalize the labeled CSV.
//! 2. [`Stage::Split`]: shuffle and cut into train/test.
//! 3. [`Stage::Train`]: vocabulary, constants and likelihoods from the train split.
//! 4. [`Stage::Evaluate`]: classify the test split and tally outcomes.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::classify::Classifier;
use crate::config::SieveConfig;
use crate::dataset::{self, DatasetStats, LabeledExample, Split};
use crate::error::SieveResult;
use crate::metrics::{ConfusionCounts, Metrics, evaluate_with};
use crate::model::{ModelConstants, NaiveBayes};

/// Named stage of an experiment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Split,
    Train,
    Evaluate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Split => write!(f, "split"),
            Self::Train => write!(f, "train"),
            Self::Evaluate => write!(f, "evaluate"),
        }
    }
}

/// Shuffle source for a run: seeded when `seed` is set, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Outcome of one experiment run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Class balance of the full dataset.
    pub dataset: DatasetStats,
    pub train_size: usize,
    pub test_size: usize,
    pub constants: ModelConstants,
    pub counts: ConfusionCounts,
    pub metrics: Metrics,
    /// Seed used for the shuffle, if any.
    pub seed: Option<u64>,
}

/// A trained model together with the split it was trained on.
#[derive(Debug, Clone)]
pub struct TrainedRun {
    pub split: Split,
    pub model: NaiveBayes,
}

/// Split `examples` and train on the training part.
pub fn train_on_split(
    examples: Vec<LabeledExample>,
    config: &SieveConfig,
    rng: &mut StdRng,
) -> SieveResult<TrainedRun> {
    tracing::debug!(stage = %Stage::Split, rows = examples.len());
    let split = dataset::split(examples, config.split.train_ratio, rng)?;
    tracing::info!(
        train = split.train.len(),
        test = split.test.len(),
        "split dataset"
    );

    tracing::debug!(stage = %Stage::Train);
    let model = NaiveBayes::train(&split.train, config.model.alpha)?;
    Ok(TrainedRun { split, model })
}

/// Run split, training and evaluation over an already loaded dataset.
pub fn run(
    examples: Vec<LabeledExample>,
    config: &SieveConfig,
    rng: &mut StdRng,
) -> SieveResult<EvaluationReport> {
    config.validate()?;
    let stats = DatasetStats::of(&examples);
    let TrainedRun { split, model } = train_on_split(examples, config, rng)?;

    tracing::debug!(stage = %Stage::Evaluate);
    let classifier = Classifier::new(&model).with_options(config.normalize_options());
    let counts = evaluate_with(&classifier, &split.test);
    let metrics = counts.metrics();

    tracing::info!(
        total = counts.total(),
        accuracy = ?metrics.accuracy,
        precision = ?metrics.precision,
        recall = ?metrics.recall,
        f1 = ?metrics.f1,
        "evaluation complete"
    );

    Ok(EvaluationReport {
        dataset: stats,
        train_size: split.train.len(),
        test_size: split.test.len(),
        constants: *model.constants(),
        counts,
        metrics,
        seed: config.split.seed,
    })
}

/// Load a CSV dataset and run the full experiment on it.
pub fn run_file(path: &Path, config: &SieveConfig) -> SieveResult<EvaluationReport> {
    config.validate()?;
    tracing::debug!(stage = %Stage::Load, path = %path.display());
    let examples = dataset::load_csv(path, config.dataset_options())?;
    let mut rng = rng_from_seed(config.split.seed);
    run(examples, config, &mut rng)
}
