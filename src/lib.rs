//! # spam-sieve
//!
//! Naive Bayes spam/ham classification of short comments, with a train/test
//! evaluation harness for offline experiments.
//!
//! ## Architecture
//!
//! - **Normalization** (`normalize`): URLs → `link`, punctuation stripped, lowercase
//! - **Vocabulary** (`vocab`): first-seen-order token set and per-document word counts
//! - **Datasets** (`dataset`): CSV ingestion, spam/ham partition, seeded train/test split
//! - **Model** (`model`): class priors and Laplace-smoothed word likelihoods
//! - **Classification** (`classify`): Bayes decision rule with an explicit tie outcome
//! - **Evaluation** (`metrics`): confusion counts, accuracy, precision, recall, F1
//! - **Pipeline** (`pipeline`): load → split → train → evaluate in one call
//!
//! ## Library usage
//!
//! ```
//! use spam_sieve::classify::{Classifier, SpamDecision};
//! use spam_sieve::dataset::{Label, LabeledExample};
//! use spam_sieve::model::NaiveBayes;
//!
//! let train = vec![
//!     LabeledExample::new("Check out my channel!", Label::Spam),
//!     LabeledExample::new("Great video, thanks", Label::Ham),
//! ];
//! let model = NaiveBayes::train(&train, 1.0).unwrap();
//! let result = Classifier::new(&model).classify("my channel");
//! assert_eq!(result.decision, SpamDecision::Spam);
//! ```

pub mod classify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod vocab;
