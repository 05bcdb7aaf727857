//! Naive Bayes parameter estimation with Laplace smoothing.
//!
//! Training produces two read-only artifacts:
//!
//! - [`ModelConstants`]: class priors, per-class word-token totals, and the
//!   vocabulary size.
//! - A pair of [`ClassParameters`]: `P(word | spam)` and `P(word | ham)` for
//!   every vocabulary word, each smoothed as
//!   `(count + alpha) / (n_class + alpha * n_vocab)`.
//!
//! [`NaiveBayes`] bundles both with the vocabulary so classification can
//! borrow a single value.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{LabeledExample, partition_by_label};
use crate::error::{ModelError, ModelResult};
use crate::normalize::token_count;
use crate::vocab::{Vocabulary, build_vocabulary, count_words};

/// Default Laplace smoothing strength.
pub const DEFAULT_ALPHA: f64 = 1.0;

// ── ModelConstants ─────────────────────────────────────────────────────────

/// Per-run constants derived from the training split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelConstants {
    /// Fraction of training comments that are spam.
    pub p_spam: f64,
    /// Fraction of training comments that are ham.
    pub p_ham: f64,
    /// Total word tokens across all spam comments.
    pub n_spam: u64,
    /// Total word tokens across all ham comments.
    pub n_ham: u64,
    /// Vocabulary size.
    pub n_vocab: usize,
}

impl ModelConstants {
    /// Compute constants from class-partitioned normalized comments.
    ///
    /// Priors are fractions of `spam.len() + ham.len()`, i.e. of the same
    /// training set the vocabulary was built from.
    pub fn from_partition<S: AsRef<str>>(
        spam: &[S],
        ham: &[S],
        vocab: &Vocabulary,
    ) -> ModelResult<Self> {
        let total = spam.len() + ham.len();
        if total == 0 || vocab.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let n_tokens = |comments: &[S]| -> u64 {
            comments
                .iter()
                .map(|c| token_count(c.as_ref()) as u64)
                .sum()
        };

        Ok(Self {
            p_spam: spam.len() as f64 / total as f64,
            p_ham: ham.len() as f64 / total as f64,
            n_spam: n_tokens(spam),
            n_ham: n_tokens(ham),
            n_vocab: vocab.len(),
        })
    }
}

// ── ClassParameters ────────────────────────────────────────────────────────

/// Smoothed word likelihoods `P(word | class)` for one class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassParameters {
    likelihoods: HashMap<String, f64>,
}

impl ClassParameters {
    /// Likelihood of `word`, or `None` if the word is outside the vocabulary.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.likelihoods.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.likelihoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.likelihoods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.likelihoods.iter().map(|(w, &p)| (w.as_str(), p))
    }
}

impl FromIterator<(String, f64)> for ClassParameters {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            likelihoods: iter.into_iter().collect(),
        }
    }
}

fn check_alpha(alpha: f64) -> ModelResult<()> {
    if alpha.is_finite() && alpha > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidAlpha { alpha })
    }
}

/// Estimate Laplace-smoothed likelihoods for both classes.
///
/// Returns `(spam_params, ham_params)`. Every vocabulary word receives a
/// strictly positive likelihood under both classes, even if it never occurs
/// in one of them.
pub fn estimate<S: AsRef<str>>(
    spam: &[S],
    ham: &[S],
    vocab: &Vocabulary,
    constants: &ModelConstants,
    alpha: f64,
) -> ModelResult<(ClassParameters, ClassParameters)> {
    check_alpha(alpha)?;
    if vocab.is_empty() {
        return Err(ModelError::EmptyCorpus);
    }

    let spam_counts = count_words(spam, vocab);
    let ham_counts = count_words(ham, vocab);

    let smoothing = alpha * constants.n_vocab as f64;
    let spam_denom = constants.n_spam as f64 + smoothing;
    let ham_denom = constants.n_ham as f64 + smoothing;

    let spam_params = vocab
        .iter()
        .map(|w| (w.to_string(), (spam_counts.total(w) as f64 + alpha) / spam_denom))
        .collect();
    let ham_params = vocab
        .iter()
        .map(|w| (w.to_string(), (ham_counts.total(w) as f64 + alpha) / ham_denom))
        .collect();

    Ok((spam_params, ham_params))
}

// ── NaiveBayes ─────────────────────────────────────────────────────────────

/// A trained Naive Bayes spam model.
///
/// Immutable after [`NaiveBayes::train`]; classification borrows it.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    vocabulary: Vocabulary,
    constants: ModelConstants,
    spam: ClassParameters,
    ham: ClassParameters,
    alpha: f64,
}

impl NaiveBayes {
    /// Train on a labeled training split.
    ///
    /// Vocabulary, priors and likelihoods all come from `train` alone.
    pub fn train(train: &[LabeledExample], alpha: f64) -> ModelResult<Self> {
        check_alpha(alpha)?;
        if train.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let corpus: Vec<&str> = train.iter().map(LabeledExample::comment).collect();
        let vocabulary = build_vocabulary(&corpus);
        let (spam, ham) = partition_by_label(train);
        let constants = ModelConstants::from_partition(&spam, &ham, &vocabulary)?;
        let (spam_params, ham_params) = estimate(&spam, &ham, &vocabulary, &constants, alpha)?;

        tracing::info!(
            examples = train.len(),
            vocab = constants.n_vocab,
            n_spam = constants.n_spam,
            n_ham = constants.n_ham,
            p_spam = constants.p_spam,
            alpha,
            "trained naive bayes model"
        );

        Ok(Self {
            vocabulary,
            constants,
            spam: spam_params,
            ham: ham_params,
            alpha,
        })
    }

    /// Assemble a model from separately estimated parts.
    pub fn from_parts(
        vocabulary: Vocabulary,
        constants: ModelConstants,
        spam: ClassParameters,
        ham: ClassParameters,
        alpha: f64,
    ) -> Self {
        Self {
            vocabulary,
            constants,
            spam,
            ham,
            alpha,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    /// `P(word | spam)` for every vocabulary word.
    pub fn spam_params(&self) -> &ClassParameters {
        &self.spam
    }

    /// `P(word | ham)` for every vocabulary word.
    pub fn ham_params(&self) -> &ClassParameters {
        &self.ham
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The `n` words with the highest spam-to-ham likelihood ratio.
    ///
    /// Ties are broken by vocabulary order.
    pub fn most_indicative(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .vocabulary
            .iter()
            .filter_map(|w| Some((w, self.spam.get(w)? / self.ham.get(w)?)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}
