//! Evaluation against ground truth: confusion counts and derived metrics.
//!
//! Spam is the positive class. A [`SpamDecision::Tie`] is not a positive
//! prediction, so it is scored as a ham prediction and also tallied in
//! [`ConfusionCounts::ties`].

use serde::Serialize;

use crate::classify::{Classifier, SpamDecision, classify};
use crate::dataset::{Label, LabeledExample};
use crate::error::{MetricError, MetricResult};
use crate::model::{ClassParameters, ModelConstants};

// ── ConfusionCounts ────────────────────────────────────────────────────────

/// 2x2 tally of predicted vs. actual classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    /// Predictions where both class scores were equal (already counted as ham).
    pub ties: usize,
}

impl ConfusionCounts {
    /// Record one prediction against its ground truth.
    pub fn record(&mut self, actual: Label, decision: SpamDecision) {
        if decision == SpamDecision::Tie {
            self.ties += 1;
        }
        let predicted_spam = decision == SpamDecision::Spam;
        match (actual, predicted_spam) {
            (Label::Spam, true) => self.true_positive += 1,
            (Label::Spam, false) => self.false_negative += 1,
            (Label::Ham, true) => self.false_positive += 1,
            (Label::Ham, false) => self.true_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// `(tp + tn) / (tp + tn + fp + fn)`
    pub fn accuracy(&self) -> MetricResult<f64> {
        ratio(
            "accuracy",
            self.true_positive + self.true_negative,
            self.total(),
        )
    }

    /// `tp / (tp + fp)`
    pub fn precision(&self) -> MetricResult<f64> {
        ratio(
            "precision",
            self.true_positive,
            self.true_positive + self.false_positive,
        )
    }

    /// `tp / (tp + fn)`
    pub fn recall(&self) -> MetricResult<f64> {
        ratio(
            "recall",
            self.true_positive,
            self.true_positive + self.false_negative,
        )
    }

    /// `2 * precision * recall / (precision + recall)`
    ///
    /// Undefined when precision or recall is undefined, or both are zero.
    pub fn f1(&self) -> MetricResult<f64> {
        let undefined = || MetricError::Undefined { metric: "f1" };
        let precision = self.precision().map_err(|_| undefined())?;
        let recall = self.recall().map_err(|_| undefined())?;
        let sum = precision + recall;
        if sum == 0.0 {
            return Err(undefined());
        }
        Ok(2.0 * precision * recall / sum)
    }

    /// All four metrics, `None` where undefined.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            accuracy: self.accuracy().ok(),
            precision: self.precision().ok(),
            recall: self.recall().ok(),
            f1: self.f1().ok(),
        }
    }
}

fn ratio(metric: &'static str, numerator: usize, denominator: usize) -> MetricResult<f64> {
    if denominator == 0 {
        return Err(MetricError::Undefined { metric });
    }
    Ok(numerator as f64 / denominator as f64)
}

/// Derived metrics of a [`ConfusionCounts`]; `None` marks an undefined metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub accuracy: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

// ── Evaluation ─────────────────────────────────────────────────────────────

/// Classify every test example and tally the outcomes.
pub fn evaluate(
    test_set: &[LabeledExample],
    constants: &ModelConstants,
    spam_params: &ClassParameters,
    ham_params: &ClassParameters,
) -> ConfusionCounts {
    test_set
        .iter()
        .fold(ConfusionCounts::default(), |mut counts, ex| {
            let result = classify(ex.comment(), constants, spam_params, ham_params);
            counts.record(ex.label(), result.decision);
            counts
        })
}

/// Like [`evaluate`], using a configured [`Classifier`].
pub fn evaluate_with(classifier: &Classifier<'_>, test_set: &[LabeledExample]) -> ConfusionCounts {
    let mut counts = ConfusionCounts::default();
    for (ex, result) in test_set.iter().zip(classifier.classify_all(test_set)) {
        counts.record(ex.label(), result.decision);
    }
    tracing::debug!(
        total = counts.total(),
        tp = counts.true_positive,
        tn = counts.true_negative,
        fp = counts.false_positive,
        fn_ = counts.false_negative,
        ties = counts.ties,
        "evaluated test split"
    );
    counts
}
