//! Naive Bayes classification of a single comment.
//!
//! The comment is normalized, split into tokens, and each class score starts
//! at the class prior and is multiplied by the likelihood of every token the
//! class knows. Tokens outside the vocabulary contribute no factor.
//!
//! Products are computed directly and reported as-is. The decision compares
//! them directly while both are positive normal floats; once either product
//! underflows, the summed log-likelihoods decide instead, which agrees with
//! the direct comparison whenever that comparison is representable.

use serde::Serialize;
use serde_json::Value;

use crate::dataset::{Label, LabeledExample};
use crate::error::{ClassifyError, ClassifyResult};
use crate::model::{ClassParameters, ModelConstants, NaiveBayes};
use crate::normalize::{NormalizeOptions, normalize_with, tokens};

// ── SpamDecision ───────────────────────────────────────────────────────────

/// Outcome of the Bayes decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamDecision {
    Spam,
    Ham,
    /// Both class scores are exactly equal.
    Tie,
}

impl SpamDecision {
    /// The predicted label, or `None` for a tie.
    pub fn label(self) -> Option<Label> {
        match self {
            Self::Spam => Some(Label::Spam),
            Self::Ham => Some(Label::Ham),
            Self::Tie => None,
        }
    }
}

impl std::fmt::Display for SpamDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spam => write!(f, "spam"),
            Self::Ham => write!(f, "ham"),
            Self::Tie => write!(f, "tie"),
        }
    }
}

// ── ClassificationResult ───────────────────────────────────────────────────

/// Decision plus the unnormalized class scores behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub decision: SpamDecision,
    /// `P(spam) * Π P(word | spam)` over known tokens.
    pub p_spam: f64,
    /// `P(ham) * Π P(word | ham)` over known tokens.
    pub p_ham: f64,
    /// `ln P(spam) + Σ ln P(word | spam)`.
    pub log_spam: f64,
    /// `ln P(ham) + Σ ln P(word | ham)`.
    pub log_ham: f64,
}

fn decide(p_spam: f64, p_ham: f64, log_spam: f64, log_ham: f64) -> SpamDecision {
    let (a, b) = if p_spam.is_normal() && p_ham.is_normal() {
        (p_spam, p_ham)
    } else {
        (log_spam, log_ham)
    };
    if a > b {
        SpamDecision::Spam
    } else if a < b {
        SpamDecision::Ham
    } else {
        SpamDecision::Tie
    }
}

/// Classify `text` against explicit constants and class parameters.
pub fn classify(
    text: &str,
    constants: &ModelConstants,
    spam_params: &ClassParameters,
    ham_params: &ClassParameters,
) -> ClassificationResult {
    classify_with(
        text,
        constants,
        spam_params,
        ham_params,
        NormalizeOptions::default(),
    )
}

/// Like [`classify`], with explicit normalization options.
pub fn classify_with(
    text: &str,
    constants: &ModelConstants,
    spam_params: &ClassParameters,
    ham_params: &ClassParameters,
    options: NormalizeOptions,
) -> ClassificationResult {
    let comment = normalize_with(text, options);

    let mut p_spam = constants.p_spam;
    let mut p_ham = constants.p_ham;
    let mut log_spam = constants.p_spam.ln();
    let mut log_ham = constants.p_ham.ln();

    for word in tokens(&comment) {
        if let Some(p) = spam_params.get(word) {
            p_spam *= p;
            log_spam += p.ln();
        }
        if let Some(p) = ham_params.get(word) {
            p_ham *= p;
            log_ham += p.ln();
        }
    }

    ClassificationResult {
        decision: decide(p_spam, p_ham, log_spam, log_ham),
        p_spam,
        p_ham,
        log_spam,
        log_ham,
    }
}

// ── Classifier ─────────────────────────────────────────────────────────────

/// Stateless classifier borrowing a trained model.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'m> {
    model: &'m NaiveBayes,
    options: NormalizeOptions,
}

impl<'m> Classifier<'m> {
    pub fn new(model: &'m NaiveBayes) -> Self {
        Self {
            model,
            options: NormalizeOptions::default(),
        }
    }

    /// Override how query text is normalized before scoring.
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &'m NaiveBayes {
        self.model
    }

    /// Classify a piece of text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        classify_with(
            text,
            self.model.constants(),
            self.model.spam_params(),
            self.model.ham_params(),
            self.options,
        )
    }

    /// Classify raw bytes, rejecting anything that is not UTF-8 text.
    pub fn classify_bytes(&self, raw: &[u8]) -> ClassifyResult<ClassificationResult> {
        let text = std::str::from_utf8(raw).map_err(|e| ClassifyError::InvalidInput {
            reason: format!("input is not valid UTF-8: {e}"),
        })?;
        Ok(self.classify(text))
    }

    /// Classify a JSON value, which must be a string.
    pub fn classify_value(&self, value: &Value) -> ClassifyResult<ClassificationResult> {
        match value {
            Value::String(text) => Ok(self.classify(text)),
            other => Err(ClassifyError::InvalidInput {
                reason: format!("expected a string, got {}", json_kind(other)),
            }),
        }
    }

    /// Classify every example's comment, in order.
    pub fn classify_all(&self, examples: &[LabeledExample]) -> Vec<ClassificationResult> {
        examples
            .iter()
            .map(|ex| self.classify(ex.comment()))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
