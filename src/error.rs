//! Rich diagnostic error types for spam-sieve.
//!
//! Each pipeline stage defines its own error type with miette `#[diagnostic]`
//! derives, so a failed experiment reports what went wrong and how to fix it.

// Fields such as `row` and `path` are read only by the generated Display and
// Diagnostic impls, which rustc's unused_assignments lint does not see.
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for spam-sieve.
///
/// Each variant wraps a stage-specific error, preserving its diagnostic code
/// and help text through to the CLI.
#[derive(Debug, Error, Diagnostic)]
pub enum SieveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("failed to open dataset: {path}")]
    #[diagnostic(
        code(sieve::dataset::io),
        help("Check that the CSV file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in dataset: {message}")]
    #[diagnostic(
        code(sieve::dataset::csv),
        help(
            "The file could not be parsed as CSV. Check quoting and that the file \
             is UTF-8 encoded."
        )
    )]
    Csv { message: String },

    #[error("malformed row {row}: expected at least {expected} columns, found {found}")]
    #[diagnostic(
        code(sieve::dataset::malformed_row),
        help(
            "After dropping the leading metadata columns each row must still hold \
             the comment text and its label. Check `dataset.skip_columns` in the config."
        )
    )]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid label {label:?} in row {row}")]
    #[diagnostic(
        code(sieve::dataset::invalid_label),
        help("Labels must be \"0\" (ham) or \"1\" (spam).")
    )]
    InvalidLabel { row: usize, label: String },

    #[error("invalid train ratio {ratio}")]
    #[diagnostic(
        code(sieve::dataset::invalid_ratio),
        help("The train ratio must be a number in (0, 1], e.g. 0.8 for an 80/20 split.")
    )]
    InvalidRatio { ratio: f64 },
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("cannot estimate parameters from an empty training corpus")]
    #[diagnostic(
        code(sieve::model::empty_corpus),
        help(
            "The training split holds no examples or no word tokens, so priors and \
             likelihoods are undefined. Use a larger dataset or a higher train ratio."
        )
    )]
    EmptyCorpus,

    #[error("invalid smoothing strength alpha = {alpha}")]
    #[diagnostic(
        code(sieve::model::invalid_alpha),
        help("Laplace smoothing needs a finite alpha greater than zero; 1.0 is the usual choice.")
    )]
    InvalidAlpha { alpha: f64 },
}

// ---------------------------------------------------------------------------
// Classification errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClassifyError {
    #[error("invalid input: {reason}")]
    #[diagnostic(
        code(sieve::classify::invalid_input),
        help("Only UTF-8 text can be classified. Pass the comment as a string.")
    )]
    InvalidInput { reason: String },
}

// ---------------------------------------------------------------------------
// Metric errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MetricError {
    #[error("{metric} is undefined: its denominator is zero")]
    #[diagnostic(
        code(sieve::metric::undefined),
        help(
            "The test split has no cases that this metric can be computed over \
             (e.g. no positive predictions for precision). Evaluate on more data."
        )
    )]
    Undefined { metric: &'static str },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(sieve::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(sieve::config::parse),
        help("Check the TOML syntax and field names in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(sieve::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(sieve::config::invalid), help("{message}"))]
    Invalid { message: String },
}

/// Convenience alias for functions returning spam-sieve results.
pub type SieveResult<T> = std::result::Result<T, SieveError>;

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
pub type ModelResult<T> = std::result::Result<T, ModelError>;
pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
pub type MetricResult<T> = std::result::Result<T, MetricError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
