//! Error types for the preference simulation harness.
//!
//! Errors are organized by stage (configuration, dataset loading, model
//! fitting, prediction, the suggestion loop) so that a failed run reports
//! where it stopped and with which record or dimension.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for prefsim operations.
#[derive(Error, Debug)]
pub enum PrefsimError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dataset loading and preference extraction errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Preference model fitting errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Kernel prediction errors
    #[error("Prediction error: {0}")]
    Predict(#[from] PredictError),

    /// Suggestion loop errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Dataset name does not match any known loader
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

/// Dataset loading and preference extraction errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A dataset file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record in a dataset file is malformed
    #[error("Parse error in {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A comparison string could not be decoded into ordered groups
    #[error("Malformed comparison string {input:?}: {message}")]
    Comparison { input: String, message: String },

    /// The loaded dataset has no usable rows
    #[error("Dataset {0} is empty")]
    Empty(String),
}

/// Errors raised while fitting the preference model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A matrix that must be positive definite failed its Cholesky factorization
    #[error("{matrix} is not positive definite (pivot {pivot})")]
    NotPositiveDefinite { matrix: &'static str, pivot: usize },

    /// Newton iterations did not reach the tolerance
    #[error("MAP estimation did not converge after {iterations} iterations (last step {step:e})")]
    DidNotConverge { iterations: usize, step: f64 },

    /// A NaN or infinity appeared during optimization
    #[error("Non-finite value during MAP estimation at iteration {iteration}")]
    NonFinite { iteration: usize },

    /// The initial guess does not match the number of training instances
    #[error("Initial vector has length {found}, expected {expected}")]
    InitialLength { expected: usize, found: usize },

    /// A preference pair references an instance outside the training table
    #[error("Preference pair ({winner}, {loser}) out of range for {instances} instances")]
    PairOutOfRange {
        winner: usize,
        loser: usize,
        instances: usize,
    },
}

/// Errors raised by the kernel utility predictor.
#[derive(Error, Debug)]
pub enum PredictError {
    /// Operand shapes disagree
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Nothing to choose from
    #[error("No candidates to score")]
    NoCandidates,
}

/// Errors raised by the sequential suggestion loop.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The selected item is not in the candidate pool
    #[error("Item {0} is not in the candidate pool")]
    NotInPool(usize),

    /// The candidate pool ran out before the horizon
    #[error("Candidate pool exhausted at step {0}")]
    PoolExhausted(usize),

    /// Exploitation was requested before any model was fitted
    #[error("No fitted model available at step {0}")]
    NoFittedModel(usize),
}

/// Convenience type alias for prefsim results.
pub type Result<T> = std::result::Result<T, PrefsimError>;

/// Convenience type alias for dataset-specific results.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
