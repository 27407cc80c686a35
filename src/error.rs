use std::fmt;

use crate::activation::Activation;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, training or querying a classifier.
///
/// None of them is transient: each one points at a misconfiguration or at
/// inconsistent input data, so callers should not retry.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A shape invariant was violated.
    ShapeMismatch {
        /// What was being checked (e.g. "layer sizes", "input features").
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// The derivative of this activation cannot be expressed in terms of its output.
    UnsupportedActivation(Activation),

    /// No activation is assigned to the given weight layer (0-based).
    MissingActivation { layer: usize },

    /// A class label does not fall into `[0, n_classes)`.
    InvalidLabel { label: usize, n_classes: usize },

    /// An input is invalid for semantic reasons.
    InvalidInput(&'static str),

    /// The classifier was queried before `fit` completed.
    NotFitted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            Error::UnsupportedActivation(activation) => {
                write!(f, "no derivative available for {activation:?} activation")
            }
            Error::MissingActivation { layer } => {
                write!(f, "layer {layer} has no activation assigned")
            }
            Error::InvalidLabel { label, n_classes } => write!(
                f,
                "label {label} is out of range for {n_classes} distinct classes"
            ),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::NotFitted => write!(f, "classifier has not been fitted"),
        }
    }
}

impl std::error::Error for Error {}

/// Compare two matrix shapes, reporting the first dimension that differs.
/// `what` names the rows and the columns of the checked matrix.
pub(crate) fn check_dim(
    what: [&'static str; 2],
    got: (usize, usize),
    expected: (usize, usize),
) -> Result<()> {
    if got.0 != expected.0 {
        return Err(Error::ShapeMismatch {
            what: what[0],
            got: got.0,
            expected: expected.0,
        });
    }
    if got.1 != expected.1 {
        return Err(Error::ShapeMismatch {
            what: what[1],
            got: got.1,
            expected: expected.1,
        });
    }
    Ok(())
}
