//! Error types for temporal value construction, parsing and arithmetic.

use crate::time::TimePoint;
use std::fmt;
use thiserror::Error;

/// What a failed parse was trying to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Date,
    Timestamp,
    TimestampTz,
    Interval,
    /// A bare base value, named by its type
    BaseValue(&'static str),
    /// A full temporal literal, named by its base type
    Temporal(&'static str),
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::TimestampTz => write!(f, "timestamp with time zone"),
            Self::Interval => write!(f, "interval"),
            Self::BaseValue(name) => write!(f, "{}", name),
            Self::Temporal(name) => write!(f, "t{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemporalError {
    #[error("invalid input syntax for type {kind}: \"{text}\"")]
    MalformedInput { text: String, kind: InputKind },

    #[error("invalid base value: {0}")]
    InvalidBaseValue(String),

    #[error("a temporal value must contain at least one element")]
    Empty,

    #[error("timestamps must be strictly increasing: {previous} is followed by {next}")]
    DuplicateOrUnorderedTimestamp { previous: TimePoint, next: TimePoint },

    #[error("the sequences of a sequence set must be ordered and must not overlap")]
    OverlappingOrUnorderedExtents,

    #[error("an instantaneous sequence must have both bounds inclusive")]
    InvalidInstantaneousBounds,

    #[error("invalid end value for a stepwise sequence with exclusive upper bound")]
    StepwiseEndpointMismatch,

    #[error("interpolation mismatch: {0}")]
    InterpolationMismatch(String),

    #[error("base type mismatch: expected {expected}, found {found}")]
    BaseTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} out of range")]
    Overflow(&'static str),

    #[error("cannot operate on infinite timestamps")]
    InfiniteOperand,

    #[error("the temporal values do not intersect in time")]
    DisjointTimeExtents,

    #[error("division by zero")]
    DivisionByZero,
}

impl TemporalError {
    pub(crate) fn malformed(text: &str, kind: InputKind) -> Self {
        Self::MalformedInput {
            text: text.to_string(),
            kind,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemporalError>;
