// src/outcome.rs

//! Outcome classification: actual behavior against the scenario contract.
//!
//! Expected-negative scenarios match on an error class and a message
//! substring, never on error internals; the lower-cased substring check is
//! the authoritative contract because the full message text varies between
//! server builds.

use std::fmt;

use crate::Error;

/// Which expected-capable failure class an outcome landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server denied the presented credentials.
    Rejected,
    /// The harness refused malformed credential input.
    InvalidArgument,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Rejected => f.write_str("authentication-rejected"),
            FailureKind::InvalidArgument => f.write_str("invalid-argument"),
        }
    }
}

/// The single terminal result of one scenario execution. Exactly one
/// variant is produced per round trip; never a value and an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The echo returned a value.
    Success(String),
    /// A failure class some scenarios assert on.
    ExpectedFailure { kind: FailureKind, message: String },
    /// Anything else: transport faults, configuration mistakes.
    UnexpectedFailure { message: String },
}

impl Outcome {
    /// Folds an echo result into exactly one outcome variant.
    pub fn from_echo(result: Result<String, Error>) -> Outcome {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) if e.is_rejected() => Outcome::ExpectedFailure {
                kind: FailureKind::Rejected,
                message: e.to_string(),
            },
            Err(e) if e.is_invalid_argument() => Outcome::ExpectedFailure {
                kind: FailureKind::InvalidArgument,
                message: e.to_string(),
            },
            Err(e) => Outcome::UnexpectedFailure {
                message: e.to_string(),
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(value) => write!(f, "success '{value}'"),
            Outcome::ExpectedFailure { kind, message } => {
                write!(f, "{kind} failure '{message}'")
            }
            Outcome::UnexpectedFailure { message } => {
                write!(f, "unexpected failure '{message}'")
            }
        }
    }
}

/// What a scenario demands of its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The echo must return exactly this value, byte for byte.
    Success(String),
    /// The server must reject the credentials, and the lower-cased failure
    /// message must contain this substring.
    Rejection(String),
    /// Credential validation must refuse the input, and the lower-cased
    /// message must contain this substring.
    InvalidArgument(String),
}

/// Terminal verdict for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// The outcome had the expected shape but the wrong content.
    ExpectedMismatch(String),
    /// The outcome had a shape the scenario never expects.
    Unexpected(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::ExpectedMismatch(diagnostic) | Verdict::Unexpected(diagnostic) => {
                Some(diagnostic)
            }
        }
    }
}

/// Compares one outcome against one expectation.
pub fn classify(expectation: &Expectation, outcome: &Outcome) -> Verdict {
    match (expectation, outcome) {
        (Expectation::Success(expected), Outcome::Success(actual)) => {
            if actual == expected {
                Verdict::Pass
            } else {
                Verdict::ExpectedMismatch(format!(
                    "expected response from service: '{expected}', actual was: '{actual}'"
                ))
            }
        }
        (
            Expectation::Rejection(required),
            Outcome::ExpectedFailure {
                kind: FailureKind::Rejected,
                message,
            },
        ) => match_substring(required, message),
        (
            Expectation::InvalidArgument(required),
            Outcome::ExpectedFailure {
                kind: FailureKind::InvalidArgument,
                message,
            },
        ) => match_substring(required, message),
        (_, outcome) => Verdict::Unexpected(format!(
            "outcome did not match the expected shape: {outcome}"
        )),
    }
}

fn match_substring(required: &str, message: &str) -> Verdict {
    if message.to_lowercase().contains(&required.to_lowercase()) {
        Verdict::Pass
    } else {
        Verdict::ExpectedMismatch(format!(
            "expected failure message to contain: '{required}', actual message is: '{message}'"
        ))
    }
}
