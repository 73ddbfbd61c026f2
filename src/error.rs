// ABOUTME: Error types for the two disjoint failure surfaces: syntax and runtime

use thiserror::Error;

/// Failures during lexing, s-expression reading, or AST construction.
///
/// Where the offending token is known it is carried in the message;
/// otherwise the bare form is used, matching the fixed stdout phrasing
/// the grading harness expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("syntax error")]
    Generic,

    #[error("syntax error, unexpected '{0}'")]
    UnexpectedToken(String),
}

/// Failures detected while evaluating an already-built AST.
///
/// Every variant renders to exactly the message text specified for it;
/// there is no recovery and no second error is ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Error: Variable {0} not defined")]
    UndefinedVariable(String),

    #[error("Error: Redefining {0} is not allowed.")]
    Redefinition(String),

    #[error("Error: Division by zero")]
    DivisionByZero,

    #[error("Error: Need {expected} arguments, but got {actual}.")]
    PrimArityExact { expected: usize, actual: usize },

    #[error("Error: Need at least {expected} arguments, but got {actual}.")]
    PrimArityAtLeast { expected: usize, actual: usize },

    #[error("Error: Need 1 argument, but got {actual}.")]
    PrimArityOne { actual: usize },

    /// User-function arity mismatch. Note the deliberate absence of the
    /// `Error:` prefix carried by every other runtime error — this matches
    /// the source program's own (differently worded) message.
    #[error("Need {expected} arguments, but got {actual}.")]
    CallArity { expected: usize, actual: usize },

    #[error("Type Error: Expect '{expected}' but got '{actual}'.")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Unifies both error surfaces for the driver's `?`-based pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiniLispError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
