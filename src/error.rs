/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: unexpected tokens, missing names, missing terminators and malformed
/// class or module headers.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// unresolved names, missing methods, type mismatches and division by zero.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// Any failure a whole run can produce.
///
/// Returned by [`crate::interpreter::machine::Machine::execute`], which both
/// parses and evaluates.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns the parse error, if this is one.
    #[must_use]
    pub const fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Runtime(_) => None,
        }
    }
}
