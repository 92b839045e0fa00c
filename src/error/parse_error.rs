use thiserror::Error;

/// Represents all errors that can occur during lexing or parsing.
///
/// The `Display` form of every variant is the bare message, such as
/// `name expected`. Hosts that want a location prefix use [`ParseError::line`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A specific token was required but something else was found.
    #[error("expected '{expected}'")]
    Expected {
        /// The text of the required token.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A method, parameter or loop variable name was required.
    #[error("name expected")]
    NameExpected {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A command was followed by more tokens on the same line.
    #[error("end of command expected")]
    EndOfCommandExpected {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The name after `class` or `module` does not start with an uppercase
    /// letter.
    #[error("class/module name must be a CONSTANT")]
    ConstantNameExpected {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found a token (or a character no token matches) that cannot appear here.
    #[error("unexpected '{token}'")]
    Unexpected {
        /// The offending token text.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The left side of `=` cannot be assigned to.
    #[error("invalid assignment target")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer literal does not fit in 64 bits.
    #[error("integer literal too large")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Input ended in the middle of a construct.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Returns the source line the error was raised on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Expected { line, .. }
            | Self::NameExpected { line }
            | Self::EndOfCommandExpected { line }
            | Self::ConstantNameExpected { line }
            | Self::Unexpected { line, .. }
            | Self::InvalidAssignmentTarget { line }
            | Self::LiteralTooLarge { line }
            | Self::UnexpectedEndOfInput { line } => *line,
        }
    }

    /// Reports whether more input could complete the construct.
    ///
    /// The REPL uses this to keep reading continuation lines.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfInput { .. })
    }
}
