use thiserror::Error;

/// Represents all errors that can occur during evaluation.
///
/// Name faults, type faults and arithmetic faults all land here. None of them
/// is caught by the interpreter itself; they unwind to the embedding host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A lowercase name resolved to neither a local nor a method on `self`.
    #[error("undefined local variable or method '{name}'")]
    UndefinedName {
        /// The unresolved name.
        name: String,
    },
    /// An uppercase name resolved to no constant.
    #[error("uninitialized constant {name}")]
    UninitializedConstant {
        /// The unresolved constant, qualified when looked up through `::`.
        name: String,
    },
    /// A class variable was read before any assignment.
    #[error("uninitialized class variable @@{name} in {class}")]
    UninitializedClassVariable {
        /// The variable name without sigils.
        name:  String,
        /// The class the lookup started from.
        class: String,
    },
    /// A method call found nothing along the receiver's resolution chain.
    #[error("undefined method '{name}' for {receiver}")]
    NoMethod {
        /// The selector.
        name:     String,
        /// The receiver's textual form.
        receiver: String,
    },
    /// An operator or builtin received values it cannot combine.
    #[error("{message}")]
    TypeError {
        /// Details about the mismatch.
        message: String,
    },
    /// A callable received the wrong number of arguments.
    #[error("wrong number of arguments for '{name}' (given {found}, expected {expected})")]
    ArgumentCount {
        /// The callable's name.
        name:     String,
        /// The number of declared parameters.
        expected: usize,
        /// The number of arguments passed.
        found:    usize,
    },
    /// `[]` was applied to a value that has no indexing.
    #[error("{receiver} cannot be indexed")]
    NotIndexable {
        /// The receiver's textual form.
        receiver: String,
    },
    /// `for ... in` was given a value that has no enumeration.
    #[error("{receiver} cannot be enumerated")]
    NotEnumerable {
        /// The receiver's textual form.
        receiver: String,
    },
    /// An array index falls before the start of the array.
    #[error("index {index} too small for array")]
    IndexOutOfRange {
        /// The offending index.
        index: i64,
    },
    /// Integer division by zero.
    #[error("divided by 0")]
    DivisionByZero,
    /// Integer arithmetic left the 64-bit range.
    #[error("integer overflow in '{operation}'")]
    Overflow {
        /// The operator that overflowed.
        operation: &'static str,
    },
    /// A collection could not grow to the size a program asked for, such as
    /// `a[9223372036854775807] = 1` or `(0..9223372036854775807).to_a`.
    #[error("failed to allocate memory")]
    AllocationFailed(#[from] std::collections::TryReserveError),
    /// Writing to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Builds a [`RuntimeError::TypeError`] from anything printable.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into() }
    }
}
