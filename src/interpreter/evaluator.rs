/// Core evaluation dispatch.
///
/// Defines `EvalResult` and the `eval` entry point that routes every syntax
/// node to its evaluator.
pub mod core;

/// Arithmetic and comparison operators.
pub mod binary;

/// Unary minus and logical not.
pub mod unary;

/// Conditionals and loops.
///
/// Evaluates `if`, `while`, `until` and `for ... in`.
pub mod control;

/// Definitions.
///
/// Evaluates `def`, `class` and `module`, including reopening and nested
/// names.
pub mod definition;

/// Method and function calls.
///
/// Resolves receivers, finds methods through the class chain and invokes
/// them.
pub mod call;

/// Variables and constants.
///
/// Reads and writes locals, constants, instance variables and class
/// variables.
pub mod variable;

/// Array, hash and range literals and indexing.
pub mod collection;

/// Callable invocation and the builtin library.
///
/// Binds arguments for user-defined methods and blocks, and installs the
/// native methods of the builtin classes.
pub mod function;
