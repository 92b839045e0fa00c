/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens:
/// literals, names, keywords, operators and significant newlines. Each token
/// remembers its line and whether whitespace preceded it, which the parser
/// needs to tell `puts [1]` from `a[1]`.
pub mod lexer;
/// The parser module builds the abstract syntax tree from tokens.
///
/// # Responsibilities
/// - Converts tokens into [`crate::ast::Expr`] nodes by precedence climbing.
/// - Resolves the command/expression ambiguity of parenthesis-free calls.
/// - Reports syntax errors with the line they occurred on.
pub mod parser;
/// The evaluator module executes syntax trees.
///
/// # Responsibilities
/// - Evaluates every node kind against a [`context::Context`].
/// - Dispatches method calls through the class model.
/// - Provides the native methods of the builtin classes.
pub mod evaluator;
/// Runtime values.
///
/// Declares the `Value` enum, hash keys and the callables that can be stored
/// in method tables.
pub mod value;
/// The object model: objects, classes, modules and singleton classes.
pub mod object;
/// Lexical scope frames.
pub mod context;
/// The interpreter entry point.
///
/// `Machine` bootstraps the builtin classes and runs programs.
pub mod machine;
