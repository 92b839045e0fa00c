//! # rubyish
//!
//! rubyish is a tree-walking interpreter for a small Ruby-like language.
//! It parses source text into a syntax tree and evaluates it against a
//! dynamic object model with classes, modules, singleton classes and blocks.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Expr,
    error::Error,
    interpreter::{
        machine::Machine,
        parser::core::{ParseResult, Parser},
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and the literal and operator types
/// that represent source code as a tree. The AST is built by the parser and
/// walked by the evaluator. Nodes compare structurally, so parser tests can
/// state the expected tree directly.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// Syntax errors carry the line they were found on; runtime errors carry the
/// names and values involved. Both convert into the top-level `Error`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, the value and
/// object model, and the `Machine` that bootstraps the builtin classes.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, evaluator and object model.
/// - Provides entry points for parsing and running programs.
pub mod interpreter;

/// Parses every command of `source`.
///
/// # Example
/// ```
/// use rubyish::{ast::Expr, parse};
///
/// let commands = parse("a = 1\nputs a").unwrap();
///
/// assert_eq!(commands,
///            vec![Expr::assign("a", Expr::constant(1)),
///                 Expr::call("puts", vec![Expr::name("a")])]);
/// ```
pub fn parse(source: &str) -> ParseResult<Vec<Expr>> {
    Parser::new(source).parse_program()
}

/// Runs `source` on a fresh machine writing to standard output.
///
/// When `auto_print` is set, the value of the last command is printed too,
/// unless it is `nil`.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use rubyish::run;
///
/// assert!(run("x = 2 + 2", false).is_ok());
///
/// // 'y' is not defined.
/// assert!(run("x = y + 1", false).is_err());
/// ```
pub fn run(source: &str, auto_print: bool) -> Result<Value, Error> {
    let machine = Machine::new();
    let result = machine.execute(source)?;

    if auto_print && result != Value::Nil {
        println!("{}", result.inspect());
    }

    Ok(result)
}
