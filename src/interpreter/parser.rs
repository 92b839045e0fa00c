/// Parser state and entry points.
///
/// Holds the [`core::Parser`] type, the `ParseResult` alias and the two public
/// entry points, one per command and one per expression.
pub mod core;

/// Prefix operators and terms.
///
/// Handles unary `-`, `+` and `!`, literals, names, grouping, and the postfix
/// chain of `.name`, `::Name` and `[index]`.
pub mod unary;

/// Binary operator tiers.
///
/// Implements the precedence climb over ranges, comparisons, additive and
/// multiplicative operators.
pub mod binary;

/// Blocks attached to calls.
///
/// Parses `do |x| ... end` and `{ |x| ... }` trailers.
pub mod block;

/// Shared parsing helpers.
///
/// Token matching, argument lists, and the checks that decide whether a bare
/// name is a call.
pub mod utils;

/// Statement-level forms.
///
/// Implements `if`, `while`, `until`, `for`, `def`, `class`, `module`,
/// assignments and command termination.
pub mod statement;
