/// Invocation of callables and blocks.
///
/// Checks arity, opens the call frame and binds parameters.
pub mod core;
/// Methods every object answers, plus `Module` and `Class` reflection.
pub mod object;
/// `Fixnum` and `Float` methods.
pub mod numeric;
/// `String` and `Symbol` methods.
pub mod text;
/// `Array`, `Hash`, `Range` and `Proc` methods.
pub mod collection;
/// The `puts` function.
pub mod print;
