/// Hash key representation.
///
/// Defines the `HashKey` type used to index `Value::Hash` entries, and the
/// insertion-ordered `HashValue` table itself. Reals are keyed through
/// `OrderedFloat`, and objects by identity.
pub mod hash_key;

/// Callable values.
///
/// Native methods, native free functions, user-defined functions and block
/// closures: everything a method table or a local binding can invoke.
pub mod callable;

/// The `Value` enum: what every expression evaluates to.
pub mod core;
