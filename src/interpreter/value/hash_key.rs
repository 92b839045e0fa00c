use std::{collections::HashMap, rc::Rc};

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, address},
    },
};

/// Enum representing values allowed as hash keys.
///
/// Scalars and arrays hash by value; objects, classes and procs hash by
/// identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// `nil`
    Nil,
    /// A boolean such as `true`.
    Bool(bool),
    /// An integer such as `42`.
    Integer(i64),
    /// A real such as `2.5`.
    Real(OrderedFloat<f64>),
    /// A string such as `"one"`.
    Str(Rc<str>),
    /// A symbol such as `:one`.
    Symbol(Rc<str>),
    /// An array such as `[1, 2]`.
    Array(Vec<HashKey>),
    /// An inclusive integer range.
    Range(i64, i64),
    /// Anything compared by identity, keyed by its address.
    Identity(usize),
}

impl TryFrom<&Value> for HashKey {
    type Error = RuntimeError;

    fn try_from(value: &Value) -> EvalResult<Self> {
        Self::from_value(value, &mut Vec::new())
    }
}

impl HashKey {
    /// `open` holds the arrays being converted further up; an array that
    /// contains itself has no finite key.
    fn from_value(value: &Value, open: &mut Vec<usize>) -> EvalResult<Self> {
        Ok(match value {
            Value::Nil => Self::Nil,
            Value::Bool(b) => Self::Bool(*b),
            Value::Integer(i) => Self::Integer(*i),
            Value::Real(r) => Self::Real(OrderedFloat(*r)),
            Value::Str(s) => Self::Str(Rc::clone(s)),
            Value::Symbol(s) => Self::Symbol(Rc::clone(s)),
            Value::Array(items) => {
                let address = address(items);
                if open.contains(&address) {
                    return Err(RuntimeError::type_error("recursive array cannot be used as a \
                                                         hash key"));
                }
                open.push(address);
                let keys = items.borrow()
                                .iter()
                                .map(|item| Self::from_value(item, open))
                                .collect::<EvalResult<Vec<_>>>();
                open.pop();
                Self::Array(keys?)
            },
            Value::Range(from, to) => Self::Range(*from, *to),
            Value::Object(o) => Self::Identity(address(o)),
            Value::Class(c) => Self::Identity(address(c)),
            Value::Proc(p) => Self::Identity(address(p)),
            Value::Hash(_) | Value::Function(_) => {
                return Err(RuntimeError::type_error(format!("{} cannot be used as a hash key",
                                                            value.inspect())));
            },
        })
    }
}

/// An insertion-ordered hash table keyed by [`HashKey`].
#[derive(Default)]
pub struct HashValue {
    entries: Vec<(Value, Value)>,
    index:   HashMap<HashKey, usize>,
}

impl HashValue {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key`.
    ///
    /// # Errors
    /// A type error when `key` cannot be hashed.
    pub fn get(&self, key: &Value) -> EvalResult<Option<Value>> {
        let key = HashKey::try_from(key)?;
        Ok(self.index.get(&key).map(|&i| self.entries[i].1.clone()))
    }

    /// Inserts or replaces the entry for `key`, keeping the position of an
    /// existing entry.
    ///
    /// # Errors
    /// A type error when `key` cannot be hashed.
    pub fn insert(&mut self, key: Value, value: Value) -> EvalResult<()> {
        let hash_key = HashKey::try_from(&key)?;
        if let Some(&i) = self.index.get(&hash_key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(hash_key, self.entries.len());
            self.entries.push((key, value));
        }
        Ok(())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_kept() -> EvalResult<()> {
        let mut hash = HashValue::new();
        hash.insert(Value::symbol("b"), 1.into())?;
        hash.insert(Value::symbol("a"), 2.into())?;
        hash.insert(Value::symbol("b"), 3.into())?;
        let keys: Vec<String> = hash.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(hash.get(&Value::symbol("b"))?, Some(Value::Integer(3)));
        Ok(())
    }

    #[test]
    fn integers_and_reals_are_distinct_keys() -> EvalResult<()> {
        let mut hash = HashValue::new();
        hash.insert(1.into(), "int".into())?;
        hash.insert(1.0.into(), "real".into())?;
        assert_eq!(hash.len(), 2);
        Ok(())
    }

    #[test]
    fn self_containing_arrays_are_not_keys() {
        let items = Value::from(vec![Value::Integer(1)]);
        if let Value::Array(inner) = &items {
            inner.borrow_mut().push(items.clone());
        }
        let mut hash = HashValue::new();
        assert!(matches!(hash.insert(items, Value::Nil), Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn a_repeated_array_is_a_key() -> EvalResult<()> {
        let shared = Value::from(vec![Value::Integer(1)]);
        let mut hash = HashValue::new();
        hash.insert(Value::from(vec![shared.clone(), shared]), Value::Nil)?;
        assert_eq!(hash.len(), 1);
        Ok(())
    }

    #[test]
    fn hashes_are_not_keys() {
        let mut hash = HashValue::new();
        let inner = Value::Hash(Rc::new(std::cell::RefCell::new(HashValue::new())));
        assert!(hash.insert(inner, Value::Nil).is_err());
    }
}
