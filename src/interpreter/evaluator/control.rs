use std::{ops::RangeInclusive, rc::Rc, vec};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{context::Context, evaluator::core::EvalResult, value::core::Value},
};

impl Context {
    /// Evaluates an `if`. Without an else branch a false condition yields
    /// `nil`.
    pub(crate) fn eval_if(self: &Rc<Self>,
                          condition: &Expr,
                          then_branch: &Expr,
                          else_branch: Option<&Expr>)
                          -> EvalResult<Value> {
        if self.eval(condition)?.is_truthy() {
            self.eval(then_branch)
        } else {
            else_branch.map_or(Ok(Value::Nil), |branch| self.eval(branch))
        }
    }

    /// Evaluates `while` (`run_while` is true) or `until` (false).
    ///
    /// The condition is re-evaluated before every iteration and the body
    /// runs in this frame, so assignments in the body are visible to the
    /// condition.
    ///
    /// # Returns
    /// Always `nil`.
    pub(crate) fn eval_loop(self: &Rc<Self>,
                            condition: &Expr,
                            body: &Expr,
                            run_while: bool)
                            -> EvalResult<Value> {
        while self.eval(condition)?.is_truthy() == run_while {
            self.eval(body)?;
        }
        Ok(Value::Nil)
    }

    /// Evaluates `for name in collection ... end`.
    ///
    /// Arrays are iterated over a snapshot, so pushing inside the body does
    /// not extend the loop. Ranges yield each integer as the loop reaches
    /// it, hashes yield `[key, value]` pairs. The loop variable is bound in this frame and
    /// keeps its last value afterwards.
    ///
    /// # Returns
    /// The collection itself.
    ///
    /// # Errors
    /// `NotEnumerable` for anything else.
    pub(crate) fn eval_for_in(self: &Rc<Self>,
                              name: &str,
                              collection: &Expr,
                              body: &Expr)
                              -> EvalResult<Value> {
        let collection = self.eval(collection)?;
        for item in enumerate(&collection)? {
            self.set_local_value(name, item);
            self.eval(body)?;
        }
        Ok(collection)
    }
}

/// The elements a `for` loop or an `each` visits, in order.
///
/// Array and hash elements are copied up front. Range elements are produced
/// one at a time, so a loop over `1..1000000000` never holds them all.
#[derive(Debug)]
pub enum Elements {
    /// A snapshot of array elements or hash pairs.
    Values(vec::IntoIter<Value>),
    /// The integers of an inclusive range.
    Range(RangeInclusive<i64>),
}

impl Iterator for Elements {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Self::Values(values) => values.next(),
            Self::Range(range) => range.next().map(Value::Integer),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Values(values) => values.size_hint(),
            Self::Range(range) => range.size_hint(),
        }
    }
}

/// Starts iterating `collection`.
///
/// # Errors
/// `NotEnumerable` when the value is not an array, range or hash.
pub fn enumerate(collection: &Value) -> EvalResult<Elements> {
    let values: Vec<Value> = match collection {
        Value::Array(items) => items.borrow().clone(),
        Value::Range(from, to) => return Ok(Elements::Range(*from..=*to)),
        Value::Hash(hash) => {
            hash.borrow()
                .iter()
                .map(|(key, value)| vec![key.clone(), value.clone()].into())
                .collect()
        },
        _ => return Err(RuntimeError::NotEnumerable { receiver: collection.inspect() }),
    };
    Ok(Elements::Values(values.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_produced_lazily() {
        let mut elements = enumerate(&Value::Range(1, i64::MAX)).unwrap();
        assert_eq!(elements.next(), Some(Value::Integer(1)));
        assert_eq!(elements.next(), Some(Value::Integer(2)));
        assert!(matches!(elements, Elements::Range(_)));
    }

    #[test]
    fn the_last_integer_of_a_range_is_reached() {
        let elements: Vec<Value> = enumerate(&Value::Range(i64::MAX - 1, i64::MAX)).unwrap()
                                                                                  .collect();
        assert_eq!(elements, vec![Value::Integer(i64::MAX - 1), Value::Integer(i64::MAX)]);
    }

    #[test]
    fn hashes_yield_pairs() {
        let mut hash = crate::interpreter::value::hash_key::HashValue::new();
        hash.insert(Value::symbol("a"), 1.into()).unwrap();
        let pairs: Vec<Value> = enumerate(&hash.into()).unwrap().collect();
        assert_eq!(pairs, vec![Value::from(vec![Value::symbol("a"), Value::Integer(1)])]);
    }

    #[test]
    fn integers_are_not_enumerable() {
        assert!(matches!(enumerate(&Value::Integer(3)),
                         Err(RuntimeError::NotEnumerable { .. })));
    }
}
