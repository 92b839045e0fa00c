use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::core::EvalResult,
        value::{core::Value, hash_key::HashValue},
    },
};

impl Context {
    /// Builds an array from its element expressions.
    pub(crate) fn eval_array(self: &Rc<Self>, items: &[Expr]) -> EvalResult<Value> {
        Ok(self.eval_arguments(items)?.into())
    }

    /// Builds a hash, evaluating each key before its value. A repeated key
    /// keeps its first position and its last value.
    pub(crate) fn eval_hash(self: &Rc<Self>, entries: &[(Expr, Expr)]) -> EvalResult<Value> {
        let mut hash = HashValue::new();
        for (key, value) in entries {
            let key = self.eval(key)?;
            let value = self.eval(value)?;
            hash.insert(key, value)?;
        }
        Ok(hash.into())
    }

    /// Builds an inclusive integer range.
    ///
    /// # Errors
    /// A type error when either bound is not an integer.
    pub(crate) fn eval_range(self: &Rc<Self>, from: &Expr, to: &Expr) -> EvalResult<Value> {
        let from = self.eval(from)?;
        let to = self.eval(to)?;
        match (from.as_integer(), to.as_integer()) {
            (Some(from), Some(to)) => Ok(Value::Range(from, to)),
            _ => {
                let message = format!("bad value for range: {}..{}", from.inspect(), to.inspect());
                Err(RuntimeError::type_error(message))
            },
        }
    }

    /// Evaluates `target[index]`.
    pub(crate) fn eval_indexed(self: &Rc<Self>, target: &Expr, index: &Expr) -> EvalResult<Value> {
        let target = self.eval(target)?;
        let index = self.eval(index)?;
        get_index(&target, &index)
    }

    /// Evaluates `target[index] = value`.
    pub(crate) fn eval_assign_indexed(self: &Rc<Self>,
                                      target: &Expr,
                                      index: &Expr,
                                      value: &Expr)
                                      -> EvalResult<Value> {
        let target = self.eval(target)?;
        let index = self.eval(index)?;
        let value = self.eval(value)?;
        set_index(&target, &index, value.clone())?;
        Ok(value)
    }
}

/// Reads `target[index]`.
///
/// Arrays and strings take integer indexes, counting from the end when
/// negative; an index past either end reads as `nil`. Hashes read `nil` for
/// a missing key.
///
/// # Errors
/// `NotIndexable` for values without indexing, and a type error for a
/// non-integer array or string index.
pub fn get_index(target: &Value, index: &Value) -> EvalResult<Value> {
    match target {
        Value::Array(items) => {
            let items = items.borrow();
            let position = resolve_position(integer_index(index)?, items.len());
            Ok(position.and_then(|i| items.get(i).cloned()).unwrap_or(Value::Nil))
        },
        Value::Hash(hash) => Ok(hash.borrow().get(index)?.unwrap_or(Value::Nil)),
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let position = resolve_position(integer_index(index)?, chars.len());
            Ok(position.and_then(|i| chars.get(i))
                       .map_or(Value::Nil, |c| c.to_string().into()))
        },
        _ => Err(RuntimeError::NotIndexable { receiver: target.inspect() }),
    }
}

/// Writes `target[index] = value`.
///
/// Writing past the end of an array pads it with `nil`.
///
/// # Errors
/// `IndexOutOfRange` for a negative index before the start of the array,
/// `AllocationFailed` when the padding cannot be allocated, and
/// `NotIndexable` for values that cannot be written by index.
pub fn set_index(target: &Value, index: &Value, value: Value) -> EvalResult<()> {
    match target {
        Value::Array(items) => {
            let raw = integer_index(index)?;
            let mut items = items.borrow_mut();
            let position = resolve_position(raw, items.len())
                .ok_or(RuntimeError::IndexOutOfRange { index: raw })?;
            if position >= items.len() {
                let len = items.len();
                items.try_reserve(position + 1 - len)?;
                items.resize(position + 1, Value::Nil);
            }
            items[position] = value;
            Ok(())
        },
        Value::Hash(hash) => hash.borrow_mut().insert(index.clone(), value),
        _ => Err(RuntimeError::NotIndexable { receiver: target.inspect() }),
    }
}

fn integer_index(index: &Value) -> EvalResult<i64> {
    index.as_integer().ok_or_else(|| {
        RuntimeError::type_error(format!("no implicit conversion of {} into Integer",
                                         index.inspect()))
    })
}

/// Maps a possibly negative index onto a position, or `None` when a
/// negative index reaches before the start.
fn resolve_position(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok()
    } else {
        len.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(items: &[i64]) -> Value {
        items.iter().copied().map(Value::Integer).collect::<Vec<_>>().into()
    }

    #[test]
    fn arrays_index_from_either_end() {
        let items = array(&[10, 20, 30]);
        assert_eq!(get_index(&items, &Value::Integer(0)).unwrap(), Value::Integer(10));
        assert_eq!(get_index(&items, &Value::Integer(-1)).unwrap(), Value::Integer(30));
        assert_eq!(get_index(&items, &Value::Integer(3)).unwrap(), Value::Nil);
        assert_eq!(get_index(&items, &Value::Integer(-4)).unwrap(), Value::Nil);
    }

    #[test]
    fn writing_past_the_end_pads_with_nil() {
        let items = array(&[1]);
        set_index(&items, &Value::Integer(3), Value::Integer(4)).unwrap();
        assert_eq!(items,
                   Value::from(vec![Value::Integer(1), Value::Nil, Value::Nil, Value::Integer(4)]));
    }

    #[test]
    fn negative_write_before_the_start_fails() {
        let items = array(&[1, 2]);
        assert!(matches!(set_index(&items, &Value::Integer(-3), Value::Nil),
                         Err(RuntimeError::IndexOutOfRange { index: -3 })));
        set_index(&items, &Value::Integer(-1), Value::Integer(9)).unwrap();
        assert_eq!(items, array(&[1, 9]));
    }

    #[test]
    fn writing_far_past_the_end_fails_without_growing() {
        let items = array(&[1]);
        assert!(matches!(set_index(&items, &Value::Integer(i64::MAX), Value::Nil),
                         Err(RuntimeError::AllocationFailed(_))));
        assert_eq!(items, array(&[1]));
    }

    #[test]
    fn strings_index_by_character() {
        let text = Value::from("héllo");
        assert_eq!(get_index(&text, &Value::Integer(1)).unwrap(), Value::from("é"));
        assert_eq!(get_index(&text, &Value::Integer(-1)).unwrap(), Value::from("o"));
    }

    #[test]
    fn integers_are_not_indexable() {
        assert!(matches!(get_index(&Value::Integer(1), &Value::Integer(0)),
                         Err(RuntimeError::NotIndexable { .. })));
    }
}
