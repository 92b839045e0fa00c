use std::{cmp::Ordering, rc::Rc};

use crate::{
    ast::CompareOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Adds two values.
///
/// A string on either side turns the operation into concatenation of the
/// textual forms. Two integers add with overflow checking, any other numeric
/// pair is promoted to real, and two arrays concatenate into a new array.
///
/// # Parameters
/// - `left`: Left operand.
/// - `right`: Right operand.
///
/// # Returns
/// The sum, concatenation or joined array.
///
/// # Example
/// ```
/// use rubyish::interpreter::{evaluator::binary::add, value::core::Value};
///
/// assert_eq!(add(&Value::Integer(1), &Value::Real(0.5)).unwrap(), Value::Real(1.5));
/// assert_eq!(add(&"n=".into(), &Value::Integer(3)).unwrap(), Value::from("n=3"));
/// ```
pub fn add(left: &Value, right: &Value) -> EvalResult<Value> {
    if left.is_str() || right.is_str() {
        return Ok(format!("{left}{right}").into());
    }
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_add(*b)
             .map(Value::Integer)
             .ok_or(RuntimeError::Overflow { operation: "addition" })
        },
        (Value::Array(a), Value::Array(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(items.into())
        },
        _ => real_operation(left, right, "+", |a, b| a + b),
    }
}

/// Subtracts `right` from `left`.
pub fn subtract(left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_sub(*b)
             .map(Value::Integer)
             .ok_or(RuntimeError::Overflow { operation: "subtraction" })
        },
        _ => real_operation(left, right, "-", |a, b| a - b),
    }
}

/// Multiplies two values. A string times an integer repeats the string.
pub fn multiply(left: &Value, right: &Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_mul(*b)
             .map(Value::Integer)
             .ok_or(RuntimeError::Overflow { operation: "multiplication" })
        },
        (Value::Str(s), Value::Integer(n)) => {
            let count = usize::try_from(*n).map_err(|_| {
                            RuntimeError::type_error(format!("negative argument: {n}"))
                        })?;
            Ok(Value::Str(Rc::from(s.repeat(count))))
        },
        _ => real_operation(left, right, "*", |a, b| a * b),
    }
}

/// Divides `left` by `right`.
///
/// Both operands are truncated to integers first, so `7.5 / 2` is `3`.
///
/// # Errors
/// `DivisionByZero` when the truncated divisor is zero.
#[allow(clippy::cast_possible_truncation)]
pub fn divide(left: &Value, right: &Value) -> EvalResult<Value> {
    let truncate = |value: &Value| {
        value.as_real()
             .map(|r| r as i64)
             .ok_or_else(|| operand_error("/", left, right))
    };
    let (a, b) = (truncate(left)?, truncate(right)?);
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    a.checked_div(b)
     .map(Value::Integer)
     .ok_or(RuntimeError::Overflow { operation: "division" })
}

/// Applies a comparison operator.
///
/// Equality works on any pair of values; ordering is defined for numbers
/// and for strings.
///
/// # Errors
/// A type error when an ordering operator is applied to values without an
/// order.
pub fn compare(left: &Value, op: CompareOperator, right: &Value) -> EvalResult<Value> {
    let result = match op {
        CompareOperator::Equal => left == right,
        CompareOperator::NotEqual => left != right,
        _ => {
            let ordering = left.compare(right).ok_or_else(|| comparison_error(left, right))?;
            match op {
                CompareOperator::Less => ordering == Ordering::Less,
                CompareOperator::Greater => ordering == Ordering::Greater,
                CompareOperator::LessOrEqual => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            }
        },
    };
    Ok(Value::Bool(result))
}

/// Applies `op` to two numbers promoted to reals.
fn real_operation(left: &Value,
                  right: &Value,
                  symbol: &str,
                  op: impl Fn(f64, f64) -> f64)
                  -> EvalResult<Value> {
    match (left.as_real(), right.as_real()) {
        (Some(a), Some(b)) => Ok(Value::Real(op(a, b))),
        _ => Err(operand_error(symbol, left, right)),
    }
}

fn comparison_error(left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!("comparison of {} with {} failed",
                                     class_name(left),
                                     right.inspect()))
}

fn operand_error(symbol: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::NoMethod { name:     symbol.to_string(),
                             receiver: format!("{} with {}", class_name(left), right.inspect()), }
}

fn class_name(value: &Value) -> String {
    match value {
        Value::Object(object) => {
            object.class()
                  .map_or_else(|| "Object".to_string(), |class| class.name().to_string())
        },
        Value::Class(class) => class.name().to_string(),
        _ => value.builtin_class_name().unwrap_or("Object").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(add(&2.into(), &3.into()).unwrap(), Value::Integer(5));
        assert_eq!(subtract(&2.into(), &3.into()).unwrap(), Value::Integer(-1));
        assert_eq!(multiply(&4.into(), &3.into()).unwrap(), Value::Integer(12));
    }

    #[test]
    fn mixed_arithmetic_promotes_to_real() {
        assert_eq!(multiply(&2.into(), &1.5.into()).unwrap(), Value::Real(3.0));
        assert_eq!(subtract(&1.5.into(), &1.into()).unwrap(), Value::Real(0.5));
    }

    #[test]
    fn division_truncates_operands() {
        assert_eq!(divide(&7.into(), &2.into()).unwrap(), Value::Integer(3));
        assert_eq!(divide(&7.9.into(), &2.into()).unwrap(), Value::Integer(3));
        assert!(matches!(divide(&1.into(), &0.into()), Err(RuntimeError::DivisionByZero)));
        assert!(matches!(divide(&1.into(), &0.5.into()), Err(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(add(&i64::MAX.into(), &1.into()), Err(RuntimeError::Overflow { .. })));
        assert!(matches!(divide(&i64::MIN.into(), &(-1).into()),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn strings_concatenate_and_repeat() {
        assert_eq!(add(&"a".into(), &"b".into()).unwrap(), Value::from("ab"));
        assert_eq!(add(&1.into(), &"b".into()).unwrap(), Value::from("1b"));
        assert_eq!(multiply(&"ab".into(), &3.into()).unwrap(), Value::from("ababab"));
    }

    #[test]
    fn arrays_concatenate_into_a_new_array() {
        let left = Value::from(vec![Value::Integer(1)]);
        let right = Value::from(vec![Value::Integer(2)]);
        let joined = add(&left, &right).unwrap();

        assert_eq!(joined, Value::from(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(left, Value::from(vec![Value::Integer(1)]));
    }

    #[test]
    fn comparisons() {
        let yes = Value::Bool(true);
        assert_eq!(compare(&1.into(), CompareOperator::Equal, &1.0.into()).unwrap(), yes);
        assert_eq!(compare(&1.into(), CompareOperator::Less, &2.into()).unwrap(), yes);
        assert_eq!(compare(&"b".into(), CompareOperator::GreaterOrEqual, &"a".into()).unwrap(),
                   yes);
        assert_eq!(compare(&Value::Nil, CompareOperator::NotEqual, &false.into()).unwrap(), yes);
        assert!(compare(&1.into(), CompareOperator::Less, &"a".into()).is_err());
    }
}
