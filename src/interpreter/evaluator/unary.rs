use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Negates a number.
///
/// # Errors
/// `Overflow` for `-i64::MIN`, and `NoMethod` for non-numeric operands.
///
/// # Example
/// ```
/// use rubyish::interpreter::{evaluator::unary::negative, value::core::Value};
///
/// assert_eq!(negative(&Value::Integer(4)).unwrap(), Value::Integer(-4));
/// assert_eq!(negative(&Value::Real(0.5)).unwrap(), Value::Real(-0.5));
/// ```
pub fn negative(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Integer(i) => {
            i.checked_neg()
             .map(Value::Integer)
             .ok_or(RuntimeError::Overflow { operation: "negation" })
        },
        Value::Real(r) => Ok(Value::Real(-r)),
        _ => Err(RuntimeError::NoMethod { name:     "-@".to_string(),
                                          receiver: value.inspect(), }),
    }
}
