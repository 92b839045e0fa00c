use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::{
            core::EvalResult,
            function::core::{block_argument, check_arity},
        },
        object::dynamic_class::DynamicClass,
        value::{callable::Callable, core::Value},
    },
};

/// Installs the `Fixnum` and `Float` methods.
pub fn install(fixnum: &DynamicClass, float: &DynamicClass) {
    fixnum.set_instance_method("times", Callable::method("times", times));
    fixnum.set_instance_method("upto", Callable::method("upto", upto));
    fixnum.set_instance_method("to_s", Callable::method("to_s", to_s));
    fixnum.set_instance_method("to_f", Callable::method("to_f", to_f));

    float.set_instance_method("to_i", Callable::method("to_i", to_i));
    float.set_instance_method("to_s", Callable::method("to_s", to_s));
}

/// `n.times { |i| ... }` runs the block for `0` up to `n - 1` and returns
/// `n`.
fn times(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("times", 1, args)?;
    let count = integer(receiver, "times")?;
    let block = block_argument("times", args)?;
    for i in 0..count {
        block.call(&[Value::Integer(i)])?;
    }
    Ok(receiver.clone())
}

/// `a.upto(b) { |i| ... }` runs the block for each integer from `a` to `b`
/// inclusive and returns `a`.
fn upto(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("upto", 2, args)?;
    let from = integer(receiver, "upto")?;
    let to = integer(&args[0], "upto")?;
    let block = block_argument("upto", args)?;
    for i in from..=to {
        block.call(&[Value::Integer(i)])?;
    }
    Ok(receiver.clone())
}

fn to_s(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_s", 0, args)?;
    Ok(receiver.to_string().into())
}

fn to_f(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_f", 0, args)?;
    receiver.as_real()
            .map(Value::Real)
            .ok_or_else(|| not_numeric(receiver, "to_f"))
}

/// Truncates toward zero. Values beyond the integer range saturate.
#[allow(clippy::cast_possible_truncation)]
fn to_i(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_i", 0, args)?;
    match receiver {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Real(r) if r.is_finite() => Ok(Value::Integer(r.trunc() as i64)),
        Value::Real(r) => Err(RuntimeError::type_error(format!("{r} out of integer range"))),
        _ => Err(not_numeric(receiver, "to_i")),
    }
}

fn integer(value: &Value, method: &str) -> EvalResult<i64> {
    value.as_integer().ok_or_else(|| not_numeric(value, method))
}

fn not_numeric(value: &Value, method: &str) -> RuntimeError {
    RuntimeError::type_error(format!("{method}: expected a number, got {}", value.inspect()))
}
