use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::{
            control::enumerate,
            core::EvalResult,
            function::core::{block_argument, check_arity},
        },
        object::dynamic_class::DynamicClass,
        value::{callable::Callable, core::Value},
    },
};

/// Installs the `Array`, `Hash`, `Range` and `Proc` methods.
pub fn install(array: &DynamicClass,
               hash: &DynamicClass,
               range: &DynamicClass,
               proc: &DynamicClass) {
    array.set_instance_method("length", Callable::method("length", length));
    array.set_instance_method("push", Callable::method("push", push));
    array.set_instance_method("first", Callable::method("first", first));
    array.set_instance_method("last", Callable::method("last", last));
    array.set_instance_method("each", Callable::method("each", each));
    array.set_instance_method("map", Callable::method("map", map));

    hash.set_instance_method("keys", Callable::method("keys", keys));
    hash.set_instance_method("values", Callable::method("values", values));
    hash.set_instance_method("length", Callable::method("length", length));
    hash.set_instance_method("each", Callable::method("each", each));
    hash.set_instance_method("map", Callable::method("map", map));

    range.set_instance_method("each", Callable::method("each", each));
    range.set_instance_method("map", Callable::method("map", map));
    range.set_instance_method("to_a", Callable::method("to_a", to_a));

    proc.set_instance_method("call", Callable::method("call", call));
}

fn length(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("length", 0, args)?;
    let len = match receiver {
        Value::Array(items) => items.borrow().len(),
        Value::Hash(hash) => hash.borrow().len(),
        _ => return Err(no_method("length", receiver)),
    };
    Ok(Value::Integer(i64::try_from(len).unwrap_or(i64::MAX)))
}

/// Appends every argument and returns the array itself.
fn push(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    let Value::Array(items) = receiver else {
        return Err(no_method("push", receiver));
    };
    items.borrow_mut().extend(args.iter().cloned());
    Ok(receiver.clone())
}

fn first(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("first", 0, args)?;
    let Value::Array(items) = receiver else {
        return Err(no_method("first", receiver));
    };
    Ok(items.borrow().first().cloned().unwrap_or(Value::Nil))
}

fn last(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("last", 0, args)?;
    let Value::Array(items) = receiver else {
        return Err(no_method("last", receiver));
    };
    Ok(items.borrow().last().cloned().unwrap_or(Value::Nil))
}

/// Runs the block for each element and returns the receiver.
///
/// Hash entries are passed as `key, value` to a block with two or more
/// parameters, and as a `[key, value]` pair otherwise.
fn each(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("each", 1, args)?;
    let block = block_argument("each", args)?;
    let spread = matches!(receiver, Value::Hash(_)) && block.params.len() > 1;
    for item in enumerate(receiver)? {
        match (&item, spread) {
            (Value::Array(pair), true) => block.call(&pair.borrow())?,
            _ => block.call(std::slice::from_ref(&item))?,
        };
    }
    Ok(receiver.clone())
}

/// Collects the block's result for each element into a new array. Hash
/// entries reach the block as `[key, value]` pairs.
fn map(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("map", 1, args)?;
    let block = block_argument("map", args)?;
    let mapped = enumerate(receiver)?.map(|item| block.call(&[item]))
                                     .collect::<EvalResult<Vec<_>>>()?;
    Ok(mapped.into())
}

fn keys(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("keys", 0, args)?;
    let Value::Hash(hash) = receiver else {
        return Err(no_method("keys", receiver));
    };
    Ok(hash.borrow().iter().map(|(key, _)| key.clone()).collect::<Vec<_>>().into())
}

fn values(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("values", 0, args)?;
    let Value::Hash(hash) = receiver else {
        return Err(no_method("values", receiver));
    };
    Ok(hash.borrow().iter().map(|(_, value)| value.clone()).collect::<Vec<_>>().into())
}

/// Lists a range's integers, reserving room for all of them first.
fn to_a(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_a", 0, args)?;
    let elements = enumerate(receiver)?;
    let mut items = Vec::new();
    items.try_reserve_exact(elements.size_hint().0)?;
    items.extend(elements);
    Ok(items.into())
}

/// `proc.call(args...)` runs the block with the given arguments.
fn call(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    match receiver {
        Value::Proc(closure) => closure.call(args),
        _ => Err(no_method("call", receiver)),
    }
}

fn no_method(name: &str, receiver: &Value) -> RuntimeError {
    RuntimeError::NoMethod { name:     name.to_string(),
                             receiver: receiver.inspect(), }
}
