use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::{core::EvalResult, function::core::check_arity},
        object::dynamic_class::DynamicClass,
        value::{callable::Callable, core::Value},
    },
};

/// Installs the `String` and `Symbol` methods.
pub fn install(string: &DynamicClass, symbol: &DynamicClass) {
    string.set_instance_method("length", Callable::method("length", length));
    string.set_instance_method("upcase", Callable::method("upcase", upcase));
    string.set_instance_method("downcase", Callable::method("downcase", downcase));
    string.set_instance_method("to_sym", Callable::method("to_sym", to_sym));
    string.set_instance_method("to_s", Callable::method("to_s", to_s));

    symbol.set_instance_method("to_s", Callable::method("to_s", to_s));
}

/// Length in characters, not bytes.
fn length(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("length", 0, args)?;
    let count = text(receiver, "length")?.chars().count();
    Ok(Value::Integer(i64::try_from(count).unwrap_or(i64::MAX)))
}

fn upcase(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("upcase", 0, args)?;
    Ok(text(receiver, "upcase")?.to_uppercase().into())
}

fn downcase(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("downcase", 0, args)?;
    Ok(text(receiver, "downcase")?.to_lowercase().into())
}

fn to_sym(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_sym", 0, args)?;
    Ok(Value::Symbol(Rc::clone(text(receiver, "to_sym")?)))
}

/// A string is its own text; a symbol loses its colon.
fn to_s(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_s", 0, args)?;
    match receiver {
        Value::Str(s) | Value::Symbol(s) => Ok(Value::Str(Rc::clone(s))),
        _ => Ok(receiver.to_string().into()),
    }
}

fn text<'a>(receiver: &'a Value, method: &str) -> EvalResult<&'a Rc<str>> {
    match receiver {
        Value::Str(s) => Ok(s),
        _ => {
            Err(RuntimeError::NoMethod { name:     method.to_string(),
                                         receiver: receiver.inspect(), })
        },
    }
}
