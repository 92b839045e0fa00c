use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::{core::EvalResult, function::core::check_arity},
        object::{dynamic_class::DynamicClass, dynamic_object::DynamicObject},
        value::{callable::Callable, core::Value},
    },
};

/// `Class#new`: allocates an instance and runs `initialize` with the
/// arguments when the class defines it.
///
/// # Errors
/// A type error when the receiver is not a class, an arity error when
/// arguments are given to a class without `initialize`, and anything
/// `initialize` raises.
pub fn new_instance(receiver: &Value, context: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    let class = expect_class(receiver, "new")?;
    let object = Value::Object(Rc::new(DynamicObject::new(Some(Rc::clone(class)))));
    match context.find_method(&object, "initialize") {
        Some(initialize) => {
            context.invoke(&initialize, Some(&object), args)?;
        },
        None => check_arity("initialize", 0, args)?,
    }
    Ok(object)
}

/// Installs the methods every object answers on `Object`, the reflection
/// methods on `Module`, and `superclass` on `Class`.
pub fn install(object: &DynamicClass, module: &DynamicClass, class: &DynamicClass) {
    object.set_instance_method("class", Callable::method("class", object_class));
    object.set_instance_method("methods", Callable::method("methods", methods));
    object.set_instance_method("singleton_methods",
                               Callable::method("singleton_methods", singleton_methods));
    object.set_instance_method("to_s", Callable::method("to_s", to_s));
    object.set_instance_method("inspect", Callable::method("inspect", inspect));
    object.set_instance_method("respond_to", Callable::method("respond_to", respond_to));
    object.set_instance_method("instance_variables",
                               Callable::method("instance_variables", instance_variables));

    module.set_instance_method("name", Callable::method("name", module_name));
    module.set_instance_method("attr_accessor", Callable::method("attr_accessor", attr_accessor));
    module.set_instance_method("attr_reader", Callable::method("attr_reader", attr_reader));
    module.set_instance_method("attr_writer", Callable::method("attr_writer", attr_writer));
    module.set_instance_method("instance_methods",
                               Callable::method("instance_methods", instance_methods));
    module.set_instance_method("constants", Callable::method("constants", constants));

    class.set_instance_method("superclass", Callable::method("superclass", superclass));
}

fn object_class(receiver: &Value, context: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("class", 0, args)?;
    Ok(Value::Class(context.class_of(receiver)?))
}

/// Every method the receiver responds to, singleton methods first.
fn methods(receiver: &Value, context: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("methods", 0, args)?;
    let names = match receiver {
        Value::Object(object) => object.method_names(),
        Value::Class(class) => class.as_object().method_names(),
        _ => context.class_of(receiver)?.instance_method_names(),
    };
    Ok(Value::symbols(names))
}

fn singleton_methods(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("singleton_methods", 0, args)?;
    let names = as_object(receiver).map(DynamicObject::singleton_method_names)
                                   .unwrap_or_default();
    Ok(Value::symbols(names))
}

fn to_s(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("to_s", 0, args)?;
    Ok(receiver.to_string().into())
}

fn inspect(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("inspect", 0, args)?;
    Ok(receiver.inspect().into())
}

fn respond_to(receiver: &Value, context: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("respond_to", 1, args)?;
    let name = name_argument(&args[0])?;
    Ok(Value::Bool(context.find_method(receiver, &name).is_some()))
}

fn instance_variables(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("instance_variables", 0, args)?;
    let names = as_object(receiver).map(DynamicObject::value_names).unwrap_or_default();
    Ok(Value::symbols(names.iter().map(|name| format!("@{name}"))))
}

fn module_name(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("name", 0, args)?;
    Ok(expect_class(receiver, "name")?.name().into())
}

fn attr_accessor(receiver: &Value, context: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    attr_reader(receiver, context, args)?;
    attr_writer(receiver, context, args)
}

/// Defines a reader method per name that returns `@name`.
fn attr_reader(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    let class = expect_class(receiver, "attr_reader")?;
    for arg in args {
        let name = name_argument(arg)?;
        class.set_instance_method(&name, reader(name.clone()));
    }
    Ok(Value::Nil)
}

/// Defines a `name=` method per name that writes `@name`.
fn attr_writer(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    let class = expect_class(receiver, "attr_writer")?;
    for arg in args {
        let name = name_argument(arg)?;
        class.set_instance_method(&format!("{name}="), writer(name));
    }
    Ok(Value::Nil)
}

fn reader(variable: String) -> Callable {
    Callable::method(&variable.clone(), move |receiver, _, args| {
        check_arity(&variable, 0, args)?;
        Ok(as_object(receiver).map_or(Value::Nil, |object| object.get_value(&variable)))
    })
}

fn writer(variable: String) -> Callable {
    let setter = format!("{variable}=");
    Callable::method(&setter.clone(), move |receiver, _, args| {
        check_arity(&setter, 1, args)?;
        let Some(object) = as_object(receiver) else {
            let message = format!("can't set instance variable @{variable} on {}",
                                  receiver.inspect());
            return Err(RuntimeError::type_error(message));
        };
        object.set_value(&variable, args[0].clone());
        Ok(args[0].clone())
    })
}

fn instance_methods(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("instance_methods", 0, args)?;
    Ok(Value::symbols(expect_class(receiver, "instance_methods")?.instance_method_names()))
}

fn constants(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("constants", 0, args)?;
    Ok(Value::symbols(expect_class(receiver, "constants")?.constant_names()))
}

fn superclass(receiver: &Value, _: &Rc<Context>, args: &[Value]) -> EvalResult<Value> {
    check_arity("superclass", 0, args)?;
    let class = expect_class(receiver, "superclass")?;
    Ok(class.superclass()
            .map_or(Value::Nil, |superclass| Value::Class(Rc::clone(superclass))))
}

/// The object side of an instance or class; primitives have none.
fn as_object(value: &Value) -> Option<&DynamicObject> {
    match value {
        Value::Object(object) => Some(object),
        Value::Class(class) => Some(class.as_object()),
        _ => None,
    }
}

fn expect_class<'a>(receiver: &'a Value, method: &str) -> EvalResult<&'a Rc<DynamicClass>> {
    match receiver {
        Value::Class(class) => Ok(class),
        _ => {
            Err(RuntimeError::NoMethod { name:     method.to_string(),
                                         receiver: receiver.inspect(), })
        },
    }
}

/// Accepts `:name` or `"name"` where a method or variable name is expected.
fn name_argument(value: &Value) -> EvalResult<String> {
    match value {
        Value::Symbol(name) | Value::Str(name) => Ok(name.to_string()),
        _ => Err(RuntimeError::type_error(format!("{} is not a symbol nor a string",
                                                  value.inspect()))),
    }
}
