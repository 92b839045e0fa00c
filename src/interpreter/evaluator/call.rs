use std::rc::Rc;

use crate::{
    ast::{Expr, is_constant},
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::core::EvalResult,
        value::{
            callable::{Callable, Closure},
            core::Value,
        },
    },
};

impl Context {
    /// Evaluates a receiverless call such as `puts 1` or `helper(2)`.
    ///
    /// A function bound in the frame chain wins; otherwise the name is sent
    /// to `self`.
    ///
    /// # Errors
    /// `NoMethod` when neither exists.
    pub(crate) fn eval_call(self: &Rc<Self>, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let args = self.eval_arguments(args)?;
        if let Some(Value::Function(callable)) = self.get_value(name) {
            return self.invoke(&callable, None, &args);
        }
        self.call_self_method(name, &args).unwrap_or_else(|| {
            Err(RuntimeError::NoMethod { name:     name.to_string(),
                                         receiver: self.self_description(), })
        })
    }

    /// Evaluates `target.name(args)`.
    pub(crate) fn eval_dot(self: &Rc<Self>,
                           target: &Expr,
                           name: &str,
                           args: &[Expr])
                           -> EvalResult<Value> {
        let receiver = self.eval(target)?;
        let args = self.eval_arguments(args)?;
        self.send(&receiver, name, &args)
    }

    /// Evaluates `Target::Name` as a constant of `Target`, or `Target::name`
    /// as a method call on it.
    ///
    /// # Errors
    /// A type error when the target is not a class or module, and
    /// `UninitializedConstant` for a missing constant.
    pub(crate) fn eval_double_colon(self: &Rc<Self>, target: &Expr, name: &str) -> EvalResult<Value> {
        let receiver = self.eval(target)?;
        let Value::Class(class) = &receiver else {
            let message = format!("{} is not a class/module", receiver.inspect());
            return Err(RuntimeError::type_error(message));
        };
        if is_constant(name) {
            let qualified = || format!("{}::{name}", class.name());
            return class.get_constant(name)
                        .ok_or_else(|| RuntimeError::UninitializedConstant { name: qualified() });
        }
        self.send(&receiver, name, &[])
    }

    /// Evaluates `target.name = value` by sending `name=`; the result is the
    /// assigned value, not what the setter returns.
    pub(crate) fn eval_assign_dot(self: &Rc<Self>, target: &Expr, value: &Expr) -> EvalResult<Value> {
        let Expr::Dot { target, name, .. } = target else {
            return Err(RuntimeError::type_error("invalid assignment target"));
        };
        let receiver = self.eval(target)?;
        let value = self.eval(value)?;
        self.send(&receiver, &format!("{name}="), std::slice::from_ref(&value))?;
        Ok(value)
    }

    /// Evaluates call arguments left to right. A block argument becomes a
    /// `Proc` capturing this frame.
    pub(crate) fn eval_arguments(self: &Rc<Self>, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    /// Turns a block into a `Proc` value closed over this frame.
    pub(crate) fn capture_block(self: &Rc<Self>, params: &[String], body: &Expr) -> Value {
        Value::Proc(Rc::new(Closure { params:  params.to_vec(),
                                      body:    body.clone(),
                                      context: Rc::clone(self), }))
    }

    /// Sends `name` to `receiver`.
    ///
    /// # Parameters
    /// - `receiver`: The object the method is looked up on and bound to.
    /// - `name`: The selector.
    /// - `args`: Evaluated arguments.
    ///
    /// # Returns
    /// The method's result.
    ///
    /// # Errors
    /// `NoMethod` when the receiver does not respond to `name`, or whatever
    /// the method itself raises.
    pub fn send(self: &Rc<Self>, receiver: &Value, name: &str, args: &[Value]) -> EvalResult<Value> {
        let method = self.find_method(receiver, name)
                         .ok_or_else(|| RuntimeError::NoMethod { name:     name.to_string(),
                                                                 receiver: receiver.inspect(), })?;
        self.invoke(&method, Some(receiver), args)
    }

    /// Resolves `name` on `receiver`.
    ///
    /// Objects and classes use their own resolution, which checks the
    /// singleton class first. Primitive values resolve through their builtin
    /// class.
    #[must_use]
    pub fn find_method(&self, receiver: &Value, name: &str) -> Option<Callable> {
        match receiver {
            Value::Object(object) => object.get_method(name),
            Value::Class(class) => class.get_method(name),
            _ => self.class_of(receiver).ok()?.get_instance_method(name),
        }
    }

    /// Sends `name` to `self` when `self` responds to it.
    pub(crate) fn call_self_method(self: &Rc<Self>,
                                   name: &str,
                                   args: &[Value])
                                   -> Option<EvalResult<Value>> {
        let receiver = self.self_value()?;
        let method = self.find_method(receiver, name)?;
        Some(self.invoke(&method, Some(receiver), args))
    }

    fn self_description(&self) -> String {
        self.self_value().map_or_else(|| "main".to_string(), Value::inspect)
    }
}
