use std::rc::{Rc, Weak};

use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::core::EvalResult,
        value::{
            callable::{Callable, Closure, DefinedFunction},
            core::Value,
        },
    },
};

impl Context {
    /// Invokes a callable.
    ///
    /// Native methods receive the receiver (`nil` when there is none), this
    /// context and the arguments. Native functions receive the arguments
    /// only. User-defined methods run in a fresh frame under the root, with
    /// `self` bound to the receiver.
    ///
    /// # Parameters
    /// - `callable`: What to run.
    /// - `receiver`: The object the method was found on, if any.
    /// - `args`: Evaluated arguments.
    ///
    /// # Returns
    /// The callable's result.
    pub fn invoke(self: &Rc<Self>,
                  callable: &Callable,
                  receiver: Option<&Value>,
                  args: &[Value])
                  -> EvalResult<Value> {
        match callable {
            Callable::Method { body, .. } => body(receiver.unwrap_or(&Value::Nil), self, args),
            Callable::Function { body, .. } => body(args),
            Callable::Defined(function) => self.call_defined(function, receiver, args),
        }
    }

    fn call_defined(self: &Rc<Self>,
                    function: &DefinedFunction,
                    receiver: Option<&Value>,
                    args: &[Value])
                    -> EvalResult<Value> {
        check_arity(&function.name, function.params.len(), args)?;
        trace!(method = %function.name, args = args.len(), "calling");

        let module = function.module.as_ref().and_then(Weak::upgrade);
        let frame = Self::with_self(&self.root(), receiver.cloned(), module);
        for (param, arg) in function.params.iter().zip(args) {
            frame.set_local_value(param, arg.clone());
        }
        frame.eval(&function.body)
    }
}

impl Closure {
    /// Runs the block with `args`.
    ///
    /// The block body runs in a new frame whose parent is the frame the
    /// block was written in. Missing arguments bind as `nil` and extra
    /// arguments are dropped.
    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        let frame = Context::with_parent(&self.context);
        for (index, param) in self.params.iter().enumerate() {
            frame.set_local_value(param, args.get(index).cloned().unwrap_or(Value::Nil));
        }
        frame.eval(&self.body)
    }
}

/// Checks that exactly `expected` arguments were given.
///
/// # Errors
/// `ArgumentCount` naming the method on mismatch.
pub fn check_arity(name: &str, expected: usize, args: &[Value]) -> EvalResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount { name: name.to_string(),
                                          expected,
                                          found: args.len() })
    }
}

/// Extracts the block passed as the last argument.
///
/// # Errors
/// A type error when the last argument is not a block.
pub fn block_argument<'a>(name: &str, args: &'a [Value]) -> EvalResult<&'a Rc<Closure>> {
    match args.last() {
        Some(Value::Proc(closure)) => Ok(closure),
        _ => Err(RuntimeError::type_error(format!("no block given to '{name}'"))),
    }
}
