use std::{
    fmt,
    rc::{Rc, Weak},
};

use crate::{
    ast::Expr,
    interpreter::{
        context::Context, evaluator::core::EvalResult, object::dynamic_class::DynamicClass,
        value::core::Value,
    },
};

/// A host-implemented method: `(receiver, calling context, arguments)`.
pub type NativeMethod = Rc<dyn Fn(&Value, &Rc<Context>, &[Value]) -> EvalResult<Value>>;

/// A host-implemented free function: `(arguments)`.
pub type NativeFunction = Rc<dyn Fn(&[Value]) -> EvalResult<Value>>;

/// Anything that can sit in a method table or be bound to a local name.
#[derive(Clone)]
pub enum Callable {
    /// A native method that receives its receiver.
    Method {
        /// The selector, for error messages and `#<Function:...>`.
        name: Rc<str>,
        /// The implementation.
        body: NativeMethod,
    },
    /// A native free function such as `puts`.
    Function {
        /// The function name.
        name: Rc<str>,
        /// The implementation.
        body: NativeFunction,
    },
    /// A method or function written with `def`.
    Defined(Rc<DefinedFunction>),
}

impl Callable {
    /// Wraps a closure as a native method.
    pub fn method(name: &str,
                  body: impl Fn(&Value, &Rc<Context>, &[Value]) -> EvalResult<Value> + 'static)
                  -> Self {
        Self::Method { name: Rc::from(name),
                       body: Rc::new(body), }
    }

    /// Wraps a closure as a native free function.
    pub fn function(name: &str, body: impl Fn(&[Value]) -> EvalResult<Value> + 'static) -> Self {
        Self::Function { name: Rc::from(name),
                         body: Rc::new(body), }
    }

    /// The name the callable was defined under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Method { name, .. } | Self::Function { name, .. } => name,
            Self::Defined(function) => &function.name,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Function:{}>", self.name())
    }
}

/// A user-defined function: the parameters and body of a `def`.
pub struct DefinedFunction {
    /// The method name.
    pub name:   String,
    /// Parameter names, bound positionally.
    pub params: Vec<String>,
    /// The body, evaluated in a fresh frame per call.
    pub body:   Expr,
    /// The class or module whose body contained the `def`; method frames
    /// resolve constants and class variables through it.
    pub module: Option<Weak<DynamicClass>>,
}

/// A block captured as a value, together with the context it was written in.
pub struct Closure {
    /// Block parameter names.
    pub params:  Vec<String>,
    /// The block body.
    pub body:    Expr,
    /// The defining context; free names in the body resolve here.
    pub context: Rc<Context>,
}
