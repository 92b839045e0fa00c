use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::core::EvalResult,
        object::dynamic_class::{ClassKind, DynamicClass},
        value::{
            callable::{Callable, DefinedFunction},
            core::Value,
        },
    },
};

impl Context {
    /// Evaluates a `def`.
    ///
    /// A plain name is installed on the enclosing class or module, else on
    /// the class of `self`, else bound as a function in this frame.
    /// `def recv.name` and `def recv::name` install on the singleton class of
    /// the receiver.
    ///
    /// # Returns
    /// The method name as a symbol.
    ///
    /// # Errors
    /// A type error when the receiver is a primitive value, which has no
    /// singleton class.
    pub(crate) fn eval_def(self: &Rc<Self>,
                           target: &Expr,
                           params: &[String],
                           body: &Expr)
                           -> EvalResult<Value> {
        let (name, owner) = match target {
            Expr::Name(name) => (name, self.definition_owner()?),
            Expr::Dot { target: receiver,
                        name,
                        .. }
            | Expr::DoubleColon { target: receiver,
                                  name, } => {
                let receiver = self.eval(receiver)?;
                (name, Some(singleton_class_of(&receiver)?))
            },
            _ => return Err(RuntimeError::type_error("invalid method definition target")),
        };

        let function = DefinedFunction { name:   name.clone(),
                                         params: params.to_vec(),
                                         body:   body.clone(),
                                         module: self.module().map(Rc::downgrade), };
        let callable = Callable::Defined(Rc::new(function));

        match owner {
            Some(class) => class.set_instance_method(name, callable),
            None => self.set_local_value(name, Value::Function(callable)),
        }
        Ok(Value::symbol(name))
    }

    /// Evaluates `class Name [< Superclass] ... end`.
    ///
    /// An existing class of the same name is reopened; anything else under
    /// that name is replaced by a fresh class. The body runs with `self` and
    /// the module set to the class.
    ///
    /// # Errors
    /// A type error when the superclass is not a class, or differs from the
    /// superclass of the class being reopened.
    pub(crate) fn eval_class(self: &Rc<Self>,
                             name: &Expr,
                             superclass: Option<&Expr>,
                             body: &Expr)
                             -> EvalResult<Value> {
        let (container, name) = self.definition_name(name)?;
        let superclass = match superclass {
            Some(expr) => {
                match self.eval(expr)? {
                    Value::Class(class) if class.kind() == ClassKind::Class => Some(class),
                    other => {
                        let message = format!("superclass must be a Class ({} given)",
                                              other.inspect());
                        return Err(RuntimeError::type_error(message));
                    },
                }
            },
            None => None,
        };

        let class = match self.existing_definition(container.as_ref(), &name, ClassKind::Class) {
            Some(class) => {
                if let Some(requested) = &superclass
                   && !class.superclass().is_some_and(|current| Rc::ptr_eq(current, requested))
                {
                    let message = format!("superclass mismatch for class {}", class.name());
                    return Err(RuntimeError::type_error(message));
                }
                class
            },
            None => {
                let superclass = match superclass {
                    Some(class) => class,
                    None => self.required_class("Object")?,
                };
                self.define(container.as_ref(), &name, ClassKind::Class, superclass)?
            },
        };
        self.eval_definition_body(class, body)
    }

    /// Evaluates `module Name ... end`, reopening an existing module of the
    /// same name.
    pub(crate) fn eval_module(self: &Rc<Self>, name: &str, body: &Expr) -> EvalResult<Value> {
        let container = self.module().cloned();
        let module = match self.existing_definition(container.as_ref(), name, ClassKind::Module) {
            Some(module) => module,
            None => {
                let object = self.required_class("Object")?;
                self.define(container.as_ref(), name, ClassKind::Module, object)?
            },
        };
        self.eval_definition_body(module, body)
    }

    /// Where a plain `def name` lands, or `None` for a local function.
    fn definition_owner(&self) -> EvalResult<Option<Rc<DynamicClass>>> {
        if let Some(module) = self.module() {
            return Ok(Some(Rc::clone(module)));
        }
        match self.self_value() {
            Some(value) => Ok(Some(self.class_of(value)?)),
            None => Ok(None),
        }
    }

    /// Splits a class name into the module it is defined in and the bare
    /// name. `A::B` defines `B` inside `A`; a bare name is defined in the
    /// enclosing module, if any.
    fn definition_name(self: &Rc<Self>,
                       name: &Expr)
                       -> EvalResult<(Option<Rc<DynamicClass>>, String)> {
        match name {
            Expr::Name(name) => Ok((self.module().cloned(), name.clone())),
            Expr::DoubleColon { target, name } => {
                match self.eval(target)? {
                    Value::Class(container) => Ok((Some(container), name.clone())),
                    other => {
                        let message = format!("{} is not a class/module", other.inspect());
                        Err(RuntimeError::type_error(message))
                    },
                }
            },
            _ => Err(RuntimeError::type_error("invalid class name")),
        }
    }

    /// Finds a class or module of `kind` already registered under `name`.
    fn existing_definition(&self,
                           container: Option<&Rc<DynamicClass>>,
                           name: &str,
                           kind: ClassKind)
                           -> Option<Rc<DynamicClass>> {
        let existing = match container {
            Some(container) => container.get_constant(name),
            None => self.outermost().get_local_value(name),
        };
        match existing {
            Some(Value::Class(class)) if class.kind() == kind => Some(class),
            _ => None,
        }
    }

    /// Creates a class or module and registers it under `name`.
    fn define(&self,
              container: Option<&Rc<DynamicClass>>,
              name: &str,
              kind: ClassKind,
              superclass: Rc<DynamicClass>)
              -> EvalResult<Rc<DynamicClass>> {
        let metaclass = match kind {
            ClassKind::Module => self.required_class("Module")?,
            _ => self.required_class("Class")?,
        };
        let qualified = match container {
            Some(container) => format!("{}::{name}", container.name()),
            None => name.to_string(),
        };
        let class = Rc::new(DynamicClass::new(Some(metaclass),
                                              &qualified,
                                              kind,
                                              Some(superclass),
                                              container));
        debug!(name = %qualified, ?kind, "defining");

        let value = Value::Class(Rc::clone(&class));
        match container {
            Some(container) => container.set_constant(name, value),
            None => self.outermost().set_local_value(name, value),
        }
        Ok(class)
    }

    /// Runs a class or module body in a fresh frame under the root, with
    /// `self` and the module set to `class`.
    fn eval_definition_body(self: &Rc<Self>,
                            class: Rc<DynamicClass>,
                            body: &Expr)
                            -> EvalResult<Value> {
        let frame = Self::with_self(&self.root(), Some(Value::Class(Rc::clone(&class))), Some(class));
        frame.eval(body)
    }

    fn required_class(&self, name: &str) -> EvalResult<Rc<DynamicClass>> {
        self.builtin_class(name)
            .ok_or_else(|| RuntimeError::UninitializedConstant { name: name.to_string() })
    }
}

/// The singleton class of an object or class, materializing it if needed.
fn singleton_class_of(receiver: &Value) -> EvalResult<Rc<DynamicClass>> {
    match receiver {
        Value::Object(object) => Ok(object.singleton_class()),
        Value::Class(class) => Ok(class.singleton_class()),
        _ => {
            let message = format!("can't define singleton method for {}", receiver.inspect());
            Err(RuntimeError::type_error(message))
        },
    }
}
