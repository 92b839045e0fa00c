use std::rc::Rc;

use crate::{
    ast::{Expr, is_constant},
    error::RuntimeError,
    interpreter::{
        context::Context, evaluator::core::EvalResult, object::dynamic_class::DynamicClass,
        value::core::Value,
    },
};

impl Context {
    /// Resolves a bare name.
    ///
    /// Uppercase names are constants: the current module and its enclosing
    /// modules are searched first, then the frame chain. Lowercase names are
    /// locals; a function bound to the name is called with no arguments, and
    /// a name that is not bound at all is tried as a method on `self`.
    ///
    /// # Errors
    /// `UninitializedConstant` or `UndefinedName` when nothing matches.
    pub(crate) fn eval_name(self: &Rc<Self>, name: &str) -> EvalResult<Value> {
        if is_constant(name) {
            return self.lookup_constant(name)
                       .ok_or_else(|| RuntimeError::UninitializedConstant { name: name.to_string() });
        }
        match self.get_value(name) {
            Some(Value::Function(callable)) => self.invoke(&callable, None, &[]),
            Some(value) => Ok(value),
            None => {
                self.call_self_method(name, &[])
                    .unwrap_or_else(|| Err(RuntimeError::UndefinedName { name: name.to_string() }))
            },
        }
    }

    /// Looks a constant up through the module nesting, then the frames.
    #[must_use]
    pub fn lookup_constant(&self, name: &str) -> Option<Value> {
        let mut module = self.module().cloned();
        while let Some(current) = module {
            if let Some(value) = current.get_constant(name) {
                return Some(value);
            }
            module = current.module();
        }
        self.get_value(name)
    }

    /// `@name` reads the instance variable on `self`; unset reads as `nil`.
    pub(crate) fn eval_instance_var(&self, name: &str) -> EvalResult<Value> {
        Ok(match self.self_value() {
               Some(Value::Object(object)) => object.get_value(name),
               Some(Value::Class(class)) => class.as_object().get_value(name),
               _ => Value::Nil,
           })
    }

    /// `@@name` reads the class variable through the current class chain.
    pub(crate) fn eval_class_var(&self, name: &str) -> EvalResult<Value> {
        let class = self.current_class();
        if let Some(value) = class.as_ref().and_then(|class| class.get_class_variable(name)) {
            return Ok(value);
        }
        let class = class.map_or_else(|| "Object".to_string(), |class| class.name().to_string());
        Err(RuntimeError::UninitializedClassVariable { name: name.to_string(),
                                                       class })
    }

    /// `name = value` binds in this frame. Inside a class or module body an
    /// uppercase name defines a constant of that module instead.
    pub(crate) fn eval_assign(self: &Rc<Self>, name: &str, value: &Expr) -> EvalResult<Value> {
        let value = self.eval(value)?;
        match self.module() {
            Some(module) if is_constant(name) => module.set_constant(name, value.clone()),
            _ => self.set_local_value(name, value.clone()),
        }
        Ok(value)
    }

    /// `@name = value` writes the instance variable on `self`.
    ///
    /// # Errors
    /// A type error when `self` is unset or is a primitive value.
    pub(crate) fn eval_assign_instance_var(self: &Rc<Self>,
                                           name: &str,
                                           value: &Expr)
                                           -> EvalResult<Value> {
        let value = self.eval(value)?;
        match self.self_value() {
            Some(Value::Object(object)) => object.set_value(name, value.clone()),
            Some(Value::Class(class)) => class.as_object().set_value(name, value.clone()),
            other => {
                let receiver = other.map_or_else(|| "main".to_string(), Value::inspect);
                let message = format!("can't set instance variable @{name} on {receiver}");
                return Err(RuntimeError::type_error(message));
            },
        }
        Ok(value)
    }

    /// `@@name = value` writes the class variable on the current class.
    pub(crate) fn eval_assign_class_var(self: &Rc<Self>,
                                        name: &str,
                                        value: &Expr)
                                        -> EvalResult<Value> {
        let value = self.eval(value)?;
        let Some(class) = self.current_class() else {
            let message = format!("class variable @@{name} assigned outside of a class");
            return Err(RuntimeError::type_error(message));
        };
        class.set_class_variable(name, value.clone());
        Ok(value)
    }

    /// The class that owns class variables in this frame: the enclosing
    /// class body, or the class of `self` inside a method.
    fn current_class(&self) -> Option<Rc<DynamicClass>> {
        if let Some(module) = self.module() {
            return Some(Rc::clone(module));
        }
        match self.self_value()? {
            Value::Class(class) => Some(Rc::clone(class)),
            Value::Object(object) => object.class(),
            _ => None,
        }
    }
}
