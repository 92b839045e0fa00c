use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        context::Context,
        evaluator::{
            binary::{add, compare, divide, multiply, subtract},
            unary::negative,
        },
        object::dynamic_class::DynamicClass,
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

impl Context {
    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Every node
    /// produces a value; commands such as `while` or `def` produce `nil` or a
    /// symbol.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression.
    ///
    /// # Example
    /// ```
    /// use rubyish::{
    ///     ast::Expr,
    ///     interpreter::{context::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    /// let sum = Expr::add(Expr::constant(1), Expr::constant(2));
    ///
    /// assert_eq!(context.eval(&sum).unwrap(), Value::Integer(3));
    /// ```
    pub fn eval(self: &Rc<Self>, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Constant(literal) => Ok(literal.into()),
            Expr::Name(name) => self.eval_name(name),
            Expr::SelfValue => Ok(self.self_value().cloned().unwrap_or(Value::Nil)),
            Expr::InstanceVar(name) => self.eval_instance_var(name),
            Expr::ClassVar(name) => self.eval_class_var(name),

            Expr::Add(left, right) => add(&self.eval(left)?, &self.eval(right)?),
            Expr::Subtract(left, right) => subtract(&self.eval(left)?, &self.eval(right)?),
            Expr::Multiply(left, right) => multiply(&self.eval(left)?, &self.eval(right)?),
            Expr::Divide(left, right) => divide(&self.eval(left)?, &self.eval(right)?),
            Expr::Negative(expr) => negative(&self.eval(expr)?),
            Expr::Negation(expr) => Ok(Value::Bool(!self.eval(expr)?.is_truthy())),
            Expr::Compare { left, op, right } => {
                compare(&self.eval(left)?, *op, &self.eval(right)?)
            },

            Expr::Assign { name, value } => self.eval_assign(name, value),
            Expr::AssignInstanceVar { name, value } => self.eval_assign_instance_var(name, value),
            Expr::AssignClassVar { name, value } => self.eval_assign_class_var(name, value),
            Expr::AssignIndexed { target,
                                  index,
                                  value, } => self.eval_assign_indexed(target, index, value),
            Expr::AssignDot { target, value } => self.eval_assign_dot(target, value),

            Expr::Call { name, args } => self.eval_call(name, args),
            Expr::Dot { target, name, args } => self.eval_dot(target, name, args),
            Expr::DoubleColon { target, name } => self.eval_double_colon(target, name),

            Expr::If { condition,
                       then_branch,
                       else_branch, } => {
                self.eval_if(condition, then_branch, else_branch.as_deref())
            },
            Expr::While { condition, body } => self.eval_loop(condition, body, true),
            Expr::Until { condition, body } => self.eval_loop(condition, body, false),
            Expr::ForIn { name,
                          collection,
                          body, } => self.eval_for_in(name, collection, body),

            Expr::Def { target, params, body } => self.eval_def(target, params, body),
            Expr::Class { name,
                          superclass,
                          body, } => self.eval_class(name, superclass.as_deref(), body),
            Expr::Module { name, body } => self.eval_module(name, body),

            Expr::Array(items) => self.eval_array(items),
            Expr::Hash(entries) => self.eval_hash(entries),
            Expr::Range { from, to } => self.eval_range(from, to),
            Expr::Indexed { target, index } => self.eval_indexed(target, index),
            Expr::Block { params, body } => Ok(self.capture_block(params, body)),
            Expr::Composite(commands) => self.eval_sequence(commands),
        }
    }

    /// Evaluates commands in order and returns the last value, or `nil` for
    /// an empty sequence.
    pub fn eval_sequence(self: &Rc<Self>, commands: &[Expr]) -> EvalResult<Value> {
        let mut last = Value::Nil;
        for command in commands {
            last = self.eval(command)?;
        }
        Ok(last)
    }

    /// The class a value belongs to, used to resolve its methods.
    ///
    /// Objects and classes carry their own class link; primitive values map
    /// to the builtin class registered in the root frame.
    pub fn class_of(&self, value: &Value) -> EvalResult<Rc<DynamicClass>> {
        let class = match value {
            Value::Object(object) => object.class(),
            Value::Class(class) => class.class(),
            _ => value.builtin_class_name().and_then(|name| self.builtin_class(name)),
        };
        class.ok_or_else(|| RuntimeError::type_error(format!("{} has no class", value.inspect())))
    }

    /// Evaluates one parsed node in this frame, for embedding hosts.
    ///
    /// # Example
    /// ```
    /// use rubyish::interpreter::{machine::Machine, parser::core::Parser, value::core::Value};
    ///
    /// let machine = Machine::new();
    /// let expr = Parser::new("2 * 21").parse_expression().unwrap().unwrap();
    ///
    /// assert_eq!(machine.root_context().evaluate(&expr).unwrap(), Value::Integer(42));
    /// ```
    pub fn evaluate(self: &Rc<Self>, expr: &Expr) -> EvalResult<Value> {
        self.eval(expr)
    }
}

impl Expr {
    /// Evaluates this node in `context`.
    ///
    /// Shorthand for [`Context::evaluate`], for callers that hold the tree
    /// rather than the frame.
    pub fn evaluate(&self, context: &Rc<Context>) -> EvalResult<Value> {
        context.evaluate(self)
    }
}
