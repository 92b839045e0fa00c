use std::fmt;

use ordered_float::OrderedFloat;

/// A literal value written directly in source code.
///
/// Reals are stored as [`OrderedFloat`] so that every syntax tree node can
/// derive `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `nil`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// An integer such as `42`.
    Integer(i64),
    /// A real such as `2.5`.
    Real(OrderedFloat<f64>),
    /// A single or double quoted string.
    Str(String),
    /// A symbol such as `:name`, stored without the colon.
    Symbol(String),
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Real(OrderedFloat(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// The six comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        };
        f.write_str(symbol)
    }
}

/// A node of the syntax tree.
///
/// Commands (assignments, control flow, definitions) and plain expressions
/// share this one type; every node evaluates to a value. Nodes are immutable
/// and compare structurally, so parser output can be checked against a tree
/// written by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A literal such as `1`, `"foo"` or `:foo`.
    Constant(Literal),
    /// A bare name, local or constant, such as `foo` or `Object`.
    Name(String),
    /// `self`
    SelfValue,
    /// An instance variable read such as `@name`, stored without the sigil.
    InstanceVar(String),
    /// A class variable read such as `@@count`, stored without the sigils.
    ClassVar(String),

    /// `left + right`
    Add(Box<Expr>, Box<Expr>),
    /// `left - right`
    Subtract(Box<Expr>, Box<Expr>),
    /// `left * right`
    Multiply(Box<Expr>, Box<Expr>),
    /// `left / right`
    Divide(Box<Expr>, Box<Expr>),
    /// Unary minus.
    Negative(Box<Expr>),
    /// Logical not, `!expr`.
    Negation(Box<Expr>),
    /// A comparison such as `a <= b`.
    Compare {
        /// Left operand.
        left:  Box<Expr>,
        /// The comparison.
        op:    CompareOperator,
        /// Right operand.
        right: Box<Expr>,
    },

    /// `name = value`
    Assign {
        /// The local or constant name.
        name:  String,
        /// The assigned expression.
        value: Box<Expr>,
    },
    /// `@name = value`
    AssignInstanceVar {
        /// The variable name without the sigil.
        name:  String,
        /// The assigned expression.
        value: Box<Expr>,
    },
    /// `@@name = value`
    AssignClassVar {
        /// The variable name without the sigils.
        name:  String,
        /// The assigned expression.
        value: Box<Expr>,
    },
    /// `target[index] = value`
    AssignIndexed {
        /// The collection expression.
        target: Box<Expr>,
        /// The index expression.
        index:  Box<Expr>,
        /// The assigned expression.
        value:  Box<Expr>,
    },
    /// `receiver.name = value`; `target` is always an [`Expr::Dot`].
    AssignDot {
        /// The dotted target.
        target: Box<Expr>,
        /// The assigned expression.
        value:  Box<Expr>,
    },

    /// A call with no explicit receiver, such as `puts 1, 2` or `foo(1)`.
    Call {
        /// The function or method name.
        name: String,
        /// Arguments; a trailing block comes last.
        args: Vec<Expr>,
    },
    /// A method call on a receiver, such as `a.m(x)`.
    Dot {
        /// The receiver.
        target: Box<Expr>,
        /// The selector.
        name:   String,
        /// Arguments; a trailing block comes last.
        args:   Vec<Expr>,
    },
    /// A qualified lookup such as `Module1::PI` or `Module1::helper`.
    DoubleColon {
        /// The namespace expression.
        target: Box<Expr>,
        /// The constant or method name.
        name:   String,
    },

    /// `if`/`elif`/`else`; an `elif` is a nested `If` in `else_branch`.
    If {
        /// The condition.
        condition:   Box<Expr>,
        /// Evaluated when the condition is truthy.
        then_branch: Box<Expr>,
        /// Evaluated otherwise, when present.
        else_branch: Option<Box<Expr>>,
    },
    /// `while condition ... end`
    While {
        /// Re-evaluated before each iteration.
        condition: Box<Expr>,
        /// The loop body.
        body:      Box<Expr>,
    },
    /// `until condition ... end`
    Until {
        /// Re-evaluated before each iteration.
        condition: Box<Expr>,
        /// The loop body.
        body:      Box<Expr>,
    },
    /// `for name in collection ... end`
    ForIn {
        /// The loop variable.
        name:       String,
        /// The enumerated expression.
        collection: Box<Expr>,
        /// The loop body.
        body:       Box<Expr>,
    },

    /// A method or function definition.
    ///
    /// `target` is a [`Expr::Name`] for plain definitions, or a
    /// [`Expr::Dot`]/[`Expr::DoubleColon`] whose receiver is `self` or a name.
    Def {
        /// What is being defined.
        target: Box<Expr>,
        /// Parameter names.
        params: Vec<String>,
        /// The method body.
        body:   Box<Expr>,
    },
    /// `class Name [< Superclass] ... end`
    Class {
        /// A [`Expr::Name`], or a [`Expr::DoubleColon`] for nested names.
        name:       Box<Expr>,
        /// The superclass expression, when given.
        superclass: Option<Box<Expr>>,
        /// The class body.
        body:       Box<Expr>,
    },
    /// `module Name ... end`
    Module {
        /// The module constant.
        name: String,
        /// The module body.
        body: Box<Expr>,
    },

    /// `[a, b, c]`
    Array(Vec<Expr>),
    /// `{ k => v, ... }`, in source order.
    Hash(Vec<(Expr, Expr)>),
    /// `from..to`
    Range {
        /// Lower bound, inclusive.
        from: Box<Expr>,
        /// Upper bound, inclusive.
        to:   Box<Expr>,
    },
    /// `target[index]`
    Indexed {
        /// The collection expression.
        target: Box<Expr>,
        /// The index expression.
        index:  Box<Expr>,
    },
    /// A `do |x| ... end` or `{ |x| ... }` block attached to a call.
    Block {
        /// Block parameter names.
        params: Vec<String>,
        /// The block body.
        body:   Box<Expr>,
    },
    /// A sequence of commands; evaluates to the value of the last one.
    Composite(Vec<Expr>),
}

impl Expr {
    /// Builds a [`Expr::Constant`] from anything convertible to a literal.
    #[must_use]
    pub fn constant(value: impl Into<Literal>) -> Self {
        Self::Constant(value.into())
    }

    /// Builds a symbol constant.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::Constant(Literal::Symbol(name.to_string()))
    }

    /// Builds a [`Expr::Name`].
    #[must_use]
    pub fn name(name: &str) -> Self {
        Self::Name(name.to_string())
    }

    /// Builds `left + right`.
    #[must_use]
    pub fn add(left: Self, right: Self) -> Self {
        Self::Add(Box::new(left), Box::new(right))
    }

    /// Builds `left - right`.
    #[must_use]
    pub fn subtract(left: Self, right: Self) -> Self {
        Self::Subtract(Box::new(left), Box::new(right))
    }

    /// Builds `left * right`.
    #[must_use]
    pub fn multiply(left: Self, right: Self) -> Self {
        Self::Multiply(Box::new(left), Box::new(right))
    }

    /// Builds `left / right`.
    #[must_use]
    pub fn divide(left: Self, right: Self) -> Self {
        Self::Divide(Box::new(left), Box::new(right))
    }

    /// Builds a comparison node.
    #[must_use]
    pub fn compare(left: Self, op: CompareOperator, right: Self) -> Self {
        Self::Compare { left: Box::new(left),
                        op,
                        right: Box::new(right) }
    }

    /// Builds `name = value`.
    #[must_use]
    pub fn assign(name: &str, value: Self) -> Self {
        Self::Assign { name:  name.to_string(),
                       value: Box::new(value), }
    }

    /// Builds a receiverless call.
    #[must_use]
    pub fn call(name: &str, args: Vec<Self>) -> Self {
        Self::Call { name: name.to_string(),
                     args }
    }

    /// Builds a dotted method call.
    #[must_use]
    pub fn dot(target: Self, name: &str, args: Vec<Self>) -> Self {
        Self::Dot { target: Box::new(target),
                    name: name.to_string(),
                    args }
    }

    /// Builds a `target::name` lookup.
    #[must_use]
    pub fn double_colon(target: Self, name: &str) -> Self {
        Self::DoubleColon { target: Box::new(target),
                            name:   name.to_string(), }
    }

    /// Wraps a parsed command list the way bodies are stored: a single
    /// command stays as it is, anything else becomes a [`Expr::Composite`].
    #[must_use]
    pub fn body(mut commands: Vec<Self>) -> Self {
        if commands.len() == 1 {
            commands.remove(0)
        } else {
            Self::Composite(commands)
        }
    }

    /// Reports whether this is a bare name starting with an uppercase letter.
    #[must_use]
    pub fn is_constant_name(&self) -> bool {
        matches!(self, Self::Name(name) if is_constant(name))
    }
}

/// Reports whether an identifier names a constant (uppercase first letter).
#[must_use]
pub fn is_constant(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
