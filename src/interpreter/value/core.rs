use std::{cell::RefCell, cmp::Ordering, fmt, rc::Rc};

use crate::{
    ast::Literal,
    interpreter::{
        object::{dynamic_class::DynamicClass, dynamic_object::DynamicObject},
        value::{
            callable::{Callable, Closure},
            hash_key::HashValue,
        },
    },
};

/// Represents a runtime value in the interpreter.
///
/// Scalars are stored inline. Arrays and hashes are shared and mutable, so
/// `a = [1]; b = a; b.push(2)` is visible through `a`. Objects, classes and
/// procs are reference values compared by identity.
#[derive(Clone)]
pub enum Value {
    /// `nil`, the absence of a value.
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// A 64 bit integer; the class is `Fixnum`.
    Integer(i64),
    /// A double precision real; the class is `Float`.
    Real(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// A symbol such as `:name`, stored without the colon.
    Symbol(Rc<str>),
    /// A shared, growable array.
    Array(Rc<RefCell<Vec<Self>>>),
    /// A shared, insertion-ordered hash.
    Hash(Rc<RefCell<HashValue>>),
    /// An inclusive integer range `from..to`.
    Range(i64, i64),
    /// An instance of a user-defined or builtin class.
    Object(Rc<DynamicObject>),
    /// A class or module.
    Class(Rc<DynamicClass>),
    /// A block turned into a value.
    Proc(Rc<Closure>),
    /// A callable bound to a local name, such as `puts` or a top-level `def`.
    Function(Callable),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<HashValue> for Value {
    fn from(v: HashValue) -> Self {
        Self::Hash(Rc::new(RefCell::new(v)))
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Self::Nil,
            Literal::Bool(b) => Self::Bool(*b),
            Literal::Integer(i) => Self::Integer(*i),
            Literal::Real(r) => Self::Real(r.into_inner()),
            Literal::Str(s) => Self::Str(Rc::from(s.as_str())),
            Literal::Symbol(s) => Self::Symbol(Rc::from(s.as_str())),
        }
    }
}

impl Value {
    /// Builds a symbol value.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::Symbol(Rc::from(name))
    }

    /// Builds an array of symbols, as returned by `methods`.
    #[must_use]
    pub fn symbols<I, S>(names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        names.into_iter()
             .map(|name| Self::symbol(name.as_ref()))
             .collect::<Vec<_>>()
             .into()
    }

    /// Truthiness: everything except `false` and `nil` is true.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// The name of the builtin class that primitive values belong to.
    ///
    /// Returns `None` for objects and classes, which carry their own class
    /// link.
    #[must_use]
    pub const fn builtin_class_name(&self) -> Option<&'static str> {
        Some(match self {
            Self::Nil => "NilClass",
            Self::Bool(true) => "TrueClass",
            Self::Bool(false) => "FalseClass",
            Self::Integer(_) => "Fixnum",
            Self::Real(_) => "Float",
            Self::Str(_) => "String",
            Self::Symbol(_) => "Symbol",
            Self::Array(_) => "Array",
            Self::Hash(_) => "Hash",
            Self::Range(..) => "Range",
            Self::Proc(_) | Self::Function(_) => "Proc",
            Self::Object(_) | Self::Class(_) => return None,
        })
    }

    /// Returns the integer payload, if this is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a real, if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Reports whether this is a string.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Orders two values where an order exists: numbers with numbers and
    /// strings with strings.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            _ => self.as_real()?.partial_cmp(&other.as_real()?),
        }
    }

    /// The developer-facing form: strings are quoted, symbols keep their
    /// colon and `nil` is spelled out.
    #[must_use]
    pub fn inspect(&self) -> String {
        self.render(true, &mut Vec::new())
    }

    /// Formats the value, in the developer-facing form when `quoted`.
    ///
    /// `open` holds the addresses of the arrays and hashes being formatted
    /// further up. Meeting one of them again prints `[...]` or `{...}`, so a
    /// collection that contains itself still formats.
    fn render(&self, quoted: bool, open: &mut Vec<usize>) -> String {
        match self {
            Self::Nil if quoted => "nil".to_string(),
            Self::Str(s) if quoted => format!("{s:?}"),
            Self::Symbol(s) if quoted => format!(":{s}"),
            Self::Array(items) => {
                let address = address(items);
                if open.contains(&address) {
                    return "[...]".to_string();
                }
                open.push(address);
                let items: Vec<String> =
                    items.borrow().iter().map(|item| item.render(true, open)).collect();
                open.pop();
                format!("[{}]", items.join(", "))
            },
            Self::Hash(hash) => {
                let address = address(hash);
                if open.contains(&address) {
                    return "{...}".to_string();
                }
                open.push(address);
                let entries: Vec<String> = hash.borrow()
                                               .iter()
                                               .map(|(k, v)| {
                                                   let key = k.render(true, open);
                                                   let value = v.render(true, open);
                                                   format!("{key}=>{value}")
                                               })
                                               .collect();
                open.pop();
                format!("{{{}}}", entries.join(", "))
            },
            _ => self.to_string(),
        }
    }

    /// Structural equality that tolerates self-containing collections.
    ///
    /// `comparing` holds the pairs of arrays or hashes being compared further
    /// up. Meeting a pair again counts as equal.
    fn equals(&self, other: &Self, comparing: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Integer(_) | Self::Real(_), Self::Integer(_) | Self::Real(_)) => {
                self.as_real() == other.as_real()
            },
            (Self::Str(a), Self::Str(b)) | (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => {
                let pair = (address(a), address(b));
                if Rc::ptr_eq(a, b) || comparing.contains(&pair) {
                    return true;
                }
                comparing.push(pair);
                let equal = {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y, comparing))
                };
                comparing.pop();
                equal
            },
            (Self::Hash(a), Self::Hash(b)) => {
                let pair = (address(a), address(b));
                if Rc::ptr_eq(a, b) || comparing.contains(&pair) {
                    return true;
                }
                comparing.push(pair);
                let equal = {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((xk, xv), (yk, yv))| {
                        xk.equals(yk, comparing) && xv.equals(yv, comparing)
                    })
                };
                comparing.pop();
                equal
            },
            (Self::Range(a, b), Self::Range(c, d)) => a == c && b == d,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Proc(a), Self::Proc(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The address behind a shared value, used as its identity.
pub(crate) fn address<T>(shared: &Rc<T>) -> usize {
    Rc::as_ptr(shared).cast::<u8>() as usize
}

impl PartialEq for Value {
    /// Value equality for data, identity for objects, classes and procs.
    /// Integers and reals compare numerically.
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl fmt::Display for Value {
    /// The user-facing form used by `puts` and string concatenation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Str(s) | Self::Symbol(s) => f.write_str(s),
            Self::Array(_) | Self::Hash(_) => f.write_str(&self.render(false, &mut Vec::new())),
            Self::Range(from, to) => write!(f, "{from}..{to}"),
            Self::Object(object) => write!(f, "{object}"),
            Self::Class(class) => write!(f, "{class}"),
            Self::Proc(closure) => write!(f, "#<Proc:{:#x}>", Rc::as_ptr(closure) as usize),
            Self::Function(callable) => write!(f, "#<Function:{}>", callable.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
