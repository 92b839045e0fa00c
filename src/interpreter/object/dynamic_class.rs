use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::interpreter::{
    evaluator::function::object::new_instance,
    object::dynamic_object::DynamicObject,
    value::{callable::Callable, core::Value},
};

/// What a [`DynamicClass`] is used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// An ordinary class; responds to `new`.
    Class,
    /// A namespace for constants and definitions; never instantiated.
    Module,
    /// The per-object class holding methods defined on one object alone.
    Singleton,
}

/// A class, module or singleton class.
///
/// A class is itself an object, so it carries a [`DynamicObject`] for its
/// own class link, instance variables and singleton class. The method table
/// maps each selector to exactly one implementation; redefinition replaces
/// the entry.
pub struct DynamicClass {
    object:          DynamicObject,
    name:            String,
    kind:            ClassKind,
    superclass:      Option<Rc<DynamicClass>>,
    module:          Option<Weak<DynamicClass>>,
    methods:         RefCell<HashMap<String, Callable>>,
    constants:       RefCell<HashMap<String, Value>>,
    class_variables: RefCell<HashMap<String, Value>>,
}

impl DynamicClass {
    /// Creates a class.
    ///
    /// # Parameters
    /// - `class`: The class of this class, normally `Class` or `Module`.
    ///   `None` only while bootstrapping.
    /// - `name`: The display name, qualified for nested definitions.
    /// - `kind`: Class, module or singleton.
    /// - `superclass`: The parent in the method resolution chain.
    /// - `module`: The lexically enclosing module, if any.
    #[must_use]
    pub fn new(class: Option<Rc<Self>>,
               name: &str,
               kind: ClassKind,
               superclass: Option<Rc<Self>>,
               module: Option<&Rc<Self>>)
               -> Self {
        Self { object: DynamicObject::new(class),
               name: name.to_string(),
               kind,
               superclass,
               module: module.map(Rc::downgrade),
               methods: RefCell::new(HashMap::new()),
               constants: RefCell::new(HashMap::new()),
               class_variables: RefCell::new(HashMap::new()) }
    }

    /// The class's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class, module or singleton.
    #[must_use]
    pub const fn kind(&self) -> ClassKind {
        self.kind
    }

    /// The superclass, `None` only for `Object`.
    #[must_use]
    pub const fn superclass(&self) -> Option<&Rc<Self>> {
        self.superclass.as_ref()
    }

    /// The lexically enclosing module, while it is alive.
    #[must_use]
    pub fn module(&self) -> Option<Rc<Self>> {
        self.module.as_ref().and_then(Weak::upgrade)
    }

    /// The object side of this class.
    #[must_use]
    pub const fn as_object(&self) -> &DynamicObject {
        &self.object
    }

    /// The class of this class.
    #[must_use]
    pub fn class(&self) -> Option<Rc<Self>> {
        self.object.class()
    }

    /// Installs (or replaces) a method for instances of this class.
    pub fn set_instance_method(&self, name: &str, method: Callable) {
        trace!(class = %self.name, method = name, "installing method");
        self.methods.borrow_mut().insert(name.to_string(), method);
    }

    /// Looks a method up in this class's own table only.
    #[must_use]
    pub fn own_method(&self, name: &str) -> Option<Callable> {
        self.methods.borrow().get(name).cloned()
    }

    /// Looks a method up for instances: this class, then each superclass.
    #[must_use]
    pub fn get_instance_method(&self, name: &str) -> Option<Callable> {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(method) = current.own_method(name) {
                return Some(method);
            }
            class = current.superclass.as_deref();
        }
        None
    }

    /// Resolves a method with this class as the receiver.
    ///
    /// `new` is answered by every class of kind [`ClassKind::Class`] without
    /// living in any table. Everything else goes through the singleton class
    /// and then the class of this class.
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<Callable> {
        if name == "new" && self.kind == ClassKind::Class {
            return Some(Callable::method("new", new_instance));
        }
        self.object.get_method(name)
    }

    /// Names in this class's own table, sorted.
    #[must_use]
    pub fn own_method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Names defined on this class and every ancestor, without duplicates.
    #[must_use]
    pub fn instance_method_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        let mut class = Some(self);
        while let Some(current) = class {
            for name in current.own_method_names() {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
            class = current.superclass.as_deref();
        }
        names
    }

    /// Returns the singleton class, creating it on first use.
    pub fn singleton_class(&self) -> Rc<Self> {
        self.object.singleton_class_for(|| self.name.clone())
    }

    /// Reports whether `other` is this class or one of its ancestors.
    #[must_use]
    pub fn inherits_from(&self, other: &Self) -> bool {
        let mut class = Some(self);
        while let Some(current) = class {
            if std::ptr::eq(current, other) {
                return true;
            }
            class = current.superclass.as_deref();
        }
        false
    }

    /// Reads a constant defined directly in this class or module.
    #[must_use]
    pub fn get_constant(&self, name: &str) -> Option<Value> {
        self.constants.borrow().get(name).cloned()
    }

    /// Defines or replaces a constant.
    pub fn set_constant(&self, name: &str, value: Value) {
        self.constants.borrow_mut().insert(name.to_string(), value);
    }

    /// Names of the constants defined here, sorted.
    #[must_use]
    pub fn constant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constants.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Reads a class variable from this class or the nearest ancestor that
    /// defines it.
    #[must_use]
    pub fn get_class_variable(&self, name: &str) -> Option<Value> {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(value) = current.class_variables.borrow().get(name) {
                return Some(value.clone());
            }
            class = current.superclass.as_deref();
        }
        None
    }

    /// Writes a class variable. An ancestor that already defines it is
    /// updated in place; otherwise the variable is created here.
    pub fn set_class_variable(&self, name: &str, value: Value) {
        let mut class = Some(self);
        while let Some(current) = class {
            if let Some(slot) = current.class_variables.borrow_mut().get_mut(name) {
                *slot = value;
                return;
            }
            class = current.superclass.as_deref();
        }
        self.class_variables.borrow_mut().insert(name.to_string(), value);
    }
}

impl fmt::Display for DynamicClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for DynamicClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicClass")
         .field("name", &self.name)
         .field("kind", &self.kind)
         .field("superclass", &self.superclass.as_ref().map(|c| c.name()))
         .field("methods", &self.own_method_names())
         .finish_non_exhaustive()
    }
}
