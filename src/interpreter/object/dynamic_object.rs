use std::{
    cell::{OnceCell, RefCell},
    collections::{HashMap, HashSet},
    fmt,
    rc::Rc,
};

use tracing::trace;

use crate::interpreter::{
    object::dynamic_class::{ClassKind, DynamicClass},
    value::{callable::Callable, core::Value},
};

/// An object: a bag of instance variables with a class.
///
/// The class link is optional only so that the bootstrap can allocate
/// `Object`, `Module` and `Class` before `Class` exists, and link them
/// afterwards. Outside of the bootstrap every object has a class.
pub struct DynamicObject {
    class:     RefCell<Option<Rc<DynamicClass>>>,
    values:    RefCell<HashMap<String, Value>>,
    singleton: OnceCell<Rc<DynamicClass>>,
}

impl DynamicObject {
    /// Creates an object with no instance variables.
    #[must_use]
    pub fn new(class: Option<Rc<DynamicClass>>) -> Self {
        Self { class:     RefCell::new(class),
               values:    RefCell::new(HashMap::new()),
               singleton: OnceCell::new(), }
    }

    /// The object's class.
    #[must_use]
    pub fn class(&self) -> Option<Rc<DynamicClass>> {
        self.class.borrow().clone()
    }

    /// Links the object to its class. Used by the bootstrap to close the
    /// `Class` cycle.
    pub fn set_class(&self, class: Rc<DynamicClass>) {
        *self.class.borrow_mut() = Some(class);
    }

    /// Reads an instance variable; unset variables read as `nil`.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Value {
        self.values.borrow().get(name).cloned().unwrap_or(Value::Nil)
    }

    /// Writes an instance variable.
    pub fn set_value(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Names of the instance variables set so far, sorted.
    #[must_use]
    pub fn value_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// The singleton class, if one has been created.
    #[must_use]
    pub fn existing_singleton(&self) -> Option<&Rc<DynamicClass>> {
        self.singleton.get()
    }

    /// Returns the singleton class, creating it on first use.
    ///
    /// The singleton's superclass is the object's class at the moment of
    /// creation, and its own class is the class of that class (`Class`).
    /// `owner` is the display form of the object the singleton belongs to.
    pub(crate) fn singleton_class_for(&self, owner: impl FnOnce() -> String) -> Rc<DynamicClass> {
        Rc::clone(self.singleton.get_or_init(|| {
                                    let superclass = self.class();
                                    let metaclass = superclass.as_ref().and_then(|c| c.class());
                                    let name = format!("#<Class:{}>", owner());
                                    trace!(singleton = %name, "materializing singleton class");
                                    Rc::new(DynamicClass::new(metaclass,
                                                              &name,
                                                              ClassKind::Singleton,
                                                              superclass,
                                                              None))
                                }))
    }

    /// Returns the singleton class of this object, creating it on first use.
    pub fn singleton_class(&self) -> Rc<DynamicClass> {
        self.singleton_class_for(|| self.to_string())
    }

    /// Resolves a method for this object as receiver.
    ///
    /// The singleton class's own table is checked first, then the class and
    /// its superclass chain.
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<Callable> {
        if let Some(singleton) = self.singleton.get()
           && let Some(method) = singleton.own_method(name)
        {
            return Some(method);
        }
        self.class()?.get_instance_method(name)
    }

    /// Every method name visible on this object: singleton, class and all
    /// ancestors, without duplicates.
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        let singleton_names = self.singleton.get().map(|s| s.own_method_names()).unwrap_or_default();
        let class_names = self.class().map(|c| c.instance_method_names()).unwrap_or_default();
        for name in singleton_names.into_iter().chain(class_names) {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        names
    }

    /// Names defined directly on the singleton class; empty when none exists.
    #[must_use]
    pub fn singleton_method_names(&self) -> Vec<String> {
        self.singleton.get().map(|s| s.own_method_names()).unwrap_or_default()
    }
}

impl fmt::Display for DynamicObject {
    /// `#<ClassName:0x...>`, where the number identifies the object.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class();
        let name = class.as_ref().map_or("Object", |c| c.name());
        write!(f, "#<{name}:{:#x}>", std::ptr::from_ref(self) as usize)
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
         .field("object", &self.to_string())
         .field("values", &self.values.borrow())
         .finish_non_exhaustive()
    }
}
