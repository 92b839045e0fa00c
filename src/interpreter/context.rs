use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::{object::dynamic_class::DynamicClass, value::core::Value};

/// A lexical scope frame.
///
/// Frames form a tree through their parent links: the root frame holds the
/// builtin classes and top-level locals, and class bodies, module bodies,
/// method calls and blocks each open a child frame. Lookups walk up the
/// chain; writes always land in the frame they are made in.
#[derive(Debug, Default)]
pub struct Context {
    parent:     Option<Rc<Context>>,
    values:     RefCell<HashMap<String, Value>>,
    self_value: Option<Value>,
    module:     Option<Rc<DynamicClass>>,
}

impl Context {
    /// Creates a root frame with no `self` and no module.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates a child frame that inherits `self` and the module from
    /// `parent`. Used for blocks.
    #[must_use]
    pub fn with_parent(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { parent:     Some(Rc::clone(parent)),
                       values:     RefCell::new(HashMap::new()),
                       self_value: parent.self_value.clone(),
                       module:     parent.module.clone(), })
    }

    /// Creates a child frame with an explicit `self` and module. Used for
    /// class bodies, module bodies and method calls.
    #[must_use]
    pub fn with_self(parent: &Rc<Self>,
                     self_value: Option<Value>,
                     module: Option<Rc<DynamicClass>>)
                     -> Rc<Self> {
        Rc::new(Self { parent: Some(Rc::clone(parent)),
                       values: RefCell::new(HashMap::new()),
                       self_value,
                       module })
    }

    /// The enclosing frame.
    #[must_use]
    pub const fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// The current `self`, if any.
    #[must_use]
    pub const fn self_value(&self) -> Option<&Value> {
        self.self_value.as_ref()
    }

    /// The class or module whose body encloses this frame, if any.
    #[must_use]
    pub const fn module(&self) -> Option<&Rc<DynamicClass>> {
        self.module.as_ref()
    }

    /// Walks the parent links to the outermost frame.
    #[must_use]
    pub fn root(self: &Rc<Self>) -> Rc<Self> {
        let mut current = Rc::clone(self);
        while let Some(parent) = current.parent.clone() {
            current = parent;
        }
        current
    }

    /// Binds `name` in this frame, creating or replacing the local.
    pub fn set_local_value(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Reports whether `name` is bound in this frame.
    #[must_use]
    pub fn has_local_value(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    /// Reads `name` from this frame only.
    #[must_use]
    pub fn get_local_value(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    /// Reports whether `name` is bound in this frame or any ancestor.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    /// Reads `name` from the nearest frame that binds it.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<Value> {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some(value) = current.get_local_value(name) {
                return Some(value);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    /// Names bound in this frame, sorted.
    #[must_use]
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// The outermost frame, borrowed. Top-level classes and modules are
    /// registered here.
    #[must_use]
    pub fn outermost(&self) -> &Self {
        let mut frame = self;
        while let Some(parent) = frame.parent.as_deref() {
            frame = parent;
        }
        frame
    }

    /// Looks up a class registered in the root frame, such as `Fixnum`.
    #[must_use]
    pub fn builtin_class(&self, name: &str) -> Option<Rc<DynamicClass>> {
        match self.outermost().get_local_value(name) {
            Some(Value::Class(class)) => Some(class),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locals_are_visible_to_descendants_only() {
        let root = Context::new();
        root.set_local_value("a", 1.into());
        let child = Context::with_parent(&root);
        child.set_local_value("b", 2.into());

        assert_eq!(child.get_value("a"), Some(Value::Integer(1)));
        assert_eq!(child.get_value("b"), Some(Value::Integer(2)));
        assert!(!root.has_value("b"));
        assert!(!child.has_local_value("a"));
    }

    #[test]
    fn writes_land_in_the_current_frame() {
        let root = Context::new();
        root.set_local_value("a", 1.into());
        let child = Context::with_parent(&root);
        child.set_local_value("a", 2.into());

        assert_eq!(root.get_value("a"), Some(Value::Integer(1)));
        assert_eq!(child.get_value("a"), Some(Value::Integer(2)));
    }

    #[test]
    fn root_is_reached_from_any_depth() {
        let root = Context::new();
        let child = Context::with_parent(&root);
        let grandchild = Context::with_self(&child, Some(Value::Nil), None);

        assert!(Rc::ptr_eq(&grandchild.root(), &root));
        assert!(Rc::ptr_eq(&root.root(), &root));
    }

    #[test]
    fn self_is_inherited_by_blocks() {
        let root = Context::new();
        let method = Context::with_self(&root, Some(Value::Integer(7)), None);
        let block = Context::with_parent(&method);

        assert_eq!(block.self_value(), Some(&Value::Integer(7)));
        assert_eq!(root.self_value(), None);
    }
}
