use std::{
    cell::RefCell,
    io::{self, Read, Write},
    rc::Rc,
};

use tracing::debug;

use crate::{
    error::{Error, RuntimeError},
    interpreter::{
        context::Context,
        evaluator::function::{collection, numeric, object, print::puts, text},
        object::dynamic_class::{ClassKind, DynamicClass},
        parser::core::Parser,
        value::{callable::Callable, core::Value},
    },
};

/// Where `puts` writes.
pub type OutputSink = Rc<RefCell<dyn Write>>;

/// A running interpreter.
///
/// Owns the root context, which holds the builtin classes, top-level locals
/// and top-level classes. State persists across calls to
/// [`Machine::execute`], so a REPL can feed it one line at a time.
pub struct Machine {
    root: Rc<Context>,
}

impl Machine {
    /// Creates a machine whose `puts` writes to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    /// Creates a machine whose `puts` writes to `out`.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use rubyish::interpreter::machine::Machine;
    ///
    /// let out = Rc::new(RefCell::new(Vec::new()));
    /// let machine = Machine::with_output(out.clone());
    /// machine.execute("puts 1 + 2").unwrap();
    ///
    /// assert_eq!(out.borrow().as_slice(), b"3\n");
    /// ```
    #[must_use]
    pub fn with_output(out: OutputSink) -> Self {
        let root = Context::new();
        bootstrap(&root);
        root.set_local_value("puts",
                             Value::Function(Callable::function("puts", move |args| {
                                                 puts(&out, args)
                                             })));
        Self { root }
    }

    /// The root context, for embedding hosts that register their own
    /// functions or inspect top-level state.
    #[must_use]
    pub const fn root_context(&self) -> &Rc<Context> {
        &self.root
    }

    /// A class or module registered at the top level, such as `Object` or
    /// one defined by the program.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<Rc<DynamicClass>> {
        self.root.builtin_class(name)
    }

    /// Parses and runs `source` in the root context.
    ///
    /// The whole text is parsed before anything runs, so a syntax error
    /// leaves the machine untouched.
    ///
    /// # Returns
    /// The value of the last command, or `nil` for an empty program.
    pub fn execute(&self, source: &str) -> Result<Value, Error> {
        let commands = Parser::new(source).parse_program()?;
        debug!(commands = commands.len(), "executing");
        Ok(self.root.eval_sequence(&commands)?)
    }

    /// Reads `reader` to the end and runs it.
    pub fn execute_reader(&self, mut reader: impl Read) -> Result<Value, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source).map_err(RuntimeError::from)?;
        self.execute(&source)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the class hierarchy in `root`.
///
/// `Object`, `Module` and `Class` are allocated first with no class, then
/// linked: each of them is an instance of `Class`, including `Class` itself.
/// Every other builtin is an ordinary subclass of `Object`.
fn bootstrap(root: &Context) {
    let object = Rc::new(DynamicClass::new(None, "Object", ClassKind::Class, None, None));
    let module = Rc::new(DynamicClass::new(None,
                                           "Module",
                                           ClassKind::Class,
                                           Some(Rc::clone(&object)),
                                           None));
    let class = Rc::new(DynamicClass::new(None,
                                          "Class",
                                          ClassKind::Class,
                                          Some(Rc::clone(&module)),
                                          None));
    for bootstrapped in [&object, &module, &class] {
        bootstrapped.as_object().set_class(Rc::clone(&class));
        root.set_local_value(bootstrapped.name(), Value::Class(Rc::clone(bootstrapped)));
    }

    let builtin = |name: &str| {
        let builtin = Rc::new(DynamicClass::new(Some(Rc::clone(&class)),
                                                name,
                                                ClassKind::Class,
                                                Some(Rc::clone(&object)),
                                                None));
        root.set_local_value(name, Value::Class(Rc::clone(&builtin)));
        builtin
    };
    for name in ["NilClass", "TrueClass", "FalseClass"] {
        builtin(name);
    }
    let fixnum = builtin("Fixnum");
    let float = builtin("Float");
    let string = builtin("String");
    let symbol = builtin("Symbol");
    let array = builtin("Array");
    let hash = builtin("Hash");
    let range = builtin("Range");
    let proc = builtin("Proc");

    object::install(&object, &module, &class);
    numeric::install(&fixnum, &float);
    text::install(&string, &symbol);
    collection::install(&array, &hash, &range, &proc);
    debug!(classes = root.local_names().len(), "bootstrapped builtin classes");
}
