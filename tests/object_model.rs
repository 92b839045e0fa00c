use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use rubyish::{
    error::{Error, RuntimeError},
    parse,
    interpreter::{machine::Machine, object::dynamic_class::ClassKind, value::core::Value},
};

fn run(machine: &Machine, src: &str) -> Value {
    machine.execute(src).unwrap_or_else(|e| panic!("Script failed: {e}\n{src}"))
}

fn local(machine: &Machine, name: &str) -> Value {
    machine.root_context()
           .get_local_value(name)
           .unwrap_or_else(|| panic!("No local named {name}"))
}

fn symbol_names(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        panic!("Expected an array, got {value:?}");
    };
    items.borrow()
         .iter()
         .map(|item| match item {
             Value::Symbol(name) => name.to_string(),
             other => panic!("Expected a symbol, got {other:?}"),
         })
         .collect()
}

fn symbol_set(value: &Value) -> BTreeSet<String> {
    symbol_names(value).into_iter().collect()
}

const ANIMALS: &str = "
class Animal
  def initialize(name)
    @name = name
  end

  def name
    @name
  end

  def speak
    \"...\"
  end
end

class Dog < Animal
  def speak
    \"Woof\"
  end

  def fetch
    \"fetching\"
  end
end
";

#[test]
fn bootstrap_closes_the_class_cycle() {
    let machine = Machine::new();
    let object = machine.class("Object").unwrap();
    let module = machine.class("Module").unwrap();
    let class = machine.class("Class").unwrap();

    for bootstrapped in [&object, &module, &class] {
        let metaclass = bootstrapped.class().unwrap();
        assert!(Rc::ptr_eq(&metaclass, &class), "{} is not an instance of Class", bootstrapped);
    }
    assert!(object.superclass().is_none());
    assert!(Rc::ptr_eq(module.superclass().unwrap(), &object));
    assert!(Rc::ptr_eq(class.superclass().unwrap(), &module));
}

#[test]
fn bootstrap_is_visible_to_programs() {
    let machine = Machine::new();
    assert_eq!(run(&machine, "Class.class == Class"), Value::Bool(true));
    assert_eq!(run(&machine, "Object.class == Class"), Value::Bool(true));
    assert_eq!(run(&machine, "Class.superclass == Module"), Value::Bool(true));
    assert_eq!(run(&machine, "Module.superclass == Object"), Value::Bool(true));
    assert_eq!(run(&machine, "Object.superclass"), Value::Nil);
}

#[test]
fn builtin_values_have_builtin_classes() {
    let machine = Machine::new();
    let cases = [("nil", "NilClass"),
                 ("true", "TrueClass"),
                 ("false", "FalseClass"),
                 ("1", "Fixnum"),
                 ("1.5", "Float"),
                 ("\"a\"", "String"),
                 (":a", "Symbol"),
                 ("[]", "Array"),
                 ("{}", "Hash"),
                 ("(1..2)", "Range")];
    for (literal, class) in cases {
        assert_eq!(run(&machine, &format!("{literal}.class.name")),
                   Value::from(class),
                   "class of {literal}");
    }
    assert_eq!(run(&machine, "Fixnum.superclass == Object"), Value::Bool(true));
}

#[test]
fn every_builtin_is_registered() {
    let machine = Machine::new();
    for name in ["Object", "Module", "Class", "NilClass", "TrueClass", "FalseClass", "Fixnum",
                 "Float", "String", "Symbol", "Array", "Hash", "Range", "Proc"]
    {
        let class = machine.class(name).unwrap_or_else(|| panic!("{name} is missing"));
        assert_eq!(class.name(), name);
        assert_eq!(class.kind(), ClassKind::Class);
    }
}

#[test]
fn machines_do_not_share_classes() {
    let first = Machine::new();
    let second = Machine::new();
    run(&first, "class Foo\nend");
    assert!(first.class("Foo").is_some());
    assert!(second.class("Foo").is_none());
    assert!(!Rc::ptr_eq(&first.class("Object").unwrap(), &second.class("Object").unwrap()));
}

#[test]
fn one_parsed_program_behaves_alike_on_separate_machines() {
    let source = format!("{ANIMALS}
rex = Dog.new(\"Rex\")
def rex.trick
  \"roll over\"
end
puts rex.speak
puts rex.trick
puts rex.name");
    let program = parse(&source).unwrap();

    let observe = || {
        let out = Rc::new(RefCell::new(Vec::<u8>::new()));
        let machine = Machine::with_output(out.clone());
        for command in &program {
            machine.root_context().evaluate(command).unwrap();
        }
        let methods = symbol_set(&run(&machine, "rex.methods"));
        let singleton_methods = symbol_set(&run(&machine, "rex.singleton_methods"));
        let printed = String::from_utf8(out.borrow().clone()).unwrap();
        (printed, methods, singleton_methods)
    };
    let first = observe();
    let second = observe();

    assert_eq!(first, second);
    assert_eq!(first.0, "Woof\nroll over\nRex\n");
    assert!(first.1.contains("trick") && first.1.contains("fetch"));
    assert_eq!(first.2, BTreeSet::from(["trick".to_string()]));
}

#[test]
fn subclasses_link_to_their_superclass() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    let animal = machine.class("Animal").unwrap();
    let dog = machine.class("Dog").unwrap();

    assert!(Rc::ptr_eq(dog.superclass().unwrap(), &animal));
    assert!(Rc::ptr_eq(animal.superclass().unwrap(), &machine.class("Object").unwrap()));
    assert!(dog.inherits_from(&animal));
    assert!(!animal.inherits_from(&dog));
    assert!(Rc::ptr_eq(&dog.class().unwrap(), &machine.class("Class").unwrap()));
}

#[test]
fn methods_resolve_up_the_superclass_chain() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    assert_eq!(run(&machine, "Dog.new(\"Rex\").name"), Value::from("Rex"));
    assert_eq!(run(&machine, "Dog.new(\"Rex\").speak"), Value::from("Woof"));
    assert_eq!(run(&machine, "Animal.new(\"Cat\").speak"), Value::from("..."));
    assert!(matches!(machine.execute("Animal.new(\"Cat\").fetch"),
                     Err(Error::Runtime(RuntimeError::NoMethod { .. }))));
}

#[test]
fn singleton_classes_are_created_lazily() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    run(&machine, "rex = Dog.new(\"Rex\")\nrex.speak\nrex.methods");
    let Value::Object(rex) = local(&machine, "rex") else {
        panic!("rex is not an object");
    };
    assert!(rex.existing_singleton().is_none());
    assert_eq!(run(&machine, "rex.singleton_methods"), Value::from(Vec::<Value>::new()));

    run(&machine, "def rex.trick\n\"roll over\"\nend");
    let singleton = Rc::clone(rex.existing_singleton().unwrap());
    assert_eq!(singleton.kind(), ClassKind::Singleton);
    assert!(Rc::ptr_eq(singleton.superclass().unwrap(), &machine.class("Dog").unwrap()));
    assert_eq!(singleton.name(), format!("#<Class:{rex}>"));

    run(&machine, "def rex.sit\nend");
    assert!(Rc::ptr_eq(rex.existing_singleton().unwrap(), &singleton));
}

#[test]
fn singleton_methods_win_over_class_methods() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    run(&machine, "rex = Dog.new(\"Rex\")\nfido = Dog.new(\"Fido\")\ndef rex.speak\n\"Grr\"\nend");
    assert_eq!(run(&machine, "rex.speak"), Value::from("Grr"));
    assert_eq!(run(&machine, "fido.speak"), Value::from("Woof"));
    assert_eq!(symbol_names(&run(&machine, "rex.singleton_methods")), ["speak"]);
    assert_eq!(symbol_names(&run(&machine, "fido.singleton_methods")), Vec::<String>::new());
}

#[test]
fn redefinition_replaces_the_method() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    run(&machine, "class Dog\ndef speak\n\"Arf\"\nend\nend");
    assert_eq!(run(&machine, "Dog.new(\"Rex\").speak"), Value::from("Arf"));
    assert_eq!(run(&machine, "Dog.new(\"Rex\").name"), Value::from("Rex"));
}

#[test]
fn methods_lists_each_name_once() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    run(&machine, "rex = Dog.new(\"Rex\")\ndef rex.speak\n\"Grr\"\nend");
    let names = symbol_names(&run(&machine, "rex.methods"));

    assert_eq!(names[0], "speak");
    for expected in ["speak", "fetch", "name", "initialize", "class", "methods", "to_s"] {
        let count = names.iter().filter(|name| *name == expected).count();
        assert_eq!(count, 1, "{expected} appears {count} times in {names:?}");
    }
}

#[test]
fn class_methods_live_on_the_singleton_class() {
    let machine = Machine::new();
    run(&machine,
        "class Counter\n  def self.create\n    new\n  end\nend\nc = Counter.create");
    let counter = machine.class("Counter").unwrap();
    let singleton = counter.as_object().existing_singleton().unwrap();

    assert_eq!(singleton.name(), "#<Class:Counter>");
    assert!(singleton.own_method("create").is_some());
    assert!(counter.own_method("create").is_none());
    assert_eq!(run(&machine, "c.class == Counter"), Value::Bool(true));
    assert_eq!(symbol_names(&run(&machine, "Counter.singleton_methods")), ["create"]);
}

#[test]
fn classes_reach_class_and_module_methods() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    assert_eq!(run(&machine, "Dog.name"), Value::from("Dog"));
    assert_eq!(run(&machine, "Dog.superclass.name"), Value::from("Animal"));
    assert_eq!(symbol_names(&run(&machine, "Dog.instance_methods"))[..2], ["fetch", "speak"]);
    assert_eq!(run(&machine, "Dog.respond_to(:instance_methods)"), Value::Bool(true));
}

#[test]
fn modules_hold_constants_and_cannot_be_instantiated() {
    let machine = Machine::new();
    run(&machine, "module Geometry\n  PI = 3\n  class Point\n  end\nend");
    let geometry = machine.class("Geometry").unwrap();

    assert_eq!(geometry.kind(), ClassKind::Module);
    assert!(Rc::ptr_eq(&geometry.class().unwrap(), &machine.class("Module").unwrap()));
    assert_eq!(run(&machine, "Geometry::PI"), Value::Integer(3));
    assert_eq!(symbol_names(&run(&machine, "Geometry.constants")), ["PI", "Point"]);
    assert_eq!(run(&machine, "Geometry::Point.name"), Value::from("Geometry::Point"));
    assert!(machine.class("Point").is_none());
    assert!(matches!(machine.execute("Geometry.new"),
                     Err(Error::Runtime(RuntimeError::NoMethod { .. }))));
}

#[test]
fn reopening_keeps_the_same_class() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    let before = machine.class("Dog").unwrap();
    run(&machine, "class Dog < Animal\nend");
    assert!(Rc::ptr_eq(&before, &machine.class("Dog").unwrap()));

    let err = machine.execute("class Dog < String\nend").unwrap_err();
    assert_eq!(err.to_string(), "superclass mismatch for class Dog");
}

#[test]
fn class_variables_are_shared_with_subclasses() {
    let machine = Machine::new();
    run(&machine,
        "class Base\n  @@count = 0\n  def bump\n    @@count = @@count + 1\n  end\nend\nclass \
         Derived < Base\nend");
    run(&machine, "Base.new.bump\nDerived.new.bump\nDerived.new.bump");
    let base = machine.class("Base").unwrap();
    assert_eq!(base.get_class_variable("count"), Some(Value::Integer(3)));
    assert_eq!(machine.class("Derived").unwrap().get_class_variable("count"),
               Some(Value::Integer(3)));
}

#[test]
fn instances_display_their_class() {
    let machine = Machine::new();
    run(&machine, ANIMALS);
    let shown = run(&machine, "Dog.new(\"Rex\").to_s").to_string();
    assert!(shown.starts_with("#<Dog:0x") && shown.ends_with('>'), "{shown}");
    assert_eq!(run(&machine, "Dog.to_s"), Value::from("Dog"));
}
