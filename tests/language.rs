use std::{cell::RefCell, rc::Rc};

use rubyish::{
    error::{Error, RuntimeError},
    interpreter::{machine::Machine, value::core::Value},
    run,
};

/// Runs `src` on a fresh machine and returns what it printed.
fn output(src: &str) -> String {
    let out = Rc::new(RefCell::new(Vec::<u8>::new()));
    let machine = Machine::with_output(out.clone());
    if let Err(e) = machine.execute(src) {
        panic!("Script failed: {e}\n{src}");
    }
    let bytes = out.borrow().clone();
    String::from_utf8(bytes).unwrap()
}

fn assert_output(src: &str, expected: &str) {
    assert_eq!(output(src), expected, "output of:\n{src}");
}

fn assert_success(src: &str) {
    if let Err(e) = run(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) -> Error {
    match run(src, false) {
        Ok(value) => panic!("Script succeeded with {value:?} but was expected to fail"),
        Err(e) => e,
    }
}

fn assert_runtime_message(src: &str, message: &str) {
    let err = assert_failure(src);
    assert!(matches!(err, Error::Runtime(_)), "{err:?}");
    assert_eq!(err.to_string(), message);
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_output("x = 1 + 2 * 3\nputs x", "7\n");
    assert_output("puts (1 + 2) * 3", "9\n");
    assert_output("puts 8 - 5 - 1", "2\n");
    assert_output("puts(-3 + 1)", "-2\n");
    assert_output("puts 1.5 + 1", "2.5\n");
    assert_output("puts 2.0 * 2", "4.0\n");
}

#[test]
fn division_truncates_to_integers() {
    assert_output("puts 10 / 3", "3\n");
    assert_output("puts 7.5 / 2", "3\n");
    assert_output("puts(-7 / 2)", "-3\n");
}

#[test]
fn string_operators() {
    assert_output("puts \"a\" + \"b\"", "ab\n");
    assert_output("puts \"n = \" + 1", "n = 1\n");
    assert_output("puts \"ab\" * 3", "ababab\n");
    assert_output("puts \"Hello\".upcase\nputs \"Hello\".downcase", "HELLO\nhello\n");
    assert_output("puts \"héllo\".length", "5\n");
}

#[test]
fn comparisons_and_truthiness() {
    assert_output("puts 1 < 2\nputs 2 <= 1\nputs 1 == 1.0\nputs \"a\" != \"b\"",
                  "true\nfalse\ntrue\ntrue\n");
    assert_output("puts nil == false\nputs(!nil)\nputs(!0)", "false\ntrue\nfalse\n");
    assert_output("puts :a == :a\nputs [1, 2] == [1, 2]", "true\ntrue\n");
}

#[test]
fn puts_formats_each_value() {
    assert_output("puts", "\n");
    assert_output("puts nil", "\n");
    assert_output("puts []", "");
    assert_output("puts [1, [2, 3]]", "1\n2\n3\n");
    assert_output("puts :sym", "sym\n");
    assert_output("puts 1..3", "1..3\n");
    assert_output("puts({ :a => 1, \"b\" => nil })", "{:a=>1, \"b\"=>nil}\n");
    assert_output("puts 1, \"two\", 3.0", "1\ntwo\n3.0\n");
}

#[test]
fn if_elif_else() {
    assert_output("x = if 1 > 2 then \"a\" else \"b\" end\nputs x", "b\n");
    assert_output("if nil\nputs 1\nelif 0\nputs 2\nelse\nputs 3\nend", "2\n");
    assert_output("if false then puts 1 end\nputs 9", "9\n");
    assert_output("x = if false then 1 end\nputs x == nil", "true\n");
}

#[test]
fn while_and_until_loops() {
    assert_output("i = 0\nwhile i < 3\nputs i\ni = i + 1\nend", "0\n1\n2\n");
    assert_output("i = 3\nuntil i == 0 do\nputs i\ni = i - 1\nend", "3\n2\n1\n");
    assert_output("i = 5\nwhile i < 3\nputs i\nend", "");
}

#[test]
fn for_loops_and_sum() {
    assert_output("for x in [1, 2, 3]\nputs x * 2\nend", "2\n4\n6\n");
    assert_output("sum = 0\nfor i in 1..4 do\nsum = sum + i\nend\nputs sum\nputs i", "10\n4\n");
    assert_output("for pair in { :a => 1 }\nputs pair\nend", "a\n1\n");
}

#[test]
fn top_level_functions_and_recursion() {
    assert_output("def square(x)\nx * x\nend\nputs square(3)", "9\n");
    assert_output("def fact(n)\nif n <= 1\n1\nelse\nn * fact(n - 1)\nend\nend\nputs fact(10)",
                  "3628800\n");
    assert_output("def hello\nputs \"hi\"\nend\nhello\nhello()", "hi\nhi\n");
    assert_output("def add a, b\na + b\nend\nputs add(2, 5)", "7\n");
}

#[test]
fn functions_do_not_see_caller_locals() {
    let err = assert_failure("def f\nsecret\nend\ndef g\nsecret = 1\nf\nend\ng");
    assert!(matches!(err, Error::Runtime(RuntimeError::UndefinedName { ref name }) if name == "secret"),
            "{err:?}");
}

#[test]
fn classes_with_state() {
    assert_output("
class Point
  attr_accessor :x, :y

  def initialize(x, y)
    @x = x
    @y = y
  end

  def to_s
    \"(\" + @x + \", \" + @y + \")\"
  end
end

p = Point.new(1, 2)
p.x = 10
puts p.x
puts p.to_s
puts p.instance_variables
",
                  "10\n(10, 2)\n@x\n@y\n");
}

#[test]
fn methods_call_each_other_through_self() {
    assert_output("
class Greeter
  def name
    \"World\"
  end

  def greet
    \"Hello \" + name + \" from \" + self.name
  end
end

puts Greeter.new.greet
",
                  "Hello World from World\n");
}

#[test]
fn inheritance_and_overriding() {
    assert_output("
class Shape
  def area
    0
  end

  def describe
    \"area \" + area
  end
end

class Square < Shape
  def initialize(side)
    @side = side
  end

  def area
    @side * @side
  end
end

puts Shape.new.describe
puts Square.new(3).describe
puts Square.superclass
",
                  "area 0\narea 9\nShape\n");
}

#[test]
fn class_methods_and_class_variables() {
    assert_output("
class Counter
  @@count = 0

  def self.increment
    @@count = @@count + 1
  end

  def self.count
    @@count
  end
end

Counter.increment
Counter.increment
puts Counter.count
",
                  "2\n");
}

#[test]
fn singleton_methods_on_one_object() {
    assert_output("
class Dog
  def speak
    \"Woof\"
  end
end

rex = Dog.new
fido = Dog.new
def rex.speak
  \"Grr\"
end

puts rex.speak
puts fido.speak
puts rex.singleton_methods
puts fido.singleton_methods.length
",
                  "Grr\nWoof\nspeak\n0\n");
}

#[test]
fn modules_namespace_constants_and_classes() {
    assert_output("
module Greeting
  PREFIX = \"Hello, \"

  def self.greet(name)
    PREFIX + name
  end

  class Formal
    def greet(name)
      PREFIX + \"dear \" + name
    end
  end
end

puts Greeting.greet(\"Bob\")
puts Greeting::PREFIX
puts Greeting::Formal.new.greet(\"Ann\")
puts Greeting::Formal
",
                  "Hello, Bob\nHello, \nHello, dear Ann\nGreeting::Formal\n");
}

#[test]
fn nested_class_names() {
    assert_output("module Outer\nend\nclass Outer::Inner\ndef hi\n\"hi\"\nend\nend\nputs \
                   Outer::Inner.new.hi",
                  "hi\n");
}

#[test]
fn blocks_and_iterators() {
    assert_output("[1, 2, 3].each do |x|\nputs x\nend", "1\n2\n3\n");
    assert_output("puts [1, 2, 3].map { |x| x * x }", "1\n4\n9\n");
    assert_output("3.times do |i|\nputs i\nend", "0\n1\n2\n");
    assert_output("1.upto(3) { |i| puts i }", "1\n2\n3\n");
    assert_output("(1..3).each { |i| puts i * 10 }", "10\n20\n30\n");
    assert_output("puts (1..3).to_a.length", "3\n");
}

#[test]
fn ranges_and_hashes_map_into_arrays() {
    assert_output("puts (1..4).map { |n| n * n }", "1\n4\n9\n16\n");
    assert_output("squares = (3..1).map { |n| n * n }\nputs squares.length", "0\n");
    assert_output("h = { :a => 1, :b => 2 }\nputs h.map { |pair| pair[1] * 10 }", "10\n20\n");
}

#[test]
fn huge_ranges_are_walked_one_integer_at_a_time() {
    assert_runtime_message("for i in 1..9223372036854775807 do\n  if i == 3\n    1 / 0\n  end\nend",
                           "divided by 0");
    assert_runtime_message("(1..9223372036854775807).each do |i|\n  if i == 3\n    1 / 0\n  \
                            end\nend",
                           "divided by 0");
    assert_runtime_message("(1..9223372036854775807).map do |i|\n  if i == 3\n    1 / 0\n  \
                            end\nend",
                           "divided by 0");
    assert_output("for i in 9223372036854775806..9223372036854775807\nputs i\nend",
                  "9223372036854775806\n9223372036854775807\n");
}

#[test]
fn oversized_collections_fail_without_panicking() {
    assert_runtime_message("a = []\na[9223372036854775807] = 1", "failed to allocate memory");
    assert_runtime_message("(0..9223372036854775807).to_a", "failed to allocate memory");
}

#[test]
fn self_containing_collections() {
    assert_output("a = [1]\na.push(a)\nputs a.inspect\nputs a", "[1, [...]]\n1\n[...]\n");
    assert_output("a = [1]\na.push(a)\nb = [1]\nb.push(b)\nputs a == b", "true\n");
    assert_output("a = [1]\na.push(a)\nb = [2]\nb.push(b)\nputs a == b", "false\n");
    assert_output("h = {}\nh[:me] = h\nputs h.inspect", "{:me=>{...}}\n");
    assert_runtime_message("a = [1]\na.push(a)\nh = { a => 1 }",
                           "recursive array cannot be used as a hash key");
}

#[test]
fn hash_iteration() {
    assert_output("{ :a => 1, :b => 2 }.each do |k, v|\nputs k\nputs v\nend", "a\n1\nb\n2\n");
    assert_output("{ :a => 1 }.each { |pair| puts pair.length }", "2\n");
    assert_output("h = { \"x\" => 1, \"y\" => 2 }\nputs h.keys\nputs h.values", "x\ny\n1\n2\n");
}

#[test]
fn blocks_close_over_their_scope() {
    assert_output("factor = 3\nputs [1, 2].map { |x| x * factor }", "3\n6\n");
    assert_output("
class Scaler
  def initialize(factor)
    @factor = factor
  end

  def scale(items)
    items.map { |x| x * @factor }
  end
end

puts Scaler.new(2).scale([1, 2])
",
                  "2\n4\n");
}

#[test]
fn assignment_inside_a_block_stays_in_the_block() {
    assert_output("total = 0\n[1, 2].each { |x| total = x }\nputs total", "0\n");
}

#[test]
fn blocks_are_passed_as_the_last_argument() {
    assert_output("def apply(f)\nf.call(2)\nend\nputs apply { |x| x * 10 }", "20\n");
    assert_output("def both(a, f)\nf.call(a, a)\nend\nputs both(4) { |x, y| x + y }", "8\n");
}

#[test]
fn missing_block_arguments_are_nil() {
    assert_output("def apply(f)\nf.call\nend\nputs apply { |x| x == nil }", "true\n");
}

#[test]
fn arrays_and_indexing() {
    assert_output("a = [1, 2, 3]\nputs a[0]\nputs a[-1]\nputs a[9] == nil", "1\n3\ntrue\n");
    assert_output("a = [1]\na[3] = 4\nputs a.length\nputs a[1] == nil", "4\ntrue\n");
    assert_output("a = [1, 2]\na[-1] = 5\nputs a", "1\n5\n");
    assert_output("a = []\na.push(1).push(2, 3)\nputs a.length\nputs a.first\nputs a.last",
                  "3\n1\n3\n");
    assert_output("puts \"hello\"[1]\nputs \"hello\"[-1]", "e\no\n");
    assert_output("puts [1] + [2, 3]", "1\n2\n3\n");
}

#[test]
fn arrays_are_shared_references() {
    assert_output("a = [1]\nb = a\nb.push(2)\nputs a.length", "2\n");
}

#[test]
fn hashes() {
    assert_output("h = { \"a\" => 1 }\nh[\"b\"] = 2\nputs h[\"b\"]\nputs h[\"z\"] == nil\nputs \
                   h.length",
                  "2\ntrue\n2\n");
    assert_output("h = { 1 => :one, 1.5 => :real }\nputs h[1]\nputs h[1.5]", "one\nreal\n");
    assert_output("h = { :a => 1 }\nh[:a] = 2\nputs h", "{:a=>2}\n");
}

#[test]
fn conversions_and_reflection() {
    assert_output("puts 7.9.to_i\nputs 3.to_f\nputs 5.to_s + \"!\"", "7\n3.0\n5!\n");
    assert_output("puts \"abc\".to_sym == :abc\nputs :abc.to_s.length", "true\n3\n");
    assert_output("puts \"a\".inspect\nputs :a.inspect\nputs nil.inspect", "\"a\"\n:a\nnil\n");
    assert_output("puts 1.respond_to(:times)\nputs 1.respond_to(:upcase)", "true\nfalse\n");
    assert_output("puts 1.class\nputs 1.class.class", "Fixnum\nClass\n");
}

#[test]
fn execute_returns_the_last_value() {
    let machine = Machine::new();
    assert_eq!(machine.execute("1 + 2").unwrap(), Value::Integer(3));
    assert_eq!(machine.execute("").unwrap(), Value::Nil);
    assert_eq!(machine.execute("def foo\nend").unwrap(), Value::symbol("foo"));
    assert_eq!(machine.execute("class Foo\n42\nend").unwrap(), Value::Integer(42));
    assert_eq!(machine.execute("while false\nend").unwrap(), Value::Nil);
    assert_eq!(machine.execute("x = [1, 2]\nfor i in x\nend").unwrap(),
               Value::from(vec![Value::Integer(1), Value::Integer(2)]));
}

#[test]
fn state_persists_between_executions() {
    let machine = Machine::new();
    machine.execute("x = 41").unwrap();
    machine.execute("def inc(n)\nn + 1\nend").unwrap();
    assert_eq!(machine.execute("inc(x)").unwrap(), Value::Integer(42));
}

#[test]
fn syntax_errors_run_nothing() {
    let machine = Machine::new();
    assert!(matches!(machine.execute("a = 1\nb = ("), Err(Error::Parse(_))));
    assert!(matches!(machine.execute("a"),
                     Err(Error::Runtime(RuntimeError::UndefinedName { .. }))));
}

#[test]
fn scripts_succeed() {
    assert_success("x = 2 + 2");
    assert_success("class A\nend\nclass B < A\nend\nB.new");
    assert_success("# only a comment\n");
}

#[test]
fn division_by_zero_is_error() {
    assert_runtime_message("x = 1 / 0", "divided by 0");
    assert_runtime_message("x = 1 / 0.5", "divided by 0");
}

#[test]
fn unknown_names_are_errors() {
    assert_runtime_message("puts foo", "undefined local variable or method 'foo'");
    assert_runtime_message("Foo", "uninitialized constant Foo");
    assert_runtime_message("module M\nend\nM::X", "uninitialized constant M::X");
    assert_runtime_message("@@x", "uninitialized class variable @@x in Object");
}

#[test]
fn unknown_methods_are_errors() {
    assert_runtime_message("1.foo", "undefined method 'foo' for 1");
    assert_runtime_message("nil + 1", "undefined method '+' for NilClass with 1");
    assert_runtime_message("frobnicate 1", "undefined method 'frobnicate' for main");

    let message = assert_failure("class A\nend\nA.new.b").to_string();
    assert!(message.starts_with("undefined method 'b' for #<A:0x"), "{message}");
}

#[test]
fn type_errors() {
    assert_runtime_message("1 < \"a\"", "comparison of Fixnum with \"a\" failed");
    assert_runtime_message("@x = 1", "can't set instance variable @x on main");
    assert_runtime_message("class Foo < 5\nend", "superclass must be a Class (5 given)");
    assert_runtime_message("x = 5\ndef x.foo\nend", "can't define singleton method for 5");
    assert_runtime_message("Foo = 1\nFoo::Bar", "1 is not a class/module");
    assert_runtime_message("[1].each(5)", "no block given to 'each'");
    assert_runtime_message("x = \"a\" * -1", "negative argument: -1");
    assert_runtime_message("x = 1..\"b\"", "bad value for range: 1..\"b\"");
}

#[test]
fn wrong_function_arity_is_error() {
    assert_runtime_message("def f(x, y)\nx + y\nend\nf(3)",
                           "wrong number of arguments for 'f' (given 1, expected 2)");
    assert_runtime_message("class A\nend\nA.new(1)",
                           "wrong number of arguments for 'initialize' (given 1, expected 0)");
}

#[test]
fn collection_errors() {
    assert_runtime_message("for x in 5\nend", "5 cannot be enumerated");
    assert_runtime_message("x = 5[0]", "5 cannot be indexed");
    assert_runtime_message("a = [1]\na[-3] = 1", "index -3 too small for array");
    assert_runtime_message("x = [1][\"a\"]", "no implicit conversion of \"a\" into Integer");
}

#[test]
fn integer_overflow_is_error() {
    assert_runtime_message("x = 9223372036854775807 + 1", "integer overflow in 'addition'");
    assert_runtime_message("x = 9223372036854775807 * 2", "integer overflow in 'multiplication'");
}

#[test]
fn syntax_errors_are_reported() {
    let err = assert_failure("if a\nputs 1");
    let parse = err.as_parse().unwrap();
    assert!(parse.is_incomplete());
    assert_eq!(err.to_string(), "unexpected end of input");

    let err = assert_failure("a = 1\nclass lower\nend");
    assert_eq!(err.as_parse().map(|e| e.line()), Some(2));
}
