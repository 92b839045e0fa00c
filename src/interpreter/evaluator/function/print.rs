use std::{cell::RefCell, io::Write, rc::Rc};

use crate::interpreter::{
    evaluator::core::EvalResult,
    value::core::{Value, address},
};

/// Writes each argument on its own line and returns `nil`.
///
/// Arrays print one element per line, nested arrays included. An array
/// nested inside itself prints as `[...]`. With no arguments a single empty
/// line is written.
///
/// # Parameters
/// - `out`: The sink the text goes to.
/// - `args`: The values to print.
///
/// # Example
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use rubyish::interpreter::{evaluator::function::print::puts, value::core::Value};
///
/// let out = Rc::new(RefCell::new(Vec::new()));
/// let result = puts(&out, &[Value::Integer(1), Value::from("two")]).unwrap();
///
/// assert_eq!(result, Value::Nil);
/// assert_eq!(String::from_utf8(out.borrow().clone()).unwrap(), "1\ntwo\n");
/// ```
pub fn puts<W>(out: &Rc<RefCell<W>>, args: &[Value]) -> EvalResult<Value>
    where W: Write + ?Sized
{
    let mut out = out.borrow_mut();
    if args.is_empty() {
        writeln!(out)?;
    }
    for arg in args {
        write_lines(&mut *out, arg, &mut Vec::new())?;
    }
    out.flush()?;
    Ok(Value::Nil)
}

fn write_lines<W>(out: &mut W, value: &Value, open: &mut Vec<usize>) -> std::io::Result<()>
    where W: Write + ?Sized
{
    match value {
        Value::Array(items) if open.contains(&address(items)) => writeln!(out, "[...]"),
        Value::Array(items) => {
            open.push(address(items));
            for item in items.borrow().iter() {
                write_lines(out, item, open)?;
            }
            open.pop();
            Ok(())
        },
        _ => writeln!(out, "{value}"),
    }
}
