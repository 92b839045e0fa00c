use std::{cell::RefCell, fs, path::Path, rc::Rc};

use rubyish::interpreter::machine::Machine;
use walkdir::WalkDir;

#[test]
fn demo_scripts_print_their_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").sort_by_file_name()
                             .into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "rb"))
    {
        let path = entry.path();
        let script =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                           panic!("Failed to read {expected_path:?}: {e}")
                       });

        count += 1;
        let actual = run_demo(path, &script);
        assert_eq!(actual, expected, "output of {path:?} differs");
    }

    assert!(count > 0, "No demo scripts found in demos/");
}

fn run_demo(path: &Path, script: &str) -> String {
    let out = Rc::new(RefCell::new(Vec::<u8>::new()));
    let machine = Machine::with_output(out.clone());
    if let Err(e) = machine.execute(script) {
        panic!("Demo {path:?} failed: {e}");
    }
    let bytes = out.borrow().clone();
    String::from_utf8(bytes).unwrap_or_else(|e| panic!("Demo {path:?} printed invalid UTF-8: {e}"))
}

#[test]
fn demo_scripts_run_from_a_reader() {
    let script = fs::read("demos/counter.rb").unwrap();
    let machine = Machine::with_output(Rc::new(RefCell::new(Vec::<u8>::new())));
    machine.execute_reader(script.as_slice()).unwrap();
    assert_eq!(machine.execute("Counter.total").unwrap().to_string(), "3");
}
