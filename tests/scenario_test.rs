mod common;
use common::*;
use msipl::mach::{Event, Val};

#[test]
fn test_count_to_three() {
    let h = exec(
        "var int n 0
label L
set n n+1
jump L n<3
console push(n)
console write()",
    );
    assert_eq!(h.processor.status(), Event::Completed);
    assert_eq!(h.value("n"), Some(Val::Int(3)));
    assert_eq!(h.written(), "3");
}

#[test]
fn test_push_renders_whole_floats() {
    let h = exec("console push(\"x=\", 5, \" y=\", 2.0)\nconsole write()");
    assert_eq!(h.written(), "x=5 y=2");
}

#[test]
fn test_memory_round_trip() {
    let h = exec(
        "var int v 0
var bool empty false
memory set(2, 42)
memory get(2) v
memory clear(2)
memory is_null(2) empty",
    );
    assert_eq!(h.processor.status(), Event::Completed);
    assert_eq!(h.value("v"), Some(Val::Int(42)));
    assert_eq!(h.value("empty"), Some(Val::Bool(true)));
}

#[test]
fn test_labels_ignore_comments_and_labels() {
    let h = exec(
        "# counters
var int hits 0

label a
# between
label b
set hits hits+1
jump b hits<2
jump a hits<4
console push(hits)
console write()",
    );
    assert_eq!(h.value("a"), Some(Val::Line(3)));
    assert_eq!(h.value("b"), Some(Val::Line(3)));
    assert_eq!(h.written(), "4");
}

#[test]
fn test_readonly_rejected_everywhere() {
    let declared = "var int {i} 1\nvar float {f} 1\nvar bool {b} true\nlabel l\n";
    for target in &["i", "f", "b", "l", "this"] {
        let mut h = Host::new(config());
        assert!(!h.load(&format!("{}set {} 2", declared, target)), "{}", target);
        assert_eq!(h.errors(), vec![format!("READONLY VARIABLE IN 4; {}", target)]);
    }
}

#[test]
fn test_fizzbuzz() {
    let h = exec(
        "var int i 0
label next
set i i+1
jump fizzbuzz i%15=0
jump fizz i%3=0
jump buzz i%5=0
console push(i)
jump done true
label fizzbuzz
console push(\"FizzBuzz\")
jump done true
label fizz
console push(\"Fizz\")
jump done true
label buzz
console push(\"Buzz\")
label done
console push(\" \")
jump next i<15
console write()",
    );
    assert_eq!(
        h.written(),
        "1 2 Fizz 4 Buzz Fizz 7 8 Fizz Buzz 11 Fizz 13 14 FizzBuzz "
    );
}

#[test]
fn test_echo_numbers() {
    let mut h = Host::new(config());
    h.console.feed("3 4");
    assert!(h.load(
        "var int a 0
var int b 0
var bool more false
console read()
console pop() a
console can_pop(b) more
jump end !more
console pop() b
label end
console push(a, \"*\", b, \"=\", a*b)
console write()",
    ));
    assert_eq!(h.run(10), Event::Completed);
    assert_eq!(h.written(), "3*4=12");
}
