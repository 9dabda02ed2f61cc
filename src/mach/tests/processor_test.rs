use super::*;
use crate::lang::ErrorCode;

#[test]
fn test_loop_until_three() {
    let mut r = script(
        "var int n 0
label L
set n n+1
jump L n<3
console push(n)
console write()",
    );
    assert_eq!(r.run(100), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(3)));
    assert_eq!(r.processor.output(), "3");
    assert_eq!(r.console.last(), Some("3".to_string()));
}

#[test]
fn test_budget_skips_labels() {
    let config = Config {
        instructions_per_tick: 3,
        ..config()
    };
    let mut r = script_with(
        config,
        "var int n 0
label a
label b
set n n+1
set n n+1
set n n+1
set n n+1",
    );
    assert_eq!(r.tick(), Event::Running);
    assert_eq!(r.value("n"), Some(Val::Int(2)));
    assert_eq!(r.processor.current_line(), 5);
    assert_eq!(r.tick(), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(4)));
}

#[test]
fn test_tight_loop_is_throttled() {
    let config = Config {
        instructions_per_tick: 4,
        ..config()
    };
    let mut r = script_with(config, "var int n 0\nlabel top\nset n n+1\njump top true");
    assert_eq!(r.tick(), Event::Running);
    assert_eq!(r.value("n"), Some(Val::Int(2)));
    assert_eq!(r.tick(), Event::Running);
    assert_eq!(r.value("n"), Some(Val::Int(4)));
}

#[test]
fn test_wait_skips_ticks() {
    let mut r = script("var int n 0\ntime wait(2)\nset n 1");
    assert_eq!(r.tick(), Event::Waiting(2));
    assert_eq!(r.tick(), Event::Waiting(1));
    assert_eq!(r.tick(), Event::Waiting(0));
    assert_eq!(r.value("n"), Some(Val::Int(0)));
    assert_eq!(r.tick(), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(1)));
}

#[test]
fn test_wait_zero_and_whole_float() {
    let mut r = script("var int n 0\ntime wait(0)\nset n 1\ntime wait(1.0)\nset n 2");
    assert_eq!(r.tick(), Event::Waiting(1));
    assert_eq!(r.value("n"), Some(Val::Int(1)));
    assert_eq!(r.run(10), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(2)));
}

#[test]
fn test_bad_wait_halts() {
    for source in &["time wait(-1)", "time wait(1.5)", "time wait(true)"] {
        let mut r = script(source);
        assert_eq!(r.tick(), Event::Halted, "{}", source);
        assert!(r.first_error().is(ErrorCode::InvalidWait), "{}", source);
    }
}

#[test]
fn test_jump_needs_bool() {
    let mut r = script("var int n 0\nlabel top\njump top n+1\nset n 5");
    assert_eq!(r.tick(), Event::Halted);
    assert!(r.first_error().is(ErrorCode::InvalidCondition));
    assert_eq!(r.first_error().line_number(), Some(2));
    assert_eq!(r.processor.error_count(), 1);
    assert_eq!(r.tick(), Event::Halted);
    assert_eq!(r.value("n"), Some(Val::Int(0)));
}

#[test]
fn test_runtime_error_halts_for_good() {
    let mut r = script("var int n 0\nset n 1 % n\nset n 9");
    assert_eq!(r.run(10), Event::Halted);
    assert!(r.first_error().is(ErrorCode::DivisionByZero));
    assert!(r.first_error().is_runtime());
    assert_eq!(r.value("n"), Some(Val::Int(0)));
    assert!(r.processor.has_thrown());
    assert!(!r.processor.is_enabled());
}

#[test]
fn test_legacy_jump_runs_target() {
    let source = "var int n 0\nlabel top\nset n n+1\njump top n<3";
    let one = |legacy_jump| Config {
        instructions_per_tick: 1,
        legacy_jump,
        ..config()
    };
    let mut plain = script_with(one(false), source);
    let mut legacy = script_with(one(true), source);
    for _ in 0..3 {
        plain.tick();
        legacy.tick();
    }
    assert_eq!(plain.value("n"), Some(Val::Int(1)));
    assert_eq!(legacy.value("n"), Some(Val::Int(2)));
    assert_eq!(plain.run(20), Event::Completed);
    assert_eq!(legacy.run(20), Event::Completed);
    assert_eq!(plain.value("n"), Some(Val::Int(3)));
    assert_eq!(legacy.value("n"), Some(Val::Int(3)));
}

#[test]
fn test_legacy_var_assigns_once() {
    let source = "var int n 0\nlabel top\nvar int k n\nset n n+1\njump top n<3";
    let mut plain = script(source);
    let mut legacy = script_with(
        Config {
            legacy_var: true,
            ..config()
        },
        source,
    );
    assert_eq!(plain.run(20), Event::Completed);
    assert_eq!(legacy.run(20), Event::Completed);
    assert_eq!(plain.value("k"), Some(Val::Int(2)));
    assert_eq!(legacy.value("k"), Some(Val::Int(0)));
}

#[test]
fn test_stop_and_interrupt() {
    let mut r = script("var int n 1\nstop\nset n 2");
    assert_eq!(r.tick(), Event::Stopped);
    assert_eq!(r.tick(), Event::Stopped);
    assert_eq!(r.value("n"), Some(Val::Int(1)));

    let mut r = script("label top\njump top true");
    assert_eq!(r.tick(), Event::Running);
    r.processor.interrupt();
    assert_eq!(r.tick(), Event::Stopped);
}

#[test]
fn test_compile_errors_never_run() {
    let mut r = Rig::new(config());
    assert!(!r.load("var int n 1\nset n n +\nconsole push(n)\nconsole write()"));
    assert_eq!(r.processor.error_count(), 1);
    assert!(r.first_error().is(ErrorCode::InvalidExpression));
    assert_eq!(r.first_error().line_number(), Some(1));
    assert_eq!(r.tick(), Event::Halted);
    assert!(r.console.written().is_empty());
}

#[test]
fn test_reload_starts_fresh() {
    let mut r = script("var int n 4");
    assert_eq!(r.run(5), Event::Completed);
    assert!(r.load("var int n 7"));
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(7)));
}

#[test]
fn test_time() {
    let mut r = script(
        "var int f 0
var float s 0
var float d 0
time frames_since_launch() f
time seconds_since_launch() s
time delta_time() d",
    );
    r.tick();
    r.tick();
    assert_eq!(r.value("f"), Some(Val::Int(1)));
    assert_eq!(r.value("s"), Some(Val::Float(0.5)));
    assert_eq!(r.value("d"), Some(Val::Float(0.5)));
    assert_eq!(r.processor.frames_since_launch(), 2);
}

#[test]
fn test_this_is_readonly() {
    let mut r = Rig::new(config());
    assert!(!r.load("var part p this\nset this p"));
    assert!(r.first_error().is(ErrorCode::ReadonlyVariable));
    let r = script("var part p this");
    assert_eq!(r.value("this"), Some(Val::Entity(r.part)));
}

#[test]
fn test_part_copy() {
    let mut r = script("var part p this\nvar int id p");
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("p"), Some(Val::Entity(r.part)));
    assert_eq!(r.value("id"), Some(Val::Int(r.part.id() as i64)));
    assert_eq!(r.world.arena.usings(r.part), 2);
}
