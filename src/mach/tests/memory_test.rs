use super::*;
use crate::lang::ErrorCode;

#[test]
fn test_set_get_clear() {
    let mut r = script(
        "var int v 0
var bool e false
memory set(2, 42)
memory get(2) v
memory clear(2)
memory is_null(2) e",
    );
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("v"), Some(Val::Int(42)));
    assert_eq!(r.value("e"), Some(Val::Bool(true)));
    assert_eq!(r.processor.memory().free_count(), 8);
}

#[test]
fn test_get_converts_and_reports_type() {
    let mut r = script(
        "var int v 0
var int t 0
var int i 3
memory set(i+1, 2.75)
memory get(4.0) v
memory get_type(i+1) t",
    );
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("v"), Some(Val::Int(2)));
    assert_eq!(r.value("t"), Some(Val::Int(DataKind::Float.code())));
    let memory = r.processor.memory();
    assert_eq!(memory.free_count(), 7);
    assert_eq!(memory.first_free(), Some(0));
    assert_eq!(memory.last_free(), Some(7));
}

#[test]
fn test_out_of_bounds() {
    let mut r = script("memory set(8, 1)");
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::AddressOutOfBounds));

    let mut r = script("memory clear(-1)");
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::AddressOutOfBounds));
}

#[test]
fn test_get_null_slot() {
    let mut r = script("var int v 0\nmemory get(3) v");
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::NullParameter));
}

#[test]
fn test_entity_slots_hold_usings() {
    let mut r = script(
        "var part p this
memory set(0, this)
memory get(0) p
memory set(0, 1)",
    );
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("p"), Some(Val::Entity(r.part)));
    assert_eq!(r.world.arena.usings(r.part), 2);
}

#[test]
fn test_sweep_clears_dead_slots() {
    let mut r = Rig::new(config());
    let other = r.world.spawn_part(0);
    r.processor.connect("other", other).unwrap();
    assert!(r.load("memory set(5, other)"));
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.world.arena.usings(other), 2);
    r.world.arena.destroy(other);
    assert_eq!(r.processor.sweep(&mut r.world.arena), 2);
    assert_eq!(r.processor.memory().free_count(), 8);
    assert_eq!(r.value("other"), None);
}
