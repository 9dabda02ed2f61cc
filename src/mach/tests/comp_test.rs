use super::*;
use crate::lang::{Error, ErrorCode};

fn engine_power(_: &mut Arena, _: Handle, args: &[Val]) -> Result<Option<Val>, Error> {
    match args.first() {
        Some(Val::Float(throttle)) => Ok(Some(Val::Float(throttle * 100.0))),
        _ => Ok(None),
    }
}

#[test]
fn test_memory_component() {
    let mut r = Rig::new(config());
    let mem = r.world.attach_memory(r.part, 4).unwrap();
    let ok = r.load(
        "comp create(\"m\", \"memory\")
var int n 0
var int v 0
comp this.get_component(\"memory\", 0) m
comp m.size() n
memory m.set(1, 9)
memory m.get(1) v
comp m.set_value(2, n+1)",
    );
    assert!(ok, "{:?}", r.processor.errors());
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("m"), Some(Val::Entity(mem)));
    assert_eq!(r.value("n"), Some(Val::Int(4)));
    assert_eq!(r.value("v"), Some(Val::Int(9)));
    let device = r.world.arena.memory(mem).unwrap();
    assert_eq!(device.get(2).unwrap(), Some(&Val::Int(5)));
    assert_eq!(device.free_count(), 2);
}

#[test]
fn test_host_registered_type() {
    let mut r = Rig::new(config());
    r.world.registry.register(
        "engine",
        "power",
        vec![Param::Kind(DataKind::Float)],
        Returns::Kind(DataKind::Float),
        engine_power,
    );
    r.world.arena.attach(r.part, "engine", Data::None).unwrap();
    let ok = r.load(
        "comp create(\"e\", \"engine\")
var float p 0
comp this.get_component(\"engine\", 0) e
comp e.power(1) p",
    );
    assert!(ok, "{:?}", r.processor.errors());
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("p"), Some(Val::Float(100.0)));
}

#[test]
fn test_component_type_is_checked() {
    let mut r = Rig::new(config());
    r.world.registry.register("engine", "power", vec![], Returns::Nothing, engine_power);
    r.world.attach_memory(r.part, 4).unwrap();
    assert!(r.load("comp create(\"e\", \"engine\")\ncomp this.get_component(\"memory\", 0) e"));
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::ConversionError));
    assert_eq!(r.value("e"), None);
}

#[test]
fn test_no_return_value() {
    let mut r = Rig::new(config());
    r.world.attach_memory(r.part, 4).unwrap();
    assert!(r.load(
        "comp create(\"m\", \"memory\")
var int v 0
comp this.get_component(\"memory\", 0) m
comp m.get_value(0) v",
    ));
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::NoReturnValue));
}

#[test]
fn test_missing_component() {
    let mut r = script(
        "comp create(\"m\", \"memory\")
comp this.get_component(\"memory\", 0) m",
    );
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::NullParameter));
}

#[test]
fn test_permission() {
    let mut r = Rig::new(config());
    let far = r.world.spawn_part(9);
    r.processor.connect("far", far).unwrap();
    assert!(r.load("var int n 0\ncomp far.id() n"));
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::PermissionDenied));

    r.world.add_antenna(0);
    r.world.add_antenna(9);
    assert!(r.load("var int n 0\ncomp far.id() n"));
    assert_eq!(r.run(5), Event::Completed);
    assert_eq!(r.value("n"), Some(Val::Int(far.id() as i64)));
}

#[test]
fn test_detached_processor_is_denied() {
    let mut world = World::new(Box::new(ManualClock::new(0.5)), Box::new(Transcript::new()));
    let part = world.spawn_part(0);
    let mut processor = Processor::new(config());
    processor.connect("p", part).unwrap();
    assert!(processor.load("var int n 0\ncomp p.id() n", &mut world));
    assert_eq!(processor.tick(&mut world), Event::Halted);
    assert!(processor.errors()[0].is(ErrorCode::PermissionDenied));
}

#[test]
fn test_dead_target() {
    let mut r = Rig::new(config());
    let other = r.world.spawn_part(0);
    r.processor.connect("other", other).unwrap();
    assert!(r.load("var int n 0\ncomp other.id() n"));
    r.world.arena.destroy(other);
    assert_eq!(r.run(5), Event::Halted);
    assert!(r.first_error().is(ErrorCode::NullParameter));
}
