mod common;
use common::*;
use msipl::lang::ErrorCode;
use msipl::mach::{Collector, Event, Lookup, ManualClock, Processor, Transcript, Val, World};

fn world() -> World {
    World::new(Box::new(ManualClock::new(0.1)), Box::new(Transcript::new()))
}

fn step(world: &mut World, processors: &mut [&mut Processor]) {
    world.tick();
    for processor in processors.iter_mut() {
        processor.tick(world);
    }
}

#[test]
fn test_antennas_bridge_groups() {
    let mut world = world();
    let home = world.spawn_part(0);
    let rover = world.spawn_part(1);
    let mut p = Processor::new(config());
    p.attach(home);
    p.connect("rover", rover).unwrap();
    let source = "var int id 0\ncomp rover.id() id";

    assert!(p.load(source, &mut world));
    step(&mut world, &mut [&mut p]);
    assert_eq!(p.status(), Event::Halted);
    assert!(p.errors()[0].is(ErrorCode::PermissionDenied));

    world.add_antenna(0);
    world.add_antenna(1);
    assert!(p.load(source, &mut world));
    step(&mut world, &mut [&mut p]);
    assert_eq!(p.status(), Event::Completed);
    assert_eq!(p.value("id"), Some(Val::Int(rover.id() as i64)));
}

#[test]
fn test_shared_memory_component() {
    let mut world = world();
    let shelf = world.spawn_part(0);
    let reader_part = world.spawn_part(0);
    let mem = world.attach_memory(shelf, 4).unwrap();

    let mut writer = Processor::new(config());
    writer.attach(shelf);
    assert!(writer.load(
        "comp create(\"m\", \"memory\")
comp this.get_component(\"memory\", 0) m
memory m.set(3, 7)",
        &mut world,
    ));
    let mut reader = Processor::new(config());
    reader.attach(reader_part);
    reader.connect("shelf", shelf).unwrap();
    assert!(reader.load(
        "comp create(\"m\", \"memory\")
var int v 0
var int free 0
comp shelf.get_component(\"memory\", 0) m
memory m.get(3) v
comp m.free_count() free",
        &mut world,
    ));

    step(&mut world, &mut [&mut writer, &mut reader]);
    assert_eq!(writer.status(), Event::Completed);
    assert_eq!(reader.status(), Event::Completed);
    assert_eq!(reader.value("m"), Some(Val::Entity(mem)));
    assert_eq!(reader.value("v"), Some(Val::Int(7)));
    assert_eq!(reader.value("free"), Some(Val::Int(3)));
    assert_eq!(world.arena.usings(mem), 2);
}

#[test]
fn test_collector_frees_destroyed_parts() {
    let mut world = world();
    let home = world.spawn_part(0);
    let rover = world.spawn_part(0);
    world.attach_memory(home, 4).unwrap();
    let mut p = Processor::new(config());
    p.attach(home);
    p.connect("rover", rover).unwrap();
    assert!(p.load(
        "comp create(\"m\", \"memory\")
var part copy rover
comp this.get_component(\"memory\", 0) m
memory m.set(0, rover)
memory set(1, copy)
label idle
time wait(1)
jump idle true",
        &mut world,
    ));
    step(&mut world, &mut [&mut p]);
    assert_eq!(world.arena.usings(rover), 4);

    world.arena.destroy(rover);
    assert!(!world.arena.is_alive(rover));
    assert_eq!(world.arena.usings(rover), 4);

    let mut collector = Collector::new(2);
    assert_eq!(collector.tick(&mut world, vec![&mut p]), 0);
    assert_eq!(collector.tick(&mut world, vec![&mut p]), 4);
    assert_eq!(world.arena.usings(rover), 0);
    assert_eq!(p.value("rover"), None);
    assert_eq!(p.value("copy"), None);
    assert!(p.memory().get(1).unwrap().is_none());

    let fresh = world.spawn_part(0);
    assert_eq!(fresh.id(), rover.id());
    assert_ne!(fresh, rover);
    assert!(!matches!(p.status(), Event::Halted));
}
