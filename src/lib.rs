//! # MSIPL
//!
//! A small typed scripting language and the processor that runs it,
//! one bounded slice per host frame.
//!
//! A host builds a [`World`](mach::World), spawns parts, mounts a
//! [`Processor`](mach::Processor) on one of them and calls
//! [`tick`](mach::Processor::tick) once per frame.
//! ```
//! use msipl::mach::{Config, Event, ManualClock, Processor, Transcript, World};
//!
//! let console = Transcript::new();
//! let mut world = World::new(Box::new(ManualClock::new(0.1)), Box::new(console.clone()));
//! let part = world.spawn_part(0);
//! let mut processor = Processor::new(Config::default());
//! processor.attach(part);
//! assert!(processor.load("var int n 6\nconsole push(\"n=\", n*7)\nconsole write()", &mut world));
//! assert_eq!(processor.tick(&mut world), Event::Completed);
//! assert_eq!(console.last(), Some("n=42".to_string()));
//! ```
//!
//! The command line front end runs a script file on a single part
//! carrying a `memory` component: `msipl boot.ms --ipt 10`.

#[path = "doc/language.rs"]
#[allow(non_snake_case)]
pub mod _Language;

pub mod lang;
pub mod mach;
pub mod term;
