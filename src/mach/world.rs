use super::{Arena, Clock, Console, Data, Handle, LogConsole, MemoryDevice, Registry, SystemClock};
use super::MEMORY_TYPE;
use crate::lang::Error;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, Error>;

/// ## Host world
///
/// Everything a processor reaches outside itself: the entity arena, the
/// method registry, the clock and the console. Parts are grouped; a
/// group stands for one connected structure. Cross-group calls need an
/// antenna in both groups.

pub struct World {
    pub arena: Arena,
    pub registry: Registry,
    clock: Box<dyn Clock>,
    console: Box<dyn Console>,
    antennas: HashSet<u32>,
}

impl Default for World {
    fn default() -> Self {
        World::new(Box::new(SystemClock::new()), Box::new(LogConsole::default()))
    }
}

impl World {
    pub fn new(clock: Box<dyn Clock>, console: Box<dyn Console>) -> World {
        World {
            arena: Arena::new(),
            registry: Registry::with_builtins(),
            clock,
            console,
            antennas: HashSet::new(),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    pub fn console(&mut self) -> &mut dyn Console {
        &mut *self.console
    }

    /// Advance the clock. Call once per host frame before ticking processors.
    pub fn tick(&mut self) {
        self.clock.tick();
    }

    pub fn spawn_part(&mut self, group: u32) -> Handle {
        self.arena.spawn_part(group)
    }

    /// Attach a memory component of `size` slots to a part.
    pub fn attach_memory(&mut self, part: Handle, size: usize) -> Result<Handle> {
        self.arena
            .attach(part, MEMORY_TYPE, Data::Memory(MemoryDevice::new(size)))
    }

    pub fn add_antenna(&mut self, group: u32) {
        self.antennas.insert(group);
    }

    pub fn remove_antenna(&mut self, group: u32) {
        self.antennas.remove(&group);
    }

    /// Whether an entity in `from`'s group may call into `to`.
    pub fn can_connect(&self, from: Handle, to: Handle) -> bool {
        match (self.arena.group(from), self.arena.group(to)) {
            (Some(a), Some(b)) => {
                a == b || (self.antennas.contains(&a) && self.antennas.contains(&b))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{ManualClock, Transcript};

    fn world() -> World {
        World::new(Box::new(ManualClock::new(0.1)), Box::new(Transcript::new()))
    }

    #[test]
    fn test_can_connect() {
        let mut world = world();
        let a = world.spawn_part(1);
        let b = world.spawn_part(1);
        let c = world.spawn_part(2);
        assert!(world.can_connect(a, b));
        assert!(!world.can_connect(a, c));
        world.add_antenna(1);
        assert!(!world.can_connect(a, c));
        world.add_antenna(2);
        assert!(world.can_connect(a, c));
        world.arena.destroy(c);
        assert!(!world.can_connect(a, c));
    }

    #[test]
    fn test_memory_component_joins_group() {
        let mut world = world();
        let part = world.spawn_part(7);
        let mem = world.attach_memory(part, 8).unwrap();
        assert!(world.can_connect(part, mem));
        assert_eq!(world.arena.memory(mem).map(|m| m.size()), Some(8));
    }
}
