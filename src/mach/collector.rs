use super::{Processor, World};

/// ## Reference sweep
///
/// Owned by whoever owns the processors and ticked once per host frame.
/// Every `period` ticks it nulls references to destroyed entities, both
/// in processors and in memory components, and releases their usage
/// counts so the arena can recycle the slots.

#[derive(Debug)]
pub struct Collector {
    period: u32,
    timer: u32,
}

impl Collector {
    pub fn new(period: u32) -> Collector {
        Collector {
            period: period.max(1),
            timer: 0,
        }
    }

    /// Count one frame and sweep when the period is up.
    /// Returns the number of references dropped.
    pub fn tick<'a, I>(&mut self, world: &mut World, processors: I) -> usize
    where
        I: IntoIterator<Item = &'a mut Processor>,
    {
        self.timer += 1;
        if self.timer < self.period {
            return 0;
        }
        self.timer = 0;
        self.collect(world, processors)
    }

    /// Sweep now.
    pub fn collect<'a, I>(&mut self, world: &mut World, processors: I) -> usize
    where
        I: IntoIterator<Item = &'a mut Processor>,
    {
        let mut dropped = 0;
        for processor in processors {
            dropped += processor.sweep(&mut world.arena);
        }
        dropped += world.arena.sweep_memory();
        if dropped > 0 {
            log::debug!("sweep dropped {} references", dropped);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{Lookup, ManualClock, Transcript};

    #[test]
    fn test_period() {
        let mut world = World::new(Box::new(ManualClock::new(0.1)), Box::new(Transcript::new()));
        let part = world.spawn_part(0);
        let target = world.spawn_part(0);
        let mut processor = Processor::default();
        processor.attach(part);
        processor.connect("other", target).unwrap();
        assert!(processor.load("stop", &mut world));
        world.arena.destroy(target);
        assert_eq!(world.arena.usings(target), 1);

        let mut collector = Collector::new(3);
        assert_eq!(collector.tick(&mut world, vec![&mut processor]), 0);
        assert_eq!(collector.tick(&mut world, vec![&mut processor]), 0);
        assert_eq!(collector.tick(&mut world, vec![&mut processor]), 1);
        assert_eq!(processor.value("other"), None);
        assert!(!world.arena.is_alive(target));
        assert_eq!(world.arena.usings(target), 0);
        assert_eq!(collector.tick(&mut world, vec![&mut processor]), 0);
    }
}
