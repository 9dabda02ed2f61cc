use super::*;

mod comp_test;
mod memory_test;
mod processor_test;

struct Rig {
    world: World,
    processor: Processor,
    console: Transcript,
    part: Handle,
}

impl Rig {
    fn new(config: Config) -> Rig {
        let console = Transcript::new();
        let mut world = World::new(Box::new(ManualClock::new(0.5)), Box::new(console.clone()));
        let part = world.spawn_part(0);
        let mut processor = Processor::new(config);
        processor.attach(part);
        Rig {
            world,
            processor,
            console,
            part,
        }
    }

    fn load(&mut self, source: &str) -> bool {
        self.processor.load(source, &mut self.world)
    }

    fn tick(&mut self) -> Event {
        self.world.tick();
        self.processor.tick(&mut self.world)
    }

    /// Tick until the processor is neither running nor waiting.
    fn run(&mut self, limit: usize) -> Event {
        for _ in 0..limit {
            match self.tick() {
                Event::Running | Event::Waiting(_) => {}
                event => return event,
            }
        }
        self.processor.status()
    }

    fn value(&self, name: &str) -> Option<Val> {
        self.processor.value(name)
    }

    fn first_error(&self) -> &crate::lang::Error {
        &self.processor.errors()[0]
    }
}

fn config() -> Config {
    Config {
        memory_size: 8,
        ..Config::default()
    }
}

fn script(source: &str) -> Rig {
    script_with(config(), source)
}

fn script_with(config: Config, source: &str) -> Rig {
    let mut rig = Rig::new(config);
    assert!(rig.load(source), "{:?}", rig.processor.errors());
    rig
}
