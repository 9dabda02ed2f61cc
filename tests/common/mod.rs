#![allow(dead_code)]
use msipl::mach::{Config, Event, Handle, ManualClock, Processor, Transcript, Val, World};

pub struct Host {
    pub world: World,
    pub processor: Processor,
    pub console: Transcript,
    pub part: Handle,
}

impl Host {
    pub fn new(config: Config) -> Host {
        let console = Transcript::new();
        let mut world = World::new(Box::new(ManualClock::new(0.25)), Box::new(console.clone()));
        let part = world.spawn_part(0);
        let mut processor = Processor::new(config);
        processor.attach(part);
        Host {
            world,
            processor,
            console,
            part,
        }
    }

    pub fn load(&mut self, source: &str) -> bool {
        self.processor.load(source, &mut self.world)
    }

    pub fn tick(&mut self) -> Event {
        self.world.tick();
        self.processor.tick(&mut self.world)
    }

    /// Tick until the processor is done, at most `ticks` times.
    pub fn run(&mut self, ticks: usize) -> Event {
        for _ in 0..ticks {
            match self.tick() {
                Event::Running | Event::Waiting(_) => {}
                event => return event,
            }
        }
        self.processor.status()
    }

    pub fn value(&self, name: &str) -> Option<Val> {
        self.processor.value(name)
    }

    /// Everything handed to the console, one write per line.
    pub fn written(&self) -> String {
        self.console.written().join("\n")
    }

    pub fn errors(&self) -> Vec<String> {
        self.processor.errors().iter().map(|e| e.to_string()).collect()
    }
}

pub fn config() -> Config {
    Config {
        memory_size: 16,
        ..Config::default()
    }
}

pub fn exec(source: &str) -> Host {
    exec_n(source, config(), 1000)
}

pub fn exec_n(source: &str, config: Config, ticks: usize) -> Host {
    let mut host = Host::new(config);
    if host.load(source) {
        host.run(ticks);
    }
    host
}
