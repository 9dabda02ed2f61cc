extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::mach::{Collector, Config, Console, Event, Processor, SystemClock, World};
use ansi_term::Style;
use linefeed::{DefaultTerminal, Interface, ReadResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const USAGE: &str = "usage: msipl <script> [--ipt N] [--memory N] [--ticks N]";

pub fn main() {
    if let Err(error) = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("{}", error);
    }
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            std::process::exit(2);
        }
    };
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
    }
    match main_loop(options, interrupted) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, PartialEq)]
struct Options {
    path: String,
    config: Config,
    ticks: usize,
}

impl Options {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Options, String> {
        let mut path = None;
        let mut config = Config {
            memory_size: 64,
            ..Config::default()
        };
        let mut ticks = 100_000;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ipt" => config.instructions_per_tick = number(&arg, args.next())?,
                "--memory" => config.memory_size = number(&arg, args.next())?,
                "--ticks" => ticks = number(&arg, args.next())?,
                flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
                _ if path.is_some() => return Err(format!("unexpected argument {}", arg)),
                _ => path = Some(arg),
            }
        }
        if config.instructions_per_tick == 0 {
            return Err("--ipt must be at least 1".to_string());
        }
        match path {
            Some(path) => Ok(Options {
                path,
                config,
                ticks,
            }),
            None => Err("missing script".to_string()),
        }
    }
}

fn number(flag: &str, value: Option<String>) -> Result<usize, String> {
    match value.map(|v| v.parse::<usize>()) {
        Some(Ok(n)) => Ok(n),
        _ => Err(format!("{} needs a number", flag)),
    }
}

fn main_loop(options: Options, interrupted: Arc<AtomicBool>) -> std::io::Result<i32> {
    let source = std::fs::read_to_string(&options.path)?;
    let console = TermConsole::new()?;
    let mut world = World::new(Box::new(SystemClock::new()), Box::new(console));
    let part = world.spawn_part(0);
    if let Err(error) = world.attach_memory(part, options.config.memory_size) {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
        return Ok(1);
    }
    let mut collector = Collector::new(options.config.sweep_period);
    let mut processor = Processor::new(options.config);
    processor.attach(part);

    let loaded = processor.load(&source, &mut world);
    let mut event = processor.status();
    if loaded {
        for _ in 0..options.ticks {
            if interrupted.swap(false, Ordering::SeqCst) {
                processor.interrupt();
            }
            world.tick();
            event = processor.tick(&mut world);
            collector.tick(&mut world, std::iter::once(&mut processor));
            match event {
                Event::Running | Event::Waiting(_) => {}
                _ => break,
            }
        }
    }

    for error in processor.errors() {
        eprintln!("{}", Style::new().bold().paint(error.to_string()));
    }
    Ok(match event {
        Event::Completed | Event::Stopped => 0,
        Event::Halted => 1,
        Event::Running | Event::Waiting(_) => {
            eprintln!("{} ticks exceeded.", options.ticks);
            3
        }
    })
}

/// `console read()` prompts on the terminal; `console write()` prints.
struct TermConsole {
    interface: Interface<DefaultTerminal>,
}

impl TermConsole {
    fn new() -> std::io::Result<TermConsole> {
        let interface = Interface::new("msipl")?;
        interface.set_prompt("> ")?;
        Ok(TermConsole { interface })
    }
}

impl Console for TermConsole {
    fn read(&mut self) -> String {
        match self.interface.read_line() {
            Ok(ReadResult::Input(string)) => string,
            Ok(ReadResult::Signal(_)) | Ok(ReadResult::Eof) => String::new(),
            Err(error) => {
                log::error!("console read failed: {}", error);
                String::new()
            }
        }
    }

    fn write(&mut self, text: &str) {
        if let Err(error) = self.interface.write_fmt(format_args!("{}\n", text)) {
            log::error!("console write failed: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["boot.ms"]).unwrap();
        assert_eq!(options.path, "boot.ms");
        assert_eq!(options.ticks, 100_000);
        assert_eq!(options.config.instructions_per_tick, 10);
        assert_eq!(options.config.memory_size, 64);
    }

    #[test]
    fn test_flags() {
        let options = parse(&["--ipt", "3", "a.ms", "--memory", "0", "--ticks", "9"]).unwrap();
        assert_eq!(options.path, "a.ms");
        assert_eq!(options.config.instructions_per_tick, 3);
        assert_eq!(options.config.memory_size, 0);
        assert_eq!(options.ticks, 9);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.ms", "b.ms"]).is_err());
        assert!(parse(&["a.ms", "--ipt"]).is_err());
        assert!(parse(&["a.ms", "--ipt", "x"]).is_err());
        assert!(parse(&["a.ms", "--ipt", "0"]).is_err());
        assert!(parse(&["a.ms", "--fast"]).is_err());
    }
}
