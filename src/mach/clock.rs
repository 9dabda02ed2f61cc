use chrono::{DateTime, Utc};

/// ## Host clock
///
/// Seconds are measured from when the clock was created.
/// `delta` is the length of the most recent tick.

pub trait Clock {
    fn seconds(&self) -> f64;
    fn delta(&self) -> f64;
    fn tick(&mut self);
}

pub struct SystemClock {
    start: DateTime<Utc>,
    last: DateTime<Utc>,
    delta: f64,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        let now = Utc::now();
        SystemClock {
            start: now,
            last: now,
            delta: 0.0,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    match (to - from).num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => (to - from).num_milliseconds() as f64 / 1000.0,
    }
}

impl Clock for SystemClock {
    fn seconds(&self) -> f64 {
        elapsed(self.start, Utc::now())
    }

    fn delta(&self) -> f64 {
        self.delta
    }

    fn tick(&mut self) {
        let now = Utc::now();
        self.delta = elapsed(self.last, now);
        self.last = now;
    }
}

/// Deterministic clock that advances a fixed step every tick.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    seconds: f64,
    delta: f64,
    step: f64,
}

impl ManualClock {
    pub fn new(step: f64) -> ManualClock {
        ManualClock {
            seconds: 0.0,
            delta: 0.0,
            step,
        }
    }

    pub fn advance(&mut self, seconds: f64) {
        self.seconds += seconds;
        self.delta = seconds;
    }
}

impl Clock for ManualClock {
    fn seconds(&self) -> f64 {
        self.seconds
    }

    fn delta(&self) -> f64 {
        self.delta
    }

    fn tick(&mut self) {
        let step = self.step;
        self.advance(step);
    }
}
