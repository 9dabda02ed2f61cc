use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// ## Host console
///
/// `console read()` asks the host for text to append to the input buffer.
/// `console write()` hands the output buffer to the host.

pub trait Console {
    fn read(&mut self) -> String;
    fn write(&mut self, text: &str);
}

/// Console that logs writes and never supplies input.
#[derive(Debug, Default)]
pub struct LogConsole {}

impl Console for LogConsole {
    fn read(&mut self) -> String {
        String::new()
    }

    fn write(&mut self, text: &str) {
        log::info!("{}", text);
    }
}

#[derive(Debug, Default)]
struct TranscriptInner {
    input: VecDeque<String>,
    written: Vec<String>,
}

/// Scripted console for tests and embedding. Clones share one transcript,
/// so a host can keep a copy after boxing one into the world.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    inner: Rc<RefCell<TranscriptInner>>,
}

impl Transcript {
    pub fn new() -> Transcript {
        Transcript::default()
    }

    /// Queue text for a later `read`.
    pub fn feed(&self, text: &str) {
        self.inner.borrow_mut().input.push_back(text.to_string());
    }

    pub fn written(&self) -> Vec<String> {
        self.inner.borrow().written.clone()
    }

    pub fn last(&self) -> Option<String> {
        self.inner.borrow().written.last().cloned()
    }
}

impl Console for Transcript {
    fn read(&mut self) -> String {
        self.inner.borrow_mut().input.pop_front().unwrap_or_default()
    }

    fn write(&mut self, text: &str) {
        self.inner.borrow_mut().written.push(text.to_string());
    }
}
