use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Deepest an expression stack may grow.
const DEPTH: usize = 256;

/// ## Bounded evaluation stack
///
/// Used both while generating expression code and while running it.
/// Growing past the depth limit is an `Overflow` carrying the stack's
/// own message; popping an empty stack is an internal error.

pub struct Stack<T> {
    items: Vec<T>,
    limit: usize,
    overflow: &'static str,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T> Stack<T> {
    pub fn new(overflow: &'static str) -> Stack<T> {
        Stack::with_limit(DEPTH, overflow)
    }

    pub fn with_limit(limit: usize, overflow: &'static str) -> Stack<T> {
        Stack {
            items: Vec::new(),
            limit,
            overflow,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() >= self.limit {
            return Err(error!(Overflow; self.overflow));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or_else(underflow)
    }

    /// Right operand on top, returned as `(lhs, rhs)`.
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        Ok((lhs, rhs))
    }

    /// The top `count` items in push order.
    pub fn pop_n(&mut self, count: usize) -> Result<Vec<T>> {
        match self.items.len().checked_sub(count) {
            Some(start) => Ok(self.items.split_off(start)),
            None => Err(underflow()),
        }
    }
}

fn underflow() -> Error {
    error!(InternalError; "UNDERFLOW")
}
