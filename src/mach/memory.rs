use super::{DataKind, Lookup, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Memory device
///
/// A fixed number of slots, each empty or holding one value.
/// `free_count`, `first_free` and `last_free` always describe the empty
/// slots exactly. A slot holding a dead entity handle still counts as
/// occupied until it is cleared or swept.
///
/// `set` and `clear` hand back the displaced value. When that is an entity
/// the caller releases its usage count.

#[derive(Debug, Clone)]
pub struct MemoryDevice {
    data: Vec<Option<Val>>,
    free_count: usize,
    first_free: Option<usize>,
    last_free: Option<usize>,
}

impl MemoryDevice {
    pub fn new(size: usize) -> MemoryDevice {
        MemoryDevice {
            data: vec![None; size],
            free_count: size,
            first_free: if size > 0 { Some(0) } else { None },
            last_free: size.checked_sub(1),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn free_count(&self) -> usize {
        self.free_count
    }

    pub fn first_free(&self) -> Option<usize> {
        self.first_free
    }

    pub fn last_free(&self) -> Option<usize> {
        self.last_free
    }

    fn index(&self, index: i64) -> Result<usize> {
        if index < 0 || index as u64 >= self.data.len() as u64 {
            Err(error!(AddressOutOfBounds; format!("{} NOT IN 0..{}", index, self.data.len())))
        } else {
            Ok(index as usize)
        }
    }

    pub fn get(&self, index: i64) -> Result<Option<&Val>> {
        let i = self.index(index)?;
        Ok(self.data[i].as_ref())
    }

    /// Empty, or holding an entity that no longer exists.
    pub fn is_null(&self, index: i64, lookup: &dyn Lookup) -> Result<bool> {
        Ok(match self.get(index)? {
            None => true,
            Some(Val::Entity(h)) => !lookup.is_alive(*h),
            Some(_) => false,
        })
    }

    pub fn kind(&self, index: i64, lookup: &dyn Lookup) -> Result<DataKind> {
        if self.is_null(index, lookup)? {
            return Ok(DataKind::None);
        }
        Ok(match self.get(index)? {
            Some(val) => DataKind::of(val),
            None => DataKind::None,
        })
    }

    pub fn set(&mut self, index: i64, val: Val) -> Result<Option<Val>> {
        let i = self.index(index)?;
        let old = self.data[i].replace(val);
        if old.is_none() {
            self.occupied(i);
        }
        Ok(old)
    }

    pub fn clear(&mut self, index: i64) -> Result<Option<Val>> {
        let i = self.index(index)?;
        let old = self.data[i].take();
        if old.is_some() {
            self.freed(i);
        }
        Ok(old)
    }

    /// Clear every slot holding a dead entity. Returns the removed values.
    pub fn sweep(&mut self, lookup: &dyn Lookup) -> Vec<Val> {
        let mut removed = vec![];
        for i in 0..self.data.len() {
            let dead = match &self.data[i] {
                Some(Val::Entity(h)) => !lookup.is_alive(*h),
                _ => false,
            };
            if dead {
                if let Some(val) = self.data[i].take() {
                    removed.push(val);
                }
                self.freed(i);
            }
        }
        removed
    }

    fn occupied(&mut self, i: usize) {
        self.free_count -= 1;
        if self.first_free == Some(i) {
            self.first_free = (i + 1..self.data.len()).find(|&j| self.data[j].is_none());
        }
        if self.last_free == Some(i) {
            self.last_free = (0..i).rev().find(|&j| self.data[j].is_none());
        }
    }

    fn freed(&mut self, i: usize) {
        self.free_count += 1;
        match self.first_free {
            Some(first) if first <= i => {}
            _ => self.first_free = Some(i),
        }
        match self.last_free {
            Some(last) if last >= i => {}
            _ => self.last_free = Some(i),
        }
    }
}
