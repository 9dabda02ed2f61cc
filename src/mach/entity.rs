use super::{Lookup, MemoryDevice, Val};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Entity arena
///
/// Parts and their components live in an arena owned by the host world.
/// Scripts only ever hold a [`Handle`]: a slot index plus the generation
/// of that slot when the handle was issued. An entity can be destroyed
/// at any time; handles to it then stop being alive.
///
/// Every place a script stores a handle (a variable, a memory slot) holds
/// one usage on the slot. A destroyed entity's slot is only recycled once
/// its usages drop to zero, and recycling bumps the generation so stale
/// handles can never alias a new entity.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Part,
    Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
    kind: EntityKind,
}

impl Handle {
    /// Integer id seen by scripts.
    pub fn id(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_part(&self) -> bool {
        self.kind == EntityKind::Part
    }
}

#[derive(Debug)]
pub enum Data {
    None,
    Memory(MemoryDevice),
}

#[derive(Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub type_name: Rc<str>,
    pub group: u32,
    pub parent: Option<Handle>,
    pub components: Vec<Handle>,
    pub data: Data,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    usings: usize,
    entity: Option<Entity>,
}

#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

pub const PART_TYPE: &str = "part";

impl Arena {
    pub fn new() -> Arena {
        Arena::default()
    }

    fn insert(&mut self, entity: Entity) -> Handle {
        let kind = entity.kind;
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.entity = Some(entity);
        slot.usings = 0;
        Handle {
            index,
            generation: slot.generation,
            kind,
        }
    }

    /// Create a part in `group`. Parts in the same group can reach each other.
    pub fn spawn_part(&mut self, group: u32) -> Handle {
        self.insert(Entity {
            kind: EntityKind::Part,
            type_name: PART_TYPE.into(),
            group,
            parent: None,
            components: vec![],
            data: Data::None,
        })
    }

    /// Create a component of `type_name` on a live part.
    pub fn attach(&mut self, part: Handle, type_name: &str, data: Data) -> Result<Handle> {
        let group = match self.get(part) {
            Some(entity) if entity.kind == EntityKind::Part => entity.group,
            _ => return Err(error!(NullParameter; "PART DOES NOT EXIST")),
        };
        let handle = self.insert(Entity {
            kind: EntityKind::Component,
            type_name: type_name.into(),
            group,
            parent: Some(part),
            components: vec![],
            data,
        });
        if let Some(entity) = self.get_mut(part) {
            entity.components.push(handle);
        }
        Ok(handle)
    }

    /// Destroy an entity and, for a part, all of its components.
    pub fn destroy(&mut self, handle: Handle) {
        let mut entity = match self.slot_mut(handle) {
            Some(slot) => match slot.entity.take() {
                Some(entity) => entity,
                None => return,
            },
            None => return,
        };
        log::debug!("destroyed {} {}", entity.type_name, handle.index);
        if let Data::Memory(device) = &mut entity.data {
            for index in 0..device.size() {
                if let Ok(Some(val)) = device.clear(index as i64) {
                    self.release_val(&val);
                }
            }
        }
        for component in entity.components {
            self.destroy(component);
        }
        self.recycle_if_unused(handle.index);
    }

    pub fn retain(&mut self, handle: Handle) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.usings += 1;
        }
    }

    pub fn release(&mut self, handle: Handle) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.usings = slot.usings.saturating_sub(1);
        } else {
            return;
        }
        self.recycle_if_unused(handle.index);
    }

    /// Release the usage held by `val` if it is an entity.
    pub fn release_val(&mut self, val: &Val) {
        if let Val::Entity(handle) = val {
            self.release(*handle);
        }
    }

    pub fn retain_val(&mut self, val: &Val) {
        if let Val::Entity(handle) = val {
            self.retain(*handle);
        }
    }

    fn recycle_if_unused(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.entity.is_none() && slot.usings == 0 && !self.free.contains(&index) {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index);
        }
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        match self.slots.get_mut(handle.index) {
            Some(slot) if slot.generation == handle.generation => Some(slot),
            _ => None,
        }
    }

    pub fn usings(&self, handle: Handle) -> usize {
        match self.slots.get(handle.index) {
            Some(slot) if slot.generation == handle.generation => slot.usings,
            _ => 0,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&Entity> {
        match self.slots.get(handle.index) {
            Some(slot) if slot.generation == handle.generation => slot.entity.as_ref(),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        self.slot_mut(handle).and_then(|slot| slot.entity.as_mut())
    }

    pub fn group(&self, handle: Handle) -> Option<u32> {
        self.get(handle).map(|entity| entity.group)
    }

    /// The `index`th component of `type_name` on a part.
    pub fn component(&self, part: Handle, type_name: &str, index: usize) -> Option<Handle> {
        self.components(part, type_name).into_iter().nth(index)
    }

    pub fn components(&self, part: Handle, type_name: &str) -> Vec<Handle> {
        match self.get(part) {
            Some(entity) => entity
                .components
                .iter()
                .copied()
                .filter(|c| match self.get(*c) {
                    Some(component) => &*component.type_name == type_name,
                    None => false,
                })
                .collect(),
            None => vec![],
        }
    }

    pub fn memory(&self, handle: Handle) -> Option<&MemoryDevice> {
        match self.get(handle).map(|entity| &entity.data) {
            Some(Data::Memory(device)) => Some(device),
            _ => None,
        }
    }

    pub fn memory_mut(&mut self, handle: Handle) -> Option<&mut MemoryDevice> {
        match self.get_mut(handle).map(|entity| &mut entity.data) {
            Some(Data::Memory(device)) => Some(device),
            _ => None,
        }
    }

    /// Clear dead entity handles out of every memory component.
    pub fn sweep_memory(&mut self) -> usize {
        let mut removed = vec![];
        for index in 0..self.slots.len() {
            let mut device = match &mut self.slots[index].entity {
                Some(Entity {
                    data: Data::Memory(device),
                    ..
                }) => std::mem::replace(device, MemoryDevice::new(0)),
                _ => continue,
            };
            removed.append(&mut device.sweep(self));
            if let Some(Entity {
                data: Data::Memory(slot_device),
                ..
            }) = &mut self.slots[index].entity
            {
                *slot_device = device;
            }
        }
        for val in &removed {
            self.release_val(val);
        }
        removed.len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Lookup for Arena {
    fn resolve(&self, id: usize) -> Option<Handle> {
        let slot = self.slots.get(id)?;
        let entity = slot.entity.as_ref()?;
        Some(Handle {
            index: id,
            generation: slot.generation,
            kind: entity.kind,
        })
    }

    fn is_alive(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_waits_for_usings() {
        let mut arena = Arena::new();
        let part = arena.spawn_part(1);
        arena.retain(part);
        arena.destroy(part);
        assert!(!arena.is_alive(part));
        assert_eq!(arena.usings(part), 1);
        let other = arena.spawn_part(1);
        assert_ne!(other.id(), part.id());
        arena.release(part);
        let reused = arena.spawn_part(1);
        assert_eq!(reused.id(), part.id());
        assert_ne!(reused, part);
        assert!(!arena.is_alive(part));
        assert!(arena.is_alive(reused));
    }

    #[test]
    fn test_components() {
        let mut arena = Arena::new();
        let part = arena.spawn_part(3);
        let a = arena.attach(part, "memory", Data::Memory(MemoryDevice::new(4))).unwrap();
        let _ = arena.attach(part, "engine", Data::None).unwrap();
        let b = arena.attach(part, "memory", Data::Memory(MemoryDevice::new(2))).unwrap();
        assert_eq!(arena.component(part, "memory", 0), Some(a));
        assert_eq!(arena.component(part, "memory", 1), Some(b));
        assert_eq!(arena.component(part, "memory", 2), None);
        assert_eq!(arena.group(b), Some(3));
        assert_eq!(arena.memory(b).map(|m| m.size()), Some(2));
        arena.destroy(part);
        assert!(!arena.is_alive(a));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_resolve() {
        let mut arena = Arena::new();
        let part = arena.spawn_part(0);
        assert_eq!(arena.resolve(part.id()), Some(part));
        arena.destroy(part);
        assert_eq!(arena.resolve(part.id()), None);
    }

    #[test]
    fn test_sweep_memory_releases() {
        let mut arena = Arena::new();
        let holder = arena.spawn_part(0);
        let mem = arena.attach(holder, "memory", Data::Memory(MemoryDevice::new(3))).unwrap();
        let target = arena.spawn_part(0);
        arena.retain(target);
        if let Some(device) = arena.memory_mut(mem) {
            device.set(1, Val::Entity(target)).unwrap();
        }
        arena.destroy(target);
        assert_eq!(arena.sweep_memory(), 1);
        assert_eq!(arena.usings(target), 0);
        assert_eq!(arena.memory(mem).map(|m| m.free_count()), Some(3));
    }

    #[test]
    fn test_destroy_memory_releases_slots() {
        let mut arena = Arena::new();
        let holder = arena.spawn_part(0);
        let mem = arena.attach(holder, "memory", Data::Memory(MemoryDevice::new(2))).unwrap();
        let target = arena.spawn_part(0);
        arena.memory_mut(mem).unwrap().set(0, Val::Entity(target)).unwrap();
        arena.retain(target);
        assert_eq!(arena.usings(target), 1);
        arena.destroy(holder);
        assert_eq!(arena.usings(target), 0);
        arena.destroy(target);
        let reused = arena.spawn_part(0);
        assert_eq!(reused.id(), target.id());
        assert_ne!(reused, target);
    }
}
