use super::{Arena, DataKind, Handle, Lookup, MemoryDevice, Val, PART_TYPE};
use crate::error;
use crate::lang::Error;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Component type of the built-in memory device.
pub const MEMORY_TYPE: &str = "memory";

/// ## Method registry
///
/// Maps `(entity type, method name)` to a typed method. Hosts add their
/// own component types with [`Registry::register`]. Nothing is discovered
/// at run time; a method exists only if it was registered.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    Kind(DataKind),
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Returns {
    Nothing,
    Kind(DataKind),
    /// Whatever the call produces, which may be nothing.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub returns: Returns,
}

pub type Invoke = fn(&mut Arena, Handle, &[Val]) -> Result<Option<Val>>;

#[derive(Clone)]
pub struct Method {
    name: Rc<str>,
    signature: Signature,
    invoke: Invoke,
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.name, self.signature)
    }
}

impl Method {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Check argument shapes then call. Integers are accepted for floats.
    pub fn invoke(&self, arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
        if args.len() != self.signature.params.len() {
            return Err(error!(InvalidOperand; format!("{} ARGUMENT COUNT", self.name)));
        }
        let mut checked = Vec::with_capacity(args.len());
        for (i, (arg, param)) in args.iter().zip(&self.signature.params).enumerate() {
            let arg = match (param, arg) {
                (Param::Any, v) => v.clone(),
                (Param::Kind(DataKind::Float), Val::Int(n)) => Val::Float(*n as f64),
                (Param::Kind(kind), v) if DataKind::of(v) == *kind => v.clone(),
                (Param::Kind(kind), v) => {
                    return Err(error!(InvalidOperand; format!(
                        "ARGUMENT {} OF {} IS {}, NOT {}",
                        i,
                        self.name,
                        DataKind::of(v),
                        kind
                    )))
                }
            };
            checked.push(arg);
        }
        (self.invoke)(arena, target, &checked)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    types: HashSet<Rc<str>>,
    methods: HashMap<(Rc<str>, Rc<str>), Method>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Part methods and the memory component.
    pub fn with_builtins() -> Registry {
        use DataKind::*;
        let mut reg = Registry::new();
        reg.register(PART_TYPE, "id", vec![], Returns::Kind(Int), part_id);
        reg.register(
            PART_TYPE,
            "get_component",
            vec![Param::Kind(Str), Param::Kind(Int)],
            Returns::Kind(ComponentRef),
            part_get_component,
        );
        reg.register(
            PART_TYPE,
            "component_count",
            vec![Param::Kind(Str)],
            Returns::Kind(Int),
            part_component_count,
        );

        reg.register(MEMORY_TYPE, "size", vec![], Returns::Kind(Int), memory_size);
        reg.register(MEMORY_TYPE, "free_count", vec![], Returns::Kind(Int), memory_free_count);
        reg.register(MEMORY_TYPE, "first_free", vec![], Returns::Kind(Int), memory_first_free);
        reg.register(MEMORY_TYPE, "last_free", vec![], Returns::Kind(Int), memory_last_free);
        reg.register(
            MEMORY_TYPE,
            "is_null",
            vec![Param::Kind(Int)],
            Returns::Kind(Bool),
            memory_is_null,
        );
        reg.register(
            MEMORY_TYPE,
            "get_type",
            vec![Param::Kind(Int)],
            Returns::Kind(Int),
            memory_get_type,
        );
        reg.register(
            MEMORY_TYPE,
            "get_value",
            vec![Param::Kind(Int)],
            Returns::Dynamic,
            memory_get_value,
        );
        reg.register(
            MEMORY_TYPE,
            "set_value",
            vec![Param::Kind(Int), Param::Any],
            Returns::Nothing,
            memory_set_value,
        );
        reg.register(MEMORY_TYPE, "clear", vec![Param::Kind(Int)], Returns::Nothing, memory_clear);
        reg
    }

    pub fn register(
        &mut self,
        type_name: &str,
        method: &str,
        params: Vec<Param>,
        returns: Returns,
        invoke: Invoke,
    ) {
        let type_name: Rc<str> = type_name.into();
        let name: Rc<str> = method.into();
        self.types.insert(type_name.clone());
        let entry = Method {
            name: name.clone(),
            signature: Signature { params, returns },
            invoke,
        };
        if self.methods.insert((type_name.clone(), name), entry).is_some() {
            log::debug!("replaced method {}.{}", type_name, method);
        }
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    pub fn get(&self, type_name: &str, method: &str) -> Option<&Method> {
        self.methods.get(&(type_name.into(), method.into()))
    }
}

fn int_arg(args: &[Val], i: usize) -> Result<i64> {
    match args.get(i) {
        Some(Val::Int(n)) => Ok(*n),
        _ => Err(error!(InternalError; "EXPECTED INT ARGUMENT")),
    }
}

fn str_arg(args: &[Val], i: usize) -> Result<Rc<str>> {
    match args.get(i) {
        Some(Val::Str(s)) => Ok(s.clone()),
        _ => Err(error!(InternalError; "EXPECTED STR ARGUMENT")),
    }
}

fn part_id(_: &mut Arena, target: Handle, _: &[Val]) -> Result<Option<Val>> {
    Ok(Some(Val::Int(target.id() as i64)))
}

fn part_get_component(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let type_name = str_arg(args, 0)?;
    let index = int_arg(args, 1)?;
    if index < 0 {
        return Err(error!(AddressOutOfBounds; format!("COMPONENT INDEX {}", index)));
    }
    match arena.component(target, &type_name, index as usize) {
        Some(handle) => Ok(Some(Val::Entity(handle))),
        None => Err(error!(NullParameter; format!("NO {} COMPONENT {}", type_name, index))),
    }
}

fn part_component_count(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let type_name = str_arg(args, 0)?;
    Ok(Some(Val::Int(arena.components(target, &type_name).len() as i64)))
}

fn device(arena: &Arena, target: Handle) -> Result<&MemoryDevice> {
    match arena.memory(target) {
        Some(device) => Ok(device),
        None => Err(error!(NullParameter; "NOT A MEMORY DEVICE")),
    }
}

fn device_mut(arena: &mut Arena, target: Handle) -> Result<&mut MemoryDevice> {
    match arena.memory_mut(target) {
        Some(device) => Ok(device),
        None => Err(error!(NullParameter; "NOT A MEMORY DEVICE")),
    }
}

fn index_or_minus_one(index: Option<usize>) -> Val {
    match index {
        Some(i) => Val::Int(i as i64),
        None => Val::Int(-1),
    }
}

fn memory_size(arena: &mut Arena, target: Handle, _: &[Val]) -> Result<Option<Val>> {
    Ok(Some(Val::Int(device(arena, target)?.size() as i64)))
}

fn memory_free_count(arena: &mut Arena, target: Handle, _: &[Val]) -> Result<Option<Val>> {
    Ok(Some(Val::Int(device(arena, target)?.free_count() as i64)))
}

fn memory_first_free(arena: &mut Arena, target: Handle, _: &[Val]) -> Result<Option<Val>> {
    Ok(Some(index_or_minus_one(device(arena, target)?.first_free())))
}

fn memory_last_free(arena: &mut Arena, target: Handle, _: &[Val]) -> Result<Option<Val>> {
    Ok(Some(index_or_minus_one(device(arena, target)?.last_free())))
}

fn memory_is_null(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let index = int_arg(args, 0)?;
    let arena = &*arena;
    let null = device(arena, target)?.is_null(index, arena)?;
    Ok(Some(Val::Bool(null)))
}

fn memory_get_type(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let index = int_arg(args, 0)?;
    let arena = &*arena;
    let kind = device(arena, target)?.kind(index, arena)?;
    Ok(Some(Val::Int(kind.code())))
}

fn memory_get_value(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let index = int_arg(args, 0)?;
    let arena = &*arena;
    let device = device(arena, target)?;
    if device.is_null(index, arena)? {
        return Ok(None);
    }
    Ok(device.get(index)?.cloned())
}

fn memory_set_value(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let index = int_arg(args, 0)?;
    let val = match args.get(1) {
        Some(val) => val.clone(),
        None => return Err(error!(InternalError; "EXPECTED VALUE ARGUMENT")),
    };
    if let Val::Entity(handle) = &val {
        if !arena.is_alive(*handle) {
            return Err(error!(NullParameter; "DEAD ENTITY"));
        }
    }
    let old = device_mut(arena, target)?.set(index, val.clone())?;
    arena.retain_val(&val);
    if let Some(old) = old {
        arena.release_val(&old);
    }
    Ok(None)
}

fn memory_clear(arena: &mut Arena, target: Handle, args: &[Val]) -> Result<Option<Val>> {
    let index = int_arg(args, 0)?;
    if let Some(old) = device_mut(arena, target)?.clear(index)? {
        arena.release_val(&old);
    }
    Ok(None)
}
