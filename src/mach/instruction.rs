use super::{Address, Argument, DataKind, Handle, MemoryDevice, Processor, Val, VarId, World};
use crate::error;
use crate::lang::Error;
use std::cell::Cell;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction set
///
/// One compiled script line. Instructions are immutable once compiled;
/// the only exception is the first-run flag a `var` keeps for the legacy
/// assign-once mode.

#[derive(Debug)]
pub enum Instruction {
    Var { assign: Assign, done: Cell<bool> },
    Set(Assign),
    Jump { target: Address, condition: Argument },
    Label,
    Stop,
    Time(TimeOp),
    Console(ConsoleOp),
    Memory(MemoryOp),
    Comp(CompOp),
}

/// How the processor continues after an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Advance and consume one unit of the tick budget.
    Normal,
    /// Advance without consuming budget.
    NoCount,
    /// Continue at the address, consuming one unit.
    Jump(Address),
}

/// Evaluate a source operand, convert it to the destination's kind, store it.
#[derive(Debug)]
pub struct Assign {
    dest: VarId,
    source: Argument,
}

impl Assign {
    pub fn new(dest: VarId, source: Argument) -> Assign {
        Assign { dest, source }
    }

    fn run(&self, processor: &mut Processor, world: &mut World) -> Result<()> {
        let kind = processor.vars.get(self.dest).kind();
        let val = self.source.value(&processor.vars, &world.arena)?;
        let val = kind.convert(&val, &world.arena)?;
        processor.store(world, self.dest, val)
    }
}

#[derive(Debug)]
pub enum TimeOp {
    FramesSinceLaunch(VarId),
    SecondsSinceLaunch(VarId),
    DeltaTime(VarId),
    Wait(Argument),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stream {
    In,
    Out,
}

#[derive(Debug)]
pub enum ConsoleOp {
    Read,
    Write,
    /// `Char` pops one character code, `Variable` pops a number.
    Pop(Argument),
    CanPop { probe: Argument, dest: VarId },
    Push(Vec<Argument>),
    Clear(Stream),
    Filter,
}

#[derive(Debug)]
pub enum MemoryTarget {
    Local,
    Component(VarId),
}

#[derive(Debug)]
pub enum MemoryAction {
    Get { addr: Argument, dest: VarId },
    GetType { addr: Argument, dest: VarId },
    IsNull { addr: Argument, dest: VarId },
    Set { addr: Argument, value: Argument },
    Clear { addr: Argument },
}

#[derive(Debug)]
pub struct MemoryOp {
    pub target: MemoryTarget,
    pub action: MemoryAction,
}

#[derive(Debug)]
pub enum CompOp {
    /// Declared at compile time; nothing to do when run.
    Create,
    Call {
        target: VarId,
        method: Rc<str>,
        args: Vec<Argument>,
        ret: Option<VarId>,
    },
}

impl Instruction {
    pub fn execute(&self, processor: &mut Processor, world: &mut World) -> Result<Signal> {
        match self {
            Instruction::Var { assign, done } => {
                if processor.config.legacy_var && done.get() {
                    return Ok(Signal::Normal);
                }
                assign.run(processor, world)?;
                done.set(true);
                Ok(Signal::Normal)
            }
            Instruction::Set(assign) => {
                assign.run(processor, world)?;
                Ok(Signal::Normal)
            }
            Instruction::Jump { target, condition } => {
                match condition.value(&processor.vars, &world.arena)? {
                    Val::Bool(true) => Ok(Signal::Jump(*target)),
                    Val::Bool(false) => Ok(Signal::Normal),
                    v => Err(error!(InvalidCondition; format!("{} IS NOT BOOL", v))),
                }
            }
            Instruction::Label => Ok(Signal::NoCount),
            Instruction::Stop => {
                processor.enabled = false;
                Ok(Signal::Normal)
            }
            Instruction::Time(op) => op.execute(processor, world),
            Instruction::Console(op) => op.execute(processor, world),
            Instruction::Memory(op) => op.execute(processor, world),
            Instruction::Comp(op) => op.execute(processor, world),
        }
    }
}

impl TimeOp {
    fn execute(&self, processor: &mut Processor, world: &mut World) -> Result<Signal> {
        let (dest, val) = match self {
            TimeOp::FramesSinceLaunch(dest) => (dest, Val::Int(processor.frames)),
            TimeOp::SecondsSinceLaunch(dest) => {
                (dest, Val::Float(world.clock().seconds() - processor.launch))
            }
            TimeOp::DeltaTime(dest) => (dest, Val::Float(world.clock().delta())),
            TimeOp::Wait(arg) => {
                let ticks = match arg.value(&processor.vars, &world.arena)? {
                    Val::Int(n) => n,
                    Val::Float(n) if n.is_finite() && n.fract() == 0.0 => n as i64,
                    v => return Err(error!(InvalidWait; format!("{}", v))),
                };
                if ticks < 0 || ticks > u32::MAX as i64 {
                    return Err(error!(InvalidWait; format!("{}", ticks)));
                }
                processor.delay = processor.delay.saturating_add(ticks as u32);
                return Ok(Signal::Normal);
            }
        };
        let kind = processor.vars.get(*dest).kind();
        let val = kind.convert(&val, &world.arena)?;
        processor.store(world, *dest, val)?;
        Ok(Signal::Normal)
    }
}

/// The first run of digits in `input`, with one decimal point when
/// `point` is set. Returns the number text and the index just past it.
pub fn find_number(input: &str, point: bool) -> Option<(&str, usize)> {
    let start = input.find(|c: char| c.is_ascii_digit())?;
    let mut point = point;
    let mut end = input.len();
    for (i, c) in input[start..].char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        if c == '.' && point {
            point = false;
            continue;
        }
        end = start + i;
        break;
    }
    Some((&input[start..end], end))
}

impl ConsoleOp {
    fn execute(&self, processor: &mut Processor, world: &mut World) -> Result<Signal> {
        match self {
            ConsoleOp::Read => {
                let text = world.console().read();
                processor.input.push_str(&text);
            }
            ConsoleOp::Write => {
                let text = processor.output.clone();
                world.console().write(&text);
            }
            ConsoleOp::Pop(Argument::Char(dest)) => {
                let ch = match processor.input.chars().next() {
                    Some(ch) => ch,
                    None => return Err(error!(InputEmpty)),
                };
                processor.store(world, *dest, Val::Int(ch as i64))?;
                processor.input.drain(..ch.len_utf8());
            }
            ConsoleOp::Pop(Argument::Variable(dest)) => {
                if processor.input.is_empty() {
                    return Err(error!(InputEmpty));
                }
                let kind = processor.vars.get(*dest).kind();
                let (val, end) = match find_number(&processor.input, kind == DataKind::Float) {
                    Some((text, end)) => match text.parse::<i64>() {
                        Ok(n) => (Val::Int(n), end),
                        Err(_) => match text.parse::<f64>() {
                            Ok(n) => (Val::Float(n), end),
                            Err(_) => return Err(error!(NumberNotFound; text)),
                        },
                    },
                    None => return Err(error!(NumberNotFound)),
                };
                let val = kind.convert(&val, &world.arena)?;
                processor.store(world, *dest, val)?;
                processor.input.drain(..end);
            }
            ConsoleOp::Pop(_) => return Err(error!(InternalError; "POP TARGET")),
            ConsoleOp::CanPop { probe, dest } => {
                let ready = match probe {
                    Argument::Char(_) => !processor.input.is_empty(),
                    Argument::Variable(id) => {
                        let point = processor.vars.get(*id).kind() == DataKind::Float;
                        find_number(&processor.input, point).is_some()
                    }
                    _ => return Err(error!(InternalError; "CAN_POP PROBE")),
                };
                processor.store(world, *dest, Val::Bool(ready))?;
            }
            ConsoleOp::Push(args) => {
                let mut text = String::new();
                for arg in args {
                    text.push_str(&arg.value(&processor.vars, &world.arena)?.render());
                }
                processor.output.push_str(&text);
            }
            ConsoleOp::Clear(Stream::In) => processor.input.clear(),
            ConsoleOp::Clear(Stream::Out) => processor.output.clear(),
            ConsoleOp::Filter => return Err(error!(NotSupported; "FILTER")),
        }
        Ok(Signal::Normal)
    }
}

fn address(arg: &Argument, processor: &Processor, world: &World) -> Result<i64> {
    match arg.value(&processor.vars, &world.arena)? {
        Val::Int(n) => Ok(n),
        Val::Float(n) => match DataKind::Int.convert(&Val::Float(n), &world.arena)? {
            Val::Int(n) => Ok(n),
            _ => Err(error!(InternalError)),
        },
        v => Err(error!(InvalidOperand; format!("ADDRESS {}", v))),
    }
}

impl MemoryOp {
    fn device<'a>(
        &self,
        processor: &'a Processor,
        world: &'a World,
        handle: Option<Handle>,
    ) -> Result<&'a MemoryDevice> {
        match handle {
            None => Ok(&processor.memory),
            Some(h) => match world.arena.memory(h) {
                Some(device) => Ok(device),
                None => Err(error!(NullParameter; "NOT A MEMORY DEVICE")),
            },
        }
    }

    fn execute(&self, processor: &mut Processor, world: &mut World) -> Result<Signal> {
        let handle = match self.target {
            MemoryTarget::Local => None,
            MemoryTarget::Component(id) => Some(processor.reach(world, id)?),
        };
        match &self.action {
            MemoryAction::Get { addr, dest } => {
                let index = address(addr, processor, world)?;
                let device = self.device(processor, world, handle)?;
                if device.is_null(index, &world.arena)? {
                    return Err(error!(NullParameter; format!("MEMORY {}", index)));
                }
                let val = match device.get(index)? {
                    Some(val) => val.clone(),
                    None => return Err(error!(NullParameter; format!("MEMORY {}", index))),
                };
                let kind = processor.vars.get(*dest).kind();
                let val = kind.convert(&val, &world.arena)?;
                processor.store(world, *dest, val)?;
            }
            MemoryAction::GetType { addr, dest } => {
                let index = address(addr, processor, world)?;
                let kind = self.device(processor, world, handle)?.kind(index, &world.arena)?;
                processor.store(world, *dest, Val::Int(kind.code()))?;
            }
            MemoryAction::IsNull { addr, dest } => {
                let index = address(addr, processor, world)?;
                let null = self.device(processor, world, handle)?.is_null(index, &world.arena)?;
                processor.store(world, *dest, Val::Bool(null))?;
            }
            MemoryAction::Set { addr, value } => {
                let index = address(addr, processor, world)?;
                let val = value.value(&processor.vars, &world.arena)?;
                let old = match handle {
                    None => processor.memory.set(index, val.clone())?,
                    Some(h) => match world.arena.memory_mut(h) {
                        Some(device) => device.set(index, val.clone())?,
                        None => return Err(error!(NullParameter; "NOT A MEMORY DEVICE")),
                    },
                };
                world.arena.retain_val(&val);
                if let Some(old) = old {
                    world.arena.release_val(&old);
                }
            }
            MemoryAction::Clear { addr } => {
                let index = address(addr, processor, world)?;
                let old = match handle {
                    None => processor.memory.clear(index)?,
                    Some(h) => match world.arena.memory_mut(h) {
                        Some(device) => device.clear(index)?,
                        None => return Err(error!(NullParameter; "NOT A MEMORY DEVICE")),
                    },
                };
                if let Some(old) = old {
                    world.arena.release_val(&old);
                }
            }
        }
        Ok(Signal::Normal)
    }
}

impl CompOp {
    fn execute(&self, processor: &mut Processor, world: &mut World) -> Result<Signal> {
        let (target, method, args, ret) = match self {
            CompOp::Create => return Ok(Signal::Normal),
            CompOp::Call {
                target,
                method,
                args,
                ret,
            } => (target, method, args, ret),
        };
        let handle = processor.reach(world, *target)?;
        let type_name = match world.arena.get(handle) {
            Some(entity) => entity.type_name.clone(),
            None => return Err(error!(NullParameter)),
        };
        let mut vals = Vec::with_capacity(args.len());
        for arg in args {
            vals.push(arg.value(&processor.vars, &world.arena)?);
        }
        let found = match world.registry.get(&type_name, method) {
            Some(found) => found,
            None => {
                return Err(error!(NotSupported; format!("{}.{}", type_name, method)));
            }
        };
        log::trace!("calling {}.{}", type_name, found.name());
        let result = found.invoke(&mut world.arena, handle, &vals)?;
        let dest = match ret {
            Some(dest) => *dest,
            None => return Ok(Signal::Normal),
        };
        let val = match result {
            Some(val) => val,
            None => return Err(error!(NoReturnValue; method.to_string())),
        };
        let kind = processor.vars.get(dest).kind();
        let val = kind.convert(&val, &world.arena)?;
        processor.store(world, dest, val)?;
        Ok(Signal::Normal)
    }
}
