/*!
## Rust Machine Module

This Rust module is the compiler and tick-driven processor for MSIPL,
together with the host world a processor runs in: the entity arena,
the method registry, the clock and the console.

*/

/// Index of a line in a compiled script.
pub type Address = usize;

mod argument;
mod clock;
mod codegen;
mod collector;
mod compile;
mod config;
mod entity;
mod expr;
mod function;
mod instruction;
mod io;
mod kind;
mod memory;
mod opcode;
mod operation;
mod processor;
mod registry;
mod stack;
mod val;
mod var;
mod world;

pub use argument::Argument;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collector::Collector;
pub use compile::compile;
pub use config::Config;
pub use entity::{Arena, Data, Entity, EntityKind, Handle, PART_TYPE};
pub use expr::Expr;
pub use function::Function;
pub use instruction::{Instruction, Signal};
pub use io::{Console, LogConsole, Transcript};
pub use kind::{DataKind, Lookup};
pub use memory::MemoryDevice;
pub use opcode::Opcode;
pub use operation::Operation;
pub use processor::{Event, Processor};
pub use registry::{Invoke, Method, Param, Registry, Returns, Signature, MEMORY_TYPE};
pub use stack::Stack;
pub use val::Val;
pub use var::{VarId, Variable, VariableStorage};
pub use world::World;

#[cfg(test)]
mod tests;
