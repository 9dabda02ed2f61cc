use super::compile::compile;
use super::instruction::{Instruction, Signal};
use super::{Address, Arena, Config, DataKind, Handle, Lookup, MemoryDevice, Val, VarId};
use super::{Variable, VariableStorage, World};
use crate::error;
use crate::lang::{check_name, Error};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// What a processor did, or why it did nothing, on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Running,
    /// Suspended by `wait`; the count is the number of ticks still to skip.
    Waiting(u32),
    /// Disabled by `stop`, by the host, or never loaded.
    Stopped,
    Completed,
    /// A compile or run-time error. Permanent.
    Halted,
}

/// ## Script processor
///
/// Owns a compiled script, its variables and a local memory device.
/// The host calls [`Processor::tick`] once per frame. Each tick runs at
/// most `instructions_per_tick` counted instructions. The first error
/// halts the processor for good.

pub struct Processor {
    pub(super) config: Config,
    script: Rc<[Option<Instruction>]>,
    pub(super) vars: VariableStorage,
    pub(super) memory: MemoryDevice,
    this: Option<Handle>,
    links: Vec<(Rc<str>, Handle)>,
    pc: Address,
    pub(super) delay: u32,
    pub(super) enabled: bool,
    completed: bool,
    thrown_error: bool,
    error_count: usize,
    errors: Vec<Error>,
    pub(super) input: String,
    pub(super) output: String,
    pub(super) frames: i64,
    pub(super) launch: f64,
}

impl Default for Processor {
    fn default() -> Self {
        Processor::new(Config::default())
    }
}

impl Processor {
    pub fn new(config: Config) -> Processor {
        Processor {
            script: Rc::new([]),
            vars: VariableStorage::new(config.max_variables),
            memory: MemoryDevice::new(config.memory_size),
            this: None,
            links: vec![],
            pc: 0,
            delay: 0,
            enabled: false,
            completed: false,
            thrown_error: false,
            error_count: 0,
            errors: vec![],
            input: String::new(),
            output: String::new(),
            frames: 0,
            launch: 0.0,
            config,
        }
    }

    /// Mount the processor on a part. The part is `this` to scripts.
    pub fn attach(&mut self, part: Handle) {
        self.this = Some(part);
    }

    /// Expose another part to scripts as a readonly variable.
    pub fn connect(&mut self, name: &str, part: Handle) -> Result<()> {
        let name = check_name(name)?;
        if self.links.iter().any(|(n, _)| *n == name.name) {
            return Err(error!(Redeclared; name.name.to_string()));
        }
        self.links.push((name.name, part));
        Ok(())
    }

    /// Compile `source` and make it the running program. Any previous
    /// program, its variables and local memory are dropped. Returns false,
    /// and leaves the processor halted, if there were compile errors.
    pub fn load(&mut self, source: &str, world: &mut World) -> bool {
        self.reset(&mut world.arena);
        if let Err(e) = self.declare_parts(world) {
            self.throw(e);
            return false;
        }
        let (script, errors) = compile(source, &mut self.vars, &world.registry);
        self.script = script.into();
        self.launch = world.clock().seconds();
        if !errors.is_empty() {
            for error in &errors {
                log::error!("{}", error);
            }
            self.error_count += errors.len();
            self.errors.extend(errors);
            self.thrown_error = true;
            return false;
        }
        log::debug!(
            "loaded {} lines, {} variables",
            self.script.len(),
            self.vars.len()
        );
        self.enabled = true;
        true
    }

    fn reset(&mut self, arena: &mut Arena) {
        for (_, var) in self.vars.iter() {
            if let Some(val) = var.get() {
                arena.release_val(val);
            }
        }
        for index in 0..self.memory.size() {
            if let Ok(Some(val)) = self.memory.clear(index as i64) {
                arena.release_val(&val);
            }
        }
        self.vars = VariableStorage::new(self.config.max_variables);
        self.memory = MemoryDevice::new(self.config.memory_size);
        self.script = Rc::new([]);
        self.pc = 0;
        self.delay = 0;
        self.enabled = false;
        self.completed = false;
        self.thrown_error = false;
        self.errors.clear();
        self.input.clear();
        self.output.clear();
        self.frames = 0;
    }

    fn declare_parts(&mut self, world: &mut World) -> Result<()> {
        let mut parts: Vec<(Rc<str>, Handle)> = self.links.clone();
        if let Some(this) = self.this {
            parts.insert(0, ("this".into(), this));
        }
        for (name, part) in parts {
            if !world.arena.is_alive(part) || !part.is_part() {
                return Err(error!(NullParameter; format!("PART {}", name)));
            }
            let id = self.vars.add(Variable::new(&name, DataKind::PartRef, true))?;
            self.store(world, id, Val::Entity(part))?;
        }
        Ok(())
    }

    /// Run one host frame.
    pub fn tick(&mut self, world: &mut World) -> Event {
        self.frames += 1;
        match self.status() {
            Event::Running | Event::Waiting(_) => {}
            event => return event,
        }
        if self.delay > 0 {
            self.delay -= 1;
            return Event::Waiting(self.delay);
        }
        self.execute(world);
        self.status()
    }

    pub fn status(&self) -> Event {
        if self.thrown_error {
            Event::Halted
        } else if self.completed {
            Event::Completed
        } else if !self.enabled {
            Event::Stopped
        } else if self.delay > 0 {
            Event::Waiting(self.delay)
        } else {
            Event::Running
        }
    }

    fn execute(&mut self, world: &mut World) {
        let script = Rc::clone(&self.script);
        let mut budget = self.config.instructions_per_tick;
        while budget > 0 {
            let instruction = match script.get(self.pc) {
                Some(Some(instruction)) => instruction,
                Some(None) => {
                    self.throw(error!(MissingInstruction));
                    return;
                }
                None => {
                    log::debug!("completed after {} frames", self.frames);
                    self.completed = true;
                    return;
                }
            };
            log::trace!("line {}: {:?}", self.pc, instruction);
            let result = match instruction.execute(self, world) {
                Ok(Signal::Normal) => {
                    budget -= 1;
                    self.pc += 1;
                    Ok(())
                }
                Ok(Signal::NoCount) => {
                    self.pc += 1;
                    Ok(())
                }
                Ok(Signal::Jump(target)) => {
                    budget -= 1;
                    self.jump(&script, target, world)
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                self.throw(e);
                return;
            }
            if self.pc >= script.len() {
                log::debug!("completed after {} frames", self.frames);
                self.completed = true;
                return;
            }
            if !self.enabled || self.delay > 0 {
                return;
            }
        }
        if self.pc >= script.len() {
            self.completed = true;
        }
    }

    fn jump(
        &mut self,
        script: &[Option<Instruction>],
        target: Address,
        world: &mut World,
    ) -> Result<()> {
        if target > script.len() {
            return Err(error!(InvalidJump; format!("LINE {}", target)));
        }
        self.pc = target;
        if !self.config.legacy_jump {
            return Ok(());
        }
        let instruction = match script.get(target) {
            Some(Some(instruction)) => instruction,
            Some(None) => return Err(error!(MissingInstruction)),
            None => return Ok(()),
        };
        match instruction.execute(self, world)? {
            Signal::Normal | Signal::NoCount => self.pc += 1,
            Signal::Jump(next) if next > script.len() => {
                return Err(error!(InvalidJump; format!("LINE {}", next)));
            }
            Signal::Jump(next) => self.pc = next,
        }
        Ok(())
    }

    fn throw(&mut self, error: Error) {
        let error = error.in_line_number(Some(self.pc));
        log::error!("{}", error);
        self.thrown_error = true;
        self.enabled = false;
        self.error_count += 1;
        self.errors.push(error);
    }

    /// Disable from the host side. The program does not resume.
    pub fn interrupt(&mut self) {
        if self.enabled {
            log::info!("interrupted at line {}", self.pc);
        }
        self.enabled = false;
    }

    /// Store into a variable, keeping entity usage counts balanced.
    pub(super) fn store(&mut self, world: &mut World, id: VarId, val: Val) -> Result<()> {
        if let (Some(wanted), Val::Entity(h)) = (self.vars.get(id).component_type(), &val) {
            let actual = world.arena.get(*h).map(|e| e.type_name.clone());
            if actual.as_deref() != Some(wanted) {
                return Err(error!(ConversionError; format!("{} IS NOT {}", val, wanted)));
            }
        }
        let handle = val.as_entity();
        let old = self.vars.get_mut(id).set(val)?;
        if let Some(h) = handle {
            world.arena.retain(h);
        }
        if let Some(old) = old {
            world.arena.release_val(&old);
        }
        Ok(())
    }

    /// Live handle held by an entity variable that this processor may call.
    pub(super) fn reach(&self, world: &World, id: VarId) -> Result<Handle> {
        let var = self.vars.get(id);
        let handle = match var.get().and_then(Val::as_entity) {
            Some(h) if world.arena.is_alive(h) => h,
            _ => return Err(error!(NullParameter; var.name().to_string())),
        };
        let this = match self.this {
            Some(this) => this,
            None => return Err(error!(PermissionDenied; "NOT ATTACHED TO A PART")),
        };
        if !world.can_connect(this, handle) {
            return Err(error!(PermissionDenied; var.name().to_string()));
        }
        Ok(handle)
    }

    /// Null every reference to a dead entity, in variables and local
    /// memory. Returns how many were dropped.
    pub fn sweep(&mut self, arena: &mut Arena) -> usize {
        let mut dropped = vec![];
        let ids: Vec<VarId> = self.vars.ids().collect();
        for id in ids {
            let var = self.vars.get_mut(id);
            let dead = matches!(var.get(), Some(Val::Entity(h)) if !arena.is_alive(*h));
            if dead {
                dropped.extend(var.clear());
            }
        }
        dropped.extend(self.memory.sweep(&*arena));
        for val in &dropped {
            arena.release_val(val);
        }
        dropped.len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn has_thrown(&self) -> bool {
        self.thrown_error
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn current_line(&self) -> Address {
        self.pc
    }

    pub fn frames_since_launch(&self) -> i64 {
        self.frames
    }

    pub fn variables(&self) -> &VariableStorage {
        &self.vars
    }

    pub fn value(&self, name: &str) -> Option<Val> {
        self.vars.value(name)
    }

    pub fn memory(&self) -> &MemoryDevice {
        &self.memory
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn feed_input(&mut self, text: &str) {
        self.input.push_str(text);
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("pc", &self.pc)
            .field("status", &self.status())
            .field("lines", &self.script.len())
            .field("variables", &self.vars.len())
            .finish()
    }
}
