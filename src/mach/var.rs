use super::{DataKind, Lookup, Val};
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Index of a variable within its storage. Stable for the processor's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

/// ## A typed, named slot

#[derive(Debug, Clone)]
pub struct Variable {
    name: Rc<str>,
    kind: DataKind,
    value: Option<Val>,
    readonly: bool,
    component: Option<Rc<str>>,
}

impl Variable {
    pub fn new(name: &str, kind: DataKind, readonly: bool) -> Variable {
        Variable {
            name: name.into(),
            kind,
            value: None,
            readonly,
            component: None,
        }
    }

    /// A value-kind variable starting at zero, as `var` declares them.
    pub fn zeroed(name: &str, kind: DataKind, readonly: bool) -> Variable {
        let mut var = Variable::new(name, kind, readonly);
        var.value = match kind {
            DataKind::Int => Some(Val::Int(0)),
            DataKind::Float => Some(Val::Float(0.0)),
            DataKind::Bool => Some(Val::Bool(false)),
            _ => None,
        };
        var
    }

    pub fn label(name: &str, line: usize) -> Variable {
        let mut var = Variable::new(name, DataKind::Label, true);
        var.value = Some(Val::Line(line));
        var
    }

    /// An empty component reference restricted to one component type.
    pub fn component(name: &str, type_name: &str) -> Variable {
        let mut var = Variable::new(name, DataKind::ComponentRef, false);
        var.component = Some(type_name.into());
        var
    }

    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn component_type(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn get(&self) -> Option<&Val> {
        self.value.as_ref()
    }

    /// Empty, or referencing an entity that no longer exists.
    pub fn is_null(&self, lookup: &dyn Lookup) -> bool {
        match &self.value {
            None => true,
            Some(Val::Entity(h)) => !lookup.is_alive(*h),
            Some(_) => false,
        }
    }

    /// Store a value of exactly this variable's kind, returning the old one.
    /// A mismatched value is a defect in the caller and is refused.
    pub fn set(&mut self, val: Val) -> Result<Option<Val>> {
        let kind = DataKind::of(&val);
        if kind != self.kind {
            log::error!(
                "refused {} value {} for {} variable {}",
                kind,
                val,
                self.kind,
                self.name
            );
            return Err(error!(InternalError; format!("{} IS NOT {}", self.name, kind)));
        }
        Ok(self.value.replace(val))
    }

    pub fn clear(&mut self) -> Option<Val> {
        self.value.take()
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = if self.readonly {
            format!("{{{}}}", self.name)
        } else {
            self.name.to_string()
        };
        match &self.value {
            Some(val) => write!(f, "{} {} = {}", self.kind, name, val),
            None => write!(f, "{} {} = NULL", self.kind, name),
        }
    }
}

/// ## Variable storage
///
/// Names are unique and the table never shrinks.

#[derive(Debug)]
pub struct VariableStorage {
    vars: Vec<Variable>,
    names: HashMap<Rc<str>, VarId>,
    max_count: usize,
}

impl VariableStorage {
    pub fn new(max_count: usize) -> VariableStorage {
        VariableStorage {
            vars: vec![],
            names: HashMap::new(),
            max_count,
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn add(&mut self, var: Variable) -> Result<VarId> {
        if self.exists(var.name()) {
            return Err(error!(Redeclared; var.name().to_string()));
        }
        if self.vars.len() >= self.max_count {
            return Err(error!(TooManyVariables; var.name().to_string()));
        }
        let id = VarId(self.vars.len());
        self.names.insert(var.name().clone(), id);
        self.vars.push(var);
        Ok(id)
    }

    /// Insert unless the name is taken or the table is full. Never overwrites.
    pub fn try_add(&mut self, var: Variable) -> bool {
        self.add(var).is_ok()
    }

    pub fn id(&self, name: &str) -> Result<VarId> {
        match self.names.get(name) {
            Some(id) => Ok(*id),
            None => Err(error!(UndefinedVariable; name)),
        }
    }

    pub fn handle(&self, name: &str) -> Result<&Variable> {
        let id = self.id(name)?;
        Ok(self.get(id))
    }

    pub fn get(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.vars[id.0]
    }

    pub fn value(&self, name: &str) -> Option<Val> {
        match self.names.get(name) {
            Some(id) => self.get(*id).get().cloned(),
            None => {
                log::error!("no variable named {}", name);
                None
            }
        }
    }

    /// Assign by name. A missing name is logged and ignored.
    pub fn set_value(&mut self, name: &str, val: Val) -> Result<Option<Val>> {
        match self.names.get(name) {
            Some(id) => {
                let id = *id;
                self.get_mut(id).set(val)
            }
            None => {
                log::error!("no variable named {}", name);
                Ok(None)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars.iter().enumerate().map(|(i, v)| (VarId(i), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.vars.len()).map(VarId)
    }
}

impl std::fmt::Display for VariableStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for var in &self.vars {
            writeln!(f, "{}", var)?;
        }
        Ok(())
    }
}
