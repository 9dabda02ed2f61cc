use super::instruction::{
    Assign, CompOp, ConsoleOp, Instruction, MemoryAction, MemoryOp, MemoryTarget, Stream, TimeOp,
};
use super::{Argument, DataKind, Registry, Returns, VarId, Variable, VariableStorage};
use super::{MEMORY_TYPE, PART_TYPE};
use crate::error;
use crate::lang::{check_name, Call, Error, Line};
use std::cell::Cell;

type Result<T> = std::result::Result<T, Error>;

/// ## Script compiler
///
/// Comment lines are dropped. Every other line keeps one slot in the
/// script, labels included, so a line index is also a jump address.
///
/// The first pass binds each label to the index of the next line that is
/// not a label. The second pass builds one instruction per line. A line
/// that fails leaves `None` in its slot and compilation carries on, so a
/// single run reports every bad line. Errors carry their script index.

pub fn compile(
    source: &str,
    vars: &mut VariableStorage,
    registry: &Registry,
) -> (Vec<Option<Instruction>>, Vec<Error>) {
    let lines: Vec<Line> = source
        .split('\n')
        .map(Line::new)
        .filter(|line| !line.is_comment())
        .collect();
    let mut errors = vec![];

    let mut bad_labels = vec![false; lines.len()];
    let mut pending: Vec<(usize, &str)> = vec![];
    for (index, line) in lines.iter().enumerate() {
        if line.is_label() {
            pending.push((index, line.as_str()));
        } else {
            bind_labels(&mut pending, index, vars, &mut bad_labels, &mut errors);
        }
    }
    bind_labels(&mut pending, lines.len(), vars, &mut bad_labels, &mut errors);

    let mut compiler = Compiler { vars, registry };
    let mut script = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        if line.is_label() {
            script.push(if bad_labels[index] {
                None
            } else {
                Some(Instruction::Label)
            });
            continue;
        }
        match compiler.instruction(line) {
            Ok(instruction) => script.push(Some(instruction)),
            Err(e) => {
                errors.push(e.in_line_number(Some(index)));
                script.push(None);
            }
        }
    }
    errors.sort_by_key(|e| e.line_number());
    (script, errors)
}

fn bind_labels(
    pending: &mut Vec<(usize, &str)>,
    target: usize,
    vars: &mut VariableStorage,
    bad: &mut [bool],
    errors: &mut Vec<Error>,
) {
    for (index, text) in pending.drain(..) {
        let result = label_name(text).and_then(|name| vars.add(Variable::label(&name, target)));
        if let Err(e) = result {
            bad[index] = true;
            errors.push(e.in_line_number(Some(index)));
        }
    }
}

fn label_name(text: &str) -> Result<std::rc::Rc<str>> {
    let line = Line::new(text);
    let parts = line.split(2);
    match parts.as_slice() {
        ["label", name] => Ok(check_name(name)?.name),
        _ => Err(error!(SyntaxError; "LABEL <NAME>")),
    }
}

fn strip_quotes(s: &str) -> Option<&str> {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

struct Compiler<'a> {
    vars: &'a mut VariableStorage,
    registry: &'a Registry,
}

impl<'a> Compiler<'a> {
    fn instruction(&mut self, line: &Line) -> Result<Instruction> {
        match line.keyword() {
            "var" => self.r#var(&line.split(4)),
            "set" => self.r#set(&line.split(3)),
            "jump" => self.r#jump(&line.split(3)),
            "stop" if line.as_str() == "stop" => Ok(Instruction::Stop),
            "stop" => Err(error!(SyntaxError; "STOP TAKES NOTHING")),
            "time" | "console" | "memory" | "comp" => {
                let call = Call::parse(line.as_str())?;
                match call.instruction.as_str() {
                    "time" => self.r#time(&call),
                    "console" => self.r#console(&call),
                    "memory" => self.r#memory(&call),
                    _ => self.r#comp(&call),
                }
            }
            keyword => Err(error!(UnknownInstruction; keyword)),
        }
    }

    fn r#var(&mut self, parts: &[&str]) -> Result<Instruction> {
        let (word, name, source) = match parts {
            [_, word, name, source] => (*word, *name, *source),
            _ => return Err(error!(SyntaxError; "VAR <TYPE> <NAME> <VALUE>")),
        };
        let kind = DataKind::from_word(word);
        if kind == DataKind::None {
            return Err(error!(TypeMismatch; format!("UNKNOWN TYPE {}", word)));
        }
        let name = check_name(name)?;
        let source = self.source(kind, None, source)?;
        let var = if kind.is_value() {
            Variable::zeroed(&name.name, kind, name.readonly)
        } else {
            Variable::new(&name.name, kind, name.readonly)
        };
        let dest = self.vars.add(var)?;
        Ok(Instruction::Var {
            assign: Assign::new(dest, source),
            done: Cell::new(false),
        })
    }

    fn r#set(&mut self, parts: &[&str]) -> Result<Instruction> {
        let (name, source) = match parts {
            [_, name, source] => (*name, *source),
            _ => return Err(error!(SyntaxError; "SET <NAME> <VALUE>")),
        };
        let dest = self.writable(name)?;
        let var = self.vars.get(dest);
        let (kind, component) = (var.kind(), var.component_type().map(String::from));
        if !kind.is_value() && !kind.is_entity() {
            return Err(error!(TypeMismatch; format!("CANNOT SET {} {}", kind, name)));
        }
        let source = self.source(kind, component.as_deref(), source)?;
        Ok(Instruction::Set(Assign::new(dest, source)))
    }

    /// Value kinds take an expression. Entity kinds copy another
    /// variable of the same kind and component type.
    fn source(&self, kind: DataKind, component: Option<&str>, text: &str) -> Result<Argument> {
        if kind.is_value() {
            return Argument::expression(text, self.vars);
        }
        let id = self.vars.id(text)?;
        let var = self.vars.get(id);
        if var.kind() != kind || var.component_type() != component {
            return Err(error!(TypeMismatch; format!("{} IS NOT {}", text, kind)));
        }
        Ok(Argument::Variable(id))
    }

    fn r#jump(&mut self, parts: &[&str]) -> Result<Instruction> {
        let (label, condition) = match parts {
            [_, label, condition] => (*label, *condition),
            _ => return Err(error!(SyntaxError; "JUMP <LABEL> <CONDITION>")),
        };
        let var = self.vars.handle(label)?;
        let target = match (var.kind(), var.get()) {
            (DataKind::Label, Some(super::Val::Line(addr))) => *addr,
            _ => return Err(error!(TypeMismatch; format!("{} IS NOT A LABEL", label))),
        };
        let condition = Argument::expression(condition, self.vars)?;
        Ok(Instruction::Jump { target, condition })
    }

    /// A variable the instruction may assign.
    fn writable(&self, name: &str) -> Result<VarId> {
        let id = self.vars.id(name)?;
        if self.vars.get(id).is_readonly() {
            return Err(error!(ReadonlyVariable; name));
        }
        Ok(id)
    }

    fn returns(&self, call: &Call) -> Result<VarId> {
        match call.ret() {
            Some(name) => self.writable(name),
            None => Err(error!(ReturnVariable; format!("{} NEEDS A RETURN VARIABLE", call.name))),
        }
    }

    fn returns_kind(&self, call: &Call, kind: DataKind) -> Result<VarId> {
        let dest = self.returns(call)?;
        let actual = self.vars.get(dest).kind();
        if actual != kind {
            let message = format!("{} RETURNS {}, NOT {}", call.name, kind, actual);
            return Err(error!(TypeMismatch; message));
        }
        Ok(dest)
    }

    fn no_return(&self, call: &Call) -> Result<()> {
        match call.ret() {
            Some(_) => Err(error!(ReturnVariable; format!("{} RETURNS NOTHING", call.name))),
            None => Ok(()),
        }
    }

    fn arity(&self, call: &Call, count: usize) -> Result<()> {
        if call.arg_count() != count {
            return Err(error!(ArgumentCount; format!("{} TAKES {}", call.name, count)));
        }
        Ok(())
    }

    fn r#time(&mut self, call: &Call) -> Result<Instruction> {
        let op = match call.name.as_str() {
            "frames_since_launch" | "seconds_since_launch" | "delta_time" => {
                self.arity(call, 0)?;
                let dest = self.returns(call)?;
                let kind = self.vars.get(dest).kind();
                let frames = call.name == "frames_since_launch";
                if kind != DataKind::Float && !(frames && kind == DataKind::Int) {
                    return Err(error!(TypeMismatch; format!("{} CANNOT HOLD {}", kind, call.name)));
                }
                match call.name.as_str() {
                    "frames_since_launch" => TimeOp::FramesSinceLaunch(dest),
                    "seconds_since_launch" => TimeOp::SecondsSinceLaunch(dest),
                    _ => TimeOp::DeltaTime(dest),
                }
            }
            "wait" => {
                self.arity(call, 1)?;
                self.no_return(call)?;
                TimeOp::Wait(Argument::expression(&call.args[0], self.vars)?)
            }
            name => return Err(error!(UnknownFunction; format!("TIME {}", name))),
        };
        Ok(Instruction::Time(op))
    }

    /// `'name'` addresses an integer variable as a character.
    fn console_target(&self, text: &str) -> Result<(Argument, VarId)> {
        if let Some(name) = strip_quotes(text) {
            let id = self.vars.id(name)?;
            return Ok((Argument::char(name, self.vars)?, id));
        }
        let id = self.vars.id(text)?;
        let kind = self.vars.get(id).kind();
        if !kind.is_value() {
            return Err(error!(TypeMismatch; format!("{} IS {}", text, kind)));
        }
        Ok((Argument::Variable(id), id))
    }

    fn r#console(&mut self, call: &Call) -> Result<Instruction> {
        let op = match call.name.as_str() {
            "read" | "write" | "clear_in" | "clear_out" => {
                self.arity(call, 0)?;
                self.no_return(call)?;
                match call.name.as_str() {
                    "read" => ConsoleOp::Read,
                    "write" => ConsoleOp::Write,
                    "clear_in" => ConsoleOp::Clear(Stream::In),
                    _ => ConsoleOp::Clear(Stream::Out),
                }
            }
            "clear" => {
                self.arity(call, 1)?;
                self.no_return(call)?;
                match Argument::from_text(&call.args[0], self.vars)?.as_str() {
                    Some("in") => ConsoleOp::Clear(Stream::In),
                    Some("out") => ConsoleOp::Clear(Stream::Out),
                    _ => return Err(error!(TypeMismatch; "CLEAR \"in\" OR \"out\"")),
                }
            }
            "pop" => {
                self.arity(call, 0)?;
                let name = match call.ret() {
                    Some(name) => name,
                    None => return Err(error!(ReturnVariable; "POP NEEDS A RETURN VARIABLE")),
                };
                let (target, id) = self.console_target(name)?;
                if self.vars.get(id).is_readonly() {
                    return Err(error!(ReadonlyVariable; name));
                }
                ConsoleOp::Pop(target)
            }
            "can_pop" => {
                self.arity(call, 1)?;
                let dest = self.returns_kind(call, DataKind::Bool)?;
                let (probe, _) = self.console_target(&call.args[0])?;
                ConsoleOp::CanPop { probe, dest }
            }
            "push" => {
                if !call.has_args() {
                    return Err(error!(ArgumentCount; "PUSH NEEDS ARGUMENTS"));
                }
                self.no_return(call)?;
                let mut args = Vec::with_capacity(call.arg_count());
                for arg in &call.args {
                    args.push(Argument::from_text(arg, self.vars)?);
                }
                ConsoleOp::Push(args)
            }
            "filter" => ConsoleOp::Filter,
            name => return Err(error!(UnknownFunction; format!("CONSOLE {}", name))),
        };
        Ok(Instruction::Console(op))
    }

    fn address(&self, text: &str) -> Result<Argument> {
        let arg = Argument::expression(text, self.vars)?;
        if !arg.is_numeric() {
            return Err(error!(TypeMismatch; format!("ADDRESS {}", text)));
        }
        Ok(arg)
    }

    fn r#memory(&mut self, call: &Call) -> Result<Instruction> {
        let parts: Vec<&str> = call.name.split('.').collect();
        let (target, method) = match parts.as_slice() {
            [method] => (MemoryTarget::Local, *method),
            [device, method] => {
                let id = self.vars.id(device)?;
                let var = self.vars.get(id);
                if var.kind() != DataKind::ComponentRef || var.component_type() != Some(MEMORY_TYPE)
                {
                    return Err(error!(TypeMismatch; format!("{} IS NOT A MEMORY", device)));
                }
                (MemoryTarget::Component(id), *method)
            }
            _ => return Err(error!(SyntaxError; format!("MEMORY {}", call.name))),
        };
        let action = match method {
            "get" => {
                self.arity(call, 1)?;
                MemoryAction::Get {
                    addr: self.address(&call.args[0])?,
                    dest: self.returns(call)?,
                }
            }
            "get_type" => {
                self.arity(call, 1)?;
                MemoryAction::GetType {
                    addr: self.address(&call.args[0])?,
                    dest: self.returns_kind(call, DataKind::Int)?,
                }
            }
            "is_null" => {
                self.arity(call, 1)?;
                MemoryAction::IsNull {
                    addr: self.address(&call.args[0])?,
                    dest: self.returns_kind(call, DataKind::Bool)?,
                }
            }
            "set" => {
                self.arity(call, 2)?;
                self.no_return(call)?;
                let value = match Argument::from_text(&call.args[1], self.vars)? {
                    Argument::String(_) | Argument::Char(_) => {
                        return Err(error!(TypeMismatch; format!("MEMORY VALUE {}", call.args[1])))
                    }
                    value => value,
                };
                MemoryAction::Set {
                    addr: self.address(&call.args[0])?,
                    value,
                }
            }
            "clear" => {
                self.arity(call, 1)?;
                self.no_return(call)?;
                MemoryAction::Clear {
                    addr: self.address(&call.args[0])?,
                }
            }
            name => return Err(error!(UnknownFunction; format!("MEMORY {}", name))),
        };
        Ok(Instruction::Memory(MemoryOp { target, action }))
    }

    fn r#comp(&mut self, call: &Call) -> Result<Instruction> {
        if call.name == "create" {
            return self.create(call);
        }
        let parts: Vec<&str> = call.name.split('.').collect();
        let (target_name, method) = match parts.as_slice() {
            [target, method] => (*target, *method),
            _ => {
                let message = format!("COMP <NAME>.<METHOD>, NOT {}", call.name);
                return Err(error!(SyntaxError; message));
            }
        };
        let target = self.vars.id(target_name)?;
        let var = self.vars.get(target);
        let type_name = match (var.kind(), var.component_type()) {
            (DataKind::PartRef, _) => PART_TYPE.to_string(),
            (DataKind::ComponentRef, Some(type_name)) => type_name.to_string(),
            (kind, _) => {
                return Err(error!(TypeMismatch; format!("{} IS {}", target_name, kind)));
            }
        };
        let found = match self.registry.get(&type_name, method) {
            Some(found) => found,
            None => {
                return Err(error!(UnknownFunction; format!("{}.{}", type_name, method)));
            }
        };
        let signature = found.signature();
        self.arity(call, signature.params.len())?;
        let mut args = Vec::with_capacity(call.arg_count());
        for arg in &call.args {
            args.push(Argument::from_text(arg, self.vars)?);
        }
        let ret = match call.ret() {
            None => None,
            Some(name) => {
                let dest = self.writable(name)?;
                let kind = self.vars.get(dest).kind();
                match signature.returns {
                    Returns::Nothing => {
                        return Err(error!(ReturnVariable; format!("{} RETURNS NOTHING", method)));
                    }
                    Returns::Dynamic => {}
                    Returns::Kind(k) if k == kind || (k.is_value() && kind.is_value()) => {}
                    Returns::Kind(k) => {
                        return Err(error!(TypeMismatch; format!("{} RETURNS {}", method, k)));
                    }
                }
                Some(dest)
            }
        };
        Ok(Instruction::Comp(CompOp::Call {
            target,
            method: method.into(),
            args,
            ret,
        }))
    }

    fn create(&mut self, call: &Call) -> Result<Instruction> {
        self.arity(call, 2)?;
        self.no_return(call)?;
        let name = Argument::from_text(&call.args[0], self.vars)?;
        let type_name = Argument::from_text(&call.args[1], self.vars)?;
        let (name, type_name) = match (name.as_str(), type_name.as_str()) {
            (Some(name), Some(type_name)) => (name.to_string(), type_name.to_string()),
            _ => return Err(error!(TypeMismatch; "CREATE(\"<NAME>\", \"<TYPE>\")")),
        };
        let name = check_name(&name)?;
        if name.readonly {
            return Err(error!(IllegalName; format!("{{{}}}", name.name)));
        }
        if type_name == PART_TYPE || !self.registry.has_type(&type_name) {
            return Err(error!(TypeMismatch; format!("UNKNOWN COMPONENT {}", type_name)));
        }
        self.vars.add(Variable::component(&name.name, &type_name))?;
        Ok(Instruction::Comp(CompOp::Create))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::Val;

    fn build(source: &str) -> (Vec<Option<Instruction>>, Vec<Error>, VariableStorage) {
        let mut vars = VariableStorage::new(64);
        let registry = Registry::with_builtins();
        let (script, errors) = compile(source, &mut vars, &registry);
        (script, errors, vars)
    }

    fn first_error(source: &str) -> Error {
        let (_, mut errors, _) = build(source);
        assert!(!errors.is_empty(), "{}", source);
        errors.remove(0)
    }

    #[test]
    fn test_labels_bind_to_next_line() {
        let (script, errors, vars) = build("# top\nlabel a\n\nlabel b\nstop\nlabel c");
        assert!(errors.is_empty());
        assert_eq!(script.len(), 4);
        assert_eq!(vars.value("a"), Some(Val::Line(2)));
        assert_eq!(vars.value("b"), Some(Val::Line(2)));
        assert_eq!(vars.value("c"), Some(Val::Line(4)));
        assert!(matches!(script[0], Some(Instruction::Label)));
        assert!(matches!(script[2], Some(Instruction::Stop)));
    }

    #[test]
    fn test_errors_keep_going() {
        let (script, errors, _) = build("bogus\nvar int n 1\nset n\nlabel 9\nstop");
        assert_eq!(script.len(), 5);
        assert!(script[0].is_none());
        assert!(script[1].is_some());
        assert!(script[2].is_none());
        assert!(script[3].is_none());
        let lines: Vec<_> = errors.iter().map(|e| e.line_number()).collect();
        assert_eq!(lines, vec![Some(0), Some(2), Some(3)]);
        assert!(errors[0].is(ErrorCode::UnknownInstruction));
        assert!(errors[1].is(ErrorCode::SyntaxError));
        assert!(errors[2].is(ErrorCode::IllegalName));
    }

    #[test]
    fn test_var_and_set_checks() {
        assert!(first_error("var int n n+1").is(ErrorCode::UndefinedVariable));
        assert!(first_error("var int n 1\nvar float n 2").is(ErrorCode::Redeclared));
        assert!(first_error("var text s 1").is(ErrorCode::TypeMismatch));
        assert!(first_error("var int {k} 1\nset k 2").is(ErrorCode::ReadonlyVariable));
        assert!(first_error("set ghost 1").is(ErrorCode::UndefinedVariable));
        assert!(first_error("var int n 1 +").is(ErrorCode::InvalidExpression));
        assert!(first_error("var int var 1").is(ErrorCode::IllegalName));
        assert!(first_error("var part p 3").is(ErrorCode::UndefinedVariable));
    }

    #[test]
    fn test_jump_checks() {
        assert!(first_error("var int n 0\njump n true").is(ErrorCode::TypeMismatch));
        assert!(first_error("jump nowhere true").is(ErrorCode::UndefinedVariable));
        let (_, errors, _) = build("label top\njump top true");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_call_checks() {
        assert!(first_error("time frames_since_launch()").is(ErrorCode::ReturnVariable));
        assert!(first_error("var bool b false\ntime delta_time() b").is(ErrorCode::TypeMismatch));
        assert!(first_error("time wait(1, 2)").is(ErrorCode::ArgumentCount));
        assert!(first_error("var int n 0\ntime wait(1) n").is(ErrorCode::ReturnVariable));
        assert!(first_error("time nap(1)").is(ErrorCode::UnknownFunction));
        assert!(first_error("console push()").is(ErrorCode::ArgumentCount));
        assert!(first_error("var float x 0\nconsole pop() 'x'").is(ErrorCode::TypeMismatch));
        assert!(first_error("var int {n} 0\nconsole pop() n").is(ErrorCode::ReadonlyVariable));
        assert!(first_error("var int n 0\nconsole can_pop(n) n").is(ErrorCode::TypeMismatch));
        assert!(first_error("console clear(\"both\")").is(ErrorCode::TypeMismatch));
        assert!(first_error("console push(\"a\" )").is(ErrorCode::SyntaxError));
        assert!(first_error("memory get(1) x").is(ErrorCode::UndefinedVariable));
        assert!(first_error("var int v 0\nmemory get(true) v").is(ErrorCode::TypeMismatch));
        assert!(first_error("memory a.b.c(1)").is(ErrorCode::SyntaxError));
        assert!(first_error("memory set(0, \"abc\")").is(ErrorCode::TypeMismatch));
        assert!(first_error("var int n 0\nmemory set(0, 'n')").is(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_comp_checks() {
        let ok = "comp create(\"m\", \"memory\")\nvar part p this";
        assert!(first_error(ok).is(ErrorCode::UndefinedVariable));
        assert!(first_error("comp create(\"m\", \"laser\")").is(ErrorCode::TypeMismatch));
        assert!(first_error("comp create(m, \"memory\")").is(ErrorCode::UndefinedVariable));
        let (_, errors, _) = build(
            "comp create(\"m\", \"memory\")\nvar int n 0\ncomp m.size() n\nmemory m.set(0, n)",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        let create = "comp create(\"m\", \"memory\")\n";
        let fly = format!("{}comp m.fly()", create);
        assert!(first_error(&fly).is(ErrorCode::UnknownFunction));
        let size = format!("{}comp m.size(1)", create);
        assert!(first_error(&size).is(ErrorCode::ArgumentCount));
        assert!(first_error("comp create(\"m\", \"memory\")\nvar int n 0\ncomp m.clear(0) n")
            .is(ErrorCode::ReturnVariable));
        assert!(first_error("var int n 0\ncomp n.size()").is(ErrorCode::TypeMismatch));
    }
}
