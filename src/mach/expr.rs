use super::codegen::codegen;
use super::{Function, Lookup, Opcode, Operation, Stack, Val, VarId, VariableStorage};
use crate::error;
use crate::lang::{parse, Error};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Compiled expression
///
/// Free identifiers are parameters. Each one is resolved to a variable
/// when the expression is compiled and bound to that variable's current
/// value every time it is evaluated. Entity references bind by their
/// integer id so expressions never see a live handle.

#[derive(Debug, Clone)]
pub struct Expr {
    source: Rc<str>,
    ops: Rc<[Opcode]>,
    params: Vec<(Rc<str>, VarId)>,
}

impl Expr {
    pub fn compile(source: &str, vars: &VariableStorage) -> Result<Expr> {
        let ast = match parse(source) {
            Ok(ast) => ast,
            Err(e) => {
                let message = format!("{} {}", source, e.text());
                return Err(error!(InvalidExpression, ..&e.column(); message.trim_end()));
            }
        };
        let names = ast.parameters();
        let mut params = Vec::with_capacity(names.len());
        for name in &names {
            match vars.id(name) {
                Ok(id) => params.push((name.clone(), id)),
                Err(e) => return Err(e.in_column(&column_of(source, name))),
            }
        }
        let ops = codegen(&ast, &names)?;
        Ok(Expr {
            source: source.into(),
            ops: ops.into(),
            params,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| &**name)
    }

    /// The value of an expression that is a single literal.
    pub fn constant(&self) -> Option<&Val> {
        match &*self.ops {
            [Opcode::Literal(val)] => Some(val),
            _ => None,
        }
    }

    pub fn evaluate(&self, vars: &VariableStorage, lookup: &dyn Lookup) -> Result<Val> {
        let mut bound = Vec::with_capacity(self.params.len());
        for (name, id) in &self.params {
            let var = vars.get(*id);
            match var.get() {
                Some(val) if !var.is_null(lookup) => bound.push(val.scalar()),
                _ => return Err(error!(NullParameter; name.to_string())),
            }
        }
        self.run(&bound)
    }

    fn run(&self, bound: &[Val]) -> Result<Val> {
        let mut stack: Stack<Val> = Stack::new("EXPRESSION TOO COMPLEX");
        let mut pc = 0;
        while let Some(op) = self.ops.get(pc) {
            pc += 1;
            match op {
                Opcode::Literal(val) => stack.push(val.clone())?,
                Opcode::Push(index) => match bound.get(*index) {
                    Some(val) => stack.push(val.clone())?,
                    None => return Err(error!(InternalError; "UNBOUND PARAMETER")),
                },
                Opcode::IfNot(addr) => match stack.pop()? {
                    Val::Bool(true) => {}
                    Val::Bool(false) => pc = *addr,
                    v => return Err(error!(InvalidOperand; format!("IF({})", v))),
                },
                Opcode::Jump(addr) => pc = *addr,

                Opcode::Neg => {
                    let val = stack.pop()?;
                    stack.push(Operation::negate(val)?)?
                }
                Opcode::Not => {
                    let val = stack.pop()?;
                    stack.push(Operation::not(val)?)?
                }
                Opcode::Mul => binary(&mut stack, Operation::multiply)?,
                Opcode::Div => binary(&mut stack, Operation::divide)?,
                Opcode::Mod => binary(&mut stack, Operation::modulus)?,
                Opcode::Add => binary(&mut stack, Operation::sum)?,
                Opcode::Sub => binary(&mut stack, Operation::subtract)?,
                Opcode::Eq => binary(&mut stack, Operation::equal)?,
                Opcode::NotEq => binary(&mut stack, Operation::not_equal)?,
                Opcode::Lt => binary(&mut stack, Operation::less)?,
                Opcode::LtEq => binary(&mut stack, Operation::less_equal)?,
                Opcode::Gt => binary(&mut stack, Operation::greater)?,
                Opcode::GtEq => binary(&mut stack, Operation::greater_equal)?,
                Opcode::And => binary(&mut stack, Operation::and)?,
                Opcode::Or => binary(&mut stack, Operation::or)?,

                Opcode::Abs => {
                    let val = stack.pop()?;
                    stack.push(Function::abs(val)?)?
                }
                Opcode::Sign => {
                    let val = stack.pop()?;
                    stack.push(Function::sign(val)?)?
                }
                Opcode::Log => {
                    let len = match stack.pop()? {
                        Val::Int(n) => n as usize,
                        _ => return Err(error!(InternalError; "LOG ARITY")),
                    };
                    let args = stack.pop_n(len)?;
                    stack.push(Function::log(args)?)?
                }
                Opcode::Max => binary(&mut stack, Function::max)?,
                Opcode::Min => binary(&mut stack, Function::min)?,
                Opcode::Pow => binary(&mut stack, Function::pow)?,
                Opcode::Random => stack.push(Function::random())?,
                Opcode::Acos
                | Opcode::Asin
                | Opcode::Atan
                | Opcode::Ceiling
                | Opcode::Cos
                | Opcode::Exp
                | Opcode::Floor
                | Opcode::Log10
                | Opcode::Round
                | Opcode::Sin
                | Opcode::Sqrt
                | Opcode::Tan
                | Opcode::Truncate => {
                    let val = stack.pop()?;
                    stack.push(Function::unary(op, val)?)?
                }
            }
        }
        let result = stack.pop()?;
        if !stack.is_empty() {
            return Err(error!(InternalError; "STACK NOT EMPTY"));
        }
        Ok(result)
    }
}

fn binary(stack: &mut Stack<Val>, f: fn(Val, Val) -> Result<Val>) -> Result<()> {
    let (lhs, rhs) = stack.pop_2()?;
    stack.push(f(lhs, rhs)?)
}

fn column_of(source: &str, name: &str) -> crate::lang::Column {
    match source.find(name) {
        Some(start) => start..start + name.len(),
        None => 0..0,
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
