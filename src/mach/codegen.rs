use super::{Function, Opcode, Stack, Val};
use crate::error;
use crate::lang::ast::{self, AcceptVisitor};
use crate::lang::{Column, Error};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Generate the stack program for one expression.
/// `params` lists the free variable names; `Var(name)` becomes `Push(index)`.
pub fn codegen(expr: &ast::Expression, params: &[Rc<str>]) -> Result<Vec<Opcode>> {
    Visitor::accept(expr, params)
}

struct Visitor<'a> {
    params: &'a [Rc<str>],
    gen: Generator,
    error: Option<Error>,
}

impl<'a> Visitor<'a> {
    fn accept(expr: &ast::Expression, params: &[Rc<str>]) -> Result<Vec<Opcode>> {
        let mut this = Visitor {
            params,
            gen: Generator::new(),
            error: None,
        };
        expr.accept(&mut this);
        if let Some(error) = this.error {
            return Err(error);
        }
        let (_col, link) = this.gen.expr.pop()?;
        debug_assert_eq!(0, this.gen.expr.len());
        Ok(link)
    }
}

impl<'a> ast::Visitor for Visitor<'a> {
    fn visit_expression(&mut self, expression: &ast::Expression) {
        if self.error.is_some() {
            return;
        }
        let mut link = vec![];
        let col = match self.gen.expression(&mut link, expression, self.params) {
            Ok(col) => col,
            Err(e) => {
                self.error = Some(e);
                return;
            }
        };
        if let Some(error) = self.gen.expr.push((col.clone(), link)).err() {
            self.error = Some(error.in_column(&col))
        }
    }
}

/// Append a fragment, relocating its branch addresses.
fn append(link: &mut Vec<Opcode>, frag: Vec<Opcode>) {
    let offset = link.len();
    link.extend(frag.into_iter().map(|op| match op {
        Opcode::IfNot(addr) => Opcode::IfNot(addr + offset),
        Opcode::Jump(addr) => Opcode::Jump(addr + offset),
        op => op,
    }));
}

struct Generator {
    expr: Stack<(Column, Vec<Opcode>)>,
}

impl Generator {
    fn new() -> Generator {
        Generator {
            expr: Stack::new("EXPRESSION OVERFLOW"),
        }
    }

    fn expression(
        &mut self,
        link: &mut Vec<Opcode>,
        expr: &ast::Expression,
        params: &[Rc<str>],
    ) -> Result<Column> {
        fn unary_expression(
            this: &mut Generator,
            link: &mut Vec<Opcode>,
            op: Opcode,
            col: &Column,
        ) -> Result<Column> {
            let (expr_col, ops) = this.expr.pop()?;
            append(link, ops);
            link.push(op);
            Ok(col.start..expr_col.end)
        }
        fn binary_expression(
            this: &mut Generator,
            link: &mut Vec<Opcode>,
            op: Opcode,
        ) -> Result<Column> {
            let (col_rhs, rhs) = this.expr.pop()?;
            let (col_lhs, lhs) = this.expr.pop()?;
            append(link, lhs);
            append(link, rhs);
            link.push(op);
            Ok(col_lhs.start..col_rhs.end)
        }
        fn literal(link: &mut Vec<Opcode>, col: &Column, val: Val) -> Result<Column> {
            link.push(Opcode::Literal(val));
            Ok(col.clone())
        }
        use ast::Expression;
        match expr {
            Expression::Integer(col, val) => literal(link, col, Val::Int(*val)),
            Expression::Float(col, val) => literal(link, col, Val::Float(*val)),
            Expression::Bool(col, val) => literal(link, col, Val::Bool(*val)),
            Expression::Var(col, name) => match params.iter().position(|p| p == name) {
                Some(index) => {
                    link.push(Opcode::Push(index));
                    Ok(col.clone())
                }
                None => Err(error!(UndefinedVariable, ..col; name.to_string())),
            },
            Expression::Function(col, name, args) => self.function(link, col, name, args.len()),
            Expression::Negation(col, ..) => unary_expression(self, link, Opcode::Neg, col),
            Expression::Not(col, ..) => unary_expression(self, link, Opcode::Not, col),
            Expression::Multiply(..) => binary_expression(self, link, Opcode::Mul),
            Expression::Divide(..) => binary_expression(self, link, Opcode::Div),
            Expression::Modulus(..) => binary_expression(self, link, Opcode::Mod),
            Expression::Add(..) => binary_expression(self, link, Opcode::Add),
            Expression::Subtract(..) => binary_expression(self, link, Opcode::Sub),
            Expression::Equal(..) => binary_expression(self, link, Opcode::Eq),
            Expression::NotEqual(..) => binary_expression(self, link, Opcode::NotEq),
            Expression::Less(..) => binary_expression(self, link, Opcode::Lt),
            Expression::LessEqual(..) => binary_expression(self, link, Opcode::LtEq),
            Expression::Greater(..) => binary_expression(self, link, Opcode::Gt),
            Expression::GreaterEqual(..) => binary_expression(self, link, Opcode::GtEq),
            Expression::And(..) => binary_expression(self, link, Opcode::And),
            Expression::Or(..) => binary_expression(self, link, Opcode::Or),
        }
    }

    fn function(
        &mut self,
        link: &mut Vec<Opcode>,
        col: &Column,
        name: &str,
        len: usize,
    ) -> Result<Column> {
        if Function::is_if(name) {
            if len != 3 {
                return Err(error!(ArgumentCount, ..col; "IF TAKES 3 ARGUMENTS"));
            }
            return self.r#if(link, col);
        }
        let (opcode, arity) = match Function::opcode_and_arity(name) {
            Some(found) => found,
            None => return Err(error!(UnknownFunction, ..col; name.to_ascii_uppercase())),
        };
        if !arity.contains(&len) {
            return Err(error!(ArgumentCount, ..col; "WRONG NUMBER OF ARGUMENTS"));
        }
        for (_col, ops) in self.expr.pop_n(len)? {
            append(link, ops);
        }
        if arity.start() != arity.end() {
            link.push(Opcode::Literal(Val::Int(len as i64)));
        }
        link.push(opcode);
        Ok(col.clone())
    }

    /// `if(c, a, b)` branches so only the chosen side runs.
    fn r#if(&mut self, link: &mut Vec<Opcode>, col: &Column) -> Result<Column> {
        let (_, when_false) = self.expr.pop()?;
        let (_, when_true) = self.expr.pop()?;
        let (_, cond) = self.expr.pop()?;
        append(link, cond);
        let else_addr = link.len() + 1 + when_true.len() + 1;
        link.push(Opcode::IfNot(else_addr));
        append(link, when_true);
        let end_addr = link.len() + 1 + when_false.len();
        link.push(Opcode::Jump(end_addr));
        append(link, when_false);
        Ok(col.clone())
    }
}
