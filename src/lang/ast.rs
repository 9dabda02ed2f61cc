use super::Column;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Integer(Column, i64),
    Float(Column, f64),
    Bool(Column, bool),
    Var(Column, Rc<str>),
    Function(Column, Rc<str>, Vec<Expression>),
    Negation(Column, Box<Expression>),
    Not(Column, Box<Expression>),
    Multiply(Column, Box<Expression>, Box<Expression>),
    Divide(Column, Box<Expression>, Box<Expression>),
    Modulus(Column, Box<Expression>, Box<Expression>),
    Add(Column, Box<Expression>, Box<Expression>),
    Subtract(Column, Box<Expression>, Box<Expression>),
    Equal(Column, Box<Expression>, Box<Expression>),
    NotEqual(Column, Box<Expression>, Box<Expression>),
    Less(Column, Box<Expression>, Box<Expression>),
    LessEqual(Column, Box<Expression>, Box<Expression>),
    Greater(Column, Box<Expression>, Box<Expression>),
    GreaterEqual(Column, Box<Expression>, Box<Expression>),
    And(Column, Box<Expression>, Box<Expression>),
    Or(Column, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn column(&self) -> Column {
        use Expression::*;
        match self {
            Integer(col, ..) | Float(col, ..) | Bool(col, ..) | Var(col, ..) => col.clone(),
            Function(col, ..) | Negation(col, ..) | Not(col, ..) => col.clone(),
            Multiply(col, ..) | Divide(col, ..) | Modulus(col, ..) => col.clone(),
            Add(col, ..) | Subtract(col, ..) => col.clone(),
            Equal(col, ..) | NotEqual(col, ..) => col.clone(),
            Less(col, ..) | LessEqual(col, ..) | Greater(col, ..) | GreaterEqual(col, ..) => {
                col.clone()
            }
            And(col, ..) | Or(col, ..) => col.clone(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::Integer(..) | Expression::Float(..) | Expression::Bool(..)
        )
    }

    /// Free variable names in order of first appearance, without repeats.
    pub fn parameters(&self) -> Vec<Rc<str>> {
        struct Collect(Vec<Rc<str>>);
        impl Visitor for Collect {
            fn visit_expression(&mut self, expr: &Expression) {
                if let Expression::Var(_, name) = expr {
                    if !self.0.contains(name) {
                        self.0.push(name.clone());
                    }
                }
            }
        }
        let mut collect = Collect(vec![]);
        self.accept(&mut collect);
        collect.0
    }
}

pub trait Visitor {
    fn visit_expression(&mut self, _: &Expression) {}
}

pub trait AcceptVisitor {
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl AcceptVisitor for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Expression::*;
        match self {
            Integer(..) | Float(..) | Bool(..) | Var(..) => {}
            Function(_, _, vec_expr) => {
                for expr in vec_expr {
                    expr.accept(visitor);
                }
            }
            Negation(_, expr) | Not(_, expr) => expr.accept(visitor),
            Multiply(_, lhs, rhs)
            | Divide(_, lhs, rhs)
            | Modulus(_, lhs, rhs)
            | Add(_, lhs, rhs)
            | Subtract(_, lhs, rhs)
            | Equal(_, lhs, rhs)
            | NotEqual(_, lhs, rhs)
            | Less(_, lhs, rhs)
            | LessEqual(_, lhs, rhs)
            | Greater(_, lhs, rhs)
            | GreaterEqual(_, lhs, rhs)
            | And(_, lhs, rhs)
            | Or(_, lhs, rhs) => {
                lhs.accept(visitor);
                rhs.accept(visitor);
            }
        }
        visitor.visit_expression(self)
    }
}
