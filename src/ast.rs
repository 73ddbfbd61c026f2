// ABOUTME: AST builder turning s-expressions into typed statement/expression nodes

use crate::error::SyntaxError;
use crate::reader::Sexpr;
use std::rc::Rc;

/// The eleven built-in primitive operators. Not first-class: they can only
/// appear as the head of a `PrimOp` form, never as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Eq,
    And,
    Or,
    Not,
}

impl PrimOp {
    fn from_name(name: &str) -> Option<PrimOp> {
        Some(match name {
            "+" => PrimOp::Add,
            "-" => PrimOp::Sub,
            "*" => PrimOp::Mul,
            "/" => PrimOp::Div,
            "mod" => PrimOp::Mod,
            ">" => PrimOp::Gt,
            "<" => PrimOp::Lt,
            "=" => PrimOp::Eq,
            "and" => PrimOp::And,
            "or" => PrimOp::Or,
            "not" => PrimOp::Not,
            _ => return None,
        })
    }
}

/// A literal value embedded directly in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lit {
    Int(i64),
    Bool(bool),
}

/// Which conversion `print-num`/`print-bool` requires of its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintKind {
    Num,
    Bool,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Lit),
    VarRef(String),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Lambda { params: Rc<[String]>, body: Rc<[Stmt]> },
    Apply { callee: Box<Expr>, args: Vec<Expr> },
    PrimOp { op: PrimOp, args: Vec<Expr> },
}

/// A top-level or function-body statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    Define { name: String, expr: Expr },
    Print { kind: PrintKind, expr: Expr },
    Expr(Expr),
}

/// Builds the top-level statement sequence from a sequence of s-expressions.
pub fn build(sexprs: &[Sexpr]) -> Result<Vec<Stmt>, SyntaxError> {
    sexprs.iter().map(parse_top_stmt).collect()
}

/// Parses one top-level statement via head-symbol form dispatch: `define`,
/// `print-num`, `print-bool`, or (falling through) a bare expression.
fn parse_top_stmt(s: &Sexpr) -> Result<Stmt, SyntaxError> {
    if let Sexpr::List(items) = s {
        if let Some(Sexpr::Sym(head)) = items.first() {
            match head.as_str() {
                "define" => return parse_define(items),
                "print-num" => return parse_print(items, PrintKind::Num),
                "print-bool" => return parse_print(items, PrintKind::Bool),
                _ => {}
            }
        }
    }
    Ok(Stmt::Expr(parse_expr(s)?))
}

/// Parses one function-body statement. Body statements are restricted to
/// `define` or a bare expression — `print-num`/`print-bool` are top-level
/// forms only; inside a body they parse as ordinary applications of an
/// (undefined) variable, which fails at call time rather than at parse
/// time.
fn parse_body_stmt(s: &Sexpr) -> Result<Stmt, SyntaxError> {
    if let Sexpr::List(items) = s {
        if let Some(Sexpr::Sym(head)) = items.first() {
            if head == "define" {
                return parse_define(items);
            }
        }
    }
    Ok(Stmt::Expr(parse_expr(s)?))
}

fn parse_define(items: &[Sexpr]) -> Result<Stmt, SyntaxError> {
    match items {
        [_, Sexpr::Sym(name), value] if !is_reserved(name) => Ok(Stmt::Define {
            name: name.clone(),
            expr: parse_expr(value)?,
        }),
        [_, Sexpr::Sym(name), _] => Err(SyntaxError::UnexpectedToken(name.clone())),
        _ => Err(SyntaxError::UnexpectedToken("define".to_string())),
    }
}

fn parse_print(items: &[Sexpr], kind: PrintKind) -> Result<Stmt, SyntaxError> {
    match items {
        [_, value] => Ok(Stmt::Print {
            kind,
            expr: parse_expr(value)?,
        }),
        _ => {
            let head = match kind {
                PrintKind::Num => "print-num",
                PrintKind::Bool => "print-bool",
            };
            Err(SyntaxError::UnexpectedToken(head.to_string()))
        }
    }
}

/// Parses an expression: a literal atom, a variable reference, or one of
/// the `if`/`fun`/primitive-operator/application list forms.
fn parse_expr(s: &Sexpr) -> Result<Expr, SyntaxError> {
    match s {
        Sexpr::Int(n) => Ok(Expr::Literal(Lit::Int(*n))),
        Sexpr::Bool(b) => Ok(Expr::Literal(Lit::Bool(*b))),
        Sexpr::Sym(name) => {
            if is_reserved(name) {
                Err(SyntaxError::UnexpectedToken(name.clone()))
            } else {
                Ok(Expr::VarRef(name.clone()))
            }
        }
        Sexpr::List(items) => parse_list_expr(items),
    }
}

fn is_reserved(name: &str) -> bool {
    PrimOp::from_name(name).is_some()
}

fn parse_list_expr(items: &[Sexpr]) -> Result<Expr, SyntaxError> {
    if items.is_empty() {
        return Err(SyntaxError::Generic);
    }

    if let Sexpr::Sym(head) = &items[0] {
        match head.as_str() {
            "if" => return parse_if(items),
            "fun" => return parse_fun(items),
            _ => {
                if let Some(op) = PrimOp::from_name(head) {
                    let args = items[1..]
                        .iter()
                        .map(parse_expr)
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Expr::PrimOp { op, args });
                }
            }
        }
    }

    let callee = parse_expr(&items[0])?;
    let args = items[1..]
        .iter()
        .map(parse_expr)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::Apply {
        callee: Box::new(callee),
        args,
    })
}

fn parse_if(items: &[Sexpr]) -> Result<Expr, SyntaxError> {
    match items {
        [_, test, then, alt] => Ok(Expr::If(
            Box::new(parse_expr(test)?),
            Box::new(parse_expr(then)?),
            Box::new(parse_expr(alt)?),
        )),
        _ => Err(SyntaxError::UnexpectedToken("if".to_string())),
    }
}

/// `(fun (PARAM ...) BODY-STMT ...)`: at least 3 elements; the second must
/// be a list of symbols (possibly empty); the remaining elements form the
/// body, each parsed as a statement (a `define` or an expression).
fn parse_fun(items: &[Sexpr]) -> Result<Expr, SyntaxError> {
    if items.len() < 3 {
        return Err(SyntaxError::UnexpectedToken("fun".to_string()));
    }

    let Sexpr::List(param_exprs) = &items[1] else {
        return Err(SyntaxError::UnexpectedToken("fun".to_string()));
    };

    let mut params = Vec::with_capacity(param_exprs.len());
    for p in param_exprs {
        match p {
            Sexpr::Sym(name) if !is_reserved(name) => params.push(name.clone()),
            Sexpr::Sym(name) => return Err(SyntaxError::UnexpectedToken(name.clone())),
            _ => return Err(SyntaxError::UnexpectedToken("fun".to_string())),
        }
    }

    let body = items[2..]
        .iter()
        .map(parse_body_stmt)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expr::Lambda {
        params: Rc::from(params),
        body: Rc::from(body),
    })
}
