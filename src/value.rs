// ABOUTME: Value types produced by evaluation and the closures they carry

use crate::ast::Stmt;
use crate::env::Environment;
use std::fmt;
use std::rc::Rc;

/// A runtime value. Mini-LISP has exactly two primitive types plus closures;
/// booleans and integers are disjoint and never implicitly coerce into
/// one another.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Closure {
        params: Rc<[String]>,
        body: Rc<[Stmt]>,
        env: Rc<Environment>,
    },
}

impl Value {
    /// The type name used in `Type Error: Expect '...' but got '...'.` messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Closure { .. } => "function",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Closure { .. } => write!(f, "#<closure>"),
        }
    }
}
