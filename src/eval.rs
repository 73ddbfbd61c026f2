// ABOUTME: Tree-walking evaluator: statement execution, closures, and primitive operators

use crate::ast::{Expr, Lit, PrimOp, PrintKind, Stmt};
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;
use std::io::Write;
use std::rc::Rc;

/// Evaluates every top-level statement in textual order against the global
/// environment, discarding each statement's value. `print-num`/`print-bool`
/// write their output (one line, newline-terminated) to `out` as they run.
pub fn eval_program<W: Write>(
    stmts: &[Stmt],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<(), RuntimeError> {
    for stmt in stmts {
        eval_stmt(stmt, env, out)?;
    }
    Ok(())
}

/// Evaluates one statement, returning its value. Used both for top-level
/// statements (whose value the driver discards) and for the non-terminal
/// statements of a function body (whose value becomes the call's result
/// only if the statement is last).
fn eval_stmt<W: Write>(
    stmt: &Stmt,
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    match stmt {
        Stmt::Define { name, expr } => {
            if env.is_bound_locally(name) {
                return Err(RuntimeError::Redefinition(name.clone()));
            }
            let value = eval_expr(expr, env, out)?;
            env.define(name.clone(), value.clone());
            Ok(value)
        }
        Stmt::Print { kind, expr } => {
            let value = eval_expr(expr, env, out)?;
            match kind {
                PrintKind::Num => {
                    let n = expect_int(&value)?;
                    let _ = writeln!(out, "{}", n);
                }
                PrintKind::Bool => {
                    let b = expect_bool(&value)?;
                    let _ = writeln!(out, "{}", if b { "#t" } else { "#f" });
                }
            }
            Ok(value)
        }
        Stmt::Expr(expr) => eval_expr(expr, env, out),
    }
}

fn eval_expr<W: Write>(
    expr: &Expr,
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(Lit::Int(n)) => Ok(Value::Int(*n)),
        Expr::Literal(Lit::Bool(b)) => Ok(Value::Bool(*b)),
        Expr::VarRef(name) => env.get(name),
        Expr::If(test, then, alt) => {
            let cond = expect_bool(&eval_expr(test, env, out)?)?;
            if cond {
                eval_expr(then, env, out)
            } else {
                eval_expr(alt, env, out)
            }
        }
        Expr::Lambda { params, body } => Ok(Value::Closure {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        }),
        Expr::Apply { callee, args } => eval_apply(callee, args, env, out),
        Expr::PrimOp { op, args } => eval_primop(*op, args, env, out),
    }
}

fn eval_apply<W: Write>(
    callee: &Expr,
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    let callee_val = eval_expr(callee, env, out)?;
    let (params, body, closure_env) = match callee_val {
        Value::Closure { params, body, env } => (params, body, env),
        other => {
            return Err(RuntimeError::TypeMismatch {
                expected: "function",
                actual: other.type_name(),
            })
        }
    };

    if params.len() != arg_exprs.len() {
        return Err(RuntimeError::CallArity {
            expected: params.len(),
            actual: arg_exprs.len(),
        });
    }

    // Evaluated left to right in the CALLER's environment before the new
    // frame is created.
    let mut args = Vec::with_capacity(arg_exprs.len());
    for a in arg_exprs {
        args.push(eval_expr(a, env, out)?);
    }

    let call_env = Environment::with_parent(closure_env);
    for (param, arg) in params.iter().zip(args.into_iter()) {
        call_env.define(param.clone(), arg);
    }

    let mut result = Value::Bool(false);
    for stmt in body.iter() {
        result = eval_stmt(stmt, &call_env, out)?;
    }
    Ok(result)
}

fn eval_primop<W: Write>(
    op: PrimOp,
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    match op {
        PrimOp::Add => {
            let ints = eval_ints_at_least(2, arg_exprs, env, out)?;
            Ok(Value::Int(ints.into_iter().sum()))
        }
        PrimOp::Mul => {
            let ints = eval_ints_at_least(2, arg_exprs, env, out)?;
            Ok(Value::Int(ints.into_iter().product()))
        }
        PrimOp::Sub => {
            let [a, b] = eval_ints_exact(2, arg_exprs, env, out)?;
            Ok(Value::Int(a - b))
        }
        PrimOp::Div => {
            let [a, b] = eval_ints_exact(2, arg_exprs, env, out)?;
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // i64's `/` already truncates toward zero.
            Ok(Value::Int(a / b))
        }
        PrimOp::Mod => {
            let [a, b] = eval_ints_exact(2, arg_exprs, env, out)?;
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // i64's `%` already carries the sign of the dividend.
            Ok(Value::Int(a % b))
        }
        PrimOp::Gt => {
            let [a, b] = eval_ints_exact(2, arg_exprs, env, out)?;
            Ok(Value::Bool(a > b))
        }
        PrimOp::Lt => {
            let [a, b] = eval_ints_exact(2, arg_exprs, env, out)?;
            Ok(Value::Bool(a < b))
        }
        PrimOp::Eq => {
            let ints = eval_ints_at_least(2, arg_exprs, env, out)?;
            Ok(Value::Bool(ints.iter().all(|n| *n == ints[0])))
        }
        PrimOp::And => eval_and(arg_exprs, env, out),
        PrimOp::Or => eval_or(arg_exprs, env, out),
        PrimOp::Not => {
            if arg_exprs.len() != 1 {
                return Err(RuntimeError::PrimArityOne {
                    actual: arg_exprs.len(),
                });
            }
            let b = expect_bool(&eval_expr(&arg_exprs[0], env, out)?)?;
            Ok(Value::Bool(!b))
        }
    }
}

/// Short-circuiting conjunction: evaluates left to right, stopping (and not
/// evaluating the rest) at the first `#f`.
fn eval_and<W: Write>(
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    if arg_exprs.len() < 2 {
        return Err(RuntimeError::PrimArityAtLeast {
            expected: 2,
            actual: arg_exprs.len(),
        });
    }
    for a in arg_exprs {
        if !expect_bool(&eval_expr(a, env, out)?)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Short-circuiting disjunction: stops at the first `#t`.
fn eval_or<W: Write>(
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    if arg_exprs.len() < 2 {
        return Err(RuntimeError::PrimArityAtLeast {
            expected: 2,
            actual: arg_exprs.len(),
        });
    }
    for a in arg_exprs {
        if expect_bool(&eval_expr(a, env, out)?)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn eval_ints_at_least<W: Write>(
    min: usize,
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<Vec<i64>, RuntimeError> {
    if arg_exprs.len() < min {
        return Err(RuntimeError::PrimArityAtLeast {
            expected: min,
            actual: arg_exprs.len(),
        });
    }
    arg_exprs
        .iter()
        .map(|a| expect_int(&eval_expr(a, env, out)?))
        .collect()
}

fn eval_ints_exact<W: Write>(
    n: usize,
    arg_exprs: &[Expr],
    env: &Rc<Environment>,
    out: &mut W,
) -> Result<[i64; 2], RuntimeError> {
    if arg_exprs.len() != n {
        return Err(RuntimeError::PrimArityExact {
            expected: n,
            actual: arg_exprs.len(),
        });
    }
    let a = expect_int(&eval_expr(&arg_exprs[0], env, out)?)?;
    let b = expect_int(&eval_expr(&arg_exprs[1], env, out)?)?;
    Ok([a, b])
}

fn expect_int(value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::TypeMismatch {
            expected: "number",
            actual: other.type_name(),
        }),
    }
}

fn expect_bool(value: &Value) -> Result<bool, RuntimeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(RuntimeError::TypeMismatch {
            expected: "boolean",
            actual: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build;
    use crate::lexer::tokenize;
    use crate::reader::read_all;

    fn run(src: &str) -> Result<String, RuntimeError> {
        let tokens = tokenize(src).unwrap();
        let sexprs = read_all(&tokens).unwrap();
        let stmts = build(&sexprs).unwrap();
        let env = Environment::new();
        let mut out = Vec::new();
        eval_program(&stmts, &env, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn variadic_sum() {
        assert_eq!(run("(print-num (+ 1 2 3))").unwrap(), "6\n");
    }

    #[test]
    fn lexical_capture_not_call_site() {
        assert_eq!(
            run("(define x 10) (define f (fun (y) (+ x y))) (define x-unused 0) (print-num (f 5))")
                .unwrap(),
            "15\n"
        );
    }

    #[test]
    fn short_circuit_and() {
        assert_eq!(
            run("(print-bool (and #t (> 3 2) (= 2 2 2)))").unwrap(),
            "#t\n"
        );
    }

    #[test]
    fn and_short_circuits_before_side_effect() {
        // If `and` evaluated its second arg, this would print 99 first.
        assert_eq!(run("(print-bool (and #f (print-num 99)))").unwrap(), "#f\n");
    }

    #[test]
    fn or_short_circuits_before_side_effect() {
        assert_eq!(run("(print-bool (or #t (print-num 99)))").unwrap(), "#t\n");
    }

    #[test]
    fn dividend_signed_modulo() {
        assert_eq!(run("(print-num (mod -7 3))").unwrap(), "-1\n");
    }

    #[test]
    fn truncated_division() {
        assert_eq!(run("(print-num (/ -7 2))").unwrap(), "-3\n");
    }

    #[test]
    fn recursive_factorial() {
        assert_eq!(
            run("(define fact (fun (n) (if (< n 2) 1 (* n (fact (- n 1)))))) (print-num (fact 5))")
                .unwrap(),
            "120\n"
        );
    }

    #[test]
    fn type_error_on_arithmetic_with_bool() {
        let err = run("(print-num (+ 1 #t))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type Error: Expect 'number' but got 'boolean'."
        );
    }

    #[test]
    fn division_by_zero() {
        let err = run("(print-num (/ 1 0))").unwrap_err();
        assert_eq!(err.to_string(), "Error: Division by zero");
    }

    #[test]
    fn undefined_variable() {
        let err = run("(print-num x)").unwrap_err();
        assert_eq!(err.to_string(), "Error: Variable x not defined");
    }

    #[test]
    fn redefinition_in_same_frame_is_an_error() {
        let err = run("(define x 1) (define x 2)").unwrap_err();
        assert_eq!(err.to_string(), "Error: Redefining x is not allowed.");
    }

    #[test]
    fn shadowing_in_nested_body_is_allowed() {
        assert_eq!(
            run("(define x 1) (define f (fun () (define x 2) (print-num x))) (f)").unwrap(),
            "2\n"
        );
    }

    #[test]
    fn user_function_arity_mismatch_has_no_error_prefix() {
        let err = run("(define f (fun (a b) a)) (print-num (f 1))").unwrap_err();
        assert_eq!(err.to_string(), "Need 2 arguments, but got 1.");
    }

    #[test]
    fn primop_arity_family_messages() {
        assert_eq!(
            run("(print-num (- 1))").unwrap_err().to_string(),
            "Error: Need 2 arguments, but got 1."
        );
        assert_eq!(
            run("(print-num (+ 1))").unwrap_err().to_string(),
            "Error: Need at least 2 arguments, but got 1."
        );
        assert_eq!(
            run("(print-bool (not #t #f))").unwrap_err().to_string(),
            "Error: Need 1 argument, but got 2."
        );
    }

    #[test]
    fn calling_a_non_closure_is_a_type_error() {
        let err = run("(define x 5) (print-num (x 1))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type Error: Expect 'function' but got 'number'."
        );
    }

    #[test]
    fn if_requires_a_boolean_test() {
        let err = run("(print-num (if 1 2 3))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type Error: Expect 'boolean' but got 'number'."
        );
    }

    #[test]
    fn if_does_not_evaluate_the_untaken_branch() {
        assert_eq!(
            run("(print-num (if #t 1 (print-num 99)))").unwrap(),
            "1\n"
        );
    }

    #[test]
    fn nested_apply_of_an_immediately_invoked_lambda() {
        assert_eq!(run("(print-num ((fun (x) (* x x)) 5))").unwrap(), "25\n");
    }
}
