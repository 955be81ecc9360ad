//! Compile-time evaluation of const-expressions.
//!
//! The parser uses this to size arrays while parsing (`array<u8, N * 2>`), and the folding passes use it to
//! collapse literal subtrees. Integers are evaluated in `i128` with checked arithmetic so every `u64` literal
//! and its negation are representable.

use std::collections::HashMap;

use quix_core::lang::operators::{self, OperatorId};
use quix_core::lang::types;
use thiserror::Error;

use crate::ast::{Expr, FloatLiteral, IntLiteral};
use crate::lexer::float_width;

/// Result of evaluating a const-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i128),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("'{0}' is not a known constant")]
    UnknownName(String),

    #[error("operator '{0}' cannot be applied to these operands")]
    BadOperands(&'static str),

    #[error("operator '{0}' is not allowed in a constant expression")]
    NotConst(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

/// Named constants visible to the evaluator.
#[derive(Debug, Clone, Default)]
pub struct ConstEnv {
    values: HashMap<String, ConstValue>,
}

impl ConstEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, value: ConstValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ConstValue> {
        self.values.get(name)
    }
}

impl ConstValue {
    /// Rebuild a literal expression for this value.
    ///
    /// Negative numbers become a unary minus over a literal. Returns `None` when the value has no literal
    /// form (an integer whose magnitude exceeds `u64`, or a non-finite float).
    pub fn to_expr(&self) -> Option<Expr> {
        match self {
            ConstValue::Int(v) => {
                let magnitude = u64::try_from(v.unsigned_abs()).ok()?;
                let lit = Expr::Integer(IntLiteral {
                    value: magnitude,
                    width: types::int_width_for(magnitude),
                });
                Some(if *v < 0 { Expr::unary(OperatorId::Minus, lit) } else { lit })
            }
            ConstValue::Float(v) => {
                if !v.is_finite() {
                    return None;
                }
                let text = format!("{:?}", v.abs());
                let width = float_width(&text)?;
                let lit = Expr::Float(FloatLiteral { text, width });
                Some(if v.is_sign_negative() { Expr::unary(OperatorId::Minus, lit) } else { lit })
            }
            ConstValue::Bool(b) => Some(Expr::Bool(*b)),
            ConstValue::Char(c) => Some(Expr::Char(*c)),
            ConstValue::Str(s) => Some(Expr::String(s.clone())),
            ConstValue::Null => Some(Expr::Null),
        }
    }

    /// Value as a non-negative integer, for array lengths.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConstValue::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// Evaluate `expr` against `env`.
pub fn evaluate(expr: &Expr, env: &ConstEnv) -> Result<ConstValue, EvalError> {
    match expr {
        Expr::Identifier(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownName(name.clone())),
        Expr::Integer(lit) => Ok(ConstValue::Int(i128::from(lit.value))),
        Expr::Float(lit) => Ok(ConstValue::Float(lit.value())),
        Expr::String(s) => Ok(ConstValue::Str(s.clone())),
        Expr::Char(c) => Ok(ConstValue::Char(*c)),
        Expr::Bool(b) => Ok(ConstValue::Bool(*b)),
        Expr::Null => Ok(ConstValue::Null),
        Expr::Unary { op, operand } => unary(*op, evaluate(operand, env)?),
        Expr::Binary { op, lhs, rhs } => binary(*op, evaluate(lhs, env)?, evaluate(rhs, env)?),
    }
}

fn unary(op: OperatorId, value: ConstValue) -> Result<ConstValue, EvalError> {
    let spelling = operators::as_str(op);
    if !operators::is_const_prefix(op) {
        return Err(EvalError::NotConst(spelling));
    }
    match (op, value) {
        (OperatorId::Minus, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int).ok_or(EvalError::Overflow),
        (OperatorId::Minus, ConstValue::Float(v)) => Ok(ConstValue::Float(-v)),
        (OperatorId::Plus, v @ (ConstValue::Int(_) | ConstValue::Float(_))) => Ok(v),
        (OperatorId::Bang, ConstValue::Bool(b)) => Ok(ConstValue::Bool(!b)),
        (OperatorId::Tilde, ConstValue::Int(v)) => Ok(ConstValue::Int(!v)),
        _ => Err(EvalError::BadOperands(spelling)),
    }
}

fn binary(op: OperatorId, lhs: ConstValue, rhs: ConstValue) -> Result<ConstValue, EvalError> {
    use ConstValue::{Bool, Char, Float, Int, Str};
    use OperatorId as Op;

    let spelling = operators::as_str(op);
    if !operators::is_const_binary(op) {
        return Err(EvalError::NotConst(spelling));
    }

    let checked = |v: Option<i128>| v.map(Int).ok_or(EvalError::Overflow);

    match (lhs, rhs) {
        (Int(a), Int(b)) => match op {
            Op::Plus => checked(a.checked_add(b)),
            Op::Minus => checked(a.checked_sub(b)),
            Op::Star => checked(a.checked_mul(b)),
            Op::Slash if b == 0 => Err(EvalError::DivisionByZero),
            Op::Slash => checked(a.checked_div(b)),
            Op::Percent if b == 0 => Err(EvalError::DivisionByZero),
            Op::Percent => checked(a.checked_rem(b)),
            Op::Amp => Ok(Int(a & b)),
            Op::Pipe => Ok(Int(a | b)),
            Op::Caret => Ok(Int(a ^ b)),
            Op::Shl => checked(u32::try_from(b).ok().and_then(|s| a.checked_shl(s))),
            Op::Shr => checked(u32::try_from(b).ok().and_then(|s| a.checked_shr(s))),
            _ => compare(op, a.partial_cmp(&b)),
        },
        (Float(a), Float(b)) => float_op(op, a, b),
        (Int(a), Float(b)) => float_op(op, a as f64, b),
        (Float(a), Int(b)) => float_op(op, a, b as f64),
        (Bool(a), Bool(b)) => match op {
            Op::AndAnd | Op::Amp => Ok(Bool(a && b)),
            Op::OrOr | Op::Pipe => Ok(Bool(a || b)),
            Op::XorXor | Op::Caret => Ok(Bool(a ^ b)),
            Op::EqEq => Ok(Bool(a == b)),
            Op::NotEq => Ok(Bool(a != b)),
            _ => Err(EvalError::BadOperands(spelling)),
        },
        (Str(a), Str(b)) => match op {
            Op::Plus => Ok(Str(a + &b)),
            _ => compare(op, a.partial_cmp(&b)),
        },
        (Char(a), Char(b)) => compare(op, a.partial_cmp(&b)),
        _ => Err(EvalError::BadOperands(spelling)),
    }
}

fn float_op(op: OperatorId, a: f64, b: f64) -> Result<ConstValue, EvalError> {
    match op {
        OperatorId::Plus => Ok(ConstValue::Float(a + b)),
        OperatorId::Minus => Ok(ConstValue::Float(a - b)),
        OperatorId::Star => Ok(ConstValue::Float(a * b)),
        OperatorId::Slash if b == 0.0 => Err(EvalError::DivisionByZero),
        OperatorId::Slash => Ok(ConstValue::Float(a / b)),
        OperatorId::Percent if b == 0.0 => Err(EvalError::DivisionByZero),
        OperatorId::Percent => Ok(ConstValue::Float(a % b)),
        _ => compare(op, a.partial_cmp(&b)),
    }
}

fn compare(op: OperatorId, ordering: Option<std::cmp::Ordering>) -> Result<ConstValue, EvalError> {
    use std::cmp::Ordering::{Equal, Greater, Less};

    let spelling = operators::as_str(op);
    let ordering = ordering.ok_or(EvalError::BadOperands(spelling))?;
    let result = match op {
        OperatorId::EqEq => ordering == Equal,
        OperatorId::NotEq => ordering != Equal,
        OperatorId::Lt => ordering == Less,
        OperatorId::LtEq => ordering != Greater,
        OperatorId::Gt => ordering == Greater,
        OperatorId::GtEq => ordering != Less,
        _ => return Err(EvalError::BadOperands(spelling)),
    };
    Ok(ConstValue::Bool(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(op: OperatorId, a: Expr, b: Expr) -> Expr {
        Expr::binary(op, a, b)
    }

    #[test]
    fn integer_arithmetic_respects_operators() {
        let env = ConstEnv::new();
        let e = bin(OperatorId::Star, bin(OperatorId::Plus, Expr::int(2), Expr::int(3)), Expr::int(4));
        assert_eq!(evaluate(&e, &env), Ok(ConstValue::Int(20)));
        let e = bin(OperatorId::Shl, Expr::int(1), Expr::int(10));
        assert_eq!(evaluate(&e, &env), Ok(ConstValue::Int(1024)));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let e = bin(OperatorId::Slash, Expr::int(1), Expr::int(0));
        assert_eq!(evaluate(&e, &ConstEnv::new()), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn names_resolve_through_env() {
        let mut env = ConstEnv::new();
        env.define("N", ConstValue::Int(8));
        let e = bin(OperatorId::Minus, Expr::Identifier("N".into()), Expr::int(1));
        assert_eq!(evaluate(&e, &env), Ok(ConstValue::Int(7)));
        assert_eq!(
            evaluate(&Expr::Identifier("M".into()), &env),
            Err(EvalError::UnknownName("M".into()))
        );
    }

    #[test]
    fn strings_concatenate_and_compare() {
        let env = ConstEnv::new();
        let e = bin(OperatorId::Plus, Expr::String("ab".into()), Expr::String("c".into()));
        assert_eq!(evaluate(&e, &env), Ok(ConstValue::Str("abc".into())));
        let e = bin(OperatorId::Lt, Expr::String("a".into()), Expr::String("b".into()));
        assert_eq!(evaluate(&e, &env), Ok(ConstValue::Bool(true)));
    }

    #[test]
    fn assignment_is_rejected() {
        let e = bin(OperatorId::Eq, Expr::int(1), Expr::int(1));
        assert_eq!(evaluate(&e, &ConstEnv::new()), Err(EvalError::NotConst("=")));
    }

    #[test]
    fn negative_values_rebuild_as_unary_minus() {
        assert_eq!(
            ConstValue::Int(-3).to_expr(),
            Some(Expr::unary(OperatorId::Minus, Expr::int(3)))
        );
        assert_eq!(ConstValue::Int(i128::from(u64::MAX) + 1).to_expr(), None);
    }
}
