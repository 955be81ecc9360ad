//! Abstract syntax tree for quix.
//!
//! The tree is a set of closed enums owned top-down: every child is held by value, in a `Box` or in a `Vec`,
//! so a deep copy is an ordinary `clone()` and no node is ever reachable from two parents.
//!
//! ## Notes
//! - Every node serialises to a `serde_json::Value` of the shape `{"type": "<Kind>", ...}` through
//!   [`AstNode::to_json`]. The format is for debugging and tooling, not persistence.
//! - Locations are kept on declarations only; they are not part of the JSON form.
//! - Rewrites go through [`crate::visit`].

use std::collections::BTreeSet;

use quix_core::lang::operators::{self, OperatorId};
use quix_core::lang::types::{self, PrimitiveId};
use serde_json::{Value, json};

use crate::location::Location;

/// Identifier (namespaced identifiers keep their `::` separators).
pub type Ident = String;

/// Behaviour shared by every node kind.
pub trait AstNode {
    /// Name of the node kind as it appears in the JSON `"type"` field.
    fn kind_name(&self) -> &'static str;

    /// Debug/interchange JSON form.
    fn to_json(&self) -> Value;
}

// ============================================================================
// Root and blocks
// ============================================================================

/// A whole translation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    pub body: Block,
}

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

// ============================================================================
// Statements and declarations
// ============================================================================

/// A statement. At top level and inside subsystems only declarations appear; `Return` only appears in
/// function bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(Binding),
    Let(Binding),
    Const(Binding),
    Struct(CompositeDecl),
    Union(CompositeDecl),
    Enum(EnumDecl),
    Function(FunctionDecl),
    Subsystem(SubsystemDecl),
    Export(ExportDecl),
    Return(ReturnStmt),
}

/// Which of the three binding forms a [`Binding`] was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Var => "Var",
            BindingKind::Let => "Let",
            BindingKind::Const => "Const",
        }
    }

    /// Source keyword (`var`, `let`, `const`).
    pub fn keyword(self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
        }
    }

    /// Only `var` bindings may be reassigned.
    pub fn is_mutable(self) -> bool {
        self == BindingKind::Var
    }
}

/// `var`/`let`/`const NAME: TYPE [= INIT];`
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Ident,
    pub ty: Type,
    pub init: Option<Expr>,
    pub loc: Location,
}

/// `struct`/`union NAME { fields };` or the field-less `struct NAME;`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeDecl {
    pub name: Ident,
    pub fields: Option<Vec<FieldDecl>>,
    pub loc: Location,
}

/// One field of a struct or union declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: Type,
    pub default: Option<Expr>,
}

/// `enum NAME : REPR { A [= expr], B };`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub repr: Type,
    pub variants: Vec<EnumVariant>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: Ident,
    pub value: Option<Expr>,
}

/// `fn NAME(params) [: RET] (; | { body })`. A missing body is a forward declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: Option<Block>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
}

/// `subsystem NAME [: deps] { body };`
#[derive(Debug, Clone, PartialEq)]
pub struct SubsystemDecl {
    pub name: Ident,
    pub deps: BTreeSet<Ident>,
    pub body: Block,
    pub loc: Location,
}

/// `pub DECL`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDecl {
    pub decl: Box<Stmt>,
    pub loc: Location,
}

/// `return [expr];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub loc: Location,
}

impl Stmt {
    /// Build a binding statement of the given kind.
    pub fn binding(kind: BindingKind, binding: Binding) -> Stmt {
        match kind {
            BindingKind::Var => Stmt::Var(binding),
            BindingKind::Let => Stmt::Let(binding),
            BindingKind::Const => Stmt::Const(binding),
        }
    }

    /// The binding and its kind, for `var`/`let`/`const` statements.
    pub fn as_binding(&self) -> Option<(BindingKind, &Binding)> {
        match self {
            Stmt::Var(b) => Some((BindingKind::Var, b)),
            Stmt::Let(b) => Some((BindingKind::Let, b)),
            Stmt::Const(b) => Some((BindingKind::Const, b)),
            _ => None,
        }
    }

    /// Declared name, if the statement declares one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Stmt::Var(b) | Stmt::Let(b) | Stmt::Const(b) => Some(&b.name),
            Stmt::Struct(d) | Stmt::Union(d) => Some(&d.name),
            Stmt::Enum(d) => Some(&d.name),
            Stmt::Function(d) => Some(&d.name),
            Stmt::Subsystem(d) => Some(&d.name),
            Stmt::Export(d) => d.decl.name(),
            Stmt::Return(_) => None,
        }
    }

    pub fn loc(&self) -> Location {
        match self {
            Stmt::Var(b) | Stmt::Let(b) | Stmt::Const(b) => b.loc,
            Stmt::Struct(d) | Stmt::Union(d) => d.loc,
            Stmt::Enum(d) => d.loc,
            Stmt::Function(d) => d.loc,
            Stmt::Subsystem(d) => d.loc,
            Stmt::Export(d) => d.loc,
            Stmt::Return(r) => r.loc,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// A const-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Ident),
    Integer(IntLiteral),
    Float(FloatLiteral),
    String(String),
    Char(char),
    Bool(bool),
    Null,
    Unary { op: OperatorId, operand: Box<Expr> },
    Binary { op: OperatorId, lhs: Box<Expr>, rhs: Box<Expr> },
}

/// Non-negative integer literal with its inferred storage width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLiteral {
    pub value: u64,
    pub width: u8,
}

/// Float literal, kept as normalised text so it compares exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatLiteral {
    pub text: String,
    pub width: u8,
}

impl FloatLiteral {
    pub fn value(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }
}

impl Expr {
    pub fn int(value: u64) -> Expr {
        Expr::Integer(IntLiteral {
            value,
            width: types::int_width_for(value),
        })
    }

    pub fn binary(op: OperatorId, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: OperatorId, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// `true` for literals of any kind.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::Integer(_) | Expr::Float(_) | Expr::String(_) | Expr::Char(_) | Expr::Bool(_) | Expr::Null
        )
    }
}

// ============================================================================
// Types
// ============================================================================

/// A type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveId),
    Array { elem: Box<Type>, len: u64 },
    Struct(Vec<TypeField>),
    Union(Vec<TypeField>),
    /// A struct, union or enum declared earlier in the same unit.
    Named(Ident),
}

/// One field of an anonymous struct or union type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeField {
    pub name: Ident,
    pub ty: Type,
}

impl Type {
    pub fn array(elem: Type, len: u64) -> Type {
        Type::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub const VOID: Type = Type::Primitive(PrimitiveId::Void);
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(id) => f.write_str(types::as_str(*id)),
            Type::Array { elem, len } => write!(f, "array<{elem}, {len}>"),
            Type::Struct(fields) | Type::Union(fields) => {
                let keyword = if matches!(self, Type::Struct(_)) { "struct" } else { "union" };
                write!(f, "{keyword} {{")?;
                for field in fields {
                    write!(f, " {}: {};", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            Type::Named(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// JSON
// ============================================================================

fn stmts_json(stmts: &[Stmt]) -> Value {
    Value::Array(stmts.iter().map(AstNode::to_json).collect())
}

fn opt_json<T: AstNode>(node: Option<&T>) -> Value {
    node.map_or(Value::Null, AstNode::to_json)
}

impl AstNode for Root {
    fn kind_name(&self) -> &'static str {
        "Root"
    }

    fn to_json(&self) -> Value {
        json!({ "type": "Root", "stmts": stmts_json(&self.body.stmts) })
    }
}

impl AstNode for Block {
    fn kind_name(&self) -> &'static str {
        "Block"
    }

    fn to_json(&self) -> Value {
        json!({ "type": "Block", "stmts": stmts_json(&self.stmts) })
    }
}

impl AstNode for Stmt {
    fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Var(_) => "Var",
            Stmt::Let(_) => "Let",
            Stmt::Const(_) => "Const",
            Stmt::Struct(_) => "Struct",
            Stmt::Union(_) => "Union",
            Stmt::Enum(_) => "Enum",
            Stmt::Function(_) => "Function",
            Stmt::Subsystem(_) => "Subsystem",
            Stmt::Export(_) => "Export",
            Stmt::Return(_) => "Return",
        }
    }

    fn to_json(&self) -> Value {
        let kind = self.kind_name();
        match self {
            Stmt::Var(b) | Stmt::Let(b) | Stmt::Const(b) => json!({
                "type": kind,
                "name": b.name,
                "ty": b.ty.to_json(),
                "init": opt_json(b.init.as_ref()),
            }),
            Stmt::Struct(d) | Stmt::Union(d) => json!({
                "type": kind,
                "name": d.name,
                "fields": d.fields.as_ref().map_or(Value::Null, |fields| {
                    fields
                        .iter()
                        .map(|f| json!({ "name": f.name, "ty": f.ty.to_json(), "default": opt_json(f.default.as_ref()) }))
                        .collect()
                }),
            }),
            Stmt::Enum(d) => json!({
                "type": kind,
                "name": d.name,
                "repr": d.repr.to_json(),
                "variants": d
                    .variants
                    .iter()
                    .map(|v| json!({ "name": v.name, "value": opt_json(v.value.as_ref()) }))
                    .collect::<Vec<_>>(),
            }),
            Stmt::Function(d) => json!({
                "type": kind,
                "name": d.name,
                "params": d
                    .params
                    .iter()
                    .map(|p| json!({ "name": p.name, "ty": p.ty.to_json() }))
                    .collect::<Vec<_>>(),
                "ret": d.ret.to_json(),
                "body": opt_json(d.body.as_ref()),
            }),
            Stmt::Subsystem(d) => json!({
                "type": kind,
                "name": d.name,
                "deps": d.deps.iter().collect::<Vec<_>>(),
                "body": d.body.to_json(),
            }),
            Stmt::Export(d) => json!({ "type": kind, "decl": d.decl.to_json() }),
            Stmt::Return(r) => json!({ "type": kind, "value": opt_json(r.value.as_ref()) }),
        }
    }
}

impl AstNode for Expr {
    fn kind_name(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "Identifier",
            Expr::Integer(_) => "IntegerLiteral",
            Expr::Float(_) => "FloatLiteral",
            Expr::String(_) => "StringLiteral",
            Expr::Char(_) => "CharLiteral",
            Expr::Bool(_) => "BoolLiteral",
            Expr::Null => "NullLiteral",
            Expr::Unary { .. } => "UnaryExpr",
            Expr::Binary { .. } => "BinaryExpr",
        }
    }

    fn to_json(&self) -> Value {
        let kind = self.kind_name();
        match self {
            Expr::Identifier(name) => json!({ "type": kind, "name": name }),
            Expr::Integer(lit) => json!({ "type": kind, "value": lit.value, "width": lit.width }),
            Expr::Float(lit) => json!({ "type": kind, "value": lit.text, "width": lit.width }),
            Expr::String(s) => json!({ "type": kind, "value": s }),
            Expr::Char(c) => json!({ "type": kind, "value": c.to_string() }),
            Expr::Bool(b) => json!({ "type": kind, "value": b }),
            Expr::Null => json!({ "type": kind }),
            Expr::Unary { op, operand } => json!({
                "type": kind,
                "op": operators::as_str(*op),
                "operand": operand.to_json(),
            }),
            Expr::Binary { op, lhs, rhs } => json!({
                "type": kind,
                "op": operators::as_str(*op),
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
            }),
        }
    }
}

impl AstNode for Type {
    fn kind_name(&self) -> &'static str {
        match self {
            Type::Primitive(id) => types::as_str(*id),
            Type::Array { .. } => "Array",
            Type::Struct(_) => "StructType",
            Type::Union(_) => "UnionType",
            Type::Named(_) => "Named",
        }
    }

    fn to_json(&self) -> Value {
        let kind = self.kind_name();
        match self {
            Type::Primitive(_) => json!({ "type": kind }),
            Type::Array { elem, len } => json!({ "type": kind, "of": elem.to_json(), "len": len }),
            Type::Struct(fields) | Type::Union(fields) => json!({
                "type": kind,
                "fields": fields
                    .iter()
                    .map(|f| json!({ "name": f.name, "ty": f.ty.to_json() }))
                    .collect::<Vec<_>>(),
            }),
            Type::Named(name) => json!({ "type": kind, "name": name }),
        }
    }
}
