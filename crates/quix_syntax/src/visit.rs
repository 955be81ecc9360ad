//! Generic depth-first traversal with in-place replacement.
//!
//! A visitor receives the kind name of the parent node and a mutable [`Slot`] holding one child. Assigning
//! through the slot replaces that child in the tree; in pre-order the walk then descends into the
//! replacement.
//!
//! ## Examples
//! ```rust
//! use quix_syntax::ast::Expr;
//! use quix_syntax::visit::{Order, Slot, Traverse};
//!
//! let mut expr = Expr::binary(
//!     quix_core::lang::operators::OperatorId::Plus,
//!     Expr::Identifier("a".into()),
//!     Expr::Identifier("b".into()),
//! );
//! let mut renamed = 0;
//! expr.depth_first_traversal(Order::PreOrder, &mut |_parent, slot| {
//!     if let Slot::Expr(e @ Expr::Identifier(_)) = slot {
//!         *e = Expr::Identifier("z".into());
//!         renamed += 1;
//!     }
//! });
//! assert_eq!(renamed, 2);
//! ```

use crate::ast::{Block, Expr, Root, Stmt, Type};

/// Whether a node is visited before or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    PreOrder,
    PostOrder,
}

/// A mutable reference to one child position in the tree.
#[derive(Debug)]
pub enum Slot<'a> {
    Stmt(&'a mut Stmt),
    Expr(&'a mut Expr),
    Type(&'a mut Type),
}

/// Visitor callback: `(parent kind name, child slot)`.
pub type Visitor<'v> = dyn FnMut(&'static str, Slot<'_>) + 'v;

/// Nodes that can be walked.
pub trait Traverse {
    /// Walk every descendant of `self`, calling `visit` once per child slot.
    ///
    /// `self` itself is not offered as a slot, since it has no parent.
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>);
}

impl Traverse for Root {
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>) {
        walk_stmts(&mut self.body.stmts, "Root", order, visit);
    }
}

impl Traverse for Block {
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>) {
        walk_stmts(&mut self.stmts, "Block", order, visit);
    }
}

impl Traverse for Stmt {
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>) {
        stmt_children(self, order, visit);
    }
}

impl Traverse for Expr {
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>) {
        expr_children(self, order, visit);
    }
}

impl Traverse for Type {
    fn depth_first_traversal(&mut self, order: Order, visit: &mut Visitor<'_>) {
        type_children(self, order, visit);
    }
}

// ============================================================================
// Walkers
// ============================================================================

fn walk_stmts(stmts: &mut [Stmt], parent: &'static str, order: Order, visit: &mut Visitor<'_>) {
    for stmt in stmts {
        walk_stmt(stmt, parent, order, visit);
    }
}

fn walk_stmt(stmt: &mut Stmt, parent: &'static str, order: Order, visit: &mut Visitor<'_>) {
    if order == Order::PreOrder {
        visit(parent, Slot::Stmt(stmt));
    }
    stmt_children(stmt, order, visit);
    if order == Order::PostOrder {
        visit(parent, Slot::Stmt(stmt));
    }
}

fn stmt_children(stmt: &mut Stmt, order: Order, visit: &mut Visitor<'_>) {
    use crate::ast::AstNode;

    let kind = stmt.kind_name();
    match stmt {
        Stmt::Var(b) | Stmt::Let(b) | Stmt::Const(b) => {
            walk_type(&mut b.ty, kind, order, visit);
            if let Some(init) = &mut b.init {
                walk_expr(init, kind, order, visit);
            }
        }
        Stmt::Struct(d) | Stmt::Union(d) => {
            for field in d.fields.iter_mut().flatten() {
                walk_type(&mut field.ty, kind, order, visit);
                if let Some(default) = &mut field.default {
                    walk_expr(default, kind, order, visit);
                }
            }
        }
        Stmt::Enum(d) => {
            walk_type(&mut d.repr, kind, order, visit);
            for value in d.variants.iter_mut().filter_map(|v| v.value.as_mut()) {
                walk_expr(value, kind, order, visit);
            }
        }
        Stmt::Function(d) => {
            for param in &mut d.params {
                walk_type(&mut param.ty, kind, order, visit);
            }
            walk_type(&mut d.ret, kind, order, visit);
            if let Some(body) = &mut d.body {
                walk_stmts(&mut body.stmts, "Block", order, visit);
            }
        }
        Stmt::Subsystem(d) => walk_stmts(&mut d.body.stmts, "Block", order, visit),
        Stmt::Export(d) => walk_stmt(&mut d.decl, kind, order, visit),
        Stmt::Return(r) => {
            if let Some(value) = &mut r.value {
                walk_expr(value, kind, order, visit);
            }
        }
    }
}

fn walk_expr(expr: &mut Expr, parent: &'static str, order: Order, visit: &mut Visitor<'_>) {
    if order == Order::PreOrder {
        visit(parent, Slot::Expr(expr));
    }
    expr_children(expr, order, visit);
    if order == Order::PostOrder {
        visit(parent, Slot::Expr(expr));
    }
}

fn expr_children(expr: &mut Expr, order: Order, visit: &mut Visitor<'_>) {
    match expr {
        Expr::Unary { operand, .. } => walk_expr(operand, "UnaryExpr", order, visit),
        Expr::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, "BinaryExpr", order, visit);
            walk_expr(rhs, "BinaryExpr", order, visit);
        }
        Expr::Identifier(_)
        | Expr::Integer(_)
        | Expr::Float(_)
        | Expr::String(_)
        | Expr::Char(_)
        | Expr::Bool(_)
        | Expr::Null => {}
    }
}

fn walk_type(ty: &mut Type, parent: &'static str, order: Order, visit: &mut Visitor<'_>) {
    if order == Order::PreOrder {
        visit(parent, Slot::Type(ty));
    }
    type_children(ty, order, visit);
    if order == Order::PostOrder {
        visit(parent, Slot::Type(ty));
    }
}

fn type_children(ty: &mut Type, order: Order, visit: &mut Visitor<'_>) {
    match ty {
        Type::Array { elem, .. } => walk_type(elem, "Array", order, visit),
        Type::Struct(fields) => {
            for field in fields {
                walk_type(&mut field.ty, "StructType", order, visit);
            }
        }
        Type::Union(fields) => {
            for field in fields {
                walk_type(&mut field.ty, "UnionType", order, visit);
            }
        }
        Type::Primitive(_) | Type::Named(_) => {}
    }
}
