use quix_core::lang::operators::OperatorId;
use quix_syntax::ast::{Expr, Root};
use quix_syntax::const_eval::{self, ConstEnv};
use quix_syntax::visit::{Order, Slot, Traverse};

/// Collapse `+` chains whose operands are all string literals into one literal.
///
/// `"a" + "b" + "c"` becomes `"abc"`. A chain with any non-string operand is left as it is, though string-only
/// sub-chains inside it are still folded.
pub fn fold_string_concat(root: &mut Root) -> usize {
    let mut replaced = 0;
    root.depth_first_traversal(Order::PreOrder, &mut |_parent, slot| {
        let Slot::Expr(expr) = slot else { return };
        if !matches!(expr, Expr::Binary { op: OperatorId::Plus, .. }) {
            return;
        }
        if let Some(joined) = concat_chain(expr) {
            *expr = Expr::String(joined);
            replaced += 1;
        }
    });
    if replaced > 0 {
        tracing::debug!(replaced, "folded string concatenations");
    }
    replaced
}

fn concat_chain(expr: &Expr) -> Option<String> {
    match expr {
        Expr::String(s) => Some(s.clone()),
        Expr::Binary {
            op: OperatorId::Plus,
            lhs,
            rhs,
        } => {
            let mut joined = concat_chain(lhs)?;
            joined.push_str(&concat_chain(rhs)?);
            Some(joined)
        }
        _ => None,
    }
}

/// Replace operator subtrees whose operands are all literals by their value.
///
/// Integer arithmetic is checked; a subtree that overflows, divides by zero or names an identifier is kept.
pub fn fold_constants(root: &mut Root) -> usize {
    let env = ConstEnv::new();
    let mut replaced = 0;
    root.depth_first_traversal(Order::PostOrder, &mut |_parent, slot| {
        let Slot::Expr(expr) = slot else { return };
        if !matches!(expr, Expr::Unary { .. } | Expr::Binary { .. }) {
            return;
        }
        let Some(folded) = const_eval::evaluate(expr, &env).ok().and_then(|v| v.to_expr()) else {
            return;
        };
        // Negative results come back as a unary minus, which is already folded.
        if folded != *expr {
            *expr = folded;
            replaced += 1;
        }
    });
    if replaced > 0 {
        tracing::debug!(replaced, "folded constant expressions");
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use quix_syntax::ast::Stmt;
    use quix_syntax::diagnostics::Diagnostics;
    use quix_syntax::parser;

    fn init_of(root: &Root, index: usize) -> Option<&Expr> {
        root.body.stmts[index].as_binding().and_then(|(_, b)| b.init.as_ref())
    }

    fn parse(src: &str) -> Root {
        parser::parse_source(src, &mut Diagnostics::new()).expect("parses")
    }

    #[test]
    fn string_chain_folds_to_one_literal() {
        let mut root = parse(r#"const s: string = "a" + "b" + "c";"#);
        assert_eq!(fold_string_concat(&mut root), 1);
        assert_eq!(init_of(&root, 0), Some(&Expr::String("abc".into())));
    }

    #[test]
    fn mixed_chain_keeps_non_strings() {
        let mut root = parse(r#"const n: i32 = 1; const s: string = "a" + "b" + n;"#);
        assert_eq!(fold_string_concat(&mut root), 1);
        let expected = Expr::binary(OperatorId::Plus, Expr::String("ab".into()), Expr::Identifier("n".into()));
        assert_eq!(init_of(&root, 1), Some(&expected));
    }

    #[test]
    fn arithmetic_folds_bottom_up() {
        let mut root = parse("let x: i32 = (1 + 2) * 4; let y: bool = 3 < 2 || true;");
        assert!(fold_constants(&mut root) >= 2);
        assert_eq!(init_of(&root, 0), Some(&Expr::int(12)));
        assert_eq!(init_of(&root, 1), Some(&Expr::Bool(true)));
    }

    #[test]
    fn negative_results_are_stable() {
        let mut root = parse("let x: i32 = 2 - 5;");
        assert_eq!(fold_constants(&mut root), 1);
        assert_eq!(init_of(&root, 0), Some(&Expr::unary(OperatorId::Minus, Expr::int(3))));
        assert_eq!(fold_constants(&mut root), 0);
    }

    #[test]
    fn identifiers_and_overflow_are_left_alone() {
        let mut root = parse("const a: u8 = 1; let x: u8 = a + 1; let y: u64 = 18446744073709551615 * 2;");
        assert_eq!(fold_constants(&mut root), 0);
        assert!(matches!(&root.body.stmts[1], Stmt::Let(_)));
        assert!(matches!(init_of(&root, 2), Some(Expr::Binary { .. })));
    }
}
