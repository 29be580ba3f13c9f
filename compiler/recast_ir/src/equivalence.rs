//! Structural equivalence of expressions.
//!
//! Two expressions are equivalent when they have the same shape, operators,
//! names and literals, ignoring parentheses and node ids. Expressions that
//! own statements or class bodies (lambdas, switch expressions, anonymous
//! classes) are only equivalent to themselves.

use recast_stack::ensure_sufficient_stack;

use crate::ast::ExprKind;
use crate::{ExprId, SyntaxTree};

pub fn equivalent(tree: &SyntaxTree, a: ExprId, b: ExprId) -> bool {
    let a = tree.skip_parens(a);
    let b = tree.skip_parens(b);
    if a == b {
        return true;
    }
    ensure_sufficient_stack(|| match (tree.expr_kind(a), tree.expr_kind(b)) {
        (ExprKind::Literal(x), ExprKind::Literal(y)) => x == y,
        (ExprKind::Name(x), ExprKind::Name(y)) => x == y,
        (ExprKind::This, ExprKind::This) => true,
        (
            ExprKind::FieldAccess {
                qualifier: qa,
                name: na,
            },
            ExprKind::FieldAccess {
                qualifier: qb,
                name: nb,
            },
        ) => na == nb && equivalent(tree, *qa, *qb),
        (
            ExprKind::MethodCall {
                qualifier: qa,
                name: na,
                args: aa,
            },
            ExprKind::MethodCall {
                qualifier: qb,
                name: nb,
                args: ab,
            },
        ) => {
            na == nb
                && match (qa, qb) {
                    (Some(x), Some(y)) => equivalent(tree, *x, *y),
                    (None, None) => true,
                    _ => false,
                }
                && all_equivalent(tree, aa, ab)
        }
        (
            ExprKind::New {
                class: ca,
                args: aa,
                body: None,
            },
            ExprKind::New {
                class: cb,
                args: ab,
                body: None,
            },
        ) => ca == cb && all_equivalent(tree, aa, ab),
        (
            ExprKind::ConstructorCall { kind: ka, args: aa },
            ExprKind::ConstructorCall { kind: kb, args: ab },
        ) => ka == kb && all_equivalent(tree, aa, ab),
        (
            ExprKind::Unary {
                op: oa,
                operand: xa,
            },
            ExprKind::Unary {
                op: ob,
                operand: xb,
            },
        ) => oa == ob && equivalent(tree, *xa, *xb),
        (
            ExprKind::Polyadic {
                op: oa,
                operands: xa,
            },
            ExprKind::Polyadic {
                op: ob,
                operands: xb,
            },
        ) => oa == ob && all_equivalent(tree, xa, xb),
        (
            ExprKind::Assign {
                op: oa,
                lhs: la,
                rhs: ra,
            },
            ExprKind::Assign {
                op: ob,
                lhs: lb,
                rhs: rb,
            },
        ) => oa == ob && equivalent(tree, *la, *lb) && equivalent(tree, *ra, *rb),
        (
            ExprKind::Conditional {
                cond: ca,
                then_expr: ta,
                else_expr: ea,
            },
            ExprKind::Conditional {
                cond: cb,
                then_expr: tb,
                else_expr: eb,
            },
        ) => {
            equivalent(tree, *ca, *cb) && equivalent(tree, *ta, *tb) && equivalent(tree, *ea, *eb)
        }
        (
            ExprKind::ArrayAccess {
                array: xa,
                index: ia,
            },
            ExprKind::ArrayAccess {
                array: xb,
                index: ib,
            },
        ) => equivalent(tree, *xa, *xb) && equivalent(tree, *ia, *ib),
        (
            ExprKind::Cast {
                ty: ta,
                operand: xa,
            },
            ExprKind::Cast {
                ty: tb,
                operand: xb,
            },
        )
        | (
            ExprKind::InstanceOf {
                operand: xa,
                ty: ta,
            },
            ExprKind::InstanceOf {
                operand: xb,
                ty: tb,
            },
        ) => ta == tb && equivalent(tree, *xa, *xb),
        _ => false,
    })
}

fn all_equivalent(tree: &SyntaxTree, a: &[ExprId], b: &[ExprId]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| equivalent(tree, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    #[test]
    fn test_parens_are_ignored() {
        let mut tree = SyntaxTree::new();
        let a = tree.mk_name("a");
        let one = tree.mk_int(1);
        let sum = tree.mk_binary(BinaryOp::Add, a, one);
        let wrapped = tree.mk_paren(sum);

        let a2 = tree.mk_name("a");
        let one2 = tree.mk_int(1);
        let sum2 = tree.mk_binary(BinaryOp::Add, a2, one2);

        assert!(equivalent(&tree, wrapped, sum2));
    }

    #[test]
    fn test_different_names_differ() {
        let mut tree = SyntaxTree::new();
        let x = tree.mk_name("x");
        let y = tree.mk_name("y");
        let fx = tree.mk_field_access(x, "f");
        let fy = tree.mk_field_access(y, "f");
        assert!(!equivalent(&tree, fx, fy));
    }

    #[test]
    fn test_lambdas_only_equal_themselves() {
        let mut tree = SyntaxTree::new();
        let b1 = tree.mk_name("x");
        let b2 = tree.mk_name("x");
        let l1 = tree.mk_lambda(&["x"], crate::ast::LambdaBody::Expr(b1), true);
        let l2 = tree.mk_lambda(&["x"], crate::ast::LambdaBody::Expr(b2), true);
        assert!(equivalent(&tree, l1, l1));
        assert!(!equivalent(&tree, l1, l2));
    }
}
