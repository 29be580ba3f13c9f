//! Compile-time boolean constants.
//!
//! Only the forms the language treats as constant expressions without
//! symbol information: boolean literals, parentheses, `!`, `&&`, `||`, and
//! `==`/`!=` between boolean constants. Every operand must be constant.

use recast_ir::ast::{BinaryOp, ExprKind, Literal, UnaryOp};
use recast_ir::{ExprId, SyntaxTree};
use recast_stack::ensure_sufficient_stack;

/// The value of `expr` if it is a constant boolean expression.
pub fn constant_bool(tree: &SyntaxTree, expr: ExprId) -> Option<bool> {
    ensure_sufficient_stack(|| match tree.expr_kind(expr) {
        ExprKind::Literal(Literal::Bool(value)) => Some(*value),
        ExprKind::Paren(inner) => constant_bool(tree, *inner),
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => constant_bool(tree, *operand).map(|v| !v),
        ExprKind::Polyadic { op, operands } => {
            let mut values = operands.iter().map(|&o| constant_bool(tree, o));
            match op {
                BinaryOp::And => values.try_fold(true, |acc, v| v.map(|v| acc && v)),
                BinaryOp::Or => values.try_fold(false, |acc, v| v.map(|v| acc || v)),
                BinaryOp::Eq | BinaryOp::NotEq if operands.len() == 2 => {
                    let left = values.next()??;
                    let right = values.next()??;
                    Some((left == right) == (*op == BinaryOp::Eq))
                }
                _ => None,
            }
        }
        _ => None,
    })
}

#[inline]
pub fn is_constant_true(tree: &SyntaxTree, expr: ExprId) -> bool {
    constant_bool(tree, expr) == Some(true)
}

#[inline]
pub fn is_constant_false(tree: &SyntaxTree, expr: ExprId) -> bool {
    constant_bool(tree, expr) == Some(false)
}

/// Literals and operator trees over literals.
pub fn is_constant(tree: &SyntaxTree, expr: ExprId) -> bool {
    ensure_sufficient_stack(|| match tree.expr_kind(expr) {
        ExprKind::Literal(_) => true,
        ExprKind::Paren(inner) => is_constant(tree, *inner),
        ExprKind::Unary { op, operand } if !op.is_update() => is_constant(tree, *operand),
        ExprKind::Polyadic { operands, .. } => operands.iter().all(|&o| is_constant(tree, o)),
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            is_constant(tree, *cond) && is_constant(tree, *then_expr) && is_constant(tree, *else_expr)
        }
        _ => false,
    })
}
