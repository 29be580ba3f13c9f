//! The syntactic role an expression plays in its statement.
//!
//! Composite rewrites only know how to split a short-circuit chain or a
//! conditional expression when the enclosing statement consumes the value
//! in one of a few ways. [`ParentContext`] names those ways; the classifier
//! asks the upstream surrounder which one applies after its own rewrite.

use recast_flow::{are_mutually_exclusive, may_have_side_effects};
use recast_ir::ast::{AssignOp, ExprKind, StmtKind, TypeRef};
use recast_ir::{ExprId, StmtId, SyntaxTree};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParentContext {
    /// Value of a `return` or `yield`.
    Return,
    /// Right side of a simple assignment, or the sole initializer of a
    /// declaration with a known type.
    Assignment,
    /// The whole expression of an expression statement.
    Expression,
    /// Condition of an `if` that has no else branch, or whose else chain
    /// cannot tell whether the condition was split.
    SimpleIfCondition,
    Unknown,
}

/// Role of `expr` (modulo parentheses) as a direct part of `stmt`.
pub(crate) fn statement_context(tree: &SyntaxTree, expr: ExprId, stmt: StmtId) -> ParentContext {
    let top = tree.skip_parens_up(expr);
    match tree.stmt_kind(stmt) {
        StmtKind::Expr(e) if *e == top => ParentContext::Expression,
        StmtKind::Expr(e) => match tree.expr_kind(*e) {
            ExprKind::Assign {
                op: AssignOp::Assign,
                lhs,
                rhs,
            } if *rhs == top && is_simple_target(tree, *lhs) => ParentContext::Assignment,
            _ => ParentContext::Unknown,
        },
        StmtKind::Return(Some(v)) | StmtKind::Yield(v) if *v == top => ParentContext::Return,
        StmtKind::LocalVar {
            ty, declarators, ..
        } if declarators.len() == 1 && declarators[0].init == Some(top) => {
            if !ty.is_var() || initializer_type(tree, top).is_some() {
                ParentContext::Assignment
            } else {
                ParentContext::Unknown
            }
        }
        StmtKind::If {
            cond, else_branch, ..
        } if *cond == top => match else_branch {
            None => ParentContext::SimpleIfCondition,
            Some(else_branch) => match else_chain_conditions(tree, *else_branch) {
                Some(conds) if conds.iter().all(|&c| are_mutually_exclusive(tree, top, c)) => {
                    ParentContext::SimpleIfCondition
                }
                _ => ParentContext::Unknown,
            },
        },
        _ => ParentContext::Unknown,
    }
}

/// A local variable, or a field of `this`. Assigning to either evaluates
/// nothing, so the target can be duplicated into both branches of a split.
pub(crate) fn is_simple_target(tree: &SyntaxTree, lhs: ExprId) -> bool {
    match tree.expr_kind(tree.skip_parens(lhs)) {
        ExprKind::Name(_) => true,
        ExprKind::FieldAccess { qualifier, .. } => {
            matches!(tree.expr_kind(tree.skip_parens(*qualifier)), ExprKind::This)
        }
        _ => false,
    }
}

/// Inferred type of an initializer, looking through parentheses. `var` is
/// not a type.
pub(crate) fn initializer_type(tree: &SyntaxTree, init: ExprId) -> Option<TypeRef> {
    [init, tree.skip_parens(init)]
        .into_iter()
        .filter_map(|e| tree.expr(e).ty)
        .find(|ty| !ty.is_var())
}

/// Conditions of an `else if` chain that ends without a final `else`.
/// `None` when the chain has a final else or a condition with side effects.
fn else_chain_conditions(tree: &SyntaxTree, mut branch: StmtId) -> Option<Vec<ExprId>> {
    let mut conds = Vec::new();
    loop {
        match tree.stmt_kind(branch) {
            StmtKind::If {
                cond, else_branch, ..
            } => {
                if may_have_side_effects(tree, *cond) {
                    return None;
                }
                conds.push(*cond);
                match else_branch {
                    None => return Some(conds),
                    Some(next) => branch = *next,
                }
            }
            _ => return None,
        }
    }
}

/// Whether every condition of the else chain starting at `else_branch`
/// excludes one of `prefix`. Only then can an `if` on the rest of the
/// chain be nested inside an `if` on `prefix` without changing when the
/// else chain runs.
pub(crate) fn else_chain_excluded_by(
    tree: &SyntaxTree,
    prefix: &[ExprId],
    else_branch: StmtId,
) -> bool {
    else_chain_conditions(tree, else_branch).is_some_and(|conds| {
        conds
            .iter()
            .all(|&c| prefix.iter().any(|&p| are_mutually_exclusive(tree, p, c)))
    })
}
