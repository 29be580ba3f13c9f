//! Mutual exclusivity of boolean conditions.
//!
//! Best effort: `true` means the two conditions can never hold at the same
//! time; `false` means they might, or that the shapes are not recognized.


use recast_ir::ast::{BinaryOp, ExprKind, Literal, UnaryOp};
use recast_ir::equivalence::equivalent;
use recast_ir::{ExprId, SyntaxTree};
use recast_stack::ensure_sufficient_stack;

pub fn are_mutually_exclusive(tree: &SyntaxTree, a: ExprId, b: ExprId) -> bool {
    ensure_sufficient_stack(|| exclusive(tree, tree.skip_parens(a), tree.skip_parens(b)))
}

fn exclusive(tree: &SyntaxTree, a: ExprId, b: ExprId) -> bool {
    if is_negation_of(tree, a, b) || is_negation_of(tree, b, a) {
        return true;
    }
    if let ExprKind::Polyadic {
        op: BinaryOp::And,
        operands,
    } = tree.expr_kind(a)
    {
        if operands.iter().any(|&o| are_mutually_exclusive(tree, o, b)) {
            return true;
        }
    }
    if let ExprKind::Polyadic {
        op: BinaryOp::And,
        operands,
    } = tree.expr_kind(b)
    {
        if operands.iter().any(|&o| are_mutually_exclusive(tree, a, o)) {
            return true;
        }
    }
    if let ExprKind::Polyadic {
        op: BinaryOp::Or,
        operands,
    } = tree.expr_kind(a)
    {
        if operands.iter().all(|&o| are_mutually_exclusive(tree, o, b)) {
            return true;
        }
    }
    if let ExprKind::Polyadic {
        op: BinaryOp::Or,
        operands,
    } = tree.expr_kind(b)
    {
        if operands.iter().all(|&o| are_mutually_exclusive(tree, a, o)) {
            return true;
        }
    }
    comparisons_exclusive(tree, a, b)
}

/// `negated` is `!x` and `x` is equivalent to `other`.
fn is_negation_of(tree: &SyntaxTree, negated: ExprId, other: ExprId) -> bool {
    match tree.expr_kind(negated) {
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => equivalent(tree, *operand, other),
        _ => false,
    }
}

fn comparison(tree: &SyntaxTree, expr: ExprId) -> Option<(BinaryOp, ExprId, ExprId)> {
    match tree.expr_kind(expr) {
        ExprKind::Polyadic { op, operands } if operands.len() == 2 && op.flipped().is_some() => {
            Some((*op, operands[0], operands[1]))
        }
        _ => None,
    }
}

fn comparisons_exclusive(tree: &SyntaxTree, a: ExprId, b: ExprId) -> bool {
    let (Some((op_a, left_a, right_a)), Some((op_b, left_b, right_b))) =
        (comparison(tree, a), comparison(tree, b))
    else {
        return false;
    };
    // Line `b` up with `a` so both compare the same left operand.
    let (op_b, left_b, right_b) = if equivalent(tree, left_a, left_b) {
        (op_b, left_b, right_b)
    } else if equivalent(tree, left_a, right_b) {
        match op_b.flipped() {
            Some(flipped) => (flipped, right_b, left_b),
            None => return false,
        }
    } else if equivalent(tree, right_a, right_b) {
        // Same right operand, compared against distinct left literals.
        return op_a == BinaryOp::Eq
            && op_b == BinaryOp::Eq
            && distinct_literals(tree, left_a, left_b);
    } else {
        return false;
    };
    debug_assert!(equivalent(tree, left_a, left_b));

    if equivalent(tree, right_a, right_b) {
        return matches!(
            (op_a, op_b),
            (BinaryOp::Eq, BinaryOp::NotEq)
                | (BinaryOp::NotEq, BinaryOp::Eq)
                | (BinaryOp::Lt, BinaryOp::GtEq | BinaryOp::Gt | BinaryOp::Eq)
                | (BinaryOp::GtEq, BinaryOp::Lt)
                | (BinaryOp::Gt, BinaryOp::LtEq | BinaryOp::Lt | BinaryOp::Eq)
                | (BinaryOp::LtEq, BinaryOp::Gt)
                | (BinaryOp::Eq, BinaryOp::Lt | BinaryOp::Gt)
        );
    }
    op_a == BinaryOp::Eq && op_b == BinaryOp::Eq && distinct_literals(tree, right_a, right_b)
}

/// Two literals of the same kind with different values.
fn distinct_literals(tree: &SyntaxTree, a: ExprId, b: ExprId) -> bool {
    match (
        tree.expr_kind(tree.skip_parens(a)),
        tree.expr_kind(tree.skip_parens(b)),
    ) {
        (ExprKind::Literal(la), ExprKind::Literal(lb)) => {
            std::mem::discriminant(la) == std::mem::discriminant(lb)
                && la != lb
                && !matches!(la, Literal::Null)
        }
        _ => false,
    }
}
