//! Choosing the rewrite for an expression.
//!
//! The walk climbs expression parents until it meets a construct that
//! decides the rewrite: a lambda body, a short-circuit operand, a
//! conditional branch, or the statement or member holding the expression.
//! Chains and conditionals are classified recursively, and their rewrite
//! is composed with the one chosen for the chain or conditional itself.

use recast_flow::are_mutually_exclusive;
use recast_ir::ast::{BinaryOp, ClassKind, ExprKind, LambdaBody, Member, StmtKind, TypeRef};
use recast_ir::{ExprId, MemberId, NodeId, StmtId, SyntaxTree};
use recast_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::context::{else_chain_excluded_by, initializer_type, ParentContext};
use crate::options::SurroundOptions;
use crate::variants::for_split::init_names_used_after;
use crate::variants::{
    AnonymousCall, BlockWrap, ExtractFieldInit, ForSplit, LambdaWrap, NoOp, ShortCircuitSplit,
    SimpleWrap, SplitTry, TernarySplit, WhileCondition, YieldWrap,
};
use crate::Surrounder;

pub(crate) fn classify(
    tree: &SyntaxTree,
    expr: ExprId,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    ensure_sufficient_stack(|| {
        let chosen = classify_inner(tree, expr, options)?;
        debug!(?expr, variant = chosen.name(), "classified");
        Some(chosen)
    })
}

fn unsupported(expr: ExprId, reason: &'static str) -> Option<Surrounder> {
    trace!(?expr, reason, "unsupported context");
    None
}

fn classify_inner(
    tree: &SyntaxTree,
    expr: ExprId,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    if !tree.is_attached(NodeId::Expr(expr)) {
        return unsupported(expr, "expression is not attached");
    }
    let mut current = expr;
    loop {
        let parent = match tree.parent(NodeId::Expr(current)) {
            Some(NodeId::Expr(parent)) => parent,
            Some(NodeId::Stmt(stmt)) => return in_statement(tree, expr, current, stmt),
            Some(NodeId::Member(member)) => return in_member(tree, expr, current, member, options),
            Some(NodeId::Class(_)) | None => return unsupported(expr, "no enclosing statement"),
        };
        match tree.expr_kind(parent) {
            ExprKind::Lambda {
                body: LambdaBody::Expr(body),
                ..
            } if *body == current => {
                return Some(Surrounder::Lambda(LambdaWrap {
                    expr,
                    lambda: parent,
                }));
            }
            ExprKind::Polyadic {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                operands,
            } => {
                let index = operands.iter().position(|&o| o == current);
                if let Some(index @ 1..) = index {
                    return short_circuit(tree, expr, parent, *op, index, options);
                }
            }
            ExprKind::Conditional {
                then_expr,
                else_expr,
                ..
            } if *then_expr == current || *else_expr == current => {
                return ternary(tree, expr, parent, options);
            }
            ExprKind::ConstructorCall { .. } if !options.statements_before_super => {
                return unsupported(expr, "argument of this(..) or super(..)");
            }
            _ => {}
        }
        current = parent;
    }
}

fn short_circuit(
    tree: &SyntaxTree,
    expr: ExprId,
    chain: ExprId,
    op: BinaryOp,
    index: usize,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    let slot = tree.skip_parens_up(chain);
    if op == BinaryOp::And {
        if let Some(NodeId::Stmt(lp)) = tree.parent(NodeId::Expr(slot)) {
            if matches!(tree.stmt_kind(lp), StmtKind::While { cond, .. } if *cond == slot) {
                return Some(Surrounder::WhileCondition(WhileCondition {
                    expr,
                    lp,
                    split: index,
                }));
            }
        }
    }

    let upstream = classify(tree, chain, options)?;
    let context = upstream.expected_parent_context(tree);
    match (op, context) {
        (BinaryOp::And, ParentContext::Return | ParentContext::SimpleIfCondition)
        | (BinaryOp::Or, ParentContext::Return) => {}
        _ => {
            trace!(?expr, ?op, ?context, "chain consumed in an unsplittable context");
            return None;
        }
    }
    if context == ParentContext::SimpleIfCondition && !else_chain_excluded(tree, chain, slot, index)
    {
        return unsupported(expr, "else branch could run after the split");
    }
    Some(Surrounder::ShortCircuitSplit(ShortCircuitSplit {
        expr,
        chain,
        index,
        upstream: Box::new(upstream),
    }))
}

/// After `if (a && b) T else E` becomes `if (a) { if (b) T } else E`, the
/// else chain no longer runs when `a` holds and `b` fails. That is only
/// invisible when every condition of the chain excludes some operand of
/// the prefix.
fn else_chain_excluded(tree: &SyntaxTree, chain: ExprId, slot: ExprId, index: usize) -> bool {
    let Some(NodeId::Stmt(stmt)) = tree.parent(NodeId::Expr(slot)) else {
        return false;
    };
    let else_branch = match tree.stmt_kind(stmt) {
        StmtKind::If { else_branch, .. } => *else_branch,
        _ => None,
    };
    let Some(else_branch) = else_branch else {
        return true;
    };
    let ExprKind::Polyadic { operands, .. } = tree.expr_kind(chain) else {
        return false;
    };
    else_chain_excluded_by(tree, &operands[..index], else_branch)
}

fn ternary(
    tree: &SyntaxTree,
    expr: ExprId,
    conditional: ExprId,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    if !branches_keep_type(tree, conditional) {
        return unsupported(expr, "branch converted to the conditional's type");
    }
    let upstream = classify(tree, conditional, options)?;
    match upstream.expected_parent_context(tree) {
        ParentContext::Assignment | ParentContext::Return => {
            Some(Surrounder::TernarySplit(TernarySplit {
                expr,
                ternary: conditional,
                upstream: Box::new(upstream),
            }))
        }
        context => {
            trace!(?expr, ?context, "conditional consumed in an unsplittable context");
            None
        }
    }
}

/// `c ? 1 : 'a'` is an `int`: each branch is converted to the type of the
/// conditional. Separate statements for the branches lose that conversion,
/// which is only harmless when the value lands in a target of exactly the
/// conditional's type.
fn branches_keep_type(tree: &SyntaxTree, conditional: ExprId) -> bool {
    let Some(ty) = initializer_type(tree, conditional) else {
        return true;
    };
    let ExprKind::Conditional {
        then_expr,
        else_expr,
        ..
    } = *tree.expr_kind(conditional)
    else {
        return false;
    };
    let converted = [then_expr, else_expr]
        .into_iter()
        .any(|branch| initializer_type(tree, branch).is_some_and(|b| b != ty));
    !converted || consumer_type(tree, conditional) == Some(ty)
}

/// Type of the variable, field or return slot the conditional's value is
/// stored in, when the tree records it.
fn consumer_type(tree: &SyntaxTree, conditional: ExprId) -> Option<TypeRef> {
    let slot = tree.skip_parens_up(conditional);
    match tree.parent(NodeId::Expr(slot))? {
        NodeId::Stmt(stmt) => match tree.stmt_kind(stmt) {
            StmtKind::LocalVar { ty, .. } if ty.is_var() => initializer_type(tree, slot),
            StmtKind::LocalVar { ty, .. } => Some(*ty),
            StmtKind::Return(_) => return_type(tree, stmt),
            _ => None,
        },
        NodeId::Expr(parent) => match tree.expr_kind(parent) {
            ExprKind::Assign { lhs, rhs, .. } if *rhs == slot => initializer_type(tree, *lhs),
            _ => None,
        },
        NodeId::Member(_) | NodeId::Class(_) => None,
    }
}

/// Declared return type of the method a `return` exits. Lambdas have none
/// in the tree.
fn return_type(tree: &SyntaxTree, ret: StmtId) -> Option<TypeRef> {
    for node in tree.ancestors(NodeId::Stmt(ret)) {
        match node {
            NodeId::Expr(e) if matches!(tree.expr_kind(e), ExprKind::Lambda { .. }) => return None,
            NodeId::Member(member) => {
                return match tree.member(member) {
                    Member::Method { return_ty, .. } => *return_ty,
                    _ => None,
                };
            }
            _ => {}
        }
    }
    None
}

/// `stmt`, or the outermost label wrapping it.
fn outermost_label(tree: &SyntaxTree, mut stmt: StmtId) -> StmtId {
    while let Some(parent) = tree.parent_stmt(stmt) {
        match tree.stmt_kind(parent) {
            StmtKind::Labeled { body, .. } if *body == stmt => stmt = parent,
            _ => break,
        }
    }
    stmt
}

/// `top` is the direct child of `stmt` holding the expression.
fn in_statement(tree: &SyntaxTree, expr: ExprId, top: ExprId, stmt: StmtId) -> Option<Surrounder> {
    match tree.stmt_kind(stmt) {
        StmtKind::For { .. } => return unsupported(expr, "for condition or update"),
        StmtKind::DoWhile { .. } => return unsupported(expr, "do-while condition"),
        StmtKind::CaseLabel { .. } => return unsupported(expr, "case label value"),
        StmtKind::SwitchRule { values, .. } if values.contains(&top) => {
            return unsupported(expr, "case label value");
        }
        StmtKind::While { cond, .. } if *cond == top => {
            return Some(Surrounder::WhileCondition(WhileCondition {
                expr,
                lp: stmt,
                split: 0,
            }));
        }
        _ => {}
    }

    let mut stmt = stmt;
    if let Some(parent) = tree.parent_stmt(stmt) {
        match tree.stmt_kind(parent) {
            StmtKind::For { init, .. } if init.contains(&stmt) => {
                return Some(for_init(tree, expr, stmt, parent, init));
            }
            StmtKind::Try {
                resources,
                catches,
                finally,
                ..
            } => {
                if let Some(index) = resources.iter().position(|&r| r == stmt) {
                    if index > 0 || !catches.is_empty() || finally.is_some() {
                        return Some(Surrounder::SplitTry(SplitTry {
                            expr,
                            try_stmt: parent,
                            index,
                        }));
                    }
                    stmt = parent;
                }
            }
            StmtKind::SwitchRule { body, .. }
                if *body == stmt
                    && matches!(tree.stmt_kind(stmt), StmtKind::Expr(_))
                    && in_switch_expression(tree, parent) =>
            {
                return Some(Surrounder::YieldWrap(YieldWrap { expr, stmt }));
            }
            _ => {}
        }
    }

    let target = outermost_label(tree, stmt);
    if tree.is_in_block(target) {
        return Some(Surrounder::NoOp(NoOp { expr, stmt, target }));
    }
    if matches!(tree.stmt_kind(stmt), StmtKind::LocalVar { .. }) {
        return unsupported(expr, "declaration outside a block");
    }
    if tree.parent_stmt(target).is_none() {
        return unsupported(expr, "statement has no enclosing statement");
    }
    Some(Surrounder::BlockWrap(BlockWrap { expr, stmt, target }))
}

fn in_switch_expression(tree: &SyntaxTree, rule: StmtId) -> bool {
    let Some(block) = tree.parent_stmt(rule) else {
        return false;
    };
    match tree.parent(NodeId::Stmt(block)) {
        Some(NodeId::Expr(switch)) => matches!(tree.expr_kind(switch), ExprKind::SwitchExpr { .. }),
        _ => false,
    }
}

fn for_init(
    tree: &SyntaxTree,
    expr: ExprId,
    init_stmt: StmtId,
    for_stmt: StmtId,
    init: &[StmtId],
) -> Surrounder {
    let head = outermost_label(tree, for_stmt);
    if tree.is_in_block(head) && !init_names_used_after(tree, init, head) {
        Surrounder::ForSplit(ForSplit {
            expr,
            init_stmt,
            for_stmt,
            head,
        })
    } else {
        Surrounder::SimpleWrap(SimpleWrap {
            expr,
            init_stmt,
            for_stmt,
            head,
        })
    }
}

fn in_member(
    tree: &SyntaxTree,
    expr: ExprId,
    top: ExprId,
    member: MemberId,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    match tree.member(member) {
        Member::Field { init: Some(init), .. } if *init == top => {
            let in_interface = tree
                .member_class(member)
                .is_some_and(|class| tree.class(class).kind == ClassKind::Interface);
            if in_interface {
                return unsupported(expr, "interface field initializer");
            }
            Some(Surrounder::ExtractFieldInit(ExtractFieldInit {
                expr,
                field: member,
            }))
        }
        Member::EnumConstant { args, .. } if args.contains(&top) => {
            let Some(ty) = initializer_type(tree, top) else {
                return unsupported(expr, "enum constant argument of unknown type");
            };
            Some(Surrounder::AnonymousCall(AnonymousCall {
                expr,
                constant: member,
                arg: top,
                ty,
                method_name: options.anonymous_method_name.clone(),
                base_type: options.anonymous_base_type.clone(),
            }))
        }
        _ => unsupported(expr, "member position"),
    }
}

#[cfg(test)]
mod tests;
