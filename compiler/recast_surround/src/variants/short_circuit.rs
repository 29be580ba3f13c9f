//! Splitting a short-circuit chain before the operand being surrounded.
//!
//! The chain is first given a statement of its own by the upstream
//! surrounder; the split then depends on how that statement consumes it:
//!
//! - `if (a && b) T` becomes `if (a) { if (b) T }`.
//! - `return a && b;` becomes `if (!a) return false; return b;`.
//! - `return a || b;` becomes `if (a) return true; return b;`.
//!
//! `yield` is handled like `return`. Operands after the split point only
//! run when the prefix did not decide the result, so statements inserted
//! before the anchor see the same short-circuit behavior.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::{BinaryOp, ExprKind, Literal, Precedence, StmtKind};
use recast_ir::{ExprId, NodeId, StmtId, SyntaxTree};
use smallvec::SmallVec;

use super::split_chain;
use crate::context::{else_chain_excluded_by, ParentContext};
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};
use crate::Surrounder;

#[derive(Debug)]
pub struct ShortCircuitSplit {
    pub(crate) expr: ExprId,
    /// The `&&` or `||` chain.
    pub(crate) chain: ExprId,
    /// Index of the operand holding `expr`; never the first.
    pub(crate) index: usize,
    /// Gives the chain a statement of its own.
    pub(crate) upstream: Box<Surrounder>,
}

/// What collapse needs to rebuild the chain in place.
#[derive(Debug)]
pub(crate) struct Split {
    op: BinaryOp,
    chain: ExprId,
    /// The chain, or the outermost parentheses around it.
    slot: ExprId,
    /// The polyadic built for a rest of more than one operand.
    synthesized_rest: Option<ExprId>,
    form: Form,
}

#[derive(Debug)]
enum Form {
    /// `if (a) { if (b) T }`, the outer `if`.
    Nested { outer: StmtId },
    /// `if (!a) return false;` followed by `return b;`.
    Guard { guard: StmtId, exit: StmtId },
}

impl Split {
    pub(crate) fn handle(&self) -> StmtId {
        match self.form {
            Form::Nested { outer } => outer,
            Form::Guard { guard, .. } => guard,
        }
    }
}

/// How the upstream statement consumes the chain.
enum Consumer {
    IfCondition { then_branch: StmtId },
    Exit { is_yield: bool },
}

impl ShortCircuitSplit {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        self.upstream.expected_parent_context(tree)
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let (op, len) = match tree.expr_kind(self.chain) {
            ExprKind::Polyadic { op, operands } if matches!(op, BinaryOp::And | BinaryOp::Or) => {
                (*op, operands.len())
            }
            other => panic!("short-circuit split: {:?} is not a chain but {other:?}", self.chain),
        };
        let upstream = self.upstream.surround(tree);
        let stmt = upstream.anchor;
        let slot = tree.skip_parens_up(self.chain);
        let consumer = match tree.stmt_kind(stmt) {
            StmtKind::If {
                cond, then_branch, ..
            } if *cond == slot && op == BinaryOp::And => Consumer::IfCondition {
                then_branch: *then_branch,
            },
            StmtKind::Return(Some(value)) if *value == slot => Consumer::Exit { is_yield: false },
            StmtKind::Yield(value) if *value == slot => Consumer::Exit { is_yield: true },
            other => panic!(
                "short-circuit split: upstream anchor {stmt:?} does not consume {slot:?}: {other:?}"
            ),
        };
        let (prefix, rest) = split_chain(tree, self.chain, self.index);
        let synthesized_rest = (self.index + 1 < len).then_some(rest);

        let (anchor, form) = match consumer {
            Consumer::IfCondition { then_branch } => {
                if prefix != self.chain {
                    replace_in(tree, stmt, slot, prefix);
                }
                let inner = tree.mk_if(rest, then_branch, None);
                let block = tree.mk_block(vec![inner]);
                tree.update_stmt(stmt, |kind| {
                    if let StmtKind::If { then_branch, .. } = kind {
                        *then_branch = block;
                    }
                });
                (inner, Form::Nested { outer: stmt })
            }
            Consumer::Exit { is_yield } => {
                replace_in(tree, stmt, slot, rest);
                let (guard_cond, decided) = if op == BinaryOp::And {
                    (tree.negate(prefix), false)
                } else {
                    (prefix, true)
                };
                let value = tree.mk_bool(decided);
                let exit = if is_yield {
                    tree.mk_yield(value)
                } else {
                    tree.mk_return(Some(value))
                };
                let guard = tree.mk_if(guard_cond, exit, None);
                tree.insert_stmt_before(stmt, guard);
                (stmt, Form::Guard { guard, exit: stmt })
            }
        };
        SurroundResult {
            expression: self.expr,
            anchor,
            context: SurroundContext::planned(CollapsePlan::ShortCircuit {
                split: Split {
                    op,
                    chain: self.chain,
                    slot,
                    synthesized_rest,
                    form,
                },
                upstream: Box::new(upstream.context),
            }),
        }
    }
}

fn replace_in(tree: &mut SyntaxTree, stmt: StmtId, old: ExprId, new: ExprId) {
    tree.try_replace_child(NodeId::Stmt(stmt), NodeId::Expr(old), NodeId::Expr(new))
        .unwrap_or_else(|e| panic!("short-circuit split: {e}"));
}

pub(crate) fn collapse(tree: &mut SyntaxTree, split: Split) -> bool {
    match split.form {
        Form::Nested { outer } => {
            let StmtKind::If {
                cond,
                then_branch: block,
                else_branch,
            } = *tree.stmt_kind(outer)
            else {
                return false;
            };
            let Some(inner) = only_statement_in_block(tree, block) else {
                return false;
            };
            let StmtKind::If {
                cond: rest,
                then_branch: body,
                else_branch: None,
            } = *tree.stmt_kind(inner)
            else {
                return false;
            };
            if let Some(else_branch) = else_branch {
                if !else_chain_still_excluded(tree, &split, cond, else_branch) {
                    return false;
                }
            }
            rebuild_chain(tree, &split, cond, rest);
            tree.transfer_comments(inner, body);
            tree.transfer_comments(block, body);
            let slot = split.slot;
            tree.update_stmt(outer, |kind| {
                if let StmtKind::If {
                    cond, then_branch, ..
                } = kind
                {
                    *cond = slot;
                    *then_branch = body;
                }
            });
        }
        Form::Guard { guard, exit } => {
            let decided = split.op == BinaryOp::Or;
            let StmtKind::If {
                cond: guard_cond,
                then_branch: early,
                else_branch: None,
            } = *tree.stmt_kind(guard)
            else {
                return false;
            };
            if tree.next_sibling(guard) != Some(exit) {
                return false;
            }
            let rest = match (tree.stmt_kind(early), tree.stmt_kind(exit)) {
                (StmtKind::Return(Some(value)), StmtKind::Return(Some(rest)))
                | (StmtKind::Yield(value), StmtKind::Yield(rest))
                    if is_bool(tree, *value, decided) =>
                {
                    *rest
                }
                _ => return false,
            };
            let prefix = if split.op == BinaryOp::And {
                tree.negate(guard_cond)
            } else {
                guard_cond
            };
            rebuild_chain(tree, &split, prefix, rest);
            replace_in(tree, exit, rest, split.slot);
            tree.transfer_comments(guard, exit);
            tree.remove_stmt(guard);
        }
    }
    // Re-link the parentheses the chain sat in.
    let mut node = split.slot;
    while node != split.chain {
        tree.update_expr(node, |_| {});
        let ExprKind::Paren(inner) = *tree.expr_kind(node) else {
            break;
        };
        node = inner;
    }
    true
}

/// The else chain may have been edited since the split; fusing the
/// conditions again is only sound while it still excludes the prefix.
fn else_chain_still_excluded(
    tree: &SyntaxTree,
    split: &Split,
    prefix: ExprId,
    else_branch: StmtId,
) -> bool {
    if tree.skip_parens(prefix) == split.chain {
        if let ExprKind::Polyadic { operands, .. } = tree.expr_kind(split.chain) {
            return else_chain_excluded_by(tree, operands, else_branch);
        }
    }
    else_chain_excluded_by(tree, &[prefix], else_branch)
}

fn is_bool(tree: &SyntaxTree, expr: ExprId, value: bool) -> bool {
    matches!(tree.expr_kind(expr), ExprKind::Literal(Literal::Bool(v)) if *v == value)
}

/// Make the chain node hold `prefix` followed by `rest` again.
fn rebuild_chain(tree: &mut SyntaxTree, split: &Split, prefix: ExprId, rest: ExprId) {
    let mut operands: SmallVec<[ExprId; 4]> = SmallVec::new();
    let precedence: Precedence = split.op.precedence();
    if tree.skip_parens(prefix) == split.chain {
        if let ExprKind::Polyadic { operands: kept, .. } = tree.expr_kind(split.chain) {
            operands.extend_from_slice(kept);
        }
    } else {
        operands.push(tree.parenthesize(prefix, precedence));
    }
    match tree.expr_kind(rest) {
        ExprKind::Polyadic { operands: moved, .. } if Some(rest) == split.synthesized_rest => {
            operands.extend_from_slice(moved);
        }
        _ => operands.push(tree.parenthesize(rest, precedence)),
    }
    tree.update_expr(split.chain, |kind| {
        if let ExprKind::Polyadic { operands: slots, .. } = kind {
            *slots = operands;
        }
    });
}
