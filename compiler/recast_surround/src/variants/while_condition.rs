//! Moving the tail of a `while` condition into the loop body.
//!
//! `while (c0 && .. && cn) B` split at `k` becomes
//! `while (c0 && .. ck-1) { if (!(ck && .. cn)) break; B }`, with `true` as
//! the loop condition when `k == 0`. The guard is the anchor: statements
//! inserted before it run on every iteration, after the retained prefix.

use recast_flow::is_constant_true;
use recast_ir::ast::{BinaryOp, StmtKind};
use recast_ir::{ExprId, NodeId, StmtId, SyntaxTree};

use super::split_chain;
use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct WhileCondition {
    pub(crate) expr: ExprId,
    pub(crate) lp: StmtId,
    /// Index of the first `&&` operand that moves; 0 moves the whole
    /// condition.
    pub(crate) split: usize,
}

impl WhileCondition {
    pub(crate) fn expected_parent_context(&self) -> ParentContext {
        ParentContext::Unknown
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let StmtKind::While { cond, body } = *tree.stmt_kind(self.lp) else {
            panic!("while condition: {:?} is not a while loop", self.lp);
        };
        let (kept, moved) = if self.split == 0 {
            (tree.mk_bool(true), cond)
        } else {
            let chain = tree.skip_parens(cond);
            let (prefix, rest) = split_chain(tree, chain, self.split);
            (if prefix == chain { cond } else { prefix }, rest)
        };
        let exit_cond = self.exit_condition(tree, moved);
        let brk = tree.mk_break(None);
        let guard = tree.mk_if(exit_cond, brk, None);
        let body_was_block = tree.is_block(body);
        if body_was_block {
            tree.insert_stmt_at(body, 0, guard);
        } else {
            tree.wrap_stmt(body, |tree, body| tree.mk_block(vec![guard, body]));
        }
        tree.update_stmt(self.lp, |kind| {
            if let StmtKind::While { cond, .. } = kind {
                *cond = kept;
            }
        });
        SurroundResult {
            expression: self.expr,
            anchor: guard,
            context: SurroundContext::planned(CollapsePlan::WhileCondition {
                lp: self.lp,
                body_was_block,
            }),
        }
    }
}

impl WhileCondition {
    /// `!moved`, simplified unless that would rewrite or drop `expr`.
    fn exit_condition(&self, tree: &mut SyntaxTree, moved: ExprId) -> ExprId {
        if moved != self.expr {
            let negated = tree.negate(moved);
            if tree.is_ancestor(NodeId::Expr(negated), NodeId::Expr(self.expr), false) {
                return negated;
            }
        }
        tree.negate_wrapping(moved)
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, lp: StmtId, body_was_block: bool) -> bool {
    let StmtKind::While { cond, body } = *tree.stmt_kind(lp) else {
        return false;
    };
    let Some(&guard) = tree.block_stmts(body).first() else {
        return false;
    };
    let StmtKind::If {
        cond: exit_cond,
        then_branch,
        else_branch: None,
    } = *tree.stmt_kind(guard)
    else {
        return false;
    };
    if !matches!(tree.stmt_kind(then_branch), StmtKind::Break(None))
        || !tree.stmt(guard).comments.is_empty()
    {
        return false;
    }
    let moved = tree.negate(exit_cond);
    let new_cond = if is_constant_true(tree, cond) {
        moved
    } else {
        tree.fuse_operands(BinaryOp::And, cond, moved)
    };
    tree.remove_stmt(guard);
    tree.update_stmt(lp, |kind| {
        if let StmtKind::While { cond, .. } = kind {
            *cond = new_cond;
        }
    });
    if !body_was_block && tree.block_stmts(body).len() == 1 {
        let only = tree.block_stmts(body)[0];
        tree.transfer_comments(body, only);
        tree.replace_stmt(body, only);
    }
    true
}
