//! `S` becomes `{ S }`.
//!
//! Used for statements that sit in a branch, loop body or other single
//! statement slot. Unwrapping on collapse must not let an `else` that
//! follows the block bind to an `if` inside it.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::StmtKind;
use recast_ir::{ExprId, NodeId, StmtId, SyntaxTree};

use crate::context::{statement_context, ParentContext};
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct BlockWrap {
    pub(crate) expr: ExprId,
    /// Statement that directly holds `expr`.
    pub(crate) stmt: StmtId,
    /// `stmt` or its outermost label: the statement that gets wrapped.
    pub(crate) target: StmtId,
}

impl BlockWrap {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        statement_context(tree, self.expr, self.stmt)
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let block = tree.wrap_stmt(self.target, |tree, target| tree.mk_block(vec![target]));
        SurroundResult {
            expression: self.expr,
            anchor: self.target,
            context: SurroundContext::planned(CollapsePlan::BlockWrap { block }),
        }
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, block: StmtId) -> bool {
    let Some(inner) = only_statement_in_block(tree, block) else {
        return false;
    };
    if tree.stmt_kind(inner).is_declaration() {
        return false;
    }
    let Some(NodeId::Stmt(parent)) = tree.parent(NodeId::Stmt(block)) else {
        return false;
    };
    let slot_accepts = match tree.stmt_kind(parent) {
        StmtKind::Block(_)
        | StmtKind::If { .. }
        | StmtKind::While { .. }
        | StmtKind::DoWhile { .. }
        | StmtKind::For { .. }
        | StmtKind::Foreach { .. }
        | StmtKind::Labeled { .. } => true,
        StmtKind::SwitchRule { .. } => {
            matches!(tree.stmt_kind(inner), StmtKind::Expr(_) | StmtKind::Throw(_))
        }
        _ => false,
    };
    if !slot_accepts || (ends_with_open_if(tree, inner) && else_follows(tree, block)) {
        return false;
    }
    tree.transfer_comments(block, inner);
    tree.replace_stmt(block, inner);
    true
}

/// Whether the last thing `stmt` parses to is an `if` without `else`.
fn ends_with_open_if(tree: &SyntaxTree, mut stmt: StmtId) -> bool {
    loop {
        match tree.stmt_kind(stmt) {
            StmtKind::If {
                else_branch: None, ..
            } => return true,
            StmtKind::If {
                else_branch: Some(next),
                ..
            }
            | StmtKind::While { body: next, .. }
            | StmtKind::For { body: next, .. }
            | StmtKind::Foreach { body: next, .. }
            | StmtKind::Labeled { body: next, .. } => stmt = *next,
            _ => return false,
        }
    }
}

/// Whether an `else` follows `stmt` in the source, so that an open `if`
/// ending at `stmt` would capture it.
fn else_follows(tree: &SyntaxTree, mut stmt: StmtId) -> bool {
    while let Some(parent) = tree.parent_stmt(stmt) {
        match tree.stmt_kind(parent) {
            StmtKind::If {
                then_branch,
                else_branch: Some(_),
                ..
            } if *then_branch == stmt => return true,
            StmtKind::If { .. }
            | StmtKind::While { .. }
            | StmtKind::For { .. }
            | StmtKind::Foreach { .. }
            | StmtKind::Labeled { .. } => stmt = parent,
            _ => return false,
        }
    }
    false
}
