//! `try (r0..rk-1; rk..rn) B C F` becomes
//! `try (r0..rk-1) { try (rk..rn) B } C F`.
//!
//! Resources are initialized in order and closed in reverse, and an inner
//! `try` without handlers closes its resources before the outer handlers
//! run, so the split is invisible. Statements inserted before the inner
//! `try` run after `rk-1` is initialized and before `rk`.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::StmtKind;
use recast_ir::{ExprId, StmtId, SyntaxTree};

use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct SplitTry {
    pub(crate) expr: ExprId,
    pub(crate) try_stmt: StmtId,
    /// Index of the resource holding `expr`.
    pub(crate) index: usize,
}

impl SplitTry {
    pub(crate) fn expected_parent_context(&self) -> ParentContext {
        ParentContext::Unknown
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let StmtKind::Try {
            resources, block, ..
        } = tree.stmt_kind(self.try_stmt)
        else {
            panic!("split try: {:?} is not a try statement", self.try_stmt);
        };
        let (tail, block) = (resources[self.index..].to_vec(), *block);
        let inner = tree.mk_try(tail, block, &[], None);
        let new_block = tree.mk_block(vec![inner]);
        let index = self.index;
        tree.update_stmt(self.try_stmt, |kind| {
            if let StmtKind::Try {
                resources, block, ..
            } = kind
            {
                resources.truncate(index);
                *block = new_block;
            }
        });
        SurroundResult {
            expression: self.expr,
            anchor: inner,
            context: SurroundContext::planned(CollapsePlan::SplitTry {
                outer: self.try_stmt,
            }),
        }
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, outer: StmtId) -> bool {
    let StmtKind::Try { block, .. } = tree.stmt_kind(outer) else {
        return false;
    };
    let Some(inner) = only_statement_in_block(tree, *block) else {
        return false;
    };
    let StmtKind::Try {
        resources: inner_resources,
        block: inner_block,
        catches,
        finally: None,
    } = tree.stmt_kind(inner)
    else {
        return false;
    };
    if !catches.is_empty() || !tree.stmt(inner).comments.is_empty() {
        return false;
    }
    let (moved, inner_block) = (inner_resources.clone(), *inner_block);
    tree.update_stmt(outer, |kind| {
        if let StmtKind::Try {
            resources, block, ..
        } = kind
        {
            resources.extend(moved);
            *block = inner_block;
        }
    });
    true
}
