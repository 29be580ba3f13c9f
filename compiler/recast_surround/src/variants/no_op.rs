//! The statement holding the expression already sits in a block.

use recast_ir::{ExprId, NodeId, StmtId, SyntaxTree};

use crate::context::{statement_context, ParentContext};
use crate::result::{SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct NoOp {
    pub(crate) expr: ExprId,
    /// Statement that directly holds `expr`.
    pub(crate) stmt: StmtId,
    /// `stmt` or its outermost label.
    pub(crate) target: StmtId,
}

impl NoOp {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        statement_context(tree, self.expr, self.stmt)
    }

    pub(crate) fn surround(self) -> SurroundResult {
        SurroundResult {
            expression: self.expr,
            anchor: self.target,
            context: SurroundContext::inert(NodeId::Stmt(self.target)),
        }
    }
}
