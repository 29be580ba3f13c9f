//! `case L -> e;` in a switch expression becomes `case L -> { yield e; }`.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::StmtKind;
use recast_ir::{ExprId, StmtId, SyntaxTree};

use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct YieldWrap {
    pub(crate) expr: ExprId,
    /// The expression body of the rule.
    pub(crate) stmt: StmtId,
}

impl YieldWrap {
    pub(crate) fn expected_parent_context(&self) -> ParentContext {
        ParentContext::Return
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let StmtKind::Expr(value) = *tree.stmt_kind(self.stmt) else {
            panic!("yield wrap: rule body {:?} is not an expression", self.stmt);
        };
        let yield_stmt = tree.mk_yield(value);
        tree.transfer_comments(self.stmt, yield_stmt);
        let block = tree.mk_block(vec![yield_stmt]);
        tree.replace_stmt(self.stmt, block);
        SurroundResult {
            expression: self.expr,
            anchor: yield_stmt,
            context: SurroundContext::planned(CollapsePlan::YieldWrap { block }),
        }
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, block: StmtId) -> bool {
    let Some(inner) = only_statement_in_block(tree, block) else {
        return false;
    };
    let StmtKind::Yield(value) = *tree.stmt_kind(inner) else {
        return false;
    };
    let is_rule_body = tree
        .parent_stmt(block)
        .is_some_and(|rule| matches!(tree.stmt_kind(rule), StmtKind::SwitchRule { body, .. } if *body == block));
    if !is_rule_body {
        return false;
    }
    let stmt = tree.mk_expr_stmt(value);
    tree.transfer_comments(inner, stmt);
    tree.transfer_comments(block, stmt);
    tree.replace_stmt(block, stmt);
    true
}
