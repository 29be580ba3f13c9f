//! `p -> e` becomes `p -> { return e; }`, or `p -> { e; }` for lambdas
//! whose functional interface returns nothing.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::{ExprKind, LambdaBody, StmtKind};
use recast_ir::{ExprId, SyntaxTree};

use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct LambdaWrap {
    pub(crate) expr: ExprId,
    pub(crate) lambda: ExprId,
}

impl LambdaWrap {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        match tree.expr_kind(self.lambda) {
            ExprKind::Lambda {
                value_returning: true,
                ..
            } => ParentContext::Return,
            _ => ParentContext::Expression,
        }
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let ExprKind::Lambda {
            body: LambdaBody::Expr(body),
            value_returning,
            ..
        } = *tree.expr_kind(self.lambda)
        else {
            panic!("lambda wrap: {:?} has no expression body", self.lambda);
        };
        let stmt = if value_returning {
            tree.mk_return(Some(body))
        } else {
            tree.mk_expr_stmt(body)
        };
        let block = tree.mk_block(vec![stmt]);
        set_body(tree, self.lambda, LambdaBody::Block(block));
        SurroundResult {
            expression: self.expr,
            anchor: stmt,
            context: SurroundContext::planned(CollapsePlan::Lambda {
                lambda: self.lambda,
            }),
        }
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, lambda: ExprId) -> bool {
    let ExprKind::Lambda {
        body: LambdaBody::Block(block),
        value_returning,
        ..
    } = *tree.expr_kind(lambda)
    else {
        return false;
    };
    let Some(inner) = only_statement_in_block(tree, block) else {
        return false;
    };
    // An expression body has nowhere to keep comments.
    if !tree.stmt(block).comments.is_empty() || !tree.stmt(inner).comments.is_empty() {
        return false;
    }
    let value = match (tree.stmt_kind(inner), value_returning) {
        (StmtKind::Return(Some(value)), true) | (StmtKind::Expr(value), false) => *value,
        _ => return false,
    };
    set_body(tree, lambda, LambdaBody::Expr(value));
    true
}

fn set_body(tree: &mut SyntaxTree, lambda: ExprId, new_body: LambdaBody) {
    tree.update_expr(lambda, |kind| {
        if let ExprKind::Lambda { body, .. } = kind {
            *body = new_body;
        }
    });
}
