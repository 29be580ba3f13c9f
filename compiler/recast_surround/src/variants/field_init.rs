//! `T f = e;` becomes `T f; { f = e; }`.
//!
//! The initializer block directly follows the field, so field
//! initialization order is unchanged. An initializer of the same staticness
//! that already follows the field is reused, with the assignment first.

use recast_ir::ast::{AssignOp, ExprKind, Member, Modifiers, StmtKind};
use recast_ir::{ExprId, MemberId, Name, SyntaxTree};
use tracing::trace;

use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct ExtractFieldInit {
    pub(crate) expr: ExprId,
    pub(crate) field: MemberId,
}

impl ExtractFieldInit {
    pub(crate) fn expected_parent_context(&self) -> ParentContext {
        ParentContext::Assignment
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let Member::Field {
            modifiers,
            name,
            init: Some(value),
            ..
        } = *tree.member(self.field)
        else {
            panic!("extract field init: {:?} is not an initialized field", self.field);
        };
        let is_static = modifiers.contains(Modifiers::STATIC);
        set_init(tree, self.field, None);
        let lhs = tree.alloc_expr(ExprKind::Name(name));
        let assign = tree.mk_assign(lhs, value);
        let stmt = tree.mk_expr_stmt(assign);

        let reusable = tree.next_member(self.field).and_then(|next| match *tree.member(next) {
            Member::Initializer {
                is_static: s,
                body,
            } if s == is_static && tree.is_block(body) => Some((next, body)),
            _ => None,
        });
        let (initializer, created) = match reusable {
            Some((initializer, body)) => {
                trace!(?initializer, "reusing initializer block");
                tree.insert_stmt_at(body, 0, stmt);
                (initializer, false)
            }
            None => {
                let body = tree.mk_block(vec![stmt]);
                let initializer = tree.mk_initializer(is_static, body);
                tree.insert_member_after(self.field, initializer);
                (initializer, true)
            }
        };
        SurroundResult {
            expression: self.expr,
            anchor: stmt,
            context: SurroundContext::planned(CollapsePlan::ExtractFieldInit {
                initializer,
                field: self.field,
                created,
            }),
        }
    }
}

fn set_init(tree: &mut SyntaxTree, field: MemberId, value: Option<ExprId>) {
    tree.update_member(field, |member| {
        if let Member::Field { init, .. } = member {
            *init = value;
        }
    });
}

/// Whether `lhs` names the field `name`, plainly or through `this`.
fn assigns_field(tree: &SyntaxTree, lhs: ExprId, name: Name) -> bool {
    match tree.expr_kind(tree.skip_parens(lhs)) {
        ExprKind::Name(n) => *n == name,
        ExprKind::FieldAccess { qualifier, name: n } => {
            *n == name && matches!(tree.expr_kind(*qualifier), ExprKind::This)
        }
        _ => false,
    }
}

pub(crate) fn collapse(
    tree: &mut SyntaxTree,
    initializer: MemberId,
    field: MemberId,
    created: bool,
) -> bool {
    let Member::Field {
        name, init: None, ..
    } = *tree.member(field)
    else {
        return false;
    };
    if tree.next_member(field) != Some(initializer) {
        return false;
    }
    let Member::Initializer { body, .. } = *tree.member(initializer) else {
        return false;
    };
    let Some(&stmt) = tree.block_stmts(body).first() else {
        return false;
    };
    let StmtKind::Expr(assign) = *tree.stmt_kind(stmt) else {
        return false;
    };
    let ExprKind::Assign {
        op: AssignOp::Assign,
        lhs,
        rhs,
    } = *tree.expr_kind(assign)
    else {
        return false;
    };
    if !assigns_field(tree, lhs, name) || !tree.stmt(stmt).comments.is_empty() {
        return false;
    }
    tree.remove_stmt(stmt);
    set_init(tree, field, Some(rhs));
    if created && tree.block_stmts(body).is_empty() && tree.stmt(body).comments.is_empty() {
        tree.remove_member(initializer);
    }
    true
}
