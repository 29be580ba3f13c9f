//! Splitting a conditional expression into an `if` statement.
//!
//! The upstream surrounder gives the conditional a statement of its own;
//! this module then turns
//!
//! - `v = c ? x : y;` into `if (c) { v = x; } else { v = y; }`,
//! - `T v = c ? x : y;` into `T v; if (c) { v = x; } else { v = y; }`,
//!   spelling out the type of a `var` declaration,
//! - `return c ? x : y;` into `if (c) { return x; } else { return y; }`,
//!   and `yield` likewise.
//!
//! The statement that consumed the conditional is kept aside (or kept in
//! place, for declarations) so that collapse can put the original nodes
//! back.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::{AssignOp, ExprKind, Precedence, StmtKind, TypeRef};
use recast_ir::equivalence::equivalent;
use recast_ir::{ExprId, Name, NodeId, StmtId, SyntaxTree};

use crate::context::{initializer_type, ParentContext};
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};
use crate::Surrounder;

#[derive(Debug)]
pub struct TernarySplit {
    pub(crate) expr: ExprId,
    pub(crate) ternary: ExprId,
    /// Gives the conditional a statement of its own.
    pub(crate) upstream: Box<Surrounder>,
}

/// What collapse needs to put the conditional back.
#[derive(Debug)]
pub(crate) struct Split {
    if_stmt: StmtId,
    ternary: ExprId,
    /// The conditional, or the outermost parentheses around it.
    slot: ExprId,
    form: Form,
}

#[derive(Debug)]
enum Form {
    /// The consuming statement was replaced by the `if`.
    Replaced { original: StmtId },
    /// The declaration lost its initializer; the `if` follows it.
    Declared { declaration: StmtId, was_var: bool },
}

impl Split {
    pub(crate) fn handle(&self) -> StmtId {
        self.if_stmt
    }
}

/// How the upstream statement consumes the conditional.
enum Consumer {
    Exit { is_yield: bool },
    Assign { lhs: ExprId },
    Declare { ty: TypeRef },
}

impl TernarySplit {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        self.upstream.expected_parent_context(tree)
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } = *tree.expr_kind(self.ternary)
        else {
            panic!("ternary split: {:?} is not a conditional", self.ternary);
        };
        let in_then = tree.is_ancestor(NodeId::Expr(then_expr), NodeId::Expr(self.expr), false);
        let upstream = self.upstream.surround(tree);
        let stmt = upstream.anchor;
        let slot = tree.skip_parens_up(self.ternary);
        let consumer = consumer(tree, stmt, slot);

        let (then_stmt, else_stmt, form) = match consumer {
            Consumer::Exit { is_yield } => {
                let then_stmt = exit_stmt(tree, is_yield, then_expr);
                let else_stmt = exit_stmt(tree, is_yield, else_expr);
                (then_stmt, else_stmt, Form::Replaced { original: stmt })
            }
            Consumer::Assign { lhs } => {
                let lhs_copy = tree.deep_copy_expr(lhs);
                let then_stmt = assign_stmt(tree, lhs, then_expr);
                let else_stmt = assign_stmt(tree, lhs_copy, else_expr);
                (then_stmt, else_stmt, Form::Replaced { original: stmt })
            }
            Consumer::Declare { ty } => {
                let was_var = ty.is_var();
                let explicit = if was_var {
                    initializer_type(tree, slot).unwrap_or_else(|| {
                        panic!("ternary split: `var` declaration {stmt:?} has no known type")
                    })
                } else {
                    ty
                };
                let name = declared_name(tree, stmt);
                let then_lhs = tree.alloc_expr(ExprKind::Name(name));
                let else_lhs = tree.alloc_expr(ExprKind::Name(name));
                let then_stmt = assign_stmt(tree, then_lhs, then_expr);
                let else_stmt = assign_stmt(tree, else_lhs, else_expr);
                tree.update_stmt(stmt, |kind| {
                    if let StmtKind::LocalVar {
                        ty, declarators, ..
                    } = kind
                    {
                        *ty = explicit;
                        declarators[0].init = None;
                    }
                });
                let form = Form::Declared {
                    declaration: stmt,
                    was_var,
                };
                (then_stmt, else_stmt, form)
            }
        };

        let then_block = tree.mk_block(vec![then_stmt]);
        let else_block = tree.mk_block(vec![else_stmt]);
        let if_stmt = tree.mk_if(cond, then_block, Some(else_block));
        match form {
            Form::Replaced { original } => {
                tree.replace_stmt(original, if_stmt);
                tree.transfer_comments(original, if_stmt);
            }
            Form::Declared { declaration, .. } => tree.insert_stmt_after(declaration, if_stmt),
        }
        SurroundResult {
            expression: self.expr,
            anchor: if in_then { then_stmt } else { else_stmt },
            context: SurroundContext::planned(CollapsePlan::Ternary {
                split: Split {
                    if_stmt,
                    ternary: self.ternary,
                    slot,
                    form,
                },
                upstream: Box::new(upstream.context),
            }),
        }
    }
}

fn consumer(tree: &SyntaxTree, stmt: StmtId, slot: ExprId) -> Consumer {
    match tree.stmt_kind(stmt) {
        StmtKind::Return(Some(value)) if *value == slot => Consumer::Exit { is_yield: false },
        StmtKind::Yield(value) if *value == slot => Consumer::Exit { is_yield: true },
        StmtKind::Expr(e) => match tree.expr_kind(*e) {
            ExprKind::Assign {
                op: AssignOp::Assign,
                lhs,
                rhs,
            } if *rhs == slot => Consumer::Assign { lhs: *lhs },
            other => panic!("ternary split: {stmt:?} does not assign {slot:?}: {other:?}"),
        },
        StmtKind::LocalVar {
            ty, declarators, ..
        } if declarators.len() == 1 && declarators[0].init == Some(slot) => {
            Consumer::Declare { ty: *ty }
        }
        other => panic!("ternary split: upstream anchor {stmt:?} does not consume {slot:?}: {other:?}"),
    }
}

fn declared_name(tree: &SyntaxTree, decl: StmtId) -> Name {
    match tree.stmt_kind(decl) {
        StmtKind::LocalVar { declarators, .. } => declarators[0].name,
        other => panic!("ternary split: {decl:?} is not a declaration but {other:?}"),
    }
}

fn exit_stmt(tree: &mut SyntaxTree, is_yield: bool, value: ExprId) -> StmtId {
    if is_yield {
        tree.mk_yield(value)
    } else {
        tree.mk_return(Some(value))
    }
}

fn assign_stmt(tree: &mut SyntaxTree, lhs: ExprId, rhs: ExprId) -> StmtId {
    let assign = tree.mk_assign(lhs, rhs);
    tree.mk_expr_stmt(assign)
}

/// The single statement of a branch written by the forward rewrite.
fn branch_stmt(tree: &SyntaxTree, branch: StmtId) -> Option<StmtId> {
    let stmt = only_statement_in_block(tree, branch)?;
    let quiet = tree.stmt(branch).comments.is_empty() && tree.stmt(stmt).comments.is_empty();
    quiet.then_some(stmt)
}

/// `lhs = value;`
fn assignment(tree: &SyntaxTree, stmt: StmtId) -> Option<(ExprId, ExprId)> {
    let StmtKind::Expr(e) = *tree.stmt_kind(stmt) else {
        return None;
    };
    match *tree.expr_kind(e) {
        ExprKind::Assign {
            op: AssignOp::Assign,
            lhs,
            rhs,
        } => Some((lhs, rhs)),
        _ => None,
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, split: Split) -> bool {
    let StmtKind::If {
        cond,
        then_branch,
        else_branch: Some(else_branch),
    } = *tree.stmt_kind(split.if_stmt)
    else {
        return false;
    };
    let (Some(a), Some(b)) = (branch_stmt(tree, then_branch), branch_stmt(tree, else_branch)) else {
        return false;
    };

    match split.form {
        Form::Replaced { original } => {
            let values = match (tree.stmt_kind(original), tree.stmt_kind(a), tree.stmt_kind(b)) {
                (StmtKind::Return(_), StmtKind::Return(Some(x)), StmtKind::Return(Some(y)))
                | (StmtKind::Yield(_), StmtKind::Yield(x), StmtKind::Yield(y)) => {
                    Some((*x, *y, None))
                }
                (StmtKind::Expr(consumed), StmtKind::Expr(_), StmtKind::Expr(_)) => {
                    let consumed = *consumed;
                    match (assignment(tree, a), assignment(tree, b)) {
                        (Some((lx, x)), Some((ly, y))) if equivalent(tree, lx, ly) => {
                            Some((x, y, Some((consumed, lx))))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };
            let Some((x, y, assign)) = values else {
                return false;
            };
            refill(tree, &split, cond, x, y);
            if let Some((consumed, lhs)) = assign {
                let slot = split.slot;
                tree.update_expr(consumed, |kind| {
                    if let ExprKind::Assign { lhs: l, rhs, .. } = kind {
                        *l = lhs;
                        *rhs = slot;
                    }
                });
            }
            tree.replace_stmt(split.if_stmt, original);
            tree.transfer_comments(split.if_stmt, original);
        }
        Form::Declared {
            declaration,
            was_var,
        } => {
            if tree.prev_sibling(split.if_stmt) != Some(declaration) {
                return false;
            }
            let name = match tree.stmt_kind(declaration) {
                StmtKind::LocalVar { declarators, .. }
                    if declarators.len() == 1 && declarators[0].init.is_none() =>
                {
                    declarators[0].name
                }
                _ => return false,
            };
            let assigns_declared = |lhs: ExprId| {
                matches!(tree.expr_kind(tree.skip_parens(lhs)), ExprKind::Name(n) if *n == name)
            };
            let (Some((lx, x)), Some((ly, y))) = (assignment(tree, a), assignment(tree, b)) else {
                return false;
            };
            if !assigns_declared(lx) || !assigns_declared(ly) {
                return false;
            }
            refill(tree, &split, cond, x, y);
            let slot = split.slot;
            tree.update_stmt(declaration, |kind| {
                if let StmtKind::LocalVar {
                    ty, declarators, ..
                } = kind
                {
                    if was_var {
                        *ty = TypeRef::Var;
                    }
                    declarators[0].init = Some(slot);
                }
            });
            tree.transfer_comments(split.if_stmt, declaration);
            tree.remove_stmt(split.if_stmt);
        }
    }
    true
}

/// Put the current condition and branch values back into the conditional.
fn refill(tree: &mut SyntaxTree, split: &Split, cond: ExprId, x: ExprId, y: ExprId) {
    let cond = tree.parenthesize(cond, Precedence::Or);
    let y = tree.parenthesize(y, Precedence::Conditional);
    tree.update_expr(split.ternary, |kind| {
        *kind = ExprKind::Conditional {
            cond,
            then_expr: x,
            else_expr: y,
        };
    });
    // Re-link the parentheses the conditional sat in.
    let mut node = split.slot;
    while node != split.ternary {
        tree.update_expr(node, |_| {});
        let ExprKind::Paren(inner) = *tree.expr_kind(node) else {
            break;
        };
        node = inner;
    }
}
