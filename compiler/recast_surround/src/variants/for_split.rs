//! Moving the initializer of a `for` statement out of its header.
//!
//! - **ForSplit**: `for (init; ..) B` becomes `init; for (; ..) B` when the
//!   loop sits in a block and nothing after it can see the moved names.
//! - **SimpleWrap**: `for (init; ..) B` becomes `{ init; for (; ..) B }`.
//!
//! Both move every initializer statement, in order, so that evaluation
//! order is unchanged.

use recast_ir::ast::{ExprKind, StmtKind};
use recast_ir::visitor::{walk_expr, walk_stmt, Visitor};
use recast_ir::{ExprId, Name, StmtId, SyntaxTree};
use rustc_hash::FxHashSet;

use crate::context::{statement_context, ParentContext};
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct ForSplit {
    pub(crate) expr: ExprId,
    /// The initializer statement holding `expr`.
    pub(crate) init_stmt: StmtId,
    pub(crate) for_stmt: StmtId,
    /// The `for` statement or its outermost label.
    pub(crate) head: StmtId,
}

#[derive(Debug)]
pub struct SimpleWrap {
    pub(crate) expr: ExprId,
    pub(crate) init_stmt: StmtId,
    pub(crate) for_stmt: StmtId,
    pub(crate) head: StmtId,
}

impl ForSplit {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        statement_context(tree, self.expr, self.init_stmt)
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let init = take_init(tree, self.for_stmt);
        for &stmt in &init {
            tree.insert_stmt_before(self.head, stmt);
        }
        SurroundResult {
            expression: self.expr,
            anchor: self.init_stmt,
            context: SurroundContext::planned(CollapsePlan::ForSplit {
                init,
                for_stmt: self.for_stmt,
                head: self.head,
            }),
        }
    }
}

impl SimpleWrap {
    pub(crate) fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        statement_context(tree, self.expr, self.init_stmt)
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let init = take_init(tree, self.for_stmt);
        let block = tree.wrap_stmt(self.head, |tree, head| {
            let mut stmts = init.clone();
            stmts.push(head);
            tree.mk_block(stmts)
        });
        SurroundResult {
            expression: self.expr,
            anchor: self.init_stmt,
            context: SurroundContext::planned(CollapsePlan::SimpleWrap {
                block,
                init,
                for_stmt: self.for_stmt,
                head: self.head,
            }),
        }
    }
}

fn take_init(tree: &mut SyntaxTree, for_stmt: StmtId) -> Vec<StmtId> {
    tree.update_stmt(for_stmt, |kind| match kind {
        StmtKind::For { init, .. } => std::mem::take(init),
        other => panic!("for split: {for_stmt:?} is not a for statement but {other:?}"),
    })
}

fn restore_init(tree: &mut SyntaxTree, for_stmt: StmtId, stmts: &[StmtId]) {
    tree.update_stmt(for_stmt, |kind| {
        if let StmtKind::For { init, .. } = kind {
            init.extend_from_slice(stmts);
        }
    });
}

fn has_empty_init(tree: &SyntaxTree, for_stmt: StmtId, head: StmtId) -> bool {
    matches!(tree.stmt_kind(for_stmt), StmtKind::For { init, .. } if init.is_empty())
        && tree.is_ancestor(head.into(), for_stmt.into(), false)
}

pub(crate) fn collapse_split(
    tree: &mut SyntaxTree,
    init: &[StmtId],
    for_stmt: StmtId,
    head: StmtId,
) -> bool {
    if !has_empty_init(tree, for_stmt, head) {
        return false;
    }
    let mut expected_next = init.iter().skip(1).copied().chain(std::iter::once(head));
    let contiguous = init
        .iter()
        .all(|&stmt| tree.next_sibling(stmt) == expected_next.next());
    if !contiguous || init_names_used_after(tree, init, head) {
        return false;
    }
    for &stmt in init {
        tree.remove_stmt(stmt);
    }
    restore_init(tree, for_stmt, init);
    true
}

pub(crate) fn collapse_wrap(
    tree: &mut SyntaxTree,
    block: StmtId,
    init: &[StmtId],
    for_stmt: StmtId,
    head: StmtId,
) -> bool {
    if !has_empty_init(tree, for_stmt, head) {
        return false;
    }
    let stmts = tree.block_stmts(block);
    if stmts.len() != init.len() + 1 || stmts[..init.len()] != *init || stmts[init.len()] != head {
        return false;
    }
    restore_init(tree, for_stmt, init);
    tree.transfer_comments(block, head);
    tree.replace_stmt(block, head);
    true
}

/// Whether a statement after `head` in its block declares or mentions a
/// name declared by `init`. Moving `init` back into the loop header would
/// change what such a statement sees.
pub(crate) fn init_names_used_after(tree: &SyntaxTree, init: &[StmtId], head: StmtId) -> bool {
    let names: FxHashSet<Name> = init
        .iter()
        .filter_map(|&s| match tree.stmt_kind(s) {
            StmtKind::LocalVar { declarators, .. } => Some(declarators.iter().map(|d| d.name)),
            _ => None,
        })
        .flatten()
        .collect();
    if names.is_empty() {
        return false;
    }
    let Some((block, index)) = tree.block_position(head) else {
        return false;
    };
    let mut finder = NameUse {
        names: &names,
        found: false,
    };
    for &stmt in &tree.block_stmts(block)[index + 1..] {
        finder.visit_stmt(stmt, tree);
        if finder.found {
            return true;
        }
    }
    false
}

/// Finds declarations or mentions of any of `names`.
struct NameUse<'n> {
    names: &'n FxHashSet<Name>,
    found: bool,
}

impl<'t> Visitor<'t> for NameUse<'_> {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        match tree.expr_kind(id) {
            ExprKind::Name(name) if self.names.contains(name) => self.found = true,
            ExprKind::Lambda { params, .. } if params.iter().any(|p| self.names.contains(p)) => {
                self.found = true;
            }
            _ => walk_expr(self, id, tree),
        }
    }

    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        let declares = match tree.stmt_kind(id) {
            StmtKind::LocalVar { declarators, .. } => {
                declarators.iter().any(|d| self.names.contains(&d.name))
            }
            StmtKind::Foreach { name, .. } => self.names.contains(name),
            StmtKind::Try { catches, .. } => catches.iter().any(|c| self.names.contains(&c.name)),
            _ => false,
        };
        if declares {
            self.found = true;
        } else {
            walk_stmt(self, id, tree);
        }
    }
}
