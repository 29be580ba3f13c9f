//! Visitors that search a statement subtree for control transfers.
//!
//! None of them descend into expressions: a `break`, `continue`, `return`
//! or `yield` inside a lambda, anonymous class or switch expression belongs
//! to that construct, not to the statement being searched.

use recast_ir::ast::{ExprKind, StmtKind};
use recast_ir::visitor::{walk_expr, walk_stmt, Visitor};
use recast_ir::{ClassId, ExprId, MemberId, NodeId, StmtId, SyntaxTree};

use super::{find_exited_statement, is_exit_call};
use crate::const_eval::constant_bool;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum JumpKind {
    Break,
    Continue,
}

/// Which exited statements count as a hit.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum TargetMatch {
    Exact,
    ExactOrAncestor,
    StrictAncestor,
}

/// Finds a `break` or `continue` whose exited statement matches `target`.
///
/// Branches of an `if` with a constant condition that can never run are
/// skipped.
pub(crate) struct JumpFinder {
    kind: JumpKind,
    target: StmtId,
    matching: TargetMatch,
    found: bool,
}

impl JumpFinder {
    pub(crate) fn search(
        tree: &SyntaxTree,
        root: StmtId,
        kind: JumpKind,
        target: StmtId,
        matching: TargetMatch,
    ) -> bool {
        let mut finder = JumpFinder {
            kind,
            target,
            matching,
            found: false,
        };
        finder.visit_stmt(root, tree);
        finder.found
    }

    fn matches(&self, tree: &SyntaxTree, exited: StmtId) -> bool {
        let strict_ancestor =
            || tree.is_ancestor(NodeId::Stmt(exited), NodeId::Stmt(self.target), true);
        match self.matching {
            TargetMatch::Exact => exited == self.target,
            TargetMatch::ExactOrAncestor => exited == self.target || strict_ancestor(),
            TargetMatch::StrictAncestor => strict_ancestor(),
        }
    }
}

impl<'t> Visitor<'t> for JumpFinder {
    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        match tree.stmt_kind(id) {
            StmtKind::Break(_) if self.kind == JumpKind::Break => {
                self.found = find_exited_statement(tree, id).is_some_and(|s| self.matches(tree, s));
            }
            StmtKind::Continue(_) if self.kind == JumpKind::Continue => {
                self.found = find_exited_statement(tree, id).is_some_and(|s| self.matches(tree, s));
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => match constant_bool(tree, *cond) {
                Some(true) => self.visit_stmt(*then_branch, tree),
                Some(false) => {
                    if let Some(e) = else_branch {
                        self.visit_stmt(*e, tree);
                    }
                }
                None => walk_stmt(self, id, tree),
            },
            _ => walk_stmt(self, id, tree),
        }
    }

    fn visit_expr(&mut self, _id: ExprId, _tree: &'t SyntaxTree) {}
}

/// Finds a jump of `kind` without a label that would leave the searched
/// statement. Nested loops (and, for `break`, nested switches) own their
/// unlabeled jumps.
pub(crate) struct NakedJumpFinder {
    kind: JumpKind,
    found: bool,
}

impl NakedJumpFinder {
    pub(crate) fn search(tree: &SyntaxTree, root: StmtId, kind: JumpKind) -> bool {
        let mut finder = NakedJumpFinder { kind, found: false };
        finder.visit_stmt(root, tree);
        finder.found
    }
}

impl<'t> Visitor<'t> for NakedJumpFinder {
    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        let kind = tree.stmt_kind(id);
        match (self.kind, kind) {
            (JumpKind::Break, StmtKind::Break(None))
            | (JumpKind::Continue, StmtKind::Continue(None)) => self.found = true,
            (_, k) if k.is_loop() => {}
            (JumpKind::Break, StmtKind::Switch { .. }) => {}
            _ => walk_stmt(self, id, tree),
        }
    }

    fn visit_expr(&mut self, _id: ExprId, _tree: &'t SyntaxTree) {}
}

/// Finds a `return` (or a `yield`) belonging to the searched statement.
pub(crate) struct ExitFinder {
    yields: bool,
    found: bool,
}

impl ExitFinder {
    pub(crate) fn search(tree: &SyntaxTree, root: StmtId, yields: bool) -> bool {
        let mut finder = ExitFinder {
            yields,
            found: false,
        };
        finder.visit_stmt(root, tree);
        finder.found
    }
}

impl<'t> Visitor<'t> for ExitFinder {
    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        match tree.stmt_kind(id) {
            StmtKind::Return(_) if !self.yields => self.found = true,
            StmtKind::Yield(_) if self.yields => self.found = true,
            _ => walk_stmt(self, id, tree),
        }
    }

    fn visit_expr(&mut self, _id: ExprId, _tree: &'t SyntaxTree) {}
}

/// Finds a call that terminates the process anywhere below the searched node, except
/// in lambda bodies and anonymous classes, which may never run.
pub(crate) struct SystemExitFinder {
    found: bool,
}

impl SystemExitFinder {
    pub(crate) fn search(tree: &SyntaxTree, root: StmtId) -> bool {
        let mut finder = SystemExitFinder { found: false };
        finder.visit_stmt(root, tree);
        finder.found
    }
}

impl<'t> Visitor<'t> for SystemExitFinder {
    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        if !self.found {
            walk_stmt(self, id, tree);
        }
    }

    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        if is_exit_call(tree, id) {
            self.found = true;
            return;
        }
        if !matches!(tree.expr_kind(id), ExprKind::Lambda { .. }) {
            walk_expr(self, id, tree);
        }
    }

    fn visit_member(&mut self, _id: MemberId, _tree: &'t SyntaxTree) {}

    fn visit_class(&mut self, _id: ClassId, _tree: &'t SyntaxTree) {}
}
