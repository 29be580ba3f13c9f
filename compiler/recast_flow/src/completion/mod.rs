//! Completion oracle.
//!
//! A statement *completes normally* when control can reach the point right
//! after it. The answers follow the language's reachability rules with a
//! few pragmatic extensions: `System.exit(..)` never returns, and when a
//! whole method is analyzed, a direct recursive call is treated like a
//! jump out of the method.
//!
//! The remaining functions in this module are small queries about jumps
//! and loop structure that rewrites need alongside the oracle.

mod finders;

#[cfg(test)]
mod tests;

use recast_ir::ast::{ExprKind, Member, StmtKind};
use recast_ir::visitor::{walk_expr, walk_stmt, Visitor};
use recast_ir::{ExprId, MemberId, Name, NodeId, StmtId, SyntaxTree};
use recast_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::const_eval::{constant_bool, is_constant_true};
use finders::{ExitFinder, JumpFinder, JumpKind, NakedJumpFinder, SystemExitFinder, TargetMatch};

/// Whether control can reach the point right after `stmt`.
pub fn may_complete_normally(tree: &SyntaxTree, stmt: StmtId) -> bool {
    Completion {
        tree,
        recursion: None,
    }
    .completes(stmt)
}

/// Like [`may_complete_normally`] for an optional body; a missing body
/// completes.
pub fn code_block_may_complete_normally(tree: &SyntaxTree, body: Option<StmtId>) -> bool {
    body.map_or(true, |b| may_complete_normally(tree, b))
}

/// Whether the body of `method` can fall off its end. Direct recursive
/// calls to `method` (unqualified or through `this`, same arity) count as
/// never returning.
pub fn method_may_complete_normally(tree: &SyntaxTree, method: MemberId) -> bool {
    match tree.member(method) {
        Member::Method {
            name,
            params,
            body: Some(body),
            ..
        } => Completion {
            tree,
            recursion: Some((*name, params.len())),
        }
        .completes(*body),
        _ => true,
    }
}

struct Completion<'t> {
    tree: &'t SyntaxTree,
    /// Name and arity of the analyzed method.
    recursion: Option<(Name, usize)>,
}

impl Completion<'_> {
    fn completes(&self, stmt: StmtId) -> bool {
        ensure_sufficient_stack(|| self.completes_inner(stmt))
    }

    fn completes_inner(&self, stmt: StmtId) -> bool {
        let tree = self.tree;
        match tree.stmt_kind(stmt) {
            StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Return(_)
            | StmtKind::Throw(_)
            | StmtKind::Yield(_) => false,
            StmtKind::Expr(expr) => {
                !is_system_exit_call(tree, *expr) && !self.is_recursive_call(*expr)
            }
            StmtKind::Empty
            | StmtKind::LocalVar { .. }
            | StmtKind::Assert { .. }
            | StmtKind::CaseLabel { .. }
            | StmtKind::Foreach { .. } => true,
            StmtKind::While { cond, .. } | StmtKind::DoWhile { cond, .. } => {
                !is_constant_true(tree, *cond) || loop_can_exit(tree, stmt)
            }
            StmtKind::For { cond, .. } => {
                cond.is_some_and(|c| !is_constant_true(tree, c)) || loop_can_exit(tree, stmt)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => match (constant_bool(tree, *cond), else_branch) {
                (Some(true), _) => self.completes(*then_branch),
                (Some(false), None) | (None, None) => true,
                (Some(false), Some(else_branch)) => self.completes(*else_branch),
                (None, Some(else_branch)) => {
                    let (first, second) =
                        if subtree_size(tree, *then_branch) <= subtree_size(tree, *else_branch) {
                            (*then_branch, *else_branch)
                        } else {
                            (*else_branch, *then_branch)
                        };
                    self.completes(first) || self.completes(second)
                }
            },
            StmtKind::Labeled { body, .. } => {
                self.completes(*body)
                    || JumpFinder::search(tree, *body, JumpKind::Break, stmt, TargetMatch::Exact)
            }
            StmtKind::Block(stmts) => stmts.iter().all(|&s| self.completes(s)),
            StmtKind::Synchronized { body, .. } => self.completes(*body),
            StmtKind::Try {
                block,
                catches,
                finally,
                ..
            } => {
                if finally.is_some_and(|f| !self.completes(f)) {
                    return false;
                }
                self.completes(*block) || catches.iter().any(|c| self.completes(c.body))
            }
            StmtKind::Switch {
                body,
                enum_constants,
                ..
            } => self.switch_completes(stmt, *body, *enum_constants),
            StmtKind::SwitchRule { body, .. } => self.completes(*body),
        }
    }

    fn switch_completes(&self, switch: StmtId, body: StmtId, enum_constants: Option<u32>) -> bool {
        let tree = self.tree;
        if JumpFinder::search(tree, body, JumpKind::Break, switch, TargetMatch::Exact) {
            return true;
        }
        let stmts = tree.block_stmts(body);
        let mut has_default = false;
        let mut covered = FxHashSet::default();
        for &s in stmts {
            let (StmtKind::CaseLabel { values } | StmtKind::SwitchRule { values, .. }) =
                tree.stmt_kind(s)
            else {
                continue;
            };
            if values.is_empty() {
                has_default = true;
            }
            for &value in values {
                if let ExprKind::Name(name) = tree.expr_kind(tree.skip_parens(value)) {
                    covered.insert(*name);
                }
            }
        }
        let exhaustive =
            has_default || enum_constants.is_some_and(|n| covered.len() >= n as usize);
        if !exhaustive {
            return true;
        }
        let rules = stmts
            .first()
            .is_some_and(|&s| matches!(tree.stmt_kind(s), StmtKind::SwitchRule { .. }));
        if rules {
            stmts.iter().any(|&s| self.completes(s))
        } else {
            stmts.last().map_or(true, |&s| self.completes(s))
        }
    }

    fn is_recursive_call(&self, expr: ExprId) -> bool {
        let Some((method, arity)) = self.recursion else {
            return false;
        };
        let tree = self.tree;
        match tree.expr_kind(tree.skip_parens(expr)) {
            ExprKind::MethodCall {
                qualifier,
                name,
                args,
            } => {
                *name == method
                    && args.len() == arity
                    && qualifier
                        .map_or(true, |q| matches!(tree.expr_kind(tree.skip_parens(q)), ExprKind::This))
            }
            _ => false,
        }
    }
}

/// An endless loop can still be left through a `break` out of it (or out of
/// an enclosing statement) or a `continue` of an enclosing loop.
fn loop_can_exit(tree: &SyntaxTree, lp: StmtId) -> bool {
    JumpFinder::search(tree, lp, JumpKind::Break, lp, TargetMatch::ExactOrAncestor)
        || JumpFinder::search(tree, lp, JumpKind::Continue, lp, TargetMatch::StrictAncestor)
}

fn subtree_size(tree: &SyntaxTree, stmt: StmtId) -> usize {
    struct Counter(usize);

    impl<'t> Visitor<'t> for Counter {
        fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
            self.0 += 1;
            walk_expr(self, id, tree);
        }

        fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
            self.0 += 1;
            walk_stmt(self, id, tree);
        }
    }

    let mut counter = Counter(0);
    counter.visit_stmt(stmt, tree);
    counter.0
}

fn is_call_to(tree: &SyntaxTree, expr: ExprId, qualifier_name: &str, method: &str) -> bool {
    let interner = tree.interner();
    let (Some(qualifier_name), Some(method)) = (interner.get(qualifier_name), interner.get(method))
    else {
        return false;
    };
    match tree.expr_kind(expr) {
        ExprKind::MethodCall {
            qualifier: Some(q),
            name,
            ..
        } => *name == method && matches!(tree.expr_kind(tree.skip_parens(*q)), ExprKind::Name(n) if *n == qualifier_name),
        _ => false,
    }
}

/// `System.exit(status)`.
pub(crate) fn is_system_exit_call(tree: &SyntaxTree, expr: ExprId) -> bool {
    let expr = tree.skip_parens(expr);
    matches!(tree.expr_kind(expr), ExprKind::MethodCall { args, .. } if args.len() == 1)
        && is_call_to(tree, expr, "System", "exit")
}

/// `System.exit(..)`, or `Runtime.getRuntime().exit(..)`/`.halt(..)`.
pub(crate) fn is_exit_call(tree: &SyntaxTree, expr: ExprId) -> bool {
    if is_system_exit_call(tree, expr) {
        return true;
    }
    let interner = tree.interner();
    let (Some(exit), Some(halt)) = (interner.get("exit"), interner.get("halt")) else {
        return false;
    };
    match tree.expr_kind(tree.skip_parens(expr)) {
        ExprKind::MethodCall {
            qualifier: Some(q),
            name,
            ..
        } if *name == exit || *name == halt => {
            is_call_to(tree, tree.skip_parens(*q), "Runtime", "getRuntime")
        }
        _ => false,
    }
}

/// A `while`, `do` or `for` loop with a constant `true` condition that no
/// jump leaves.
pub fn is_endless_loop(tree: &SyntaxTree, stmt: StmtId) -> bool {
    let endless = match tree.stmt_kind(stmt) {
        StmtKind::While { cond, .. } | StmtKind::DoWhile { cond, .. } => is_constant_true(tree, *cond),
        StmtKind::For { cond, .. } => cond.map_or(true, |c| is_constant_true(tree, c)),
        _ => false,
    };
    endless && !loop_can_exit(tree, stmt)
}

/// Whether `stmt` contains a `return` of its own method.
pub fn contains_return(tree: &SyntaxTree, stmt: StmtId) -> bool {
    ExitFinder::search(tree, stmt, false)
}

/// Whether `stmt` contains a `yield` of the switch expression it belongs to.
pub fn contains_yield(tree: &SyntaxTree, stmt: StmtId) -> bool {
    ExitFinder::search(tree, stmt, true)
}

pub fn contains_system_exit(tree: &SyntaxTree, stmt: StmtId) -> bool {
    SystemExitFinder::search(tree, stmt)
}

/// An unlabeled `break` inside `stmt` that is not owned by a nested loop or
/// switch. A loop or switch passed as `stmt` owns its own breaks.
pub fn statement_contains_naked_break(tree: &SyntaxTree, stmt: StmtId) -> bool {
    NakedJumpFinder::search(tree, stmt, JumpKind::Break)
}

pub fn statement_contains_naked_continue(tree: &SyntaxTree, stmt: StmtId) -> bool {
    NakedJumpFinder::search(tree, stmt, JumpKind::Continue)
}

/// Whether some `break` inside `stmt` exits exactly `stmt`.
pub fn statement_is_break_target(tree: &SyntaxTree, stmt: StmtId) -> bool {
    JumpFinder::search(tree, stmt, JumpKind::Break, stmt, TargetMatch::Exact)
}

/// Whether some `continue` inside `stmt` continues exactly `stmt`.
pub fn statement_is_continue_target(tree: &SyntaxTree, stmt: StmtId) -> bool {
    JumpFinder::search(tree, stmt, JumpKind::Continue, stmt, TargetMatch::Exact)
}

/// The statement a `break` or `continue` transfers control out of.
///
/// An unlabeled `break` exits the innermost loop or switch statement, an
/// unlabeled `continue` the innermost loop. A labeled `break` exits the
/// labeled statement; a labeled `continue` continues the loop under the
/// label. Jumps never cross expressions (lambdas, switch expressions,
/// anonymous classes), so `None` is returned when the target would lie
/// outside one, or when `jump` is not a jump.
pub fn find_exited_statement(tree: &SyntaxTree, jump: StmtId) -> Option<StmtId> {
    match tree.stmt_kind(jump) {
        StmtKind::Break(None) => innermost_enclosing(tree, jump, |k| {
            k.is_loop() || matches!(k, StmtKind::Switch { .. })
        }),
        StmtKind::Continue(None) => innermost_enclosing(tree, jump, StmtKind::is_loop),
        StmtKind::Break(Some(label)) => labeled_enclosing(tree, jump, *label),
        StmtKind::Continue(Some(label)) => {
            let mut target = labeled_enclosing(tree, jump, *label)?;
            while let StmtKind::Labeled { body, .. } = tree.stmt_kind(target) {
                target = *body;
            }
            tree.stmt_kind(target).is_loop().then_some(target)
        }
        _ => None,
    }
}

fn innermost_enclosing(
    tree: &SyntaxTree,
    from: StmtId,
    pred: impl Fn(&StmtKind) -> bool,
) -> Option<StmtId> {
    for ancestor in tree.ancestors(NodeId::Stmt(from)) {
        let NodeId::Stmt(stmt) = ancestor else {
            return None;
        };
        if pred(tree.stmt_kind(stmt)) {
            return Some(stmt);
        }
    }
    None
}

fn labeled_enclosing(tree: &SyntaxTree, from: StmtId, label: Name) -> Option<StmtId> {
    innermost_enclosing(tree, from, |k| matches!(k, StmtKind::Labeled { label: l, .. } if *l == label))
}

/// The body of a method never falls off its end and never returns.
pub fn method_always_throws(tree: &SyntaxTree, method: MemberId) -> bool {
    match tree.member(method) {
        Member::Method { body: Some(body), .. } => {
            !contains_return(tree, *body) && !method_may_complete_normally(tree, method)
        }
        _ => false,
    }
}

fn loop_body(kind: &StmtKind) -> Option<StmtId> {
    match kind {
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::For { body, .. }
        | StmtKind::Foreach { body, .. } => Some(*body),
        _ => None,
    }
}

/// Whether `node` lies in the body of its nearest enclosing loop within the
/// same method or lambda.
pub fn is_in_loop(tree: &SyntaxTree, node: NodeId) -> bool {
    let mut child = node;
    for ancestor in tree.ancestors(node) {
        match ancestor {
            NodeId::Stmt(stmt) => {
                if let Some(body) = loop_body(tree.stmt_kind(stmt)) {
                    return child == NodeId::Stmt(body);
                }
            }
            NodeId::Expr(expr) => {
                if matches!(tree.expr_kind(expr), ExprKind::Lambda { .. }) {
                    return false;
                }
            }
            NodeId::Member(_) | NodeId::Class(_) => return false,
        }
        child = ancestor;
    }
    false
}

/// Whether `node` lies in a `finally` block within the same method or
/// lambda.
pub fn is_in_finally_block(tree: &SyntaxTree, node: NodeId) -> bool {
    let mut child = node;
    for ancestor in tree.ancestors(node) {
        match ancestor {
            NodeId::Stmt(stmt) => {
                if let StmtKind::Try {
                    finally: Some(finally),
                    ..
                } = tree.stmt_kind(stmt)
                {
                    if child == NodeId::Stmt(*finally) {
                        return true;
                    }
                }
            }
            NodeId::Expr(expr) => {
                if matches!(tree.expr_kind(expr), ExprKind::Lambda { .. }) {
                    return false;
                }
            }
            NodeId::Member(_) | NodeId::Class(_) => return false,
        }
        child = ancestor;
    }
    false
}

/// `stmt` is an `if` sitting in the else branch of another `if`.
pub fn is_else_if(tree: &SyntaxTree, stmt: StmtId) -> bool {
    if !matches!(tree.stmt_kind(stmt), StmtKind::If { .. }) {
        return false;
    }
    tree.parent_stmt(stmt).is_some_and(|p| {
        matches!(tree.stmt_kind(p), StmtKind::If { else_branch: Some(e), .. } if *e == stmt)
    })
}

/// Peel blocks that hold exactly one statement.
pub fn strip_braces(tree: &SyntaxTree, mut stmt: StmtId) -> StmtId {
    while let Some(inner) = only_statement_in_block(tree, stmt) {
        stmt = inner;
    }
    stmt
}

/// The single statement of `block`, if it holds exactly one.
pub fn only_statement_in_block(tree: &SyntaxTree, block: StmtId) -> Option<StmtId> {
    match tree.stmt_kind(block) {
        StmtKind::Block(stmts) if stmts.len() == 1 => Some(stmts[0]),
        _ => None,
    }
}

/// `;`, or a block of nothing but empty statements.
pub fn statement_is_empty(tree: &SyntaxTree, stmt: StmtId) -> bool {
    match tree.stmt_kind(stmt) {
        StmtKind::Empty => true,
        StmtKind::Block(stmts) => stmts.iter().all(|&s| statement_is_empty(tree, s)),
        _ => false,
    }
}

/// Whether `stmt` is the last thing executed on the fall-through path of
/// `block`: it is last in its block (ignoring trailing `;`), and so is every
/// enclosing statement up to `block`, with no loop in between.
pub fn block_completes_with_statement(tree: &SyntaxTree, block: StmtId, stmt: StmtId) -> bool {
    let mut current = stmt;
    loop {
        let Some(parent) = tree.parent_stmt(current) else {
            return false;
        };
        let kind = tree.stmt_kind(parent);
        if kind.is_loop() {
            return false;
        }
        if let StmtKind::Block(stmts) = kind {
            let last = stmts
                .iter()
                .rev()
                .find(|&&s| !matches!(tree.stmt_kind(s), StmtKind::Empty));
            if last != Some(&current) {
                return false;
            }
            if parent == block {
                return true;
            }
        }
        current = parent;
    }
}
