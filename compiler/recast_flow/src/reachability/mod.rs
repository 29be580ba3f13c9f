//! Statement reachability.
//!
//! Reachability is answered on a flow graph built for a *region*: the
//! smallest block enclosing the queried statement that is not the body of a
//! switch. The region's entry is assumed reachable; control that leaves the
//! region (returns, throws, jumps to outer statements) flows into a single
//! exit node.
//!
//! Unlike the completion oracle, `if` statements keep both branches
//! reachable whatever their condition, matching the language's
//! unreachable-code rules. Loops honor constant conditions.


use recast_ir::ast::{CatchClause, ExprKind, StmtKind};
use recast_ir::{NodeId, StmtId, SyntaxTree};
use recast_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::completion::find_exited_statement;
use crate::const_eval::constant_bool;
use crate::FlowError;

/// Node every abrupt exit from the region flows into.
const EXIT: usize = 0;

/// Whether control can reach `stmt` from the entry of its region.
///
/// Graph construction failures answer `true`.
pub fn is_reachable(tree: &SyntaxTree, stmt: StmtId) -> bool {
    match try_is_reachable(tree, stmt) {
        Ok(reachable) => reachable,
        Err(err) => {
            debug!(%err, "reachability: assuming reachable");
            true
        }
    }
}

/// Like [`is_reachable`], reporting graph construction failures.
pub fn try_is_reachable(tree: &SyntaxTree, stmt: StmtId) -> Result<bool, FlowError> {
    let Some(region) = analysis_region(tree, stmt) else {
        return Ok(true);
    };
    let graph = FlowGraph::build(tree, region)?;
    graph
        .reaches(stmt)
        .ok_or(FlowError::NotInRegion { stmt, region })
}

/// Smallest block strictly enclosing `stmt` that is not a switch body.
/// `None` when an expression or member is met first.
fn analysis_region(tree: &SyntaxTree, stmt: StmtId) -> Option<StmtId> {
    for ancestor in tree.ancestors(NodeId::Stmt(stmt)) {
        let NodeId::Stmt(candidate) = ancestor else {
            return None;
        };
        if !tree.is_block(candidate) {
            continue;
        }
        let switch_body = match tree.parent(ancestor) {
            Some(NodeId::Stmt(p)) => matches!(tree.stmt_kind(p), StmtKind::Switch { .. }),
            Some(NodeId::Expr(e)) => matches!(tree.expr_kind(e), ExprKind::SwitchExpr { .. }),
            _ => false,
        };
        if !switch_body {
            return Some(candidate);
        }
    }
    None
}

/// Flow graph over the statements of one region.
///
/// Every statement gets an entry node; a `finally` block is built twice
/// (normal and exceptional completion), so a statement may own more than
/// one node.
pub struct FlowGraph {
    succs: Vec<SmallVec<[usize; 2]>>,
    entries: FxHashMap<StmtId, SmallVec<[usize; 2]>>,
    entry: usize,
}

impl FlowGraph {
    pub fn build(tree: &SyntaxTree, region: StmtId) -> Result<Self, FlowError> {
        let mut builder = Builder {
            tree,
            succs: vec![SmallVec::new()],
            entries: FxHashMap::default(),
            scopes: Vec::new(),
        };
        let entry = builder.stmt(region, EXIT)?;
        Ok(FlowGraph {
            succs: builder.succs,
            entries: builder.entries,
            entry,
        })
    }

    /// Whether some entry node of `stmt` is reachable; `None` when `stmt`
    /// is not part of the graph.
    pub fn reaches(&self, stmt: StmtId) -> Option<bool> {
        let nodes = self.entries.get(&stmt)?;
        let reachable = self.reachable_nodes();
        Some(nodes.iter().any(|&n| reachable[n]))
    }

    pub fn node_count(&self) -> usize {
        self.succs.len()
    }

    fn reachable_nodes(&self) -> Vec<bool> {
        let mut seen = vec![false; self.succs.len()];
        let mut stack = vec![self.entry];
        while let Some(node) = stack.pop() {
            if std::mem::replace(&mut seen[node], true) {
                continue;
            }
            stack.extend(self.succs[node].iter().copied().filter(|&s| !seen[s]));
        }
        seen
    }
}

/// Statements a `break` or `continue` may target, and `finally` blocks a
/// jump must pass through.
enum Scope {
    Jump {
        stmt: StmtId,
        break_to: usize,
        continue_to: Option<usize>,
    },
    Finally {
        entry: usize,
    },
}

struct Builder<'t> {
    tree: &'t SyntaxTree,
    succs: Vec<SmallVec<[usize; 2]>>,
    entries: FxHashMap<StmtId, SmallVec<[usize; 2]>>,
    scopes: Vec<Scope>,
}

impl Builder<'_> {
    fn node(&mut self) -> usize {
        self.succs.push(SmallVec::new());
        self.succs.len() - 1
    }

    fn edge(&mut self, from: usize, to: usize) {
        if !self.succs[from].contains(&to) {
            self.succs[from].push(to);
        }
    }

    fn enter(&mut self, stmt: StmtId) -> usize {
        let node = self.node();
        self.entries.entry(stmt).or_default().push(node);
        node
    }

    /// Build `stmt` so that normal completion flows to `next`; returns its
    /// entry node.
    fn stmt(&mut self, stmt: StmtId, next: usize) -> Result<usize, FlowError> {
        ensure_sufficient_stack(|| self.stmt_inner(stmt, next))
    }

    fn stmt_inner(&mut self, stmt: StmtId, next: usize) -> Result<usize, FlowError> {
        let tree = self.tree;
        let node = self.enter(stmt);
        match tree.stmt_kind(stmt) {
            StmtKind::Block(stmts) => {
                let mut cont = next;
                for &s in stmts.iter().rev() {
                    cont = self.stmt(s, cont)?;
                }
                self.edge(node, cont);
            }
            StmtKind::Expr(_)
            | StmtKind::LocalVar { .. }
            | StmtKind::Assert { .. }
            | StmtKind::Empty
            | StmtKind::CaseLabel { .. } => self.edge(node, next),
            StmtKind::Return(_) | StmtKind::Throw(_) | StmtKind::Yield(_) => {
                self.leave(node, 0);
            }
            StmtKind::Break(_) | StmtKind::Continue(_) => self.jump(stmt, node)?,
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let then_entry = self.stmt(*then_branch, next)?;
                self.edge(node, then_entry);
                match else_branch {
                    Some(e) => {
                        let else_entry = self.stmt(*e, next)?;
                        self.edge(node, else_entry);
                    }
                    None => self.edge(node, next),
                }
            }
            StmtKind::While { cond, body } => {
                let constant = constant_bool(tree, *cond);
                let body_entry = self.loop_body(stmt, *body, node, next)?;
                if constant != Some(false) {
                    self.edge(node, body_entry);
                }
                if constant != Some(true) {
                    self.edge(node, next);
                }
            }
            StmtKind::DoWhile { body, cond } => {
                let constant = constant_bool(tree, *cond);
                let check = self.node();
                let body_entry = self.loop_body(stmt, *body, check, next)?;
                self.edge(node, body_entry);
                if constant != Some(false) {
                    self.edge(check, body_entry);
                }
                if constant != Some(true) {
                    self.edge(check, next);
                }
            }
            StmtKind::For {
                init, cond, body, ..
            } => {
                let constant = cond.map_or(Some(true), |c| constant_bool(tree, c));
                let check = self.node();
                let update = self.node();
                self.edge(update, check);
                let body_entry = self.loop_body(stmt, *body, update, next)?;
                if constant != Some(false) {
                    self.edge(check, body_entry);
                }
                if constant != Some(true) {
                    self.edge(check, next);
                }
                let mut cont = check;
                for &s in init.iter().rev() {
                    cont = self.stmt(s, cont)?;
                }
                self.edge(node, cont);
            }
            StmtKind::Foreach { body, .. } => {
                let body_entry = self.loop_body(stmt, *body, node, next)?;
                self.edge(node, body_entry);
                self.edge(node, next);
            }
            StmtKind::Labeled { body, .. } => {
                self.scopes.push(Scope::Jump {
                    stmt,
                    break_to: next,
                    continue_to: None,
                });
                let body_entry = self.stmt(*body, next);
                self.scopes.pop();
                self.edge(node, body_entry?);
            }
            StmtKind::Synchronized { body, .. } => {
                let body_entry = self.stmt(*body, next)?;
                self.edge(node, body_entry);
            }
            StmtKind::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                let (after, exceptional) = match finally {
                    Some(f) => (self.stmt(*f, next)?, Some(self.stmt(*f, EXIT)?)),
                    None => (next, None),
                };
                if let Some(entry) = exceptional {
                    self.scopes.push(Scope::Finally { entry });
                    self.edge(node, entry);
                }
                let protected = self.try_parts(resources, *block, catches, after);
                if exceptional.is_some() {
                    self.scopes.pop();
                }
                let (cont, handlers) = protected?;
                self.edge(node, cont);
                for handler in handlers {
                    self.edge(node, handler);
                }
            }
            StmtKind::Switch { body, .. } => {
                self.scopes.push(Scope::Jump {
                    stmt,
                    break_to: next,
                    continue_to: None,
                });
                let cases = self.switch_body(*body, next);
                self.scopes.pop();
                let (cases, has_default) = cases?;
                for case in cases {
                    self.edge(node, case);
                }
                if !has_default {
                    self.edge(node, next);
                }
            }
            StmtKind::SwitchRule { body, .. } => {
                let body_entry = self.stmt(*body, next)?;
                self.edge(node, body_entry);
            }
        }
        Ok(node)
    }

    fn loop_body(
        &mut self,
        lp: StmtId,
        body: StmtId,
        continue_to: usize,
        next: usize,
    ) -> Result<usize, FlowError> {
        self.scopes.push(Scope::Jump {
            stmt: lp,
            break_to: next,
            continue_to: Some(continue_to),
        });
        let entry = self.stmt(body, continue_to);
        self.scopes.pop();
        entry
    }

    /// Resources, try block and catch blocks; returns the entry of the
    /// resources (or block) and the catch entries.
    fn try_parts(
        &mut self,
        resources: &[StmtId],
        block: StmtId,
        catches: &[CatchClause],
        after: usize,
    ) -> Result<(usize, SmallVec<[usize; 2]>), FlowError> {
        let mut handlers = SmallVec::new();
        for catch in catches {
            handlers.push(self.stmt(catch.body, after)?);
        }
        let mut cont = self.stmt(block, after)?;
        for &r in resources.iter().rev() {
            cont = self.stmt(r, cont)?;
        }
        Ok((cont, handlers))
    }

    /// Builds the statements of a switch body; returns the entries of its
    /// case labels or rules and whether one of them is `default`.
    fn switch_body(
        &mut self,
        body: StmtId,
        next: usize,
    ) -> Result<(SmallVec<[usize; 4]>, bool), FlowError> {
        let tree = self.tree;
        let block = self.enter(body);
        let mut cases = SmallVec::new();
        let mut has_default = false;
        let mut cont = next;
        for &s in tree.block_stmts(body).iter().rev() {
            cont = self.stmt(s, cont)?;
            if let StmtKind::CaseLabel { values } | StmtKind::SwitchRule { values, .. } =
                tree.stmt_kind(s)
            {
                has_default |= values.is_empty();
                cases.push(cont);
            }
        }
        self.edge(block, cont);
        Ok((cases, has_default))
    }

    /// Abrupt completion out of every scope above `depth`: through each
    /// `finally` on the way, then to the exit node.
    fn leave(&mut self, node: usize, depth: usize) {
        self.through_finally(node, depth);
        self.edge(node, EXIT);
    }

    fn through_finally(&mut self, node: usize, depth: usize) {
        let finally: SmallVec<[usize; 2]> = self.scopes[depth..]
            .iter()
            .filter_map(|s| match s {
                Scope::Finally { entry } => Some(*entry),
                Scope::Jump { .. } => None,
            })
            .collect();
        for entry in finally {
            self.edge(node, entry);
        }
    }

    fn jump(&mut self, jump: StmtId, node: usize) -> Result<(), FlowError> {
        let tree = self.tree;
        let target = find_exited_statement(tree, jump).ok_or(FlowError::UnresolvedJump(jump))?;
        let is_continue = matches!(tree.stmt_kind(jump), StmtKind::Continue(_));
        let found = self.scopes.iter().rposition(|s| {
            matches!(s, Scope::Jump { stmt, .. } if *stmt == target)
        });
        let Some(depth) = found else {
            // Target lies outside the region.
            self.leave(node, 0);
            return Ok(());
        };
        let dest = match &self.scopes[depth] {
            Scope::Jump {
                break_to,
                continue_to,
                ..
            } => {
                if is_continue {
                    continue_to.ok_or(FlowError::UnresolvedJump(jump))?
                } else {
                    *break_to
                }
            }
            Scope::Finally { .. } => return Err(FlowError::UnresolvedJump(jump)),
        };
        self.through_finally(node, depth + 1);
        self.edge(node, dest);
        Ok(())
    }
}
