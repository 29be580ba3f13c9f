//! Extraction safety.
//!
//! Decides whether the evaluation of a subexpression can be hoisted out of
//! an enclosing expression, i.e. performed before everything else the
//! enclosing expression evaluates, without changing behavior. Two things
//! can go wrong: an earlier sibling has side effects the subexpression
//! depends on (or vice versa), or an earlier sibling is a *guard* that
//! prevents the subexpression from throwing.

#[cfg(test)]
mod tests;

use recast_ir::ast::{BinaryOp, ExprKind};
use recast_ir::visitor::{walk_expr, Visitor};
use recast_ir::{ExprId, Name, NodeId, StmtId, SyntaxTree};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::const_eval::is_constant;
use crate::side_effects::may_have_side_effects;

/// Answer of [`can_extract`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExtractSafety {
    Yes,
    No,
    Unsure,
}

impl ExtractSafety {
    /// Combine the answers of two steps: any `No` wins, then any `Unsure`.
    #[must_use]
    pub fn combine(self, other: ExtractSafety) -> ExtractSafety {
        match (self, other) {
            (ExtractSafety::No, _) | (_, ExtractSafety::No) => ExtractSafety::No,
            (ExtractSafety::Unsure, _) | (_, ExtractSafety::Unsure) => ExtractSafety::Unsure,
            (ExtractSafety::Yes, ExtractSafety::Yes) => ExtractSafety::Yes,
        }
    }
}

/// Whether `sub` can be evaluated before the rest of `ancestor`.
///
/// `Unsure` when `sub` is not inside `ancestor`.
pub fn can_extract(tree: &SyntaxTree, ancestor: ExprId, sub: ExprId) -> ExtractSafety {
    if sub == ancestor || is_constant(tree, sub) {
        return ExtractSafety::Yes;
    }
    let mut result = ExtractSafety::Yes;
    let mut current = sub;
    while current != ancestor {
        match tree.parent(NodeId::Expr(current)) {
            Some(NodeId::Expr(parent)) => {
                result = result.combine(step(tree, parent, current));
                if result == ExtractSafety::No {
                    trace!(?parent, "extract: blocked");
                    return result;
                }
                current = parent;
            }
            Some(node) => return leave_statement_context(tree, ancestor, node),
            None => return ExtractSafety::Unsure,
        }
    }
    result
}

/// `sub` sits in a statement or class body nested in an expression (lambda
/// block, switch expression, anonymous class). Code there runs at another
/// time, so it can never be hoisted out of an expression enclosing it.
fn leave_statement_context(tree: &SyntaxTree, ancestor: ExprId, from: NodeId) -> ExtractSafety {
    let owner = tree.ancestors(from).find_map(NodeId::as_expr);
    match owner {
        Some(owner) if tree.is_ancestor(NodeId::Expr(ancestor), NodeId::Expr(owner), false) => {
            ExtractSafety::No
        }
        _ => ExtractSafety::Unsure,
    }
}

/// Whether `child` can be evaluated before its siblings in `parent`.
fn step(tree: &SyntaxTree, parent: ExprId, child: ExprId) -> ExtractSafety {
    let pure = |e: ExprId| !may_have_side_effects(tree, e);
    match tree.expr_kind(parent) {
        ExprKind::MethodCall {
            qualifier, args, ..
        } => {
            if *qualifier == Some(child) {
                return ExtractSafety::Yes;
            }
            let earlier = args.iter().take_while(|&&a| a != child);
            if qualifier.map_or(true, pure) && earlier.copied().all(pure) {
                ExtractSafety::Yes
            } else {
                ExtractSafety::No
            }
        }
        ExprKind::New { args, .. } | ExprKind::ConstructorCall { args, .. } => {
            if args.iter().take_while(|&&a| a != child).copied().all(pure) {
                ExtractSafety::Yes
            } else {
                ExtractSafety::No
            }
        }
        ExprKind::Conditional { cond, .. } => {
            if *cond == child {
                ExtractSafety::Yes
            } else if is_necessary_guard(tree, *cond, child) {
                ExtractSafety::No
            } else if pure(*cond) && pure(child) {
                ExtractSafety::Yes
            } else {
                ExtractSafety::Unsure
            }
        }
        ExprKind::Polyadic { op, operands } => {
            let earlier: Vec<ExprId> = operands.iter().copied().take_while(|&o| o != child).collect();
            if earlier.is_empty() {
                return ExtractSafety::Yes;
            }
            if op.is_short_circuit() {
                if earlier.iter().any(|&g| is_necessary_guard(tree, g, child)) {
                    ExtractSafety::No
                } else if earlier.iter().copied().all(pure) && pure(child) {
                    ExtractSafety::Yes
                } else {
                    ExtractSafety::Unsure
                }
            } else if earlier.iter().copied().all(pure) {
                ExtractSafety::Yes
            } else {
                ExtractSafety::Unsure
            }
        }
        ExprKind::Assign { lhs, .. } => {
            if *lhs == child {
                ExtractSafety::No
            } else if pure(*lhs) {
                ExtractSafety::Yes
            } else {
                ExtractSafety::Unsure
            }
        }
        ExprKind::Lambda { .. } => ExtractSafety::No,
        _ => ExtractSafety::Yes,
    }
}

/// A guard is necessary for `mover` when a variable it mentions appears
/// where `mover` could throw: a dereferenced qualifier, an array or index,
/// a cast operand, or a divisor.
pub fn is_necessary_guard(tree: &SyntaxTree, guard: ExprId, mover: ExprId) -> bool {
    let guarded = names_in(tree, guard);
    if guarded.is_empty() {
        return false;
    }
    let mut sites = ExceptionSites {
        names: FxHashSet::default(),
    };
    sites.visit_expr(mover, tree);
    !guarded.is_disjoint(&sites.names)
}

fn names_in(tree: &SyntaxTree, expr: ExprId) -> FxHashSet<Name> {
    let mut collector = NameCollector {
        names: FxHashSet::default(),
    };
    collector.visit_expr(expr, tree);
    collector.names
}

struct NameCollector {
    names: FxHashSet<Name>,
}

impl<'t> Visitor<'t> for NameCollector {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        match tree.expr_kind(id) {
            ExprKind::Name(name) => {
                self.names.insert(*name);
            }
            ExprKind::Lambda { .. } => {}
            _ => walk_expr(self, id, tree),
        }
    }

    fn visit_stmt(&mut self, _id: StmtId, _tree: &'t SyntaxTree) {}
}

/// Collects the variables mentioned at the places an expression may throw.
struct ExceptionSites {
    names: FxHashSet<Name>,
}

impl ExceptionSites {
    fn site(&mut self, tree: &SyntaxTree, expr: ExprId) {
        self.names.extend(names_in(tree, expr));
    }
}

impl<'t> Visitor<'t> for ExceptionSites {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        match tree.expr_kind(id) {
            ExprKind::FieldAccess { qualifier, .. }
            | ExprKind::MethodCall {
                qualifier: Some(qualifier),
                ..
            } => self.site(tree, *qualifier),
            ExprKind::ArrayAccess { array, index } => {
                self.site(tree, *array);
                self.site(tree, *index);
            }
            ExprKind::Cast { operand, .. } => self.site(tree, *operand),
            ExprKind::Polyadic {
                op: BinaryOp::Div | BinaryOp::Mod,
                operands,
            } => {
                for &divisor in operands.iter().skip(1) {
                    self.site(tree, divisor);
                }
            }
            ExprKind::Lambda { .. } => return,
            _ => {}
        }
        walk_expr(self, id, tree);
    }

    fn visit_stmt(&mut self, _id: StmtId, _tree: &'t SyntaxTree) {}
}
