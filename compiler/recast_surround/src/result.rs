//! What a rewrite hands back, and how to fold it.

use recast_ir::{ExprId, MemberId, NodeId, StmtId, SyntaxTree};
use tracing::debug;

use crate::variants::{
    anonymous_call, block_wrap, field_init, for_split, lambda, short_circuit, split_try, ternary,
    while_condition, yield_wrap,
};

/// Outcome of [`Surrounder::surround`](crate::Surrounder::surround).
#[derive(Debug)]
pub struct SurroundResult {
    /// The surrounded expression. Always the id the classifier was given.
    pub expression: ExprId,
    /// Statements inserted immediately before this one run before
    /// `expression` is evaluated. Its parent is a block.
    pub anchor: StmtId,
    /// Handle for [`collapse`](Self::collapse).
    pub context: SurroundContext,
}

impl SurroundResult {
    /// Fold the rewrite back if the tree still has the shape it produced.
    /// Returns whether anything changed.
    pub fn collapse(self, tree: &mut SyntaxTree) -> bool {
        self.context.collapse(tree)
    }
}

/// The node a rewrite introduced or restructured, plus what its collapse
/// needs to know about the forward edit.
#[derive(Debug)]
pub struct SurroundContext {
    node: NodeId,
    plan: Option<CollapsePlan>,
}

/// Data recorded by the forward rewrite of each variant.
#[derive(Debug)]
pub(crate) enum CollapsePlan {
    BlockWrap {
        block: StmtId,
    },
    YieldWrap {
        block: StmtId,
    },
    Lambda {
        lambda: ExprId,
    },
    ForSplit {
        init: Vec<StmtId>,
        for_stmt: StmtId,
        /// The `for` or its outermost label.
        head: StmtId,
    },
    SimpleWrap {
        block: StmtId,
        init: Vec<StmtId>,
        for_stmt: StmtId,
        head: StmtId,
    },
    WhileCondition {
        lp: StmtId,
        body_was_block: bool,
    },
    SplitTry {
        outer: StmtId,
    },
    ExtractFieldInit {
        initializer: MemberId,
        field: MemberId,
        created: bool,
    },
    AnonymousCall {
        call: ExprId,
    },
    /// Composite rewrites fold their own edit first, then the upstream's.
    ShortCircuit {
        split: short_circuit::Split,
        upstream: Box<SurroundContext>,
    },
    Ternary {
        split: ternary::Split,
        upstream: Box<SurroundContext>,
    },
}

impl CollapsePlan {
    fn handle(&self) -> NodeId {
        match self {
            CollapsePlan::BlockWrap { block }
            | CollapsePlan::YieldWrap { block }
            | CollapsePlan::SimpleWrap { block, .. } => NodeId::Stmt(*block),
            CollapsePlan::Lambda { lambda } => NodeId::Expr(*lambda),
            CollapsePlan::ForSplit { init, for_stmt, .. } => {
                NodeId::Stmt(init.first().copied().unwrap_or(*for_stmt))
            }
            CollapsePlan::WhileCondition { lp, .. } => NodeId::Stmt(*lp),
            CollapsePlan::SplitTry { outer } => NodeId::Stmt(*outer),
            CollapsePlan::ExtractFieldInit { initializer, .. } => NodeId::Member(*initializer),
            CollapsePlan::AnonymousCall { call } => NodeId::Expr(*call),
            CollapsePlan::ShortCircuit { split, .. } => NodeId::Stmt(split.handle()),
            CollapsePlan::Ternary { split, .. } => NodeId::Stmt(split.handle()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CollapsePlan::BlockWrap { .. } => "block-wrap",
            CollapsePlan::YieldWrap { .. } => "yield-wrap",
            CollapsePlan::Lambda { .. } => "lambda",
            CollapsePlan::ForSplit { .. } => "for-split",
            CollapsePlan::SimpleWrap { .. } => "simple-wrap",
            CollapsePlan::WhileCondition { .. } => "while-condition",
            CollapsePlan::SplitTry { .. } => "split-try",
            CollapsePlan::ExtractFieldInit { .. } => "extract-field-init",
            CollapsePlan::AnonymousCall { .. } => "anonymous-call",
            CollapsePlan::ShortCircuit { .. } => "short-circuit-split",
            CollapsePlan::Ternary { .. } => "ternary-split",
        }
    }
}

impl SurroundContext {
    /// Context of a rewrite that changed nothing.
    pub(crate) fn inert(node: NodeId) -> Self {
        SurroundContext { node, plan: None }
    }

    pub(crate) fn planned(plan: CollapsePlan) -> Self {
        SurroundContext {
            node: plan.handle(),
            plan: Some(plan),
        }
    }

    /// The statement, expression or member the rewrite introduced or
    /// restructured.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether collapsing can change anything at all.
    pub fn is_collapsible(&self) -> bool {
        self.plan.is_some()
    }

    /// Fold the rewrite back. A no-op when the handle was detached by later
    /// edits or the shape around it no longer matches.
    pub fn collapse(self, tree: &mut SyntaxTree) -> bool {
        let Some(plan) = self.plan else {
            return false;
        };
        let name = plan.name();
        if !tree.is_attached(self.node) {
            debug!(variant = name, node = ?self.node, "collapse skipped: context detached");
            return false;
        }
        let collapsed = match plan {
            CollapsePlan::BlockWrap { block } => block_wrap::collapse(tree, block),
            CollapsePlan::YieldWrap { block } => yield_wrap::collapse(tree, block),
            CollapsePlan::Lambda { lambda } => lambda::collapse(tree, lambda),
            CollapsePlan::ForSplit {
                init,
                for_stmt,
                head,
            } => for_split::collapse_split(tree, &init, for_stmt, head),
            CollapsePlan::SimpleWrap {
                block,
                init,
                for_stmt,
                head,
            } => for_split::collapse_wrap(tree, block, &init, for_stmt, head),
            CollapsePlan::WhileCondition { lp, body_was_block } => {
                while_condition::collapse(tree, lp, body_was_block)
            }
            CollapsePlan::SplitTry { outer } => split_try::collapse(tree, outer),
            CollapsePlan::ExtractFieldInit {
                initializer,
                field,
                created,
            } => field_init::collapse(tree, initializer, field, created),
            CollapsePlan::AnonymousCall { call } => anonymous_call::collapse(tree, call),
            CollapsePlan::ShortCircuit { split, upstream } => {
                let folded = short_circuit::collapse(tree, split);
                if folded {
                    upstream.collapse(tree);
                }
                folded
            }
            CollapsePlan::Ternary { split, upstream } => {
                let folded = ternary::collapse(tree, split);
                if folded {
                    upstream.collapse(tree);
                }
                folded
            }
        };
        if collapsed {
            debug!(variant = name, node = ?self.node, "collapsed");
        } else {
            debug!(variant = name, node = ?self.node, "collapse skipped: shape changed");
        }
        collapsed
    }
}
