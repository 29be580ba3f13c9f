//! The chosen rewrite for one expression.

use recast_ir::{ExprId, NodeId, SyntaxTree};
use tracing::debug;

use crate::context::ParentContext;
use crate::result::SurroundResult;
use crate::variants::{
    AnonymousCall, BlockWrap, ExtractFieldInit, ForSplit, LambdaWrap, NoOp, ShortCircuitSplit,
    SimpleWrap, SplitTry, TernarySplit, WhileCondition, YieldWrap,
};

/// A rewrite that gives an expression a statement context.
///
/// Produced by [`for_expression`](crate::for_expression). Holding one does
/// not change the tree; [`surround`](Self::surround) does. The ids inside
/// refer to the tree the classifier saw, so the tree must not be edited in
/// between.
#[derive(Debug)]
pub enum Surrounder {
    /// The expression's statement already sits in a block.
    NoOp(NoOp),
    /// `S` becomes `{ S }`.
    BlockWrap(BlockWrap),
    /// A switch rule `case L -> e;` becomes `case L -> { yield e; }`.
    YieldWrap(YieldWrap),
    /// An expression lambda body becomes a block body.
    Lambda(LambdaWrap),
    /// `for` initializers move before the loop.
    ForSplit(ForSplit),
    /// `for` initializers move before the loop inside a new block.
    SimpleWrap(SimpleWrap),
    /// Part of a `while` condition moves into the body.
    WhileCondition(WhileCondition),
    /// A try-with-resources is split before the resource.
    SplitTry(SplitTry),
    /// A field initializer moves into an initializer block.
    ExtractFieldInit(ExtractFieldInit),
    /// An enum-constant argument moves into an anonymous class method.
    AnonymousCall(AnonymousCall),
    /// A `&&`/`||` chain is split before the operand.
    ShortCircuitSplit(ShortCircuitSplit),
    /// A conditional expression becomes an `if`.
    TernarySplit(TernarySplit),
}

impl Surrounder {
    /// The expression this rewrite was chosen for.
    pub fn expression(&self) -> ExprId {
        match self {
            Surrounder::NoOp(s) => s.expr,
            Surrounder::BlockWrap(s) => s.expr,
            Surrounder::YieldWrap(s) => s.expr,
            Surrounder::Lambda(s) => s.expr,
            Surrounder::ForSplit(s) => s.expr,
            Surrounder::SimpleWrap(s) => s.expr,
            Surrounder::WhileCondition(s) => s.expr,
            Surrounder::SplitTry(s) => s.expr,
            Surrounder::ExtractFieldInit(s) => s.expr,
            Surrounder::AnonymousCall(s) => s.expr,
            Surrounder::ShortCircuitSplit(s) => s.expr,
            Surrounder::TernarySplit(s) => s.expr,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Surrounder::NoOp(_) => "no-op",
            Surrounder::BlockWrap(_) => "block-wrap",
            Surrounder::YieldWrap(_) => "yield-wrap",
            Surrounder::Lambda(_) => "lambda",
            Surrounder::ForSplit(_) => "for-split",
            Surrounder::SimpleWrap(_) => "simple-wrap",
            Surrounder::WhileCondition(_) => "while-condition",
            Surrounder::SplitTry(_) => "split-try",
            Surrounder::ExtractFieldInit(_) => "extract-field-init",
            Surrounder::AnonymousCall(_) => "anonymous-call",
            Surrounder::ShortCircuitSplit(_) => "short-circuit-split",
            Surrounder::TernarySplit(_) => "ternary-split",
        }
    }

    /// How the innermost statement produced by the rewrite will use the
    /// expression, computed without rewriting.
    pub fn expected_parent_context(&self, tree: &SyntaxTree) -> ParentContext {
        match self {
            Surrounder::NoOp(s) => s.expected_parent_context(tree),
            Surrounder::BlockWrap(s) => s.expected_parent_context(tree),
            Surrounder::YieldWrap(s) => s.expected_parent_context(),
            Surrounder::Lambda(s) => s.expected_parent_context(tree),
            Surrounder::ForSplit(s) => s.expected_parent_context(tree),
            Surrounder::SimpleWrap(s) => s.expected_parent_context(tree),
            Surrounder::WhileCondition(s) => s.expected_parent_context(),
            Surrounder::SplitTry(s) => s.expected_parent_context(),
            Surrounder::ExtractFieldInit(s) => s.expected_parent_context(),
            Surrounder::AnonymousCall(s) => s.expected_parent_context(),
            Surrounder::ShortCircuitSplit(s) => s.expected_parent_context(tree),
            Surrounder::TernarySplit(s) => s.expected_parent_context(tree),
        }
    }

    /// Perform the rewrite.
    ///
    /// Afterwards the anchor sits directly in a block and contains the
    /// expression, which keeps its id.
    ///
    /// # Panics
    ///
    /// Panics if the tree no longer has the shape the classifier saw.
    pub fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let expr = self.expression();
        let name = self.name();
        let result = match self {
            Surrounder::NoOp(s) => s.surround(),
            Surrounder::BlockWrap(s) => s.surround(tree),
            Surrounder::YieldWrap(s) => s.surround(tree),
            Surrounder::Lambda(s) => s.surround(tree),
            Surrounder::ForSplit(s) => s.surround(tree),
            Surrounder::SimpleWrap(s) => s.surround(tree),
            Surrounder::WhileCondition(s) => s.surround(tree),
            Surrounder::SplitTry(s) => s.surround(tree),
            Surrounder::ExtractFieldInit(s) => s.surround(tree),
            Surrounder::AnonymousCall(s) => s.surround(tree),
            Surrounder::ShortCircuitSplit(s) => s.surround(tree),
            Surrounder::TernarySplit(s) => s.surround(tree),
        };
        debug!(
            variant = name,
            ?expr,
            anchor = ?result.anchor,
            context = ?result.context.node(),
            "surrounded"
        );

        let anchor = NodeId::Stmt(result.anchor);
        assert!(
            tree.is_in_block(result.anchor),
            "{name}: anchor {:?} is not directly in a block",
            result.anchor
        );
        assert!(
            result.expression == expr && tree.is_ancestor(anchor, NodeId::Expr(expr), true),
            "{name}: anchor {:?} does not contain {expr:?}",
            result.anchor
        );
        result
    }
}
