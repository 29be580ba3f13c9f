//! Rewrite shapes.
//!
//! Each module holds one shape: the data the classifier commits to, the
//! forward rewrite, and the collapse that folds it back. Forward rewrites
//! assume the shape the classifier saw and panic when it is missing;
//! collapses re-check everything and do nothing on a mismatch.

pub(crate) mod anonymous_call;
pub(crate) mod block_wrap;
pub(crate) mod field_init;
pub(crate) mod for_split;
pub(crate) mod lambda;
pub(crate) mod no_op;
pub(crate) mod short_circuit;
pub(crate) mod split_try;
pub(crate) mod ternary;
pub(crate) mod while_condition;
pub(crate) mod yield_wrap;

use recast_ir::ast::ExprKind;
use recast_ir::{ExprId, SyntaxTree};

pub use anonymous_call::AnonymousCall;
pub use block_wrap::BlockWrap;
pub use field_init::ExtractFieldInit;
pub use for_split::{ForSplit, SimpleWrap};
pub use lambda::LambdaWrap;
pub use no_op::NoOp;
pub use short_circuit::ShortCircuitSplit;
pub use split_try::SplitTry;
pub use ternary::TernarySplit;
pub use while_condition::WhileCondition;
pub use yield_wrap::YieldWrap;

/// Split the polyadic `chain` before operand `at` (`at >= 1`).
///
/// Returns the prefix and the rest. A prefix of one operand is that
/// operand; a longer prefix reuses `chain`, truncated. A rest of one
/// operand is that operand; a longer rest is a new polyadic.
pub(crate) fn split_chain(tree: &mut SyntaxTree, chain: ExprId, at: usize) -> (ExprId, ExprId) {
    let ExprKind::Polyadic { op, operands } = tree.expr_kind(chain) else {
        panic!("split: {chain:?} is not a polyadic expression");
    };
    let (op, operands) = (*op, operands.clone());
    assert!(
        at >= 1 && at < operands.len(),
        "split: operand {at} out of range for {chain:?}"
    );
    let rest = if at + 1 == operands.len() {
        operands[at]
    } else {
        tree.mk_polyadic(op, &operands[at..])
    };
    let prefix = if at == 1 {
        operands[0]
    } else {
        tree.update_expr(chain, |kind| {
            if let ExprKind::Polyadic { operands, .. } = kind {
                operands.truncate(at);
            }
        });
        chain
    };
    (prefix, rest)
}
