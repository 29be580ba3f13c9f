//! Statement-context synthesis for the recast syntax tree.
//!
//! Refactorings that introduce statements ("extract variable", "introduce
//! null check") need a place to insert them that runs right before a given
//! expression is evaluated. Many expressions have no such place: a lambda
//! body, a `for` initializer, the second operand of `&&`, a field
//! initializer. This crate restructures the code around the expression so
//! that one exists, and can fold the restructuring back afterwards.
//!
//! Use is two-phase:
//!
//! 1. [`for_expression`] inspects the tree and commits to a [`Surrounder`],
//!    or answers `None` for contexts that cannot be surrounded.
//! 2. [`Surrounder::surround`] rewrites the tree and returns a
//!    [`SurroundResult`]: the expression (same id), the anchor statement to
//!    insert before, and a [`SurroundContext`] for
//!    [`SurroundContext::collapse`].
//!
//! ```text
//! x -> f(x)                  x -> { return f(x); }
//! for (int i = f(); ..) ..   int i = f(); for (; ..) ..
//! if (a && g(b)) T           if (a) { if (g(b)) T }
//! v = c ? x : g(y);          if (c) { v = x; } else { v = g(y); }
//! ```
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=recast_surround=debug`: each classification, rewrite and
//!   collapse.
//! - `RUST_LOG=recast_surround=trace`: also the reason a context was
//!   rejected.
//!
//! # Crate Dependencies
//!
//! `recast_surround` depends on `recast_ir` for the tree, its mutation API
//! and node factory, on `recast_flow` for mutual exclusivity and
//! side-effect queries, and on `recast_stack` for the recursive classifier.

mod classify;
mod context;
mod options;
mod result;
mod surrounder;
pub mod variants;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

use recast_ir::{ExprId, SyntaxTree};

pub use context::ParentContext;
pub use options::SurroundOptions;
pub use result::{SurroundContext, SurroundResult};
pub use surrounder::Surrounder;

/// The rewrite that gives `expr` a statement context, with default
/// options. `None` when the context is not supported.
pub fn for_expression(tree: &SyntaxTree, expr: ExprId) -> Option<Surrounder> {
    for_expression_with(tree, expr, &SurroundOptions::default())
}

pub fn for_expression_with(
    tree: &SyntaxTree,
    expr: ExprId,
    options: &SurroundOptions,
) -> Option<Surrounder> {
    classify::classify(tree, expr, options)
}

/// Whether [`for_expression`] would find a rewrite.
pub fn can_surround(tree: &SyntaxTree, expr: ExprId) -> bool {
    for_expression(tree, expr).is_some()
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
