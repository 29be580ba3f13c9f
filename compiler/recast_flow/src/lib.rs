//! Flow analysis for the recast syntax tree.
//!
//! This crate provides the oracles the statement rewrites consult:
//!
//! - **Completion** ([`may_complete_normally`]) - whether control can reach
//!   the point after a statement, plus queries about jumps and loops.
//!
//! - **Reachability** ([`is_reachable`]) - whether a statement can be reached
//!   from the entry of its enclosing block, answered on a [`FlowGraph`].
//!
//! - **Extraction safety** ([`can_extract`]) - whether a subexpression can
//!   be evaluated before the rest of an enclosing expression.
//!
//! - **Mutual exclusivity** ([`are_mutually_exclusive`]) and constant
//!   boolean evaluation ([`constant_bool`]).
//!
//! # Conservative answers
//!
//! When an analysis cannot decide, it answers the way that makes dependent
//! rewrites refuse: reachable, may complete, `Unsure`, not exclusive.
//!
//! # Crate Dependencies
//!
//! `recast_flow` depends only on `recast_ir` (for the tree and its visitor)
//! and `recast_stack`. Nothing here mutates a tree.

pub mod completion;
mod const_eval;
mod error;
pub mod exclusive;
pub mod extract;
pub mod reachability;
mod side_effects;

#[cfg(test)]
mod test_helpers;

pub use completion::{
    code_block_may_complete_normally, find_exited_statement, may_complete_normally,
    method_may_complete_normally,
};
pub use const_eval::{constant_bool, is_constant, is_constant_false, is_constant_true};
pub use error::FlowError;
pub use exclusive::are_mutually_exclusive;
pub use extract::{can_extract, ExtractSafety};
pub use reachability::{is_reachable, try_is_reachable, FlowGraph};
pub use side_effects::may_have_side_effects;
