//! Recast IR - syntax tree for statement-level rewriting
//!
//! This crate contains the tree model the rewriting engine works on:
//! - Names for interned identifiers
//! - Expression, statement, member and class nodes in flat arenas
//! - Parent links and a mutation API that keeps them consistent
//! - A node factory for the shapes rewrites synthesize
//! - Structural equivalence and a compact printer
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers, labels and type spellings are `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId`/`StmtId` indices
//! - **Ids are identity**: a rewrite relinks nodes, so an id names the same
//!   node before and after the edit

mod comment;
mod error;
mod factory;
mod ids;
mod interner;
mod name;
mod printer;
mod tree;

pub mod ast;
pub mod equivalence;
pub mod visitor;

pub use comment::{Comment, CommentKind, CommentList};
pub use error::TreeError;
pub use ids::{ClassId, ExprId, MemberId, NodeId, StmtId};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use tree::{Ancestors, ChildList, SyntaxTree};
