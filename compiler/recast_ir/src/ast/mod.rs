//! Node kinds of the syntax tree.
//!
//! Nodes hold ids of their children, never the children themselves. Each
//! kind knows how to enumerate its child slots (`for_each_child`) and how to
//! swap one child for another (`replace_child`); the tree's mutation API is
//! built on those two primitives.

mod expr;
mod member;
mod operators;
mod stmt;

pub use expr::{ConstructorKind, Expr, ExprKind, ExprList, LambdaBody, Literal, TypeRef};
pub use member::{ClassDecl, ClassKind, Member, Param};
pub use operators::{AssignOp, BinaryOp, Precedence, UnaryOp};
pub use stmt::{CatchClause, Declarator, Stmt, StmtKind};

bitflags::bitflags! {
    /// Declaration modifiers that affect rewriting.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u8 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
    }
}
