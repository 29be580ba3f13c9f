//! Tree visitor.
//!
//! Default `visit_*` implementations call the matching `walk_*` function,
//! which visits every child. Override a `visit_*` method to inspect a node
//! and decide whether to keep descending; the tree itself is never mutated.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'t> Visitor<'t> for CountCalls {
//!     fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
//!         if matches!(tree.expr_kind(id), ExprKind::MethodCall { .. }) {
//!             self.count += 1;
//!         }
//!         walk_expr(self, id, tree);
//!     }
//! }
//! ```

use recast_stack::ensure_sufficient_stack;

use crate::{ClassId, ExprId, MemberId, NodeId, StmtId, SyntaxTree};

pub trait Visitor<'t> {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        walk_expr(self, id, tree);
    }

    fn visit_stmt(&mut self, id: StmtId, tree: &'t SyntaxTree) {
        walk_stmt(self, id, tree);
    }

    fn visit_member(&mut self, id: MemberId, tree: &'t SyntaxTree) {
        walk_member(self, id, tree);
    }

    fn visit_class(&mut self, id: ClassId, tree: &'t SyntaxTree) {
        walk_class(self, id, tree);
    }

    /// Dispatch on the node kind.
    fn visit_node(&mut self, node: NodeId, tree: &'t SyntaxTree) {
        match node {
            NodeId::Expr(id) => self.visit_expr(id, tree),
            NodeId::Stmt(id) => self.visit_stmt(id, tree),
            NodeId::Member(id) => self.visit_member(id, tree),
            NodeId::Class(id) => self.visit_class(id, tree),
        }
    }
}

fn walk_children<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, node: NodeId, tree: &'t SyntaxTree) {
    ensure_sufficient_stack(|| {
        for child in tree.children(node) {
            visitor.visit_node(child, tree);
        }
    });
}

pub fn walk_expr<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, id: ExprId, tree: &'t SyntaxTree) {
    walk_children(visitor, NodeId::Expr(id), tree);
}

pub fn walk_stmt<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, id: StmtId, tree: &'t SyntaxTree) {
    walk_children(visitor, NodeId::Stmt(id), tree);
}

pub fn walk_member<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, id: MemberId, tree: &'t SyntaxTree) {
    walk_children(visitor, NodeId::Member(id), tree);
}

pub fn walk_class<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, id: ClassId, tree: &'t SyntaxTree) {
    walk_children(visitor, NodeId::Class(id), tree);
}
