//! Structural edits.
//!
//! Every edit keeps parent links consistent with child slots:
//! - `update_*` runs a closure on a node's kind, then detaches children it
//!   dropped and adopts children it gained.
//! - `replace_*` swaps one child slot of the old node's parent.
//! - `wrap_*` replaces a node with a new node built around it.
//! - Block and class-body edits insert or remove list entries.
//!
//! The `try_*` forms report misuse as [`TreeError`]; the plain forms are for
//! callers that have already established the shape they edit and treat a
//! failure as a logic error.

use recast_stack::ensure_sufficient_stack;

use super::{ChildList, SyntaxTree};
use crate::ast::{ClassDecl, Expr, ExprKind, Member, Stmt, StmtKind, TypeRef};
use crate::{ClassId, ExprId, MemberId, NodeId, StmtId, TreeError};

impl SyntaxTree {
    fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        match child {
            NodeId::Expr(id) => self.expr_parents[id.index()] = parent,
            NodeId::Stmt(id) => self.stmt_parents[id.index()] = parent,
            NodeId::Member(id) => self.member_parents[id.index()] = parent,
            NodeId::Class(id) => self.class_parents[id.index()] = parent,
        }
    }

    /// Point every child of `node` back at it.
    pub(super) fn adopt(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.set_parent(child, Some(node));
        }
    }

    /// Fix parent links after `node`'s child slots changed from `before`.
    fn reparent(&mut self, node: NodeId, before: &ChildList) {
        let after = self.children(node);
        for &child in before {
            if !after.contains(&child) && self.parent(child) == Some(node) {
                self.set_parent(child, None);
            }
        }
        self.adopt(node);
        self.revision += 1;
    }

    /// Edit an expression in place.
    pub fn update_expr<R>(&mut self, id: ExprId, f: impl FnOnce(&mut ExprKind) -> R) -> R {
        let node = NodeId::Expr(id);
        let before = self.children(node);
        let result = f(&mut self.exprs[id.index()].kind);
        self.reparent(node, &before);
        result
    }

    /// Edit a statement in place.
    pub fn update_stmt<R>(&mut self, id: StmtId, f: impl FnOnce(&mut StmtKind) -> R) -> R {
        let node = NodeId::Stmt(id);
        let before = self.children(node);
        let result = f(&mut self.stmts[id.index()].kind);
        self.reparent(node, &before);
        result
    }

    /// Edit a member in place.
    pub fn update_member<R>(&mut self, id: MemberId, f: impl FnOnce(&mut Member) -> R) -> R {
        let node = NodeId::Member(id);
        let before = self.children(node);
        let result = f(&mut self.members[id.index()]);
        self.reparent(node, &before);
        result
    }

    /// Edit a class body in place.
    pub fn update_class<R>(&mut self, id: ClassId, f: impl FnOnce(&mut ClassDecl) -> R) -> R {
        let node = NodeId::Class(id);
        let before = self.children(node);
        let result = f(&mut self.classes[id.index()]);
        self.reparent(node, &before);
        result
    }

    pub fn set_expr_type(&mut self, id: ExprId, ty: Option<TypeRef>) {
        self.exprs[id.index()].ty = ty;
    }

    // Replacement

    /// Swap the child slot of `parent` that holds `old` for `new`.
    pub fn try_replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let replaced = match parent {
            NodeId::Expr(id) => self.exprs[id.index()].kind.replace_child(old, new),
            NodeId::Stmt(id) => self.stmts[id.index()].kind.replace_child(old, new),
            NodeId::Member(id) => self.members[id.index()].replace_child(old, new),
            NodeId::Class(id) => self.classes[id.index()].replace_child(old, new),
        };
        if !replaced {
            return Err(TreeError::SlotMismatch { parent, child: old });
        }
        if self.parent(old) == Some(parent) {
            self.set_parent(old, None);
        }
        self.set_parent(new, Some(parent));
        self.revision += 1;
        Ok(())
    }

    /// Put `new` where `old` is. `new` must not contain `old`; use
    /// [`wrap_expr`](Self::wrap_expr) or [`wrap_stmt`](Self::wrap_stmt) to
    /// build a node around the one it replaces.
    pub fn try_replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(old).ok_or(TreeError::Detached(old))?;
        self.try_replace_child(parent, old, new)
    }

    pub fn replace_expr(&mut self, old: ExprId, new: ExprId) {
        self.try_replace(NodeId::Expr(old), NodeId::Expr(new))
            .unwrap_or_else(|e| panic!("replace_expr: {e}"));
    }

    pub fn replace_stmt(&mut self, old: StmtId, new: StmtId) {
        self.try_replace(NodeId::Stmt(old), NodeId::Stmt(new))
            .unwrap_or_else(|e| panic!("replace_stmt: {e}"));
    }

    /// Replace `target` with the expression `build` makes from it.
    pub fn wrap_expr(
        &mut self,
        target: ExprId,
        build: impl FnOnce(&mut Self, ExprId) -> ExprId,
    ) -> ExprId {
        let node = NodeId::Expr(target);
        let parent = self
            .parent(node)
            .unwrap_or_else(|| panic!("wrap_expr: {}", TreeError::Detached(node)));
        let wrapper = build(self, target);
        self.try_replace_child(parent, node, NodeId::Expr(wrapper))
            .unwrap_or_else(|e| panic!("wrap_expr: {e}"));
        wrapper
    }

    /// Replace `target` with the statement `build` makes from it. Leading
    /// comments of `target` move to the wrapper.
    pub fn wrap_stmt(
        &mut self,
        target: StmtId,
        build: impl FnOnce(&mut Self, StmtId) -> StmtId,
    ) -> StmtId {
        let node = NodeId::Stmt(target);
        let parent = self
            .parent(node)
            .unwrap_or_else(|| panic!("wrap_stmt: {}", TreeError::Detached(node)));
        let wrapper = build(self, target);
        self.try_replace_child(parent, node, NodeId::Stmt(wrapper))
            .unwrap_or_else(|e| panic!("wrap_stmt: {e}"));
        self.transfer_comments(target, wrapper);
        wrapper
    }

    // Blocks

    fn enclosing_block(&self, stmt: StmtId) -> Result<(StmtId, usize), TreeError> {
        self.block_position(stmt).ok_or(TreeError::NotInBlock(stmt))
    }

    /// Insert `new` at `index` of `block`.
    ///
    /// # Panics
    /// Panics if `block` is not a block statement or `index` is past its end.
    pub fn insert_stmt_at(&mut self, block: StmtId, index: usize, new: StmtId) {
        self.update_stmt(block, |kind| match kind {
            StmtKind::Block(stmts) => stmts.insert(index, new),
            other => panic!("insert_stmt_at: {block:?} is not a block but {other:?}"),
        });
    }

    pub fn try_insert_stmt_before(&mut self, anchor: StmtId, new: StmtId) -> Result<(), TreeError> {
        let (block, index) = self.enclosing_block(anchor)?;
        self.insert_stmt_at(block, index, new);
        Ok(())
    }

    pub fn try_insert_stmt_after(&mut self, anchor: StmtId, new: StmtId) -> Result<(), TreeError> {
        let (block, index) = self.enclosing_block(anchor)?;
        self.insert_stmt_at(block, index + 1, new);
        Ok(())
    }

    /// Remove `stmt` from its block. The statement and its subtree stay in
    /// the arena, detached.
    pub fn try_remove_stmt(&mut self, stmt: StmtId) -> Result<(), TreeError> {
        let (block, index) = self.enclosing_block(stmt)?;
        self.update_stmt(block, |kind| {
            if let StmtKind::Block(stmts) = kind {
                stmts.remove(index);
            }
        });
        Ok(())
    }

    pub fn insert_stmt_before(&mut self, anchor: StmtId, new: StmtId) {
        self.try_insert_stmt_before(anchor, new)
            .unwrap_or_else(|e| panic!("insert_stmt_before: {e}"));
    }

    pub fn insert_stmt_after(&mut self, anchor: StmtId, new: StmtId) {
        self.try_insert_stmt_after(anchor, new)
            .unwrap_or_else(|e| panic!("insert_stmt_after: {e}"));
    }

    pub fn remove_stmt(&mut self, stmt: StmtId) {
        self.try_remove_stmt(stmt)
            .unwrap_or_else(|e| panic!("remove_stmt: {e}"));
    }

    // Class bodies

    fn member_position(&self, member: MemberId) -> Result<(ClassId, usize), TreeError> {
        let class = self
            .member_class(member)
            .ok_or(TreeError::NotInClass(member))?;
        self.class(class)
            .members
            .iter()
            .position(|&m| m == member)
            .map(|index| (class, index))
            .ok_or(TreeError::NotInClass(member))
    }

    pub fn try_insert_member_after(
        &mut self,
        anchor: MemberId,
        new: MemberId,
    ) -> Result<(), TreeError> {
        let (class, index) = self.member_position(anchor)?;
        self.update_class(class, |decl| decl.members.insert(index + 1, new));
        Ok(())
    }

    pub fn try_remove_member(&mut self, member: MemberId) -> Result<(), TreeError> {
        let (class, index) = self.member_position(member)?;
        self.update_class(class, |decl| {
            decl.members.remove(index);
        });
        Ok(())
    }

    pub fn insert_member_after(&mut self, anchor: MemberId, new: MemberId) {
        self.try_insert_member_after(anchor, new)
            .unwrap_or_else(|e| panic!("insert_member_after: {e}"));
    }

    pub fn remove_member(&mut self, member: MemberId) {
        self.try_remove_member(member)
            .unwrap_or_else(|e| panic!("remove_member: {e}"));
    }

    /// The member following `member` in its class body.
    pub fn next_member(&self, member: MemberId) -> Option<MemberId> {
        let (class, index) = self.member_position(member).ok()?;
        self.class(class).members.get(index + 1).copied()
    }

    // Comments

    /// Move the leading comments of `from` in front of those of `to`.
    pub fn transfer_comments(&mut self, from: StmtId, to: StmtId) {
        if from == to {
            return;
        }
        let moved = self.stmts[from.index()].comments.take();
        if !moved.is_empty() {
            self.stmts[to.index()].comments.prepend(moved);
        }
    }

    pub fn add_comment(&mut self, stmt: StmtId, comment: crate::Comment) {
        self.stmts[stmt.index()].comments.push(comment);
    }

    // Copies

    /// Copy the subtree rooted at `id`. The copy is detached.
    pub fn deep_copy_expr(&mut self, id: ExprId) -> ExprId {
        ensure_sufficient_stack(|| {
            let mut copy: Expr = self.expr(id).clone();
            for child in self.children(NodeId::Expr(id)) {
                let fresh = self.deep_copy(child);
                copy.kind.replace_child(child, fresh);
            }
            self.alloc_typed_expr(copy)
        })
    }

    /// Copy the subtree rooted at `id`, comments included. The copy is
    /// detached.
    pub fn deep_copy_stmt(&mut self, id: StmtId) -> StmtId {
        ensure_sufficient_stack(|| {
            let mut copy: Stmt = self.stmt(id).clone();
            for child in self.children(NodeId::Stmt(id)) {
                let fresh = self.deep_copy(child);
                copy.kind.replace_child(child, fresh);
            }
            self.alloc_full_stmt(copy)
        })
    }

    fn deep_copy(&mut self, node: NodeId) -> NodeId {
        match node {
            NodeId::Expr(id) => NodeId::Expr(self.deep_copy_expr(id)),
            NodeId::Stmt(id) => NodeId::Stmt(self.deep_copy_stmt(id)),
            NodeId::Member(id) => {
                let mut copy = self.member(id).clone();
                for child in self.children(node) {
                    let fresh = self.deep_copy(child);
                    copy.replace_child(child, fresh);
                }
                NodeId::Member(self.alloc_member(copy))
            }
            NodeId::Class(id) => {
                let mut copy = self.class(id).clone();
                for child in self.children(node) {
                    let fresh = self.deep_copy(child);
                    copy.replace_child(child, fresh);
                }
                NodeId::Class(self.alloc_class(copy))
            }
        }
    }
}
