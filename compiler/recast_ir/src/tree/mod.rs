//! The syntax tree arena.
//!
//! # Layout
//!
//! `SyntaxTree` stores four flat arenas (expressions, statements, members,
//! class bodies) plus one parent slot per node. Children are referenced by
//! id, so moving a subtree is a matter of rewriting two slots and one parent
//! link; the moved node keeps its id. Nodes are never freed: a node dropped
//! by a rewrite simply becomes unreachable from the roots, which is what
//! [`SyntaxTree::is_attached`] checks.
//!
//! # Phases
//!
//! Read-only queries (classification, flow analysis) take `&SyntaxTree`;
//! rewrites take `&mut SyntaxTree`. The interner is internally synchronized,
//! so read-only queries may still intern names.

mod mutation;

use smallvec::SmallVec;

use crate::ast::{ClassDecl, Expr, ExprKind, Member, Stmt, StmtKind};
use crate::{ClassId, ExprId, MemberId, Name, NodeId, StmtId, StringInterner};

/// Direct children of a node. Most nodes have few.
pub type ChildList = SmallVec<[NodeId; 8]>;

#[derive(Debug, Default)]
pub struct SyntaxTree {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    members: Vec<Member>,
    classes: Vec<ClassDecl>,
    expr_parents: Vec<Option<NodeId>>,
    stmt_parents: Vec<Option<NodeId>>,
    member_parents: Vec<Option<NodeId>>,
    class_parents: Vec<Option<NodeId>>,
    roots: Vec<ClassId>,
    interner: StringInterner,
    /// Bumped by every structural edit.
    revision: u64,
}

fn next_index(len: usize, arena: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{arena} arena exceeded u32::MAX nodes"))
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree::default()
    }

    // Interning

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    #[inline]
    pub fn name_str(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Allocation

    pub fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        self.alloc_typed_expr(Expr::new(kind))
    }

    pub fn alloc_typed_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len(), "expression"));
        self.exprs.push(expr);
        self.expr_parents.push(None);
        self.adopt(NodeId::Expr(id));
        id
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind) -> StmtId {
        self.alloc_full_stmt(Stmt::new(kind))
    }

    pub fn alloc_full_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len(), "statement"));
        self.stmts.push(stmt);
        self.stmt_parents.push(None);
        self.adopt(NodeId::Stmt(id));
        id
    }

    pub fn alloc_member(&mut self, member: Member) -> MemberId {
        let id = MemberId::new(next_index(self.members.len(), "member"));
        self.members.push(member);
        self.member_parents.push(None);
        self.adopt(NodeId::Member(id));
        id
    }

    pub fn alloc_class(&mut self, class: ClassDecl) -> ClassId {
        let id = ClassId::new(next_index(self.classes.len(), "class"));
        self.classes.push(class);
        self.class_parents.push(None);
        self.adopt(NodeId::Class(id));
        id
    }

    /// Register a top-level class. Only nodes reachable from a root are
    /// attached.
    pub fn add_root(&mut self, class: ClassId) {
        debug_assert!(self.parent(NodeId::Class(class)).is_none());
        self.roots.push(class);
    }

    pub fn roots(&self) -> &[ClassId] {
        &self.roots
    }

    // Accessors

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()].kind
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn stmt_kind(&self, id: StmtId) -> &StmtKind {
        &self.stmts[id.index()].kind
    }

    #[inline]
    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.index()]
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.index()]
    }

    // Navigation

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        match node {
            NodeId::Expr(id) => self.expr_parents[id.index()],
            NodeId::Stmt(id) => self.stmt_parents[id.index()],
            NodeId::Member(id) => self.member_parents[id.index()],
            NodeId::Class(id) => self.class_parents[id.index()],
        }
    }

    /// Parent of an expression, when that parent is an expression.
    #[inline]
    pub fn parent_expr(&self, id: ExprId) -> Option<ExprId> {
        self.parent(NodeId::Expr(id)).and_then(NodeId::as_expr)
    }

    /// Parent of a statement, when that parent is a statement.
    #[inline]
    pub fn parent_stmt(&self, id: StmtId) -> Option<StmtId> {
        self.parent(NodeId::Stmt(id)).and_then(NodeId::as_stmt)
    }

    pub fn children(&self, node: NodeId) -> ChildList {
        let mut children = ChildList::new();
        let push = |c: NodeId| children.push(c);
        match node {
            NodeId::Expr(id) => self.expr_kind(id).for_each_child(push),
            NodeId::Stmt(id) => self.stmt_kind(id).for_each_child(push),
            NodeId::Member(id) => self.member(id).for_each_child(push),
            NodeId::Class(id) => self.class(id).for_each_child(push),
        }
        children
    }

    /// Strict ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// Whether `ancestor` encloses `node`. With `strict == false`, a node is
    /// its own ancestor.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId, strict: bool) -> bool {
        if !strict && ancestor == node {
            return true;
        }
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Nearest statement that is `node` or encloses it.
    pub fn enclosing_statement(&self, node: NodeId) -> Option<StmtId> {
        if let NodeId::Stmt(id) = node {
            return Some(id);
        }
        self.ancestors(node).find_map(NodeId::as_stmt)
    }

    /// Nearest member that encloses `node`.
    pub fn enclosing_member(&self, node: NodeId) -> Option<MemberId> {
        if let NodeId::Member(id) = node {
            return Some(id);
        }
        self.ancestors(node).find_map(NodeId::as_member)
    }

    /// Whether `node` is reachable from a root through consistent parent
    /// links. Nodes dropped by a rewrite, and everything below them, are
    /// not attached.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            match self.parent(current) {
                Some(parent) => {
                    if !self.children(parent).contains(&current) {
                        return false;
                    }
                    current = parent;
                }
                None => {
                    return matches!(current, NodeId::Class(id) if self.roots.contains(&id));
                }
            }
        }
    }

    /// The block holding `stmt`, and its position there.
    pub fn block_position(&self, stmt: StmtId) -> Option<(StmtId, usize)> {
        let block = self.parent_stmt(stmt)?;
        match self.stmt_kind(block) {
            StmtKind::Block(stmts) => stmts
                .iter()
                .position(|&s| s == stmt)
                .map(|index| (block, index)),
            _ => None,
        }
    }

    pub fn next_sibling(&self, stmt: StmtId) -> Option<StmtId> {
        let (block, index) = self.block_position(stmt)?;
        self.block_stmts(block).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, stmt: StmtId) -> Option<StmtId> {
        let (block, index) = self.block_position(stmt)?;
        index
            .checked_sub(1)
            .and_then(|i| self.block_stmts(block).get(i).copied())
    }

    /// Statements of a block; empty for any other statement kind.
    pub fn block_stmts(&self, block: StmtId) -> &[StmtId] {
        match self.stmt_kind(block) {
            StmtKind::Block(stmts) => stmts,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_block(&self, stmt: StmtId) -> bool {
        matches!(self.stmt_kind(stmt), StmtKind::Block(_))
    }

    /// Whether the direct parent of `stmt` is a block.
    pub fn is_in_block(&self, stmt: StmtId) -> bool {
        self.parent_stmt(stmt).is_some_and(|p| self.is_block(p))
    }

    /// Innermost expression below any parentheses.
    pub fn skip_parens(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Paren(inner) = self.expr_kind(id) {
            id = *inner;
        }
        id
    }

    /// Outermost parenthesized expression wrapping `id`.
    pub fn skip_parens_up(&self, mut id: ExprId) -> ExprId {
        while let Some(parent) = self.parent_expr(id) {
            if matches!(self.expr_kind(parent), ExprKind::Paren(_)) {
                id = parent;
            } else {
                break;
            }
        }
        id
    }

    /// Class body that declares `member`.
    pub fn member_class(&self, member: MemberId) -> Option<ClassId> {
        self.parent(NodeId::Member(member)).and_then(NodeId::as_class)
    }
}

/// Iterator over strict ancestors, see [`SyntaxTree::ancestors`].
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests;
