//! Node ids for the flat syntax tree.
//!
//! Every node lives in one of four arenas inside [`SyntaxTree`](crate::SyntaxTree)
//! and is addressed by a `u32` index. Ids are never reused, so an id keeps
//! naming the same node across any number of structural edits; rewrites
//! relink existing nodes instead of copying them.

use std::fmt;

/// Defines an arena index newtype.
///
/// Each generated type has:
/// - an `INVALID` sentinel (`u32::MAX`), also its `Default`
/// - `new()`, `index()`, `raw()` and `is_valid()`
/// - a `Debug` implementation showing `TypeName(n)`
macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Invalid id (sentinel value).
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Get the index into the arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    )* };
}

define_id!(
    /// Index into the expression arena.
    ExprId,
    /// Index into the statement arena.
    StmtId,
    /// Index into the class-member arena.
    MemberId,
    /// Index into the class-body arena.
    ClassId,
);

/// Any node of the tree.
///
/// Parent links are stored as `NodeId`s because an expression's parent may
/// be an expression, a statement or a member, and a class body's parent is
/// the `new` expression that declares it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeId {
    Expr(ExprId),
    Stmt(StmtId),
    Member(MemberId),
    Class(ClassId),
}

impl NodeId {
    #[inline]
    pub fn as_expr(self) -> Option<ExprId> {
        match self {
            NodeId::Expr(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_stmt(self) -> Option<StmtId> {
        match self {
            NodeId::Stmt(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_member(self) -> Option<MemberId> {
        match self {
            NodeId::Member(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_class(self) -> Option<ClassId> {
        match self {
            NodeId::Class(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ExprId> for NodeId {
    fn from(id: ExprId) -> Self {
        NodeId::Expr(id)
    }
}

impl From<StmtId> for NodeId {
    fn from(id: StmtId) -> Self {
        NodeId::Stmt(id)
    }
}

impl From<MemberId> for NodeId {
    fn from(id: MemberId) -> Self {
        NodeId::Member(id)
    }
}

impl From<ClassId> for NodeId {
    fn from(id: ClassId) -> Self {
        NodeId::Class(id)
    }
}
