//! Class members and class bodies.

use smallvec::SmallVec;

use super::expr::{swap_in_list, swap_slot, ExprList, TypeRef};
use super::Modifiers;
use crate::{ExprId, MemberId, Name, NodeId, StmtId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Name,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Member {
    Field {
        modifiers: Modifiers,
        ty: TypeRef,
        name: Name,
        init: Option<ExprId>,
    },
    /// Method or constructor. Abstract methods have no body.
    Method {
        modifiers: Modifiers,
        name: Name,
        params: SmallVec<[Param; 4]>,
        /// `None` for constructors and `void` methods.
        return_ty: Option<TypeRef>,
        body: Option<StmtId>,
        constructor: bool,
    },
    /// Instance or static initializer block.
    Initializer {
        is_static: bool,
        body: StmtId,
    },
    EnumConstant {
        name: Name,
        args: ExprList,
    },
}

impl Member {
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            Member::Field { init, .. } => {
                if let Some(init) = init {
                    f(NodeId::Expr(*init));
                }
            }
            Member::Method { body, .. } => {
                if let Some(body) = body {
                    f(NodeId::Stmt(*body));
                }
            }
            Member::Initializer { body, .. } => f(NodeId::Stmt(*body)),
            Member::EnumConstant { args, .. } => args.iter().for_each(|&a| f(NodeId::Expr(a))),
        }
    }

    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match (self, old, new) {
            (
                Member::Field {
                    init: Some(init), ..
                },
                NodeId::Expr(old),
                NodeId::Expr(new),
            ) => swap_slot(init, old, new),
            (Member::EnumConstant { args, .. }, NodeId::Expr(old), NodeId::Expr(new)) => {
                swap_in_list(args, old, new)
            }
            (
                Member::Method {
                    body: Some(body), ..
                }
                | Member::Initializer { body, .. },
                NodeId::Stmt(old),
                NodeId::Stmt(new),
            ) => swap_slot(body, old, new),
            _ => false,
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        match self {
            Member::Field { modifiers, .. } | Member::Method { modifiers, .. } => {
                modifiers.contains(Modifiers::STATIC)
            }
            Member::Initializer { is_static, .. } => *is_static,
            Member::EnumConstant { .. } => true,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

/// A class body: a root declaration or the anonymous body of a `new`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDecl {
    pub kind: ClassKind,
    /// [`Name::EMPTY`] for anonymous classes.
    pub name: Name,
    pub members: Vec<MemberId>,
}

impl ClassDecl {
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        self.members.iter().for_each(|&m| f(NodeId::Member(m)));
    }

    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match (old, new) {
            (NodeId::Member(old), NodeId::Member(new)) => swap_in_list(&mut self.members, old, new),
            _ => false,
        }
    }
}
