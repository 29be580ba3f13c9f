//! Statement nodes.

use smallvec::SmallVec;

use super::expr::{swap_in_list, swap_slot, ExprList, TypeRef};
use super::Modifiers;
use crate::{CommentList, ExprId, Name, NodeId, StmtId};

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub comments: CommentList,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            kind,
            comments: CommentList::new(),
        }
    }
}

/// One `name = init` part of a local variable declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Declarator {
    pub name: Name,
    pub init: Option<ExprId>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CatchClause {
    pub ty: Name,
    pub name: Name,
    pub body: StmtId,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Block(Vec<StmtId>),
    Expr(ExprId),
    LocalVar {
        modifiers: Modifiers,
        ty: TypeRef,
        declarators: SmallVec<[Declarator; 1]>,
    },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    /// `for (init; cond; update) body`. `init` holds local declarations or
    /// expression statements.
    For {
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: SmallVec<[ExprId; 2]>,
        body: StmtId,
    },
    Foreach {
        ty: TypeRef,
        name: Name,
        iterable: ExprId,
        body: StmtId,
    },
    Return(Option<ExprId>),
    Throw(ExprId),
    Break(Option<Name>),
    Continue(Option<Name>),
    Yield(ExprId),
    Assert {
        cond: ExprId,
        message: Option<ExprId>,
    },
    Empty,
    Labeled {
        label: Name,
        body: StmtId,
    },
    Synchronized {
        lock: ExprId,
        body: StmtId,
    },
    /// `resources` holds local declarations or expression statements
    /// naming an existing variable.
    Try {
        resources: Vec<StmtId>,
        block: StmtId,
        catches: SmallVec<[CatchClause; 2]>,
        finally: Option<StmtId>,
    },
    /// Switch statement. `enum_constants` is the number of constants of the
    /// selector's enum type, when the selector is an enum.
    Switch {
        selector: ExprId,
        body: StmtId,
        enum_constants: Option<u32>,
    },
    /// `case a, b:` inside an old-style switch body; no values means
    /// `default:`.
    CaseLabel {
        values: ExprList,
    },
    /// `case a, b -> body`; no values means `default ->`.
    SwitchRule {
        values: ExprList,
        body: StmtId,
    },
}

impl StmtKind {
    /// Visit direct children in evaluation order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            StmtKind::Block(stmts) => stmts.iter().for_each(|&s| f(NodeId::Stmt(s))),
            StmtKind::Expr(e) | StmtKind::Throw(e) | StmtKind::Yield(e) => f(NodeId::Expr(*e)),
            StmtKind::LocalVar { declarators, .. } => {
                for d in declarators {
                    if let Some(init) = d.init {
                        f(NodeId::Expr(init));
                    }
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f(NodeId::Expr(*cond));
                f(NodeId::Stmt(*then_branch));
                if let Some(e) = else_branch {
                    f(NodeId::Stmt(*e));
                }
            }
            StmtKind::While { cond, body } => {
                f(NodeId::Expr(*cond));
                f(NodeId::Stmt(*body));
            }
            StmtKind::DoWhile { body, cond } => {
                f(NodeId::Stmt(*body));
                f(NodeId::Expr(*cond));
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                init.iter().for_each(|&s| f(NodeId::Stmt(s)));
                if let Some(c) = cond {
                    f(NodeId::Expr(*c));
                }
                update.iter().for_each(|&u| f(NodeId::Expr(u)));
                f(NodeId::Stmt(*body));
            }
            StmtKind::Foreach { iterable, body, .. } => {
                f(NodeId::Expr(*iterable));
                f(NodeId::Stmt(*body));
            }
            StmtKind::Return(value) => {
                if let Some(v) = value {
                    f(NodeId::Expr(*v));
                }
            }
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Assert { cond, message } => {
                f(NodeId::Expr(*cond));
                if let Some(m) = message {
                    f(NodeId::Expr(*m));
                }
            }
            StmtKind::Labeled { body, .. } => f(NodeId::Stmt(*body)),
            StmtKind::Synchronized { lock, body } => {
                f(NodeId::Expr(*lock));
                f(NodeId::Stmt(*body));
            }
            StmtKind::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                resources.iter().for_each(|&r| f(NodeId::Stmt(r)));
                f(NodeId::Stmt(*block));
                catches.iter().for_each(|c| f(NodeId::Stmt(c.body)));
                if let Some(fin) = finally {
                    f(NodeId::Stmt(*fin));
                }
            }
            StmtKind::Switch { selector, body, .. } => {
                f(NodeId::Expr(*selector));
                f(NodeId::Stmt(*body));
            }
            StmtKind::CaseLabel { values } => values.iter().for_each(|&v| f(NodeId::Expr(v))),
            StmtKind::SwitchRule { values, body } => {
                values.iter().for_each(|&v| f(NodeId::Expr(v)));
                f(NodeId::Stmt(*body));
            }
        }
    }

    /// Replace the child slot holding `old` with `new`. Returns `false` when
    /// no slot holds `old` or the node kinds differ.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match (old, new) {
            (NodeId::Expr(old), NodeId::Expr(new)) => self.replace_expr_child(old, new),
            (NodeId::Stmt(old), NodeId::Stmt(new)) => self.replace_stmt_child(old, new),
            _ => false,
        }
    }

    fn replace_expr_child(&mut self, old: ExprId, new: ExprId) -> bool {
        match self {
            StmtKind::Expr(e) | StmtKind::Throw(e) | StmtKind::Yield(e) => swap_slot(e, old, new),
            StmtKind::LocalVar { declarators, .. } => declarators.iter_mut().any(|d| match &mut d.init {
                Some(init) => swap_slot(init, old, new),
                None => false,
            }),
            StmtKind::If { cond, .. }
            | StmtKind::While { cond, .. }
            | StmtKind::DoWhile { cond, .. } => swap_slot(cond, old, new),
            StmtKind::For { cond, update, .. } => {
                let in_cond = match cond {
                    Some(c) => swap_slot(c, old, new),
                    None => false,
                };
                in_cond || swap_in_list(update, old, new)
            }
            StmtKind::Foreach { iterable, .. } => swap_slot(iterable, old, new),
            StmtKind::Return(Some(v)) => swap_slot(v, old, new),
            StmtKind::Assert { cond, message } => {
                swap_slot(cond, old, new)
                    || match message {
                        Some(m) => swap_slot(m, old, new),
                        None => false,
                    }
            }
            StmtKind::Synchronized { lock, .. } => swap_slot(lock, old, new),
            StmtKind::Switch { selector, .. } => swap_slot(selector, old, new),
            StmtKind::CaseLabel { values } | StmtKind::SwitchRule { values, .. } => {
                swap_in_list(values, old, new)
            }
            StmtKind::Block(_)
            | StmtKind::Return(None)
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Empty
            | StmtKind::Labeled { .. }
            | StmtKind::Try { .. } => false,
        }
    }

    fn replace_stmt_child(&mut self, old: StmtId, new: StmtId) -> bool {
        match self {
            StmtKind::Block(stmts) => swap_in_list(stmts, old, new),
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                swap_slot(then_branch, old, new)
                    || match else_branch {
                        Some(e) => swap_slot(e, old, new),
                        None => false,
                    }
            }
            StmtKind::While { body, .. }
            | StmtKind::DoWhile { body, .. }
            | StmtKind::Foreach { body, .. }
            | StmtKind::Labeled { body, .. }
            | StmtKind::Synchronized { body, .. }
            | StmtKind::Switch { body, .. }
            | StmtKind::SwitchRule { body, .. } => swap_slot(body, old, new),
            StmtKind::For { init, body, .. } => {
                swap_in_list(init, old, new) || swap_slot(body, old, new)
            }
            StmtKind::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                swap_in_list(resources, old, new)
                    || swap_slot(block, old, new)
                    || catches.iter_mut().any(|c| swap_slot(&mut c.body, old, new))
                    || match finally {
                        Some(f) => swap_slot(f, old, new),
                        None => false,
                    }
            }
            StmtKind::Expr(_)
            | StmtKind::LocalVar { .. }
            | StmtKind::Return(_)
            | StmtKind::Throw(_)
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Yield(_)
            | StmtKind::Assert { .. }
            | StmtKind::Empty
            | StmtKind::CaseLabel { .. } => false,
        }
    }

    #[inline]
    pub fn is_declaration(&self) -> bool {
        matches!(self, StmtKind::LocalVar { .. })
    }

    /// Statements that loop: targets of unlabeled `break` and `continue`.
    #[inline]
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            StmtKind::While { .. }
                | StmtKind::DoWhile { .. }
                | StmtKind::For { .. }
                | StmtKind::Foreach { .. }
        )
    }
}
