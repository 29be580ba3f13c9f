//! Expression nodes.

use smallvec::SmallVec;

use super::operators::{AssignOp, BinaryOp, Precedence, UnaryOp};
use crate::{ClassId, ExprId, Name, NodeId, StmtId};

/// Argument and operand lists. Most calls have few arguments.
pub type ExprList = SmallVec<[ExprId; 4]>;

/// A spelled type. Resolution happens outside this crate; the tree only
/// records what was written (or inferred) so that declarations can be
/// split and printed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    /// `var`: the declared type is inferred from the initializer.
    Var,
    Named(Name),
}

impl TypeRef {
    #[inline]
    pub fn is_var(self) -> bool {
        matches!(self, TypeRef::Var)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Char(char),
    Str(Name),
    Null,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstructorKind {
    This,
    Super,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LambdaBody {
    Expr(ExprId),
    Block(StmtId),
}

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    /// Inferred type, when the producer of the tree knows it.
    pub ty: Option<TypeRef>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind, ty: None }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(Literal),
    Name(Name),
    This,
    FieldAccess {
        qualifier: ExprId,
        name: Name,
    },
    MethodCall {
        qualifier: Option<ExprId>,
        name: Name,
        args: ExprList,
    },
    /// `new T(args)`, optionally with an anonymous class body.
    New {
        class: Name,
        args: ExprList,
        body: Option<ClassId>,
    },
    /// `this(..)` or `super(..)` as the first statement of a constructor.
    ConstructorCall {
        kind: ConstructorKind,
        args: ExprList,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// `a op b op c ...` for one operator.
    Polyadic {
        op: BinaryOp,
        operands: ExprList,
    },
    Assign {
        op: AssignOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Lambda {
        params: SmallVec<[Name; 2]>,
        body: LambdaBody,
        /// Whether the functional interface returns a value.
        value_returning: bool,
    },
    ArrayAccess {
        array: ExprId,
        index: ExprId,
    },
    Cast {
        ty: Name,
        operand: ExprId,
    },
    InstanceOf {
        operand: ExprId,
        ty: Name,
    },
    Paren(ExprId),
    /// Switch expression; `body` is a block of `SwitchRule` or `CaseLabel`
    /// statements.
    SwitchExpr {
        selector: ExprId,
        body: StmtId,
    },
}

impl ExprKind {
    /// Visit direct children in evaluation order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This => {}
            ExprKind::FieldAccess { qualifier, .. } => f(NodeId::Expr(*qualifier)),
            ExprKind::MethodCall {
                qualifier, args, ..
            } => {
                if let Some(q) = qualifier {
                    f(NodeId::Expr(*q));
                }
                args.iter().for_each(|&a| f(NodeId::Expr(a)));
            }
            ExprKind::New { args, body, .. } => {
                args.iter().for_each(|&a| f(NodeId::Expr(a)));
                if let Some(body) = body {
                    f(NodeId::Class(*body));
                }
            }
            ExprKind::ConstructorCall { args, .. } => {
                args.iter().for_each(|&a| f(NodeId::Expr(a)));
            }
            ExprKind::Unary { operand, .. }
            | ExprKind::Cast { operand, .. }
            | ExprKind::InstanceOf { operand, .. }
            | ExprKind::Paren(operand) => f(NodeId::Expr(*operand)),
            ExprKind::Polyadic { operands, .. } => {
                operands.iter().for_each(|&o| f(NodeId::Expr(o)));
            }
            ExprKind::Assign { lhs, rhs, .. } => {
                f(NodeId::Expr(*lhs));
                f(NodeId::Expr(*rhs));
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                f(NodeId::Expr(*cond));
                f(NodeId::Expr(*then_expr));
                f(NodeId::Expr(*else_expr));
            }
            ExprKind::Lambda { body, .. } => match body {
                LambdaBody::Expr(e) => f(NodeId::Expr(*e)),
                LambdaBody::Block(s) => f(NodeId::Stmt(*s)),
            },
            ExprKind::ArrayAccess { array, index } => {
                f(NodeId::Expr(*array));
                f(NodeId::Expr(*index));
            }
            ExprKind::SwitchExpr { selector, body } => {
                f(NodeId::Expr(*selector));
                f(NodeId::Stmt(*body));
            }
        }
    }

    /// Replace the child slot holding `old` with `new`. Returns `false` when
    /// no slot holds `old` or the node kinds differ.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        match (old, new) {
            (NodeId::Expr(old), NodeId::Expr(new)) => self.replace_expr_child(old, new),
            (NodeId::Stmt(old), NodeId::Stmt(new)) => match self {
                ExprKind::Lambda {
                    body: LambdaBody::Block(body),
                    ..
                }
                | ExprKind::SwitchExpr { body, .. } => swap_slot(body, old, new),
                _ => false,
            },
            (NodeId::Class(old), NodeId::Class(new)) => match self {
                ExprKind::New {
                    body: Some(body), ..
                } => swap_slot(body, old, new),
                _ => false,
            },
            _ => false,
        }
    }

    fn replace_expr_child(&mut self, old: ExprId, new: ExprId) -> bool {
        match self {
            ExprKind::Literal(_) | ExprKind::Name(_) | ExprKind::This => false,
            ExprKind::FieldAccess { qualifier, .. } => swap_slot(qualifier, old, new),
            ExprKind::MethodCall {
                qualifier, args, ..
            } => {
                if let Some(q) = qualifier {
                    if swap_slot(q, old, new) {
                        return true;
                    }
                }
                swap_in_list(args, old, new)
            }
            ExprKind::New { args, .. } | ExprKind::ConstructorCall { args, .. } => {
                swap_in_list(args, old, new)
            }
            ExprKind::Unary { operand, .. }
            | ExprKind::Cast { operand, .. }
            | ExprKind::InstanceOf { operand, .. }
            | ExprKind::Paren(operand) => swap_slot(operand, old, new),
            ExprKind::Polyadic { operands, .. } => swap_in_list(operands, old, new),
            ExprKind::Assign { lhs, rhs, .. } => {
                swap_slot(lhs, old, new) || swap_slot(rhs, old, new)
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                swap_slot(cond, old, new)
                    || swap_slot(then_expr, old, new)
                    || swap_slot(else_expr, old, new)
            }
            ExprKind::Lambda { body, .. } => match body {
                LambdaBody::Expr(e) => swap_slot(e, old, new),
                LambdaBody::Block(_) => false,
            },
            ExprKind::ArrayAccess { array, index } => {
                swap_slot(array, old, new) || swap_slot(index, old, new)
            }
            ExprKind::SwitchExpr { selector, .. } => swap_slot(selector, old, new),
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ExprKind::Literal(_)
            | ExprKind::Name(_)
            | ExprKind::This
            | ExprKind::FieldAccess { .. }
            | ExprKind::MethodCall { .. }
            | ExprKind::New { .. }
            | ExprKind::ConstructorCall { .. }
            | ExprKind::ArrayAccess { .. }
            | ExprKind::Paren(_)
            | ExprKind::SwitchExpr { .. } => Precedence::Primary,
            ExprKind::Unary { op, .. } if op.is_postfix() => Precedence::Postfix,
            ExprKind::Unary { .. } | ExprKind::Cast { .. } => Precedence::Unary,
            ExprKind::InstanceOf { .. } => Precedence::Relational,
            ExprKind::Polyadic { op, .. } => op.precedence(),
            ExprKind::Assign { .. } => Precedence::Assignment,
            ExprKind::Conditional { .. } => Precedence::Conditional,
            ExprKind::Lambda { .. } => Precedence::Lambda,
        }
    }
}

#[inline]
pub(crate) fn swap_slot<T: Copy + PartialEq>(slot: &mut T, old: T, new: T) -> bool {
    if *slot == old {
        *slot = new;
        true
    } else {
        false
    }
}

#[inline]
pub(crate) fn swap_in_list<T: Copy + PartialEq>(list: &mut [T], old: T, new: T) -> bool {
    list.iter_mut().any(|slot| swap_slot(slot, old, new))
}
