//! Node factory.
//!
//! Builders for the fixed set of expression and statement shapes that
//! rewrites synthesize, plus the two expression templates that need
//! operator knowledge: logical negation and precedence-aware
//! parenthesization.
//!
//! Builders adopt the children they are given. A child that is still
//! attached elsewhere must be moved out of its old slot by the caller (or
//! built through [`SyntaxTree::wrap_expr`]).

use smallvec::SmallVec;

use crate::ast::{
    BinaryOp, CatchClause, ClassDecl, ClassKind, Declarator, ExprKind, LambdaBody, Literal,
    Member, Modifiers, Param, Precedence, StmtKind, TypeRef, UnaryOp, AssignOp,
};
use crate::{ClassId, ExprId, MemberId, StmtId, SyntaxTree};

impl SyntaxTree {
    /// Spell a type; `var` becomes [`TypeRef::Var`].
    pub fn type_ref(&self, spelling: &str) -> TypeRef {
        if spelling == "var" {
            TypeRef::Var
        } else {
            TypeRef::Named(self.intern(spelling))
        }
    }

    // Expressions

    pub fn mk_name(&mut self, name: &str) -> ExprId {
        let name = self.intern(name);
        self.alloc_expr(ExprKind::Name(name))
    }

    pub fn mk_int(&mut self, value: i64) -> ExprId {
        self.alloc_expr(ExprKind::Literal(Literal::Int(value)))
    }

    pub fn mk_bool(&mut self, value: bool) -> ExprId {
        self.alloc_expr(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn mk_null(&mut self) -> ExprId {
        self.alloc_expr(ExprKind::Literal(Literal::Null))
    }

    pub fn mk_str(&mut self, text: &str) -> ExprId {
        let text = self.intern(text);
        self.alloc_expr(ExprKind::Literal(Literal::Str(text)))
    }

    pub fn mk_this(&mut self) -> ExprId {
        self.alloc_expr(ExprKind::This)
    }

    pub fn mk_field_access(&mut self, qualifier: ExprId, name: &str) -> ExprId {
        let name = self.intern(name);
        self.alloc_expr(ExprKind::FieldAccess { qualifier, name })
    }

    pub fn mk_call(&mut self, qualifier: Option<ExprId>, name: &str, args: &[ExprId]) -> ExprId {
        let name = self.intern(name);
        self.alloc_expr(ExprKind::MethodCall {
            qualifier,
            name,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn mk_new(&mut self, class: &str, args: &[ExprId], body: Option<ClassId>) -> ExprId {
        let class = self.intern(class);
        self.alloc_expr(ExprKind::New {
            class,
            args: SmallVec::from_slice(args),
            body,
        })
    }

    pub fn mk_paren(&mut self, inner: ExprId) -> ExprId {
        self.alloc_expr(ExprKind::Paren(inner))
    }

    pub fn mk_unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc_expr(ExprKind::Unary { op, operand })
    }

    pub fn mk_not(&mut self, operand: ExprId) -> ExprId {
        self.mk_unary(UnaryOp::Not, operand)
    }

    pub fn mk_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.mk_polyadic(op, &[left, right])
    }

    pub fn mk_polyadic(&mut self, op: BinaryOp, operands: &[ExprId]) -> ExprId {
        debug_assert!(operands.len() >= 2, "polyadic needs two operands");
        self.alloc_expr(ExprKind::Polyadic {
            op,
            operands: SmallVec::from_slice(operands),
        })
    }

    pub fn mk_assign(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.alloc_expr(ExprKind::Assign {
            op: AssignOp::Assign,
            lhs,
            rhs,
        })
    }

    pub fn mk_conditional(&mut self, cond: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        self.alloc_expr(ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        })
    }

    pub fn mk_lambda(&mut self, params: &[&str], body: LambdaBody, value_returning: bool) -> ExprId {
        let params = params.iter().map(|p| self.intern(p)).collect();
        self.alloc_expr(ExprKind::Lambda {
            params,
            body,
            value_returning,
        })
    }

    pub fn mk_switch_expr(&mut self, selector: ExprId, body: StmtId) -> ExprId {
        self.alloc_expr(ExprKind::SwitchExpr { selector, body })
    }

    // Statements

    pub fn mk_block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.alloc_stmt(StmtKind::Block(stmts))
    }

    pub fn mk_expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.alloc_stmt(StmtKind::Expr(expr))
    }

    pub fn mk_local(&mut self, ty: TypeRef, name: &str, init: Option<ExprId>) -> StmtId {
        let name = self.intern(name);
        self.alloc_stmt(StmtKind::LocalVar {
            modifiers: Modifiers::empty(),
            ty,
            declarators: smallvec::smallvec![Declarator { name, init }],
        })
    }

    pub fn mk_if(&mut self, cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) -> StmtId {
        self.alloc_stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn mk_while(&mut self, cond: ExprId, body: StmtId) -> StmtId {
        self.alloc_stmt(StmtKind::While { cond, body })
    }

    pub fn mk_do_while(&mut self, body: StmtId, cond: ExprId) -> StmtId {
        self.alloc_stmt(StmtKind::DoWhile { body, cond })
    }

    pub fn mk_for(
        &mut self,
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: &[ExprId],
        body: StmtId,
    ) -> StmtId {
        self.alloc_stmt(StmtKind::For {
            init,
            cond,
            update: SmallVec::from_slice(update),
            body,
        })
    }

    pub fn mk_foreach(&mut self, ty: TypeRef, name: &str, iterable: ExprId, body: StmtId) -> StmtId {
        let name = self.intern(name);
        self.alloc_stmt(StmtKind::Foreach {
            ty,
            name,
            iterable,
            body,
        })
    }

    pub fn mk_return(&mut self, value: Option<ExprId>) -> StmtId {
        self.alloc_stmt(StmtKind::Return(value))
    }

    pub fn mk_throw(&mut self, value: ExprId) -> StmtId {
        self.alloc_stmt(StmtKind::Throw(value))
    }

    pub fn mk_yield(&mut self, value: ExprId) -> StmtId {
        self.alloc_stmt(StmtKind::Yield(value))
    }

    pub fn mk_break(&mut self, label: Option<&str>) -> StmtId {
        let label = label.map(|l| self.intern(l));
        self.alloc_stmt(StmtKind::Break(label))
    }

    pub fn mk_continue(&mut self, label: Option<&str>) -> StmtId {
        let label = label.map(|l| self.intern(l));
        self.alloc_stmt(StmtKind::Continue(label))
    }

    pub fn mk_empty(&mut self) -> StmtId {
        self.alloc_stmt(StmtKind::Empty)
    }

    pub fn mk_labeled(&mut self, label: &str, body: StmtId) -> StmtId {
        let label = self.intern(label);
        self.alloc_stmt(StmtKind::Labeled { label, body })
    }

    pub fn mk_try(
        &mut self,
        resources: Vec<StmtId>,
        block: StmtId,
        catches: &[(&str, &str, StmtId)],
        finally: Option<StmtId>,
    ) -> StmtId {
        let catches = catches
            .iter()
            .map(|&(ty, name, body)| CatchClause {
                ty: self.intern(ty),
                name: self.intern(name),
                body,
            })
            .collect();
        self.alloc_stmt(StmtKind::Try {
            resources,
            block,
            catches,
            finally,
        })
    }

    pub fn mk_switch(&mut self, selector: ExprId, body: StmtId, enum_constants: Option<u32>) -> StmtId {
        self.alloc_stmt(StmtKind::Switch {
            selector,
            body,
            enum_constants,
        })
    }

    /// `case v1, v2:`; no values means `default:`.
    pub fn mk_case(&mut self, values: &[ExprId]) -> StmtId {
        self.alloc_stmt(StmtKind::CaseLabel {
            values: SmallVec::from_slice(values),
        })
    }

    /// `case v1, v2 -> body`; no values means `default ->`.
    pub fn mk_rule(&mut self, values: &[ExprId], body: StmtId) -> StmtId {
        self.alloc_stmt(StmtKind::SwitchRule {
            values: SmallVec::from_slice(values),
            body,
        })
    }

    // Members

    pub fn mk_field(
        &mut self,
        modifiers: Modifiers,
        ty: TypeRef,
        name: &str,
        init: Option<ExprId>,
    ) -> MemberId {
        let name = self.intern(name);
        self.alloc_member(Member::Field {
            modifiers,
            ty,
            name,
            init,
        })
    }

    pub fn mk_method(
        &mut self,
        name: &str,
        params: &[(TypeRef, &str)],
        return_ty: Option<TypeRef>,
        body: Option<StmtId>,
    ) -> MemberId {
        let name = self.intern(name);
        let params = params
            .iter()
            .map(|&(ty, p)| Param {
                ty,
                name: self.intern(p),
            })
            .collect();
        self.alloc_member(Member::Method {
            modifiers: Modifiers::empty(),
            name,
            params,
            return_ty,
            body,
            constructor: false,
        })
    }

    pub fn mk_initializer(&mut self, is_static: bool, body: StmtId) -> MemberId {
        self.alloc_member(Member::Initializer { is_static, body })
    }

    pub fn mk_enum_constant(&mut self, name: &str, args: &[ExprId]) -> MemberId {
        let name = self.intern(name);
        self.alloc_member(Member::EnumConstant {
            name,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn mk_class(&mut self, kind: ClassKind, name: &str, members: Vec<MemberId>) -> ClassId {
        let name = self.intern(name);
        self.alloc_class(ClassDecl {
            kind,
            name,
            members,
        })
    }

    // Templates

    /// Wrap `expr` in parentheses when it binds looser than `min`.
    pub fn parenthesize(&mut self, expr: ExprId, min: Precedence) -> ExprId {
        if self.expr_kind(expr).precedence() < min {
            self.mk_paren(expr)
        } else {
            expr
        }
    }

    /// `!expr`, parenthesized as needed, without simplification.
    pub fn negate_wrapping(&mut self, expr: ExprId) -> ExprId {
        let operand = self.parenthesize(expr, Precedence::Unary);
        self.mk_not(operand)
    }

    /// Logical negation of `expr`, simplified where the result is obvious:
    /// `!x` becomes `x`, a boolean literal flips, and a binary `==`/`!=`
    /// flips its operator in place.
    pub fn negate(&mut self, expr: ExprId) -> ExprId {
        match self.expr_kind(expr) {
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.skip_parens(*operand),
            ExprKind::Literal(Literal::Bool(value)) => {
                let flipped = !*value;
                self.mk_bool(flipped)
            }
            ExprKind::Polyadic { op, operands } if operands.len() == 2 && op.negated().is_some() => {
                self.update_expr(expr, |kind| {
                    if let ExprKind::Polyadic { op, .. } = kind {
                        if let Some(negated) = op.negated() {
                            *op = negated;
                        }
                    }
                });
                expr
            }
            _ => self.negate_wrapping(expr),
        }
    }

    /// `left op right`, flattening unparenthesized chains of `op` on either
    /// side and parenthesizing operands that bind looser than `op`.
    pub fn fuse_operands(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let mut operands: SmallVec<[ExprId; 4]> = SmallVec::new();
        for side in [left, right] {
            match self.expr_kind(side) {
                ExprKind::Polyadic {
                    op: side_op,
                    operands: side_operands,
                } if *side_op == op => operands.extend_from_slice(side_operands),
                _ => {
                    let operand = self.parenthesize(side, op.precedence());
                    operands.push(operand);
                }
            }
        }
        self.mk_polyadic(op, &operands)
    }
}
