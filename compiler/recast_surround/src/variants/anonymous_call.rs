//! `C(e)` becomes `C(new Object() { T get() { return e; } }.get())`.
//!
//! Enum-constant arguments are evaluated before any statement of the enum
//! body can run, so the only way to get a statement context is a method of
//! an anonymous class invoked in place. The method is named so that no
//! call inside the argument binds to it.

use recast_flow::completion::only_statement_in_block;
use recast_ir::ast::{ClassKind, ExprKind, Member, StmtKind, TypeRef};
use recast_ir::visitor::{walk_expr, Visitor};
use recast_ir::{ExprId, MemberId, NodeId, SyntaxTree};
use rustc_hash::FxHashSet;

use crate::context::ParentContext;
use crate::result::{CollapsePlan, SurroundContext, SurroundResult};

#[derive(Debug)]
pub struct AnonymousCall {
    pub(crate) expr: ExprId,
    pub(crate) constant: MemberId,
    /// The argument holding `expr`.
    pub(crate) arg: ExprId,
    /// Inferred type of `arg`, the return type of the synthesized method.
    pub(crate) ty: TypeRef,
    pub(crate) method_name: String,
    pub(crate) base_type: String,
}

impl AnonymousCall {
    pub(crate) fn expected_parent_context(&self) -> ParentContext {
        ParentContext::Return
    }

    pub(crate) fn surround(self, tree: &mut SyntaxTree) -> SurroundResult {
        let method_name = free_method_name(tree, self.arg, &self.method_name);
        let ret = tree.mk_return(Some(self.arg));
        let body = tree.mk_block(vec![ret]);
        let method = tree.mk_method(&method_name, &[], Some(self.ty), Some(body));
        let class = tree.mk_class(ClassKind::Class, "", vec![method]);
        let instance = tree.mk_new(&self.base_type, &[], Some(class));
        let call = tree.mk_call(Some(instance), &method_name, &[]);
        tree.set_expr_type(call, Some(self.ty));
        tree.try_replace_child(
            NodeId::Member(self.constant),
            NodeId::Expr(self.arg),
            NodeId::Expr(call),
        )
        .unwrap_or_else(|e| panic!("anonymous call: {e}"));
        SurroundResult {
            expression: self.expr,
            anchor: ret,
            context: SurroundContext::planned(CollapsePlan::AnonymousCall { call }),
        }
    }
}

/// `preferred`, or `preferred` with the smallest numeric suffix, that no
/// method call in `arg` uses.
fn free_method_name(tree: &SyntaxTree, arg: ExprId, preferred: &str) -> String {
    let mut called = CalledNames::default();
    called.visit_expr(arg, tree);
    let mut name = preferred.to_owned();
    let mut suffix = 1u32;
    while called.names.contains(name.as_str()) {
        name = format!("{preferred}{suffix}");
        suffix += 1;
    }
    name
}

#[derive(Default)]
struct CalledNames<'t> {
    names: FxHashSet<&'t str>,
}

impl<'t> Visitor<'t> for CalledNames<'t> {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        if let ExprKind::MethodCall { name, .. } = tree.expr_kind(id) {
            self.names.insert(tree.name_str(*name));
        }
        walk_expr(self, id, tree);
    }
}

pub(crate) fn collapse(tree: &mut SyntaxTree, call: ExprId) -> bool {
    let ExprKind::MethodCall {
        qualifier: Some(instance),
        args,
        ..
    } = tree.expr_kind(call)
    else {
        return false;
    };
    if !args.is_empty() {
        return false;
    }
    let ExprKind::New {
        args,
        body: Some(class),
        ..
    } = tree.expr_kind(*instance)
    else {
        return false;
    };
    let &[method] = tree.class(*class).members.as_slice() else {
        return false;
    };
    if !args.is_empty() {
        return false;
    }
    let Member::Method {
        body: Some(body), ..
    } = *tree.member(method)
    else {
        return false;
    };
    let Some(ret) = only_statement_in_block(tree, body) else {
        return false;
    };
    let StmtKind::Return(Some(value)) = *tree.stmt_kind(ret) else {
        return false;
    };
    if !tree.stmt(ret).comments.is_empty() || !tree.stmt(body).comments.is_empty() {
        return false;
    }
    tree.replace_expr(call, value);
    true
}
