//! Builders shared by the unit tests of this crate.

use recast_ir::ast::ClassKind;
use recast_ir::{ExprId, MemberId, StmtId, SyntaxTree};

/// `class C { void m() { <stmts> } }` registered as a root. Returns the
/// method and its body.
pub(crate) fn in_method(tree: &mut SyntaxTree, stmts: Vec<StmtId>) -> (MemberId, StmtId) {
    let body = tree.mk_block(stmts);
    let method = tree.mk_method("m", &[], None, Some(body));
    let class = tree.mk_class(ClassKind::Class, "C", vec![method]);
    tree.add_root(class);
    (method, body)
}

/// `name(args);`, returning the statement and the call.
pub(crate) fn call_stmt(tree: &mut SyntaxTree, name: &str, args: &[ExprId]) -> (StmtId, ExprId) {
    let call = tree.mk_call(None, name, args);
    (tree.mk_expr_stmt(call), call)
}

/// The first root class, printed.
pub(crate) fn printed(tree: &SyntaxTree) -> String {
    tree.print_class(tree.roots()[0])
}
