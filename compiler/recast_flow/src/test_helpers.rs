//! Builders shared by the unit tests of this crate.

use recast_ir::ast::ClassKind;
use recast_ir::{MemberId, StmtId, SyntaxTree};

/// `class C { void m() { <stmts> } }` registered as a root. Returns the
/// method and its body.
pub(crate) fn in_method(tree: &mut SyntaxTree, stmts: Vec<StmtId>) -> (MemberId, StmtId) {
    let body = tree.mk_block(stmts);
    let method = tree.mk_method("m", &[], None, Some(body));
    let class = tree.mk_class(ClassKind::Class, "C", vec![method]);
    tree.add_root(class);
    (method, body)
}

/// `name();`
pub(crate) fn call_stmt(tree: &mut SyntaxTree, name: &str) -> StmtId {
    let call = tree.mk_call(None, name, &[]);
    tree.mk_expr_stmt(call)
}

/// `while (true) <body>`
pub(crate) fn while_true(tree: &mut SyntaxTree, body: StmtId) -> StmtId {
    let cond = tree.mk_bool(true);
    tree.mk_while(cond, body)
}
