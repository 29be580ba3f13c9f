use pretty_assertions::assert_eq;

use crate::ast::{ClassKind, ExprKind, Modifiers, StmtKind};
use crate::equivalence::equivalent;
use crate::{Comment, NodeId, StmtId, SyntaxTree, TreeError};

/// `class C { void m() <body> }` registered as a root.
fn in_method(tree: &mut SyntaxTree, stmts: Vec<StmtId>) -> StmtId {
    let body = tree.mk_block(stmts);
    let method = tree.mk_method("m", &[], None, Some(body));
    let class = tree.mk_class(ClassKind::Class, "C", vec![method]);
    tree.add_root(class);
    body
}

fn call_stmt(tree: &mut SyntaxTree, name: &str) -> StmtId {
    let call = tree.mk_call(None, name, &[]);
    tree.mk_expr_stmt(call)
}

#[test]
fn test_alloc_adopts_children() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let b = call_stmt(&mut tree, "b");
    let body = in_method(&mut tree, vec![a, b]);

    assert_eq!(tree.parent(NodeId::Stmt(a)), Some(NodeId::Stmt(body)));
    assert_eq!(tree.block_position(b), Some((body, 1)));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(a), None);
    assert!(tree.is_attached(NodeId::Stmt(b)));
}

#[test]
fn test_detached_until_rooted() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let body = tree.mk_block(vec![a]);
    assert!(!tree.is_attached(NodeId::Stmt(a)));

    let method = tree.mk_method("m", &[], None, Some(body));
    let class = tree.mk_class(ClassKind::Class, "C", vec![method]);
    tree.add_root(class);
    assert!(tree.is_attached(NodeId::Stmt(a)));
}

#[test]
fn test_replace_expr_moves_parent_link() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let ret = tree.mk_return(Some(x));
    in_method(&mut tree, vec![ret]);

    let y = tree.mk_name("y");
    tree.replace_expr(x, y);

    assert_eq!(tree.print_stmt(ret), "return y;");
    assert_eq!(tree.parent(NodeId::Expr(x)), None);
    assert_eq!(tree.parent(NodeId::Expr(y)), Some(NodeId::Stmt(ret)));
    assert!(!tree.is_attached(NodeId::Expr(x)));
}

#[test]
fn test_replace_detached_is_an_error() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let y = tree.mk_name("y");
    assert_eq!(
        tree.try_replace(NodeId::Expr(x), NodeId::Expr(y)),
        Err(TreeError::Detached(NodeId::Expr(x)))
    );
}

#[test]
fn test_wrap_expr_keeps_identity() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let ret = tree.mk_return(Some(x));
    in_method(&mut tree, vec![ret]);

    let not = tree.wrap_expr(x, |t, inner| t.mk_not(inner));

    assert_eq!(tree.print_stmt(ret), "return !x;");
    assert_eq!(tree.parent_expr(x), Some(not));
    assert!(tree.is_attached(NodeId::Expr(x)));
}

#[test]
fn test_wrap_stmt_moves_comments() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let note = tree.intern("note");
    tree.add_comment(a, Comment::block(note));
    let cond = tree.mk_name("c");
    let iff = tree.mk_if(cond, a, None);
    in_method(&mut tree, vec![iff]);

    let block = tree.wrap_stmt(a, |t, s| t.mk_block(vec![s]));

    assert_eq!(tree.print_stmt(iff), "if (c) /* note */ { a(); }");
    assert_eq!(tree.parent_stmt(a), Some(block));
}

#[test]
fn test_insert_and_remove_in_block() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let c = call_stmt(&mut tree, "c");
    let body = in_method(&mut tree, vec![a, c]);

    let b = call_stmt(&mut tree, "b");
    tree.insert_stmt_before(c, b);
    let d = call_stmt(&mut tree, "d");
    tree.insert_stmt_after(c, d);
    assert_eq!(tree.print_stmt(body), "{ a(); b(); c(); d(); }");

    tree.remove_stmt(a);
    assert_eq!(tree.print_stmt(body), "{ b(); c(); d(); }");
    assert!(!tree.is_attached(NodeId::Stmt(a)));
}

#[test]
fn test_insert_outside_block_is_an_error() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let cond = tree.mk_name("c");
    let iff = tree.mk_if(cond, a, None);
    in_method(&mut tree, vec![iff]);

    let b = call_stmt(&mut tree, "b");
    assert_eq!(tree.try_insert_stmt_before(a, b), Err(TreeError::NotInBlock(a)));
}

#[test]
fn test_update_detaches_dropped_children() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let b = call_stmt(&mut tree, "b");
    let body = in_method(&mut tree, vec![a, b]);

    tree.update_stmt(body, |kind| {
        if let StmtKind::Block(stmts) = kind {
            stmts.retain(|&s| s != a);
        }
    });

    assert_eq!(tree.parent(NodeId::Stmt(a)), None);
    assert_eq!(tree.parent_stmt(b), Some(body));
}

#[test]
fn test_update_keeps_moved_child() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let body = in_method(&mut tree, vec![a]);
    let inner = tree.mk_block(vec![]);
    tree.insert_stmt_after(a, inner);

    // Move `a` into `inner` first, then drop it from `body`.
    tree.update_stmt(inner, |kind| {
        if let StmtKind::Block(stmts) = kind {
            stmts.push(a);
        }
    });
    tree.update_stmt(body, |kind| {
        if let StmtKind::Block(stmts) = kind {
            stmts.retain(|&s| s != a);
        }
    });

    assert_eq!(tree.parent_stmt(a), Some(inner));
    assert_eq!(tree.print_stmt(body), "{ { a(); } }");
    assert!(tree.is_attached(NodeId::Stmt(a)));
}

#[test]
fn test_deep_copy_is_equivalent_and_detached() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let f = tree.mk_field_access(x, "f");
    let i = tree.mk_int(0);
    let access = tree.alloc_expr(ExprKind::ArrayAccess { array: f, index: i });
    let stmt = tree.mk_expr_stmt(access);
    in_method(&mut tree, vec![stmt]);

    let copy = tree.deep_copy_expr(access);

    assert_ne!(copy, access);
    assert!(equivalent(&tree, copy, access));
    assert_eq!(tree.print_expr(copy), "x.f[0]");
    assert_eq!(tree.parent(NodeId::Expr(copy)), None);
    assert_eq!(tree.parent_expr(x), Some(f));
}

#[test]
fn test_member_insert_and_remove() {
    let mut tree = SyntaxTree::new();
    let ty = tree.type_ref("int");
    let field = tree.mk_field(Modifiers::empty(), ty, "x", None);
    let class = tree.mk_class(ClassKind::Class, "C", vec![field]);
    tree.add_root(class);

    let body = tree.mk_block(vec![]);
    let init = tree.mk_initializer(false, body);
    tree.insert_member_after(field, init);
    assert_eq!(tree.next_member(field), Some(init));
    assert_eq!(tree.print_class(class), "class C { int x; {} }");

    tree.remove_member(init);
    assert_eq!(tree.next_member(field), None);
    assert!(!tree.is_attached(NodeId::Member(init)));
}

#[test]
fn test_ancestors_and_enclosing_statement() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let call = tree.mk_call(None, "f", &[x]);
    let stmt = tree.mk_expr_stmt(call);
    let body = in_method(&mut tree, vec![stmt]);

    assert_eq!(tree.enclosing_statement(NodeId::Expr(x)), Some(stmt));
    assert!(tree.is_ancestor(NodeId::Stmt(body), NodeId::Expr(x), true));
    assert!(tree.is_ancestor(NodeId::Expr(x), NodeId::Expr(x), false));
    assert!(!tree.is_ancestor(NodeId::Expr(x), NodeId::Expr(x), true));
    assert_eq!(tree.ancestors(NodeId::Expr(x)).next(), Some(NodeId::Expr(call)));
}

#[test]
fn test_revision_bumps_on_edit() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    in_method(&mut tree, vec![a]);
    let before = tree.revision();
    let b = call_stmt(&mut tree, "b");
    tree.insert_stmt_after(a, b);
    assert!(tree.revision() > before);
}
