use pretty_assertions::assert_eq;
use recast_ir::ast::{BinaryOp, LambdaBody};
use recast_ir::SyntaxTree;

use super::*;

/// `a != null && a.length() > 0`; returns the chain and its second operand.
fn null_guarded_length(tree: &mut SyntaxTree) -> (ExprId, ExprId) {
    let a = tree.mk_name("a");
    let null = tree.mk_null();
    let guard = tree.mk_binary(BinaryOp::NotEq, a, null);
    let a2 = tree.mk_name("a");
    let len = tree.mk_call(Some(a2), "length", &[]);
    let zero = tree.mk_int(0);
    let check = tree.mk_binary(BinaryOp::Gt, len, zero);
    let chain = tree.mk_binary(BinaryOp::And, guard, check);
    (chain, check)
}

#[test]
fn test_combine() {
    use ExtractSafety::{No, Unsure, Yes};
    assert_eq!(Yes.combine(Yes), Yes);
    assert_eq!(Yes.combine(Unsure), Unsure);
    assert_eq!(Unsure.combine(No), No);
    assert_eq!(No.combine(Yes), No);
}

#[test]
fn test_guarded_dereference_cannot_move() {
    let mut tree = SyntaxTree::new();
    let (chain, check) = null_guarded_length(&mut tree);
    assert_eq!(can_extract(&tree, chain, check), ExtractSafety::No);
}

#[test]
fn test_independent_conditions() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let zero = tree.mk_int(0);
    let first = tree.mk_binary(BinaryOp::Gt, a, zero);
    let b = tree.mk_name("b");
    let zero2 = tree.mk_int(0);
    let second = tree.mk_binary(BinaryOp::Gt, b, zero2);
    let chain = tree.mk_binary(BinaryOp::And, first, second);

    assert_eq!(can_extract(&tree, chain, second), ExtractSafety::Yes);
    assert_eq!(can_extract(&tree, chain, first), ExtractSafety::Yes);
}

#[test]
fn test_side_effecting_guard_is_unsure() {
    let mut tree = SyntaxTree::new();
    let first = tree.mk_call(None, "ready", &[]);
    let b = tree.mk_name("b");
    let chain = tree.mk_binary(BinaryOp::Or, first, b);
    assert_eq!(can_extract(&tree, chain, b), ExtractSafety::Unsure);
}

#[test]
fn test_constant_always_moves() {
    let mut tree = SyntaxTree::new();
    let call = tree.mk_call(None, "f", &[]);
    let one = tree.mk_int(1);
    let sum = tree.mk_binary(BinaryOp::Add, call, one);
    assert_eq!(can_extract(&tree, sum, one), ExtractSafety::Yes);
}

#[test]
fn test_argument_after_side_effect() {
    let mut tree = SyntaxTree::new();
    let first = tree.mk_call(None, "next", &[]);
    let x = tree.mk_name("x");
    let call = tree.mk_call(None, "f", &[first, x]);
    let y = tree.mk_name("y");
    let later = tree.mk_call(None, "next", &[]);
    let pure_call = tree.mk_call(None, "g", &[y, later]);

    assert_eq!(can_extract(&tree, call, x), ExtractSafety::No);
    assert_eq!(can_extract(&tree, pure_call, y), ExtractSafety::Yes);
}

#[test]
fn test_conditional_branches() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let null = tree.mk_null();
    let cond = tree.mk_binary(BinaryOp::Eq, a, null);
    let zero = tree.mk_int(0);
    let a2 = tree.mk_name("a");
    let size = tree.mk_field_access(a2, "size");
    let ternary = tree.mk_conditional(cond, zero, size);

    assert_eq!(can_extract(&tree, ternary, cond), ExtractSafety::Yes);
    assert_eq!(can_extract(&tree, ternary, size), ExtractSafety::No);

    let c = tree.mk_name("c");
    let b = tree.mk_name("b");
    let call = tree.mk_call(None, "compute", &[]);
    let other = tree.mk_conditional(c, b, call);
    assert_eq!(can_extract(&tree, other, b), ExtractSafety::Yes);
    assert_eq!(can_extract(&tree, other, call), ExtractSafety::Unsure);
}

#[test]
fn test_assignment_sides() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let v = tree.mk_name("v");
    let assign = tree.mk_assign(x, v);

    assert_eq!(can_extract(&tree, assign, x), ExtractSafety::No);
    assert_eq!(can_extract(&tree, assign, v), ExtractSafety::Yes);
}

#[test]
fn test_lambda_body_never_moves() {
    let mut tree = SyntaxTree::new();
    let v = tree.mk_name("v");
    let lambda = tree.mk_lambda(&["p"], LambdaBody::Expr(v), true);
    let call = tree.mk_call(None, "apply", &[lambda]);

    assert_eq!(can_extract(&tree, call, v), ExtractSafety::No);
    assert_eq!(can_extract(&tree, call, lambda), ExtractSafety::Yes);
}

#[test]
fn test_statement_in_lambda_block() {
    let mut tree = SyntaxTree::new();
    let v = tree.mk_name("v");
    let ret = tree.mk_return(Some(v));
    let body = tree.mk_block(vec![ret]);
    let lambda = tree.mk_lambda(&[], LambdaBody::Block(body), true);
    let call = tree.mk_call(None, "apply", &[lambda]);

    assert_eq!(can_extract(&tree, call, v), ExtractSafety::No);
}

#[test]
fn test_not_a_descendant() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let b = tree.mk_name("b");
    assert_eq!(can_extract(&tree, a, b), ExtractSafety::Unsure);
}

#[test]
fn test_division_guard() {
    let mut tree = SyntaxTree::new();
    let n = tree.mk_name("n");
    let zero = tree.mk_int(0);
    let guard = tree.mk_binary(BinaryOp::NotEq, n, zero);
    let total = tree.mk_name("total");
    let n2 = tree.mk_name("n");
    let avg = tree.mk_binary(BinaryOp::Div, total, n2);
    let limit = tree.mk_int(10);
    let check = tree.mk_binary(BinaryOp::Gt, avg, limit);

    assert!(is_necessary_guard(&tree, guard, check));
    let other = tree.mk_name("m");
    assert!(!is_necessary_guard(&tree, other, check));
}
