use pretty_assertions::assert_eq;
use recast_ir::ast::{BinaryOp, ClassKind, LambdaBody};
use recast_ir::{NodeId, SyntaxTree};

use super::*;
use crate::test_helpers::{call_stmt, in_method, while_true};

#[test]
fn test_jumps_never_complete() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(None);
    let ret = tree.mk_return(None);
    let e = tree.mk_name("e");
    let throw = tree.mk_throw(e);
    let body = tree.mk_block(vec![brk]);
    let lp = while_true(&mut tree, body);
    in_method(&mut tree, vec![lp, ret, throw]);

    assert!(!may_complete_normally(&tree, brk));
    assert!(!may_complete_normally(&tree, ret));
    assert!(!may_complete_normally(&tree, throw));
}

#[test]
fn test_system_exit_never_returns() {
    let mut tree = SyntaxTree::new();
    let system = tree.mk_name("System");
    let zero = tree.mk_int(0);
    let exit = tree.mk_call(Some(system), "exit", &[zero]);
    let stmt = tree.mk_expr_stmt(exit);
    let other = call_stmt(&mut tree, "exit");
    in_method(&mut tree, vec![stmt, other]);

    assert!(!may_complete_normally(&tree, stmt));
    assert!(may_complete_normally(&tree, other));
    assert!(contains_system_exit(&tree, stmt));
}

#[test]
fn test_runtime_halt_counts_as_exit() {
    let mut tree = SyntaxTree::new();
    let runtime = tree.mk_name("Runtime");
    let get = tree.mk_call(Some(runtime), "getRuntime", &[]);
    let one = tree.mk_int(1);
    let halt = tree.mk_call(Some(get), "halt", &[one]);
    let stmt = tree.mk_expr_stmt(halt);
    in_method(&mut tree, vec![stmt]);

    assert!(contains_system_exit(&tree, stmt));
    // Only `System.exit` is terminal for the oracle.
    assert!(may_complete_normally(&tree, stmt));
}

#[test]
fn test_endless_loop_without_break() {
    let mut tree = SyntaxTree::new();
    let work = call_stmt(&mut tree, "work");
    let body = tree.mk_block(vec![work]);
    let lp = while_true(&mut tree, body);
    in_method(&mut tree, vec![lp]);

    assert!(!may_complete_normally(&tree, lp));
    assert!(is_endless_loop(&tree, lp));
}

#[test]
fn test_endless_loop_with_break() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(None);
    let c = tree.mk_name("c");
    let guard = tree.mk_if(c, brk, None);
    let body = tree.mk_block(vec![guard]);
    let lp = while_true(&mut tree, body);
    in_method(&mut tree, vec![lp]);

    assert!(may_complete_normally(&tree, lp));
    assert!(!is_endless_loop(&tree, lp));
    assert!(statement_is_break_target(&tree, lp));
}

#[test]
fn test_break_in_dead_branch_is_ignored() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(None);
    let never = tree.mk_bool(false);
    let dead = tree.mk_if(never, brk, None);
    let body = tree.mk_block(vec![dead]);
    let lp = while_true(&mut tree, body);
    in_method(&mut tree, vec![lp]);

    assert!(!may_complete_normally(&tree, lp));
}

#[test]
fn test_break_of_nested_loop_does_not_exit_outer() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(None);
    let inner_body = tree.mk_block(vec![brk]);
    let inner = while_true(&mut tree, inner_body);
    let outer_body = tree.mk_block(vec![inner]);
    let outer = while_true(&mut tree, outer_body);
    in_method(&mut tree, vec![outer]);

    assert!(may_complete_normally(&tree, inner));
    assert!(!may_complete_normally(&tree, outer));
}

#[test]
fn test_labeled_break_exits_outer_loop() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(Some("outer"));
    let inner_body = tree.mk_block(vec![brk]);
    let inner = while_true(&mut tree, inner_body);
    let outer_body = tree.mk_block(vec![inner]);
    let outer = while_true(&mut tree, outer_body);
    let labeled = tree.mk_labeled("outer", outer);
    in_method(&mut tree, vec![labeled]);

    assert_eq!(find_exited_statement(&tree, brk), Some(labeled));
    // Both loops are left through a break to an enclosing statement.
    assert!(may_complete_normally(&tree, inner));
    assert!(may_complete_normally(&tree, outer));
    assert!(may_complete_normally(&tree, labeled));
}

#[test]
fn test_labeled_continue_leaves_inner_loop() {
    let mut tree = SyntaxTree::new();
    let cont = tree.mk_continue(Some("outer"));
    let inner_body = tree.mk_block(vec![cont]);
    let inner = while_true(&mut tree, inner_body);
    let c = tree.mk_name("c");
    let outer_body = tree.mk_block(vec![inner]);
    let outer = tree.mk_while(c, outer_body);
    let labeled = tree.mk_labeled("outer", outer);
    in_method(&mut tree, vec![labeled]);

    assert_eq!(find_exited_statement(&tree, cont), Some(outer));
    assert!(may_complete_normally(&tree, inner));
    assert!(statement_is_continue_target(&tree, outer));
}

#[test]
fn test_for_without_condition_is_endless() {
    let mut tree = SyntaxTree::new();
    let body = tree.mk_block(vec![]);
    let lp = tree.mk_for(vec![], None, &[], body);
    let i = tree.mk_name("i");
    let n = tree.mk_name("n");
    let cond = tree.mk_binary(BinaryOp::Lt, i, n);
    let body2 = tree.mk_block(vec![]);
    let bounded = tree.mk_for(vec![], Some(cond), &[], body2);
    in_method(&mut tree, vec![lp, bounded]);

    assert!(!may_complete_normally(&tree, lp));
    assert!(may_complete_normally(&tree, bounded));
}

#[test]
fn test_if_with_constant_condition() {
    let mut tree = SyntaxTree::new();
    let ret = tree.mk_return(None);
    let always = tree.mk_bool(true);
    let taken = tree.mk_if(always, ret, None);
    let ret2 = tree.mk_return(None);
    let never = tree.mk_bool(false);
    let skipped = tree.mk_if(never, ret2, None);
    in_method(&mut tree, vec![skipped, taken]);

    assert!(!may_complete_normally(&tree, taken));
    assert!(may_complete_normally(&tree, skipped));
}

#[test]
fn test_if_else_both_branches_exit() {
    let mut tree = SyntaxTree::new();
    let c = tree.mk_name("c");
    let r1 = tree.mk_return(None);
    let e = tree.mk_name("e");
    let t = tree.mk_throw(e);
    let both = tree.mk_if(c, r1, Some(t));
    let c2 = tree.mk_name("c");
    let r2 = tree.mk_return(None);
    let one = tree.mk_if(c2, r2, None);
    in_method(&mut tree, vec![one, both]);

    assert!(!may_complete_normally(&tree, both));
    assert!(may_complete_normally(&tree, one));
}

#[test]
fn test_try_finally() {
    let mut tree = SyntaxTree::new();
    let r1 = tree.mk_return(None);
    let block = tree.mk_block(vec![r1]);
    let handled = call_stmt(&mut tree, "log");
    let catch_body = tree.mk_block(vec![handled]);
    let with_catch = tree.mk_try(vec![], block, &[("Exception", "e", catch_body)], None);

    let r2 = tree.mk_return(None);
    let block2 = tree.mk_block(vec![]);
    let finally = tree.mk_block(vec![r2]);
    let with_finally = tree.mk_try(vec![], block2, &[], Some(finally));
    in_method(&mut tree, vec![with_catch, with_finally]);

    assert!(may_complete_normally(&tree, with_catch));
    assert!(!may_complete_normally(&tree, with_finally));
    assert!(is_in_finally_block(&tree, NodeId::Stmt(r2)));
    assert!(!is_in_finally_block(&tree, NodeId::Stmt(r1)));
}

#[test]
fn test_switch_without_default_completes() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let one = tree.mk_int(1);
    let case = tree.mk_case(&[one]);
    let ret = tree.mk_return(None);
    let body = tree.mk_block(vec![case, ret]);
    let switch = tree.mk_switch(x, body, None);
    in_method(&mut tree, vec![switch]);

    assert!(may_complete_normally(&tree, switch));
}

#[test]
fn test_switch_with_default_and_returns() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let one = tree.mk_int(1);
    let case = tree.mk_case(&[one]);
    let r1 = tree.mk_return(None);
    let default = tree.mk_case(&[]);
    let r2 = tree.mk_return(None);
    let body = tree.mk_block(vec![case, r1, default, r2]);
    let switch = tree.mk_switch(x, body, None);
    in_method(&mut tree, vec![switch]);

    assert!(!may_complete_normally(&tree, switch));
}

#[test]
fn test_switch_break_completes() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let default = tree.mk_case(&[]);
    let brk = tree.mk_break(None);
    let ret = tree.mk_return(None);
    let body = tree.mk_block(vec![default, brk, ret]);
    let switch = tree.mk_switch(x, body, None);
    in_method(&mut tree, vec![switch]);

    assert_eq!(find_exited_statement(&tree, brk), Some(switch));
    assert!(may_complete_normally(&tree, switch));
}

#[test]
fn test_enum_switch_covering_all_constants() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let a = tree.mk_name("A");
    let ra = tree.mk_return(None);
    let rule_a = tree.mk_rule(&[a], ra);
    let b = tree.mk_name("B");
    let rb = tree.mk_return(None);
    let rule_b = tree.mk_rule(&[b], rb);
    let body = tree.mk_block(vec![rule_a, rule_b]);
    let exhaustive = tree.mk_switch(x, body, Some(2));

    let y = tree.mk_name("y");
    let a2 = tree.mk_name("A");
    let ra2 = tree.mk_return(None);
    let rule_a2 = tree.mk_rule(&[a2], ra2);
    let body2 = tree.mk_block(vec![rule_a2]);
    let partial = tree.mk_switch(y, body2, Some(2));
    in_method(&mut tree, vec![partial, exhaustive]);

    assert!(!may_complete_normally(&tree, exhaustive));
    assert!(may_complete_normally(&tree, partial));
}

#[test]
fn test_labeled_block_with_break() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(Some("done"));
    let ret = tree.mk_return(None);
    let c = tree.mk_name("c");
    let guard = tree.mk_if(c, brk, None);
    let body = tree.mk_block(vec![guard, ret]);
    let labeled = tree.mk_labeled("done", body);
    in_method(&mut tree, vec![labeled]);

    assert!(!may_complete_normally(&tree, body));
    assert!(may_complete_normally(&tree, labeled));
}

#[test]
fn test_recursive_call_is_terminal_for_method() {
    let mut tree = SyntaxTree::new();
    let recurse = call_stmt(&mut tree, "m");
    let (method, body) = in_method(&mut tree, vec![recurse]);

    assert!(may_complete_normally(&tree, body));
    assert!(!method_may_complete_normally(&tree, method));
    assert!(method_always_throws(&tree, method));
}

#[test]
fn test_contains_return_skips_lambdas() {
    let mut tree = SyntaxTree::new();
    let ret = tree.mk_return(None);
    let lambda_body = tree.mk_block(vec![ret]);
    let lambda = tree.mk_lambda(&[], LambdaBody::Block(lambda_body), false);
    let run = tree.mk_call(None, "run", &[lambda]);
    let stmt = tree.mk_expr_stmt(run);
    in_method(&mut tree, vec![stmt]);

    assert!(!contains_return(&tree, stmt));
    assert!(contains_return(&tree, lambda_body));
    // A jump inside the lambda has no target outside it.
    let brk = tree.mk_break(None);
    assert_eq!(find_exited_statement(&tree, brk), None);
}

#[test]
fn test_contains_yield() {
    let mut tree = SyntaxTree::new();
    let v = tree.mk_name("v");
    let yld = tree.mk_yield(v);
    let rule_body = tree.mk_block(vec![yld]);
    let rule = tree.mk_rule(&[], rule_body);
    let body = tree.mk_block(vec![rule]);
    let x = tree.mk_name("x");
    let switch = tree.mk_switch_expr(x, body);
    let stmt = tree.mk_expr_stmt(switch);
    in_method(&mut tree, vec![stmt]);

    assert!(contains_yield(&tree, rule_body));
    assert!(!contains_yield(&tree, stmt));
}

#[test]
fn test_naked_jumps() {
    let mut tree = SyntaxTree::new();
    let brk = tree.mk_break(None);
    let c = tree.mk_name("c");
    let guard = tree.mk_if(c, brk, None);
    let cont = tree.mk_continue(None);
    let inner_body = tree.mk_block(vec![cont]);
    let inner = while_true(&mut tree, inner_body);
    let body = tree.mk_block(vec![guard, inner]);
    let lp = while_true(&mut tree, body);
    in_method(&mut tree, vec![lp]);

    assert!(statement_contains_naked_break(&tree, body));
    assert!(!statement_contains_naked_break(&tree, lp));
    assert!(!statement_contains_naked_continue(&tree, body));
    assert!(statement_contains_naked_continue(&tree, inner_body));
}

#[test]
fn test_is_in_loop() {
    let mut tree = SyntaxTree::new();
    let work = call_stmt(&mut tree, "work");
    let body = tree.mk_block(vec![work]);
    let c = tree.mk_name("c");
    let lp = tree.mk_while(c, body);
    in_method(&mut tree, vec![lp]);

    assert!(is_in_loop(&tree, NodeId::Stmt(work)));
    assert!(!is_in_loop(&tree, NodeId::Expr(c)));
    assert!(!is_in_loop(&tree, NodeId::Stmt(lp)));
}

#[test]
fn test_else_if_and_braces() {
    let mut tree = SyntaxTree::new();
    let a = call_stmt(&mut tree, "a");
    let inner_block = tree.mk_block(vec![a]);
    let outer_block = tree.mk_block(vec![inner_block]);
    let c2 = tree.mk_name("d");
    let b = call_stmt(&mut tree, "b");
    let else_if = tree.mk_if(c2, b, None);
    let c = tree.mk_name("c");
    let top = tree.mk_if(c, outer_block, Some(else_if));
    in_method(&mut tree, vec![top]);

    assert!(is_else_if(&tree, else_if));
    assert!(!is_else_if(&tree, top));
    assert_eq!(strip_braces(&tree, outer_block), a);
    assert_eq!(only_statement_in_block(&tree, outer_block), Some(inner_block));
}

#[test]
fn test_statement_is_empty() {
    let mut tree = SyntaxTree::new();
    let e1 = tree.mk_empty();
    let inner = tree.mk_block(vec![e1]);
    let outer = tree.mk_block(vec![inner]);
    let work = call_stmt(&mut tree, "work");
    let full = tree.mk_block(vec![work]);
    in_method(&mut tree, vec![outer, full]);

    assert!(statement_is_empty(&tree, outer));
    assert!(!statement_is_empty(&tree, full));
}

#[test]
fn test_block_completes_with_statement() {
    let mut tree = SyntaxTree::new();
    let first = call_stmt(&mut tree, "first");
    let last = call_stmt(&mut tree, "last");
    let then_block = tree.mk_block(vec![last]);
    let c = tree.mk_name("c");
    let branch = tree.mk_if(c, then_block, None);
    let trailing = tree.mk_empty();
    let (_, body) = in_method(&mut tree, vec![first, branch, trailing]);

    assert!(block_completes_with_statement(&tree, body, last));
    assert!(!block_completes_with_statement(&tree, body, first));
}

#[test]
fn test_anonymous_class_exit_is_ignored() {
    let mut tree = SyntaxTree::new();
    let system = tree.mk_name("System");
    let zero = tree.mk_int(0);
    let exit = tree.mk_call(Some(system), "exit", &[zero]);
    let exit_stmt = tree.mk_expr_stmt(exit);
    let run_body = tree.mk_block(vec![exit_stmt]);
    let run = tree.mk_method("run", &[], None, Some(run_body));
    let anon = tree.mk_class(ClassKind::Class, "", vec![run]);
    let new = tree.mk_new("Runnable", &[], Some(anon));
    let stmt = tree.mk_expr_stmt(new);
    in_method(&mut tree, vec![stmt]);

    assert!(!contains_system_exit(&tree, stmt));
}
