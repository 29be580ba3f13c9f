use pretty_assertions::assert_eq;
use recast_flow::{can_extract, ExtractSafety};
use recast_ir::ast::{
    BinaryOp, ClassKind, ConstructorKind, ExprKind, LambdaBody, Literal, Modifiers,
};
use recast_ir::{ExprId, StmtId, SyntaxTree};

use crate::test_helpers::{call_stmt, in_method};
use crate::{for_expression, for_expression_with, ParentContext, SurroundOptions, Surrounder};

fn classified(tree: &SyntaxTree, expr: ExprId) -> Surrounder {
    match for_expression(tree, expr) {
        Some(surrounder) => surrounder,
        None => panic!("{} is not surroundable", tree.print_expr(expr)),
    }
}

fn context(tree: &SyntaxTree, expr: ExprId) -> ParentContext {
    classified(tree, expr).expected_parent_context(tree)
}

#[test]
fn test_statement_in_block_needs_no_rewrite() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let (stmt, call) = call_stmt(&mut tree, "foo", &[x]);
    in_method(&mut tree, vec![stmt]);

    assert_eq!(classified(&tree, x).name(), "no-op");
    assert_eq!(context(&tree, x), ParentContext::Unknown);
    assert_eq!(context(&tree, call), ParentContext::Expression);
}

#[test]
fn test_branch_statement_is_wrapped() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let (stmt, _) = call_stmt(&mut tree, "foo", &[x]);
    let c = tree.mk_name("c");
    let if_stmt = tree.mk_if(c, stmt, None);
    in_method(&mut tree, vec![if_stmt]);

    assert!(matches!(
        classified(&tree, x),
        Surrounder::BlockWrap(ref wrap) if wrap.target == stmt
    ));
}

#[test]
fn test_labeled_branch_wraps_the_label() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let (stmt, _) = call_stmt(&mut tree, "foo", &[x]);
    let labeled = tree.mk_labeled("l", stmt);
    let c = tree.mk_name("c");
    let if_stmt = tree.mk_if(c, labeled, None);
    in_method(&mut tree, vec![if_stmt]);

    assert!(matches!(
        classified(&tree, x),
        Surrounder::BlockWrap(ref wrap) if wrap.target == labeled && wrap.stmt == stmt
    ));
}

#[test]
fn test_return_value_context() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let paren = tree.mk_paren(x);
    let ret = tree.mk_return(Some(paren));
    in_method(&mut tree, vec![ret]);

    assert_eq!(context(&tree, x), ParentContext::Return);
}

#[test]
fn test_assignment_context_needs_simple_target() {
    let mut tree = SyntaxTree::new();
    let v = tree.mk_name("v");
    let f = tree.mk_call(None, "f", &[]);
    let assign = tree.mk_assign(v, f);
    let simple = tree.mk_expr_stmt(assign);

    let arr = tree.mk_name("arr");
    let i = tree.mk_name("i");
    let slot = tree.alloc_expr(ExprKind::ArrayAccess { array: arr, index: i });
    let g = tree.mk_call(None, "g", &[]);
    let assign = tree.mk_assign(slot, g);
    let indexed = tree.mk_expr_stmt(assign);

    let this = tree.mk_this();
    let field = tree.mk_field_access(this, "f");
    let h = tree.mk_call(None, "h", &[]);
    let assign = tree.mk_assign(field, h);
    let through_this = tree.mk_expr_stmt(assign);
    in_method(&mut tree, vec![simple, indexed, through_this]);

    assert_eq!(context(&tree, f), ParentContext::Assignment);
    assert_eq!(context(&tree, g), ParentContext::Unknown);
    assert_eq!(context(&tree, h), ParentContext::Assignment);
}

#[test]
fn test_var_declaration_needs_known_type() {
    let mut tree = SyntaxTree::new();
    let var = tree.type_ref("var");
    let typed = tree.mk_call(None, "typed", &[]);
    let int = tree.type_ref("int");
    tree.set_expr_type(typed, Some(int));
    let known = tree.mk_local(var, "a", Some(typed));
    let untyped = tree.mk_call(None, "untyped", &[]);
    let unknown = tree.mk_local(var, "b", Some(untyped));
    in_method(&mut tree, vec![known, unknown]);

    assert_eq!(context(&tree, typed), ParentContext::Assignment);
    assert_eq!(context(&tree, untyped), ParentContext::Unknown);
}

#[test]
fn test_lambda_body() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let f = tree.mk_call(None, "f", &[x]);
    let supplier = tree.mk_lambda(&["x"], LambdaBody::Expr(f), true);
    let g = tree.mk_call(None, "g", &[]);
    let runnable = tree.mk_lambda(&[], LambdaBody::Expr(g), false);
    let (stmt, _) = call_stmt(&mut tree, "run", &[supplier, runnable]);
    in_method(&mut tree, vec![stmt]);

    assert!(matches!(
        classified(&tree, x),
        Surrounder::Lambda(ref wrap) if wrap.lambda == supplier
    ));
    assert_eq!(context(&tree, x), ParentContext::Return);
    assert_eq!(context(&tree, g), ParentContext::Expression);
}

#[test]
fn test_for_initializer_splits_when_names_are_free() {
    let mut tree = SyntaxTree::new();
    let int = tree.type_ref("int");
    let f = tree.mk_call(None, "f", &[]);
    let init = tree.mk_local(int, "i", Some(f));
    let body = tree.mk_block(vec![]);
    let for_stmt = tree.mk_for(vec![init], None, &[], body);
    in_method(&mut tree, vec![for_stmt]);

    assert!(matches!(
        classified(&tree, f),
        Surrounder::ForSplit(ref split) if split.init_stmt == init && split.head == for_stmt
    ));
    assert_eq!(context(&tree, f), ParentContext::Assignment);
}

#[test]
fn test_for_initializer_wraps_when_name_is_used_later() {
    let mut tree = SyntaxTree::new();
    let int = tree.type_ref("int");
    let f = tree.mk_call(None, "f", &[]);
    let init = tree.mk_local(int, "i", Some(f));
    let body = tree.mk_block(vec![]);
    let for_stmt = tree.mk_for(vec![init], None, &[], body);
    let labeled = tree.mk_labeled("outer", for_stmt);
    let zero = tree.mk_int(0);
    let redeclared = tree.mk_local(int, "i", Some(zero));
    in_method(&mut tree, vec![labeled, redeclared]);

    assert!(matches!(
        classified(&tree, f),
        Surrounder::SimpleWrap(ref wrap) if wrap.head == labeled
    ));
}

#[test]
fn test_loop_headers_are_unsupported() {
    let mut tree = SyntaxTree::new();
    let cond = tree.mk_call(None, "more", &[]);
    let i = tree.mk_name("i");
    let update = tree.mk_unary(recast_ir::ast::UnaryOp::PostInc, i);
    let body = tree.mk_block(vec![]);
    let for_stmt = tree.mk_for(vec![], Some(cond), &[update], body);
    let again = tree.mk_call(None, "again", &[]);
    let body = tree.mk_block(vec![]);
    let do_while = tree.mk_do_while(body, again);
    in_method(&mut tree, vec![for_stmt, do_while]);

    assert!(for_expression(&tree, cond).is_none());
    assert!(for_expression(&tree, i).is_none());
    assert!(for_expression(&tree, again).is_none());
}

#[test]
fn test_while_condition() {
    let mut tree = SyntaxTree::new();
    let whole = tree.mk_call(None, "more", &[]);
    let body = tree.mk_block(vec![]);
    let plain = tree.mk_while(whole, body);

    let a = tree.mk_name("a");
    let b = tree.mk_name("b");
    let f = tree.mk_call(None, "f", &[]);
    let chain = tree.mk_polyadic(BinaryOp::And, &[a, b, f]);
    let paren = tree.mk_paren(chain);
    let body = tree.mk_block(vec![]);
    let split = tree.mk_while(paren, body);
    in_method(&mut tree, vec![plain, split]);

    assert!(matches!(
        classified(&tree, whole),
        Surrounder::WhileCondition(ref w) if w.split == 0 && w.lp == plain
    ));
    assert!(matches!(
        classified(&tree, f),
        Surrounder::WhileCondition(ref w) if w.split == 2 && w.lp == split
    ));
    assert_eq!(context(&tree, f), ParentContext::Unknown);
    // The first operand is always evaluated.
    assert!(matches!(
        classified(&tree, a),
        Surrounder::WhileCondition(ref w) if w.split == 0
    ));
}

#[test]
fn test_and_in_if_condition() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let f = tree.mk_call(None, "f", &[]);
    let chain = tree.mk_binary(BinaryOp::And, a, f);
    let (then_branch, _) = call_stmt(&mut tree, "g", &[]);
    let if_stmt = tree.mk_if(chain, then_branch, None);
    in_method(&mut tree, vec![if_stmt]);

    let surrounder = classified(&tree, f);
    assert!(matches!(
        surrounder,
        Surrounder::ShortCircuitSplit(ref s) if s.index == 1 && s.chain == chain
    ));
    assert_eq!(
        surrounder.expected_parent_context(&tree),
        ParentContext::SimpleIfCondition
    );
}

#[test]
fn test_or_needs_return() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let f = tree.mk_call(None, "f", &[]);
    let chain = tree.mk_binary(BinaryOp::Or, a, f);
    let (then_branch, _) = call_stmt(&mut tree, "g", &[]);
    let if_stmt = tree.mk_if(chain, then_branch, None);

    let b = tree.mk_name("b");
    let h = tree.mk_call(None, "h", &[]);
    let returned = tree.mk_binary(BinaryOp::Or, b, h);
    let ret = tree.mk_return(Some(returned));
    in_method(&mut tree, vec![if_stmt, ret]);

    assert!(for_expression(&tree, f).is_none());
    assert_eq!(classified(&tree, h).name(), "short-circuit-split");
    assert_eq!(context(&tree, h), ParentContext::Return);
}

#[test]
fn test_and_in_assignment_is_unsupported() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let f = tree.mk_call(None, "f", &[]);
    let chain = tree.mk_binary(BinaryOp::And, a, f);
    let v = tree.mk_name("v");
    let assign = tree.mk_assign(v, chain);
    let stmt = tree.mk_expr_stmt(assign);
    in_method(&mut tree, vec![stmt]);

    assert!(for_expression(&tree, f).is_none());
    // The first operand needs no split.
    assert_eq!(classified(&tree, a).name(), "no-op");
}

#[test]
fn test_else_chain_must_exclude_the_prefix() {
    let mut tree = SyntaxTree::new();
    // if (p && f()) a(); else if (!p) b();
    let p = tree.mk_name("p");
    let f = tree.mk_call(None, "f", &[]);
    let chain = tree.mk_binary(BinaryOp::And, p, f);
    let (a, _) = call_stmt(&mut tree, "a", &[]);
    let p2 = tree.mk_name("p");
    let not_p = tree.mk_not(p2);
    let (b, _) = call_stmt(&mut tree, "b", &[]);
    let else_if = tree.mk_if(not_p, b, None);
    let excluded = tree.mk_if(chain, a, Some(else_if));

    // if (p && !q) c(); else if (q) d();
    let p = tree.mk_name("p");
    let q = tree.mk_name("q");
    let not_q = tree.mk_not(q);
    let chain = tree.mk_binary(BinaryOp::And, p, not_q);
    let (c, _) = call_stmt(&mut tree, "c", &[]);
    let q2 = tree.mk_name("q");
    let (d, _) = call_stmt(&mut tree, "d", &[]);
    let else_if = tree.mk_if(q2, d, None);
    let overlapping = tree.mk_if(chain, c, Some(else_if));
    in_method(&mut tree, vec![excluded, overlapping]);

    assert_eq!(classified(&tree, f).name(), "short-circuit-split");
    assert!(for_expression(&tree, q).is_none());
}

#[test]
fn test_ternary_branches() {
    let mut tree = SyntaxTree::new();
    let c = tree.mk_name("c");
    let a = tree.mk_name("a");
    let f = tree.mk_call(None, "f", &[]);
    let ternary = tree.mk_conditional(c, a, f);
    let v = tree.mk_name("v");
    let assign = tree.mk_assign(v, ternary);
    let stmt = tree.mk_expr_stmt(assign);

    let d = tree.mk_name("d");
    let g = tree.mk_call(None, "g", &[]);
    let b = tree.mk_name("b");
    let returned = tree.mk_conditional(d, g, b);
    let ret = tree.mk_return(Some(returned));

    let e = tree.mk_name("e");
    let h = tree.mk_call(None, "h", &[]);
    let zero = tree.mk_int(0);
    let passed = tree.mk_conditional(e, h, zero);
    let (call, _) = call_stmt(&mut tree, "use", &[passed]);
    in_method(&mut tree, vec![stmt, ret, call]);

    assert!(matches!(
        classified(&tree, f),
        Surrounder::TernarySplit(ref t) if t.ternary == ternary
    ));
    assert_eq!(context(&tree, f), ParentContext::Assignment);
    assert_eq!(context(&tree, g), ParentContext::Return);
    assert!(for_expression(&tree, h).is_none());
    // The condition is always evaluated.
    assert_eq!(classified(&tree, c).name(), "no-op");
}

/// `c ? 1 : 'a'`, typed `int` with a `char` else branch. Returns the
/// conditional and the char literal.
fn promoted_conditional(tree: &mut SyntaxTree) -> (ExprId, ExprId) {
    let int = tree.type_ref("int");
    let char_ty = tree.type_ref("char");
    let c = tree.mk_name("c");
    let one = tree.mk_int(1);
    tree.set_expr_type(one, Some(int));
    let letter = tree.alloc_expr(ExprKind::Literal(Literal::Char('a')));
    tree.set_expr_type(letter, Some(char_ty));
    let ternary = tree.mk_conditional(c, one, letter);
    tree.set_expr_type(ternary, Some(int));
    (ternary, letter)
}

/// `class C { <ret> m() { <stmt> } }`
fn in_method_returning(tree: &mut SyntaxTree, ret: &str, stmt: StmtId) {
    let ty = tree.type_ref(ret);
    let body = tree.mk_block(vec![stmt]);
    let method = tree.mk_method("m", &[], Some(ty), Some(body));
    let class = tree.mk_class(ClassKind::Class, "C", vec![method]);
    tree.add_root(class);
}

#[test]
fn test_ternary_promotion_needs_a_target_of_the_same_type() {
    let mut tree = SyntaxTree::new();
    let object = tree.type_ref("Object");
    let int = tree.type_ref("int");
    let var = tree.type_ref("var");

    let (boxed, boxed_letter) = promoted_conditional(&mut tree);
    let boxed_decl = tree.mk_local(object, "o", Some(boxed));
    let (exact, exact_letter) = promoted_conditional(&mut tree);
    let exact_decl = tree.mk_local(int, "i", Some(exact));
    let (inferred, inferred_letter) = promoted_conditional(&mut tree);
    let inferred_decl = tree.mk_local(var, "v", Some(inferred));
    let (assigned, assigned_letter) = promoted_conditional(&mut tree);
    let target = tree.mk_name("o");
    tree.set_expr_type(target, Some(object));
    let assign = tree.mk_assign(target, assigned);
    let assign_stmt = tree.mk_expr_stmt(assign);
    in_method(&mut tree, vec![boxed_decl, exact_decl, inferred_decl, assign_stmt]);

    // `o = 'a'` would box a Character instead of an Integer.
    assert!(for_expression(&tree, boxed_letter).is_none());
    assert!(for_expression(&tree, assigned_letter).is_none());
    assert_eq!(classified(&tree, exact_letter).name(), "ternary-split");
    assert_eq!(classified(&tree, inferred_letter).name(), "ternary-split");
}

#[test]
fn test_ternary_promotion_in_return_uses_method_type() {
    let mut tree = SyntaxTree::new();
    let (boxed, boxed_letter) = promoted_conditional(&mut tree);
    let boxed_ret = tree.mk_return(Some(boxed));
    in_method_returning(&mut tree, "Object", boxed_ret);
    let (exact, exact_letter) = promoted_conditional(&mut tree);
    let exact_ret = tree.mk_return(Some(exact));
    in_method_returning(&mut tree, "int", exact_ret);

    assert!(for_expression(&tree, boxed_letter).is_none());
    assert_eq!(classified(&tree, exact_letter).name(), "ternary-split");
}

#[test]
fn test_chain_splits_at_operand_even_when_hoisting_is_safe() {
    let mut tree = SyntaxTree::new();
    let a = tree.mk_name("a");
    let b = tree.mk_name("b");
    let chain = tree.mk_binary(BinaryOp::And, a, b);
    let (go, _) = call_stmt(&mut tree, "go", &[]);
    let if_stmt = tree.mk_if(chain, go, None);
    in_method(&mut tree, vec![if_stmt]);

    assert_eq!(can_extract(&tree, chain, b), ExtractSafety::Yes);
    assert!(matches!(
        classified(&tree, b),
        Surrounder::ShortCircuitSplit(ref s) if s.index == 1 && s.chain == chain
    ));
}

#[test]
fn test_try_resources() {
    let mut tree = SyntaxTree::new();
    let ty = tree.type_ref("Reader");
    let first = tree.mk_call(None, "open", &[]);
    let r = tree.mk_local(ty, "r", Some(first));
    let second = tree.mk_call(None, "open", &[]);
    let s = tree.mk_local(ty, "s", Some(second));
    let block = tree.mk_block(vec![]);
    let plain = tree.mk_try(vec![r, s], block, &[], None);

    let handled_open = tree.mk_call(None, "open", &[]);
    let t = tree.mk_local(ty, "t", Some(handled_open));
    let block = tree.mk_block(vec![]);
    let handler = tree.mk_block(vec![]);
    let handled = tree.mk_try(vec![t], block, &[("IOException", "e", handler)], None);
    in_method(&mut tree, vec![plain, handled]);

    assert!(matches!(
        classified(&tree, first),
        Surrounder::NoOp(ref n) if n.target == plain
    ));
    assert!(matches!(
        classified(&tree, second),
        Surrounder::SplitTry(ref split) if split.index == 1
    ));
    assert!(matches!(
        classified(&tree, handled_open),
        Surrounder::SplitTry(ref split) if split.index == 0 && split.try_stmt == handled
    ));
}

#[test]
fn test_switch_rules() {
    let mut tree = SyntaxTree::new();
    let one = tree.mk_int(1);
    let (body, f) = call_stmt(&mut tree, "f", &[]);
    let rule = tree.mk_rule(&[one], body);
    let rules = tree.mk_block(vec![rule]);
    let k = tree.mk_name("k");
    let switch = tree.mk_switch_expr(k, rules);
    let ret = tree.mk_return(Some(switch));

    let two = tree.mk_int(2);
    let (body, g) = call_stmt(&mut tree, "g", &[]);
    let rule = tree.mk_rule(&[two], body);
    let rules = tree.mk_block(vec![rule]);
    let k = tree.mk_name("k");
    let statement = tree.mk_switch(k, rules, None);

    let label = tree.mk_call(None, "label", &[]);
    let (body, _) = call_stmt(&mut tree, "h", &[]);
    let rule = tree.mk_rule(&[label], body);
    let case = tree.mk_call(None, "caseValue", &[]);
    let old_style = tree.mk_case(&[case]);
    let rules = tree.mk_block(vec![rule, old_style]);
    let k = tree.mk_name("k");
    let labels = tree.mk_switch(k, rules, None);
    in_method(&mut tree, vec![ret, statement, labels]);

    assert_eq!(classified(&tree, f).name(), "yield-wrap");
    assert_eq!(context(&tree, f), ParentContext::Return);
    assert_eq!(classified(&tree, g).name(), "block-wrap");
    assert!(for_expression(&tree, label).is_none());
    assert!(for_expression(&tree, case).is_none());
}

#[test]
fn test_declaration_outside_block_is_unsupported() {
    let mut tree = SyntaxTree::new();
    let int = tree.type_ref("int");
    let f = tree.mk_call(None, "f", &[]);
    let decl = tree.mk_local(int, "x", Some(f));
    let c = tree.mk_name("c");
    let if_stmt = tree.mk_if(c, decl, None);
    in_method(&mut tree, vec![if_stmt]);

    assert!(for_expression(&tree, f).is_none());
}

#[test]
fn test_field_initializers() {
    let mut tree = SyntaxTree::new();
    let int = tree.type_ref("int");
    let f = tree.mk_call(None, "f", &[]);
    let field = tree.mk_field(Modifiers::empty(), int, "x", Some(f));
    let class = tree.mk_class(ClassKind::Class, "C", vec![field]);
    tree.add_root(class);

    let g = tree.mk_call(None, "g", &[]);
    let constant = tree.mk_field(Modifiers::STATIC, int, "Y", Some(g));
    let interface = tree.mk_class(ClassKind::Interface, "I", vec![constant]);
    tree.add_root(interface);

    assert!(matches!(
        classified(&tree, f),
        Surrounder::ExtractFieldInit(ref e) if e.field == field
    ));
    assert_eq!(context(&tree, f), ParentContext::Assignment);
    assert!(for_expression(&tree, g).is_none());
}

#[test]
fn test_enum_constant_arguments_need_a_type() {
    let mut tree = SyntaxTree::new();
    let typed = tree.mk_call(None, "f", &[]);
    let int = tree.type_ref("int");
    tree.set_expr_type(typed, Some(int));
    let a = tree.mk_enum_constant("A", &[typed]);
    let untyped = tree.mk_call(None, "g", &[]);
    let b = tree.mk_enum_constant("B", &[untyped]);
    let class = tree.mk_class(ClassKind::Enum, "E", vec![a, b]);
    tree.add_root(class);

    let options = SurroundOptions::default().with_anonymous_method_name("compute");
    let chosen = for_expression_with(&tree, typed, &options);
    assert!(matches!(
        chosen,
        Some(Surrounder::AnonymousCall(ref call))
            if call.method_name == "compute" && call.base_type == "Object" && call.ty == int
    ));
    assert!(for_expression(&tree, untyped).is_none());
}

#[test]
fn test_constructor_call_arguments() {
    let mut tree = SyntaxTree::new();
    let f = tree.mk_call(None, "f", &[]);
    let call = tree.alloc_expr(ExprKind::ConstructorCall {
        kind: ConstructorKind::Super,
        args: [f].into_iter().collect(),
    });
    let stmt = tree.mk_expr_stmt(call);
    in_method(&mut tree, vec![stmt]);

    assert!(for_expression(&tree, f).is_none());
    let relaxed = SurroundOptions::default().with_statements_before_super(true);
    assert!(matches!(
        for_expression_with(&tree, f, &relaxed),
        Some(Surrounder::NoOp(_))
    ));
}

#[test]
fn test_detached_expression_is_unsupported() {
    let mut tree = SyntaxTree::new();
    let x = tree.mk_name("x");
    let (stmt, _) = call_stmt(&mut tree, "foo", &[x]);
    let (_, body) = in_method(&mut tree, vec![stmt]);
    tree.remove_stmt(stmt);

    assert!(tree.block_stmts(body).is_empty());
    assert!(for_expression(&tree, x).is_none());
    assert!(!crate::can_surround(&tree, x));
}
