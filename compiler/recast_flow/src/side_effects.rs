//! Side-effect detection.
//!
//! An expression may have side effects when evaluating it can call code or
//! write memory: method calls, object creation, constructor calls,
//! assignments, increments and decrements, and switch expressions (whose
//! rule bodies are statements). Lambda bodies are not evaluated where the
//! lambda appears.

use recast_ir::ast::ExprKind;
use recast_ir::visitor::{walk_expr, Visitor};
use recast_ir::{ExprId, StmtId, SyntaxTree};

struct SideEffectFinder {
    found: bool,
}

impl<'t> Visitor<'t> for SideEffectFinder {
    fn visit_expr(&mut self, id: ExprId, tree: &'t SyntaxTree) {
        if self.found {
            return;
        }
        match tree.expr_kind(id) {
            ExprKind::MethodCall { .. }
            | ExprKind::New { .. }
            | ExprKind::ConstructorCall { .. }
            | ExprKind::Assign { .. }
            | ExprKind::SwitchExpr { .. } => self.found = true,
            ExprKind::Unary { op, .. } if op.is_update() => self.found = true,
            ExprKind::Lambda { .. } => {}
            _ => walk_expr(self, id, tree),
        }
    }

    fn visit_stmt(&mut self, _id: StmtId, _tree: &'t SyntaxTree) {}
}

pub fn may_have_side_effects(tree: &SyntaxTree, expr: ExprId) -> bool {
    let mut finder = SideEffectFinder { found: false };
    finder.visit_expr(expr, tree);
    finder.found
}
