//! Single-line source rendering.
//!
//! Produces compact Java-like text for diagnostics, trace output and tests.
//! Statements inside blocks are separated by one space; parentheses appear
//! only where the tree has `Paren` nodes.

use crate::ast::{
    ClassKind, ConstructorKind, ExprKind, LambdaBody, Literal, Member, Modifiers, StmtKind,
    TypeRef,
};
use crate::{ClassId, CommentKind, ExprId, MemberId, Name, NodeId, StmtId, SyntaxTree};

impl SyntaxTree {
    pub fn print_expr(&self, id: ExprId) -> String {
        let mut p = Printer::new(self);
        p.expr(id);
        p.out
    }

    pub fn print_stmt(&self, id: StmtId) -> String {
        let mut p = Printer::new(self);
        p.stmt(id);
        p.out
    }

    pub fn print_member(&self, id: MemberId) -> String {
        let mut p = Printer::new(self);
        p.member(id);
        p.out
    }

    pub fn print_class(&self, id: ClassId) -> String {
        let mut p = Printer::new(self);
        p.class(id);
        p.out
    }

    pub fn print_node(&self, node: NodeId) -> String {
        match node {
            NodeId::Expr(id) => self.print_expr(id),
            NodeId::Stmt(id) => self.print_stmt(id),
            NodeId::Member(id) => self.print_member(id),
            NodeId::Class(id) => self.print_class(id),
        }
    }
}

struct Printer<'t> {
    tree: &'t SyntaxTree,
    out: String,
}

impl<'t> Printer<'t> {
    fn new(tree: &'t SyntaxTree) -> Self {
        Printer {
            tree,
            out: String::new(),
        }
    }

    fn word(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn name(&mut self, name: Name) {
        let tree = self.tree;
        self.out.push_str(tree.name_str(name));
    }

    fn ty(&mut self, ty: TypeRef) {
        match ty {
            TypeRef::Var => self.word("var"),
            TypeRef::Named(name) => self.name(name),
        }
    }

    fn modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::STATIC) {
            self.word("static ");
        }
        if modifiers.contains(Modifiers::FINAL) {
            self.word("final ");
        }
    }

    fn list(&mut self, items: &[ExprId]) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.expr(item);
        }
    }

    fn expr(&mut self, id: ExprId) {
        let tree = self.tree;
        match tree.expr_kind(id) {
            ExprKind::Literal(lit) => match *lit {
                Literal::Int(v) => self.word(&v.to_string()),
                Literal::Bool(v) => self.word(if v { "true" } else { "false" }),
                Literal::Char(c) => self.word(&format!("'{c}'")),
                Literal::Str(s) => {
                    self.word("\"");
                    self.name(s);
                    self.word("\"");
                }
                Literal::Null => self.word("null"),
            },
            ExprKind::Name(name) => self.name(*name),
            ExprKind::This => self.word("this"),
            ExprKind::FieldAccess { qualifier, name } => {
                self.expr(*qualifier);
                self.word(".");
                self.name(*name);
            }
            ExprKind::MethodCall {
                qualifier,
                name,
                args,
            } => {
                if let Some(q) = qualifier {
                    self.expr(*q);
                    self.word(".");
                }
                self.name(*name);
                self.word("(");
                self.list(args);
                self.word(")");
            }
            ExprKind::New { class, args, body } => {
                self.word("new ");
                self.name(*class);
                self.word("(");
                self.list(args);
                self.word(")");
                if let Some(body) = body {
                    self.word(" ");
                    self.class_body(*body);
                }
            }
            ExprKind::ConstructorCall { kind, args } => {
                self.word(match kind {
                    ConstructorKind::This => "this(",
                    ConstructorKind::Super => "super(",
                });
                self.list(args);
                self.word(")");
            }
            ExprKind::Unary { op, operand } => {
                if op.is_postfix() {
                    self.expr(*operand);
                    self.word(op.as_symbol());
                } else {
                    self.word(op.as_symbol());
                    self.expr(*operand);
                }
            }
            ExprKind::Polyadic { op, operands } => {
                for (i, &operand) in operands.iter().enumerate() {
                    if i > 0 {
                        self.word(" ");
                        self.word(op.as_symbol());
                        self.word(" ");
                    }
                    self.expr(operand);
                }
            }
            ExprKind::Assign { op, lhs, rhs } => {
                self.expr(*lhs);
                self.word(" ");
                self.word(&op.as_symbol());
                self.word(" ");
                self.expr(*rhs);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(*cond);
                self.word(" ? ");
                self.expr(*then_expr);
                self.word(" : ");
                self.expr(*else_expr);
            }
            ExprKind::Lambda { params, body, .. } => {
                if params.len() == 1 {
                    self.name(params[0]);
                } else {
                    self.word("(");
                    for (i, &p) in params.iter().enumerate() {
                        if i > 0 {
                            self.word(", ");
                        }
                        self.name(p);
                    }
                    self.word(")");
                }
                self.word(" -> ");
                match body {
                    LambdaBody::Expr(e) => self.expr(*e),
                    LambdaBody::Block(s) => self.stmt(*s),
                }
            }
            ExprKind::ArrayAccess { array, index } => {
                self.expr(*array);
                self.word("[");
                self.expr(*index);
                self.word("]");
            }
            ExprKind::Cast { ty, operand } => {
                self.word("(");
                self.name(*ty);
                self.word(") ");
                self.expr(*operand);
            }
            ExprKind::InstanceOf { operand, ty } => {
                self.expr(*operand);
                self.word(" instanceof ");
                self.name(*ty);
            }
            ExprKind::Paren(inner) => {
                self.word("(");
                self.expr(*inner);
                self.word(")");
            }
            ExprKind::SwitchExpr { selector, body } => {
                self.word("switch (");
                self.expr(*selector);
                self.word(") ");
                self.stmt(*body);
            }
        }
    }

    /// Declaration or expression statement without its `;`, as written in
    /// `for` initializers and resource lists.
    fn header_stmt(&mut self, id: StmtId) {
        let tree = self.tree;
        match tree.stmt_kind(id) {
            StmtKind::LocalVar {
                modifiers,
                ty,
                declarators,
            } => {
                self.modifiers(*modifiers);
                self.ty(*ty);
                for (i, d) in declarators.iter().enumerate() {
                    self.word(if i == 0 { " " } else { ", " });
                    self.name(d.name);
                    if let Some(init) = d.init {
                        self.word(" = ");
                        self.expr(init);
                    }
                }
            }
            StmtKind::Expr(e) => self.expr(*e),
            _ => self.stmt(id),
        }
    }

    fn stmt(&mut self, id: StmtId) {
        let tree = self.tree;
        let stmt = tree.stmt(id);
        for comment in &stmt.comments {
            match comment.kind {
                CommentKind::Line => self.word("//"),
                CommentKind::Block => self.word("/*"),
            }
            self.word(" ");
            self.name(comment.content);
            match comment.kind {
                CommentKind::Line => self.word("\n"),
                CommentKind::Block => self.word(" */ "),
            }
        }
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                if stmts.is_empty() {
                    self.word("{}");
                } else {
                    self.word("{ ");
                    for &s in stmts {
                        self.stmt(s);
                        self.word(" ");
                    }
                    self.word("}");
                }
            }
            StmtKind::Expr(_) | StmtKind::LocalVar { .. } => {
                self.header_stmt(id);
                self.word(";");
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.word("if (");
                self.expr(*cond);
                self.word(") ");
                self.stmt(*then_branch);
                if let Some(e) = else_branch {
                    self.word(" else ");
                    self.stmt(*e);
                }
            }
            StmtKind::While { cond, body } => {
                self.word("while (");
                self.expr(*cond);
                self.word(") ");
                self.stmt(*body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.word("do ");
                self.stmt(*body);
                self.word(" while (");
                self.expr(*cond);
                self.word(");");
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.word("for (");
                for (i, &s) in init.iter().enumerate() {
                    if i > 0 {
                        self.word(", ");
                    }
                    self.header_stmt(s);
                }
                self.word(";");
                if let Some(c) = cond {
                    self.word(" ");
                    self.expr(*c);
                }
                self.word(";");
                if !update.is_empty() {
                    self.word(" ");
                    self.list(update);
                }
                self.word(") ");
                self.stmt(*body);
            }
            StmtKind::Foreach {
                ty,
                name,
                iterable,
                body,
            } => {
                self.word("for (");
                self.ty(*ty);
                self.word(" ");
                self.name(*name);
                self.word(" : ");
                self.expr(*iterable);
                self.word(") ");
                self.stmt(*body);
            }
            StmtKind::Return(value) => {
                self.word("return");
                if let Some(v) = value {
                    self.word(" ");
                    self.expr(*v);
                }
                self.word(";");
            }
            StmtKind::Throw(value) => {
                self.word("throw ");
                self.expr(*value);
                self.word(";");
            }
            StmtKind::Yield(value) => {
                self.word("yield ");
                self.expr(*value);
                self.word(";");
            }
            StmtKind::Break(label) | StmtKind::Continue(label) => {
                self.word(if matches!(stmt.kind, StmtKind::Break(_)) {
                    "break"
                } else {
                    "continue"
                });
                if let Some(l) = label {
                    self.word(" ");
                    self.name(*l);
                }
                self.word(";");
            }
            StmtKind::Assert { cond, message } => {
                self.word("assert ");
                self.expr(*cond);
                if let Some(m) = message {
                    self.word(" : ");
                    self.expr(*m);
                }
                self.word(";");
            }
            StmtKind::Empty => self.word(";"),
            StmtKind::Labeled { label, body } => {
                self.name(*label);
                self.word(": ");
                self.stmt(*body);
            }
            StmtKind::Synchronized { lock, body } => {
                self.word("synchronized (");
                self.expr(*lock);
                self.word(") ");
                self.stmt(*body);
            }
            StmtKind::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                self.word("try ");
                if !resources.is_empty() {
                    self.word("(");
                    for (i, &r) in resources.iter().enumerate() {
                        if i > 0 {
                            self.word("; ");
                        }
                        self.header_stmt(r);
                    }
                    self.word(") ");
                }
                self.stmt(*block);
                for c in catches {
                    self.word(" catch (");
                    self.name(c.ty);
                    self.word(" ");
                    self.name(c.name);
                    self.word(") ");
                    self.stmt(c.body);
                }
                if let Some(f) = finally {
                    self.word(" finally ");
                    self.stmt(*f);
                }
            }
            StmtKind::Switch { selector, body, .. } => {
                self.word("switch (");
                self.expr(*selector);
                self.word(") ");
                self.stmt(*body);
            }
            StmtKind::CaseLabel { values } => {
                if values.is_empty() {
                    self.word("default:");
                } else {
                    self.word("case ");
                    self.list(values);
                    self.word(":");
                }
            }
            StmtKind::SwitchRule { values, body } => {
                if values.is_empty() {
                    self.word("default -> ");
                } else {
                    self.word("case ");
                    self.list(values);
                    self.word(" -> ");
                }
                self.stmt(*body);
            }
        }
    }

    fn member(&mut self, id: MemberId) {
        let tree = self.tree;
        match tree.member(id) {
            Member::Field {
                modifiers,
                ty,
                name,
                init,
            } => {
                self.modifiers(*modifiers);
                self.ty(*ty);
                self.word(" ");
                self.name(*name);
                if let Some(init) = init {
                    self.word(" = ");
                    self.expr(*init);
                }
                self.word(";");
            }
            Member::Method {
                modifiers,
                name,
                params,
                return_ty,
                body,
                constructor,
            } => {
                self.modifiers(*modifiers);
                if !constructor {
                    match return_ty {
                        Some(ty) => self.ty(*ty),
                        None => self.word("void"),
                    }
                    self.word(" ");
                }
                self.name(*name);
                self.word("(");
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        self.word(", ");
                    }
                    self.ty(p.ty);
                    self.word(" ");
                    self.name(p.name);
                }
                self.word(")");
                match body {
                    Some(body) => {
                        self.word(" ");
                        self.stmt(*body);
                    }
                    None => self.word(";"),
                }
            }
            Member::Initializer { is_static, body } => {
                if *is_static {
                    self.word("static ");
                }
                self.stmt(*body);
            }
            Member::EnumConstant { name, args } => {
                self.name(*name);
                if !args.is_empty() {
                    self.word("(");
                    self.list(args);
                    self.word(")");
                }
            }
        }
    }

    fn class(&mut self, id: ClassId) {
        let tree = self.tree;
        let decl = tree.class(id);
        self.word(match decl.kind {
            ClassKind::Class => "class ",
            ClassKind::Interface => "interface ",
            ClassKind::Enum => "enum ",
        });
        self.name(decl.name);
        self.word(" ");
        self.class_body(id);
    }

    fn class_body(&mut self, id: ClassId) {
        let tree = self.tree;
        let decl = tree.class(id);
        if decl.members.is_empty() {
            self.word("{}");
            return;
        }
        self.word("{ ");
        let (constants, others): (Vec<MemberId>, Vec<MemberId>) = decl
            .members
            .iter()
            .partition(|&&m| matches!(tree.member(m), Member::EnumConstant { .. }));
        if !constants.is_empty() {
            for (i, &c) in constants.iter().enumerate() {
                if i > 0 {
                    self.word(", ");
                }
                self.member(c);
            }
            self.word("; ");
        }
        for m in others {
            self.member(m);
            self.word(" ");
        }
        self.word("}");
    }
}
