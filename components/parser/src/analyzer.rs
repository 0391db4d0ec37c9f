//! Semantic analysis for Corten Script
//!
//! A single walk over the AST that resolves identifiers against a scope
//! stack, validates `return`/`break` placement and checks conditions whose
//! type is known statically. Problems accumulate as [`Diagnostic`]s; the walk
//! never stops early.

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::scope::{ScopeKind, ScopeStack};
use core_types::Span;
use tracing::{debug, instrument};

/// Analyze a program with no predeclared globals
#[instrument(level = "debug", skip(program), fields(statements = program.body.len()))]
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    let diagnostics = SemanticAnalyzer::new().analyze(program);
    debug!(diagnostics = diagnostics.len(), "analysis finished");
    diagnostics
}

/// Scope-aware checker over a parsed [`Program`]
pub struct SemanticAnalyzer {
    scopes: ScopeStack,
    /// Enclosing function bodies
    function_depth: usize,
    /// Enclosing loop bodies within the current function
    loop_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl SemanticAnalyzer {
    /// Create an analyzer with an empty global scope
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            function_depth: 0,
            loop_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Treat `globals` as declared in the global scope
    pub fn with_globals<I, S>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in globals {
            self.scopes.declare(name, None);
        }
        self
    }

    /// Walk the program and return every diagnostic in visitation order
    pub fn analyze(mut self, program: &Program) -> Vec<Diagnostic> {
        self.visit_statements(&program.body);
        self.diagnostics
    }

    fn visit_statements(&mut self, statements: &[Statement]) {
        // Functions are callable anywhere in their statement list
        for stmt in statements {
            if let Statement::FunctionDeclaration { name, .. } = stmt {
                self.scopes.declare(name.as_str(), None);
            }
        }

        for stmt in statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::LetDeclaration {
                name,
                type_annotation,
                init,
                ..
            } => {
                if let Some(init) = init {
                    self.visit_expression(init);
                }
                self.scopes.declare(name.as_str(), type_annotation.clone());
            }

            Statement::ConstDeclaration {
                name,
                type_annotation,
                init,
                ..
            } => {
                self.visit_expression(init);
                self.scopes.declare(name.as_str(), type_annotation.clone());
            }

            Statement::FunctionDeclaration {
                name, params, body, ..
            } => {
                self.scopes.declare(name.as_str(), None);
                self.visit_function(params, body);
            }

            Statement::BlockStatement { body, .. } => {
                self.scopes.push(ScopeKind::Block);
                self.visit_statements(body);
                self.leave_scope(ScopeKind::Block);
            }

            Statement::IfStatement { .. } => self.visit_if_chain(stmt),

            Statement::WhileStatement { test, body, .. } => {
                self.check_condition("while", test);
                self.visit_expression(test);
                self.loop_depth += 1;
                self.visit_body(ScopeKind::Loop, body);
                self.loop_depth -= 1;
            }

            Statement::ReturnStatement { argument, span } => {
                if self.function_depth == 0 {
                    self.report("return outside of function", *span);
                }
                if let Some(argument) = argument {
                    self.visit_expression(argument);
                }
            }

            Statement::BreakStatement { span } => {
                if self.loop_depth == 0 {
                    self.report("break outside of loop", *span);
                }
            }

            Statement::ExpressionStatement { expression, .. } => {
                self.visit_expression(expression);
            }
        }
    }

    /// `if` and its `else if` arms, one arm per iteration
    fn visit_if_chain(&mut self, mut stmt: &Statement) {
        while let Statement::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } = stmt
        {
            self.check_condition("if", test);
            self.visit_expression(test);
            self.visit_body(ScopeKind::Block, consequent);
            match alternate.as_deref() {
                Some(next) => stmt = next,
                None => return,
            }
        }
        self.visit_statement(stmt);
    }

    /// Visit a compound statement's body in one frame of the given kind
    fn visit_body(&mut self, kind: ScopeKind, body: &Statement) {
        self.scopes.push(kind);
        match body {
            Statement::BlockStatement { body, .. } => self.visit_statements(body),
            other => self.visit_statement(other),
        }
        self.leave_scope(kind);
    }

    fn leave_scope(&mut self, kind: ScopeKind) {
        debug_assert_eq!(self.scopes.current_kind(), kind, "unbalanced scope stack");
        self.scopes.pop();
    }

    fn visit_function(&mut self, params: &[Parameter], body: &[Statement]) {
        self.scopes.push(ScopeKind::Function);
        self.function_depth += 1;
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);

        for param in params {
            self.scopes
                .declare(param.name.as_str(), param.type_annotation.clone());
        }
        self.visit_statements(body);

        self.loop_depth = outer_loops;
        self.function_depth -= 1;
        self.leave_scope(ScopeKind::Function);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier { name, span } => self.resolve(name, *span),

            Expression::StringLiteral { .. }
            | Expression::NumberLiteral { .. }
            | Expression::BooleanLiteral { .. } => {}

            Expression::ObjectLiteral { properties, .. } => {
                for property in properties {
                    self.visit_expression(&property.value);
                }
            }

            Expression::ArrayLiteral { elements, .. } => {
                for element in elements {
                    self.visit_expression(element);
                }
            }

            Expression::CallExpression {
                callee, arguments, ..
            } => {
                self.visit_expression(callee);
                for arg in arguments {
                    self.visit_expression(arg);
                }
            }

            Expression::MemberExpression { object, .. } => self.visit_expression(object),

            Expression::IndexExpression { object, index, .. } => {
                self.visit_expression(object);
                self.visit_expression(index);
            }

            Expression::AssignmentExpression { target, value, .. } => {
                self.visit_expression(target);
                self.visit_expression(value);
            }

            Expression::BinaryExpression { left, right, .. } => {
                self.visit_expression(left);
                self.visit_expression(right);
            }

            Expression::UnaryExpression { argument, .. } => self.visit_expression(argument),

            // The body belongs to another language; only the values passed in are checked
            Expression::ForeignCodeBlock { params, .. } => {
                for param in params {
                    self.resolve(&param.name, param.span);
                }
            }

            Expression::AIInvocationExpression { arguments, .. } => {
                for arg in arguments {
                    self.visit_expression(arg);
                }
            }
        }
    }

    fn resolve(&mut self, name: &str, span: Span) {
        if self.scopes.lookup(name).is_none() {
            self.report(format!("'{}' is not defined", name), span);
        }
    }

    fn check_condition(&mut self, construct: &str, test: &Expression) {
        if let Some(ty) = self.static_type(test) {
            if ty != "boolean" {
                self.report(
                    format!("{} condition must be boolean, got {}", construct, ty),
                    test.span(),
                );
            }
        }
    }

    /// Type of `expr` when it is known without evaluation
    fn static_type(&self, expr: &Expression) -> Option<String> {
        match expr {
            Expression::StringLiteral { .. } => Some("text".to_string()),
            Expression::NumberLiteral { .. } => Some("number".to_string()),
            Expression::BooleanLiteral { .. } => Some("boolean".to_string()),
            Expression::Identifier { name, .. } => self
                .scopes
                .lookup(name)
                .and_then(|binding| binding.declared_type.clone())
                .filter(|ty| ty != "any"),
            _ => None,
        }
    }

    fn report(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
