//! Abstract Syntax Tree node definitions
//!
//! The tree is closed: every consumer matches exhaustively over
//! [`Statement`] and [`Expression`]. Children are owned through `Box`/`Vec`
//! fields, never shared, and every node carries the [`Span`] it was parsed
//! from.

use core_types::Span;
use serde::Serialize;

/// Root of a parsed source text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Top-level statements in source order
    pub body: Vec<Statement>,
    /// Source location
    pub span: Span,
}

impl Program {
    /// Names declared by top-level `let`, `const` and `function` statements
    pub fn declared_names(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::LetDeclaration { name, .. }
                | Statement::ConstDeclaration { name, .. }
                | Statement::FunctionDeclaration { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Corten Script statements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    /// `let name: type = init`
    LetDeclaration {
        /// Declared name
        name: String,
        /// Optional type annotation
        type_annotation: Option<String>,
        /// Optional initializer
        init: Option<Expression>,
        /// Source location
        span: Span,
    },

    /// `const name: type = init`
    ConstDeclaration {
        /// Declared name
        name: String,
        /// Optional type annotation
        type_annotation: Option<String>,
        /// Initializer
        init: Expression,
        /// Source location
        span: Span,
    },

    /// Function declaration
    FunctionDeclaration {
        /// Function name
        name: String,
        /// Parameters
        params: Vec<Parameter>,
        /// Optional return type annotation
        return_type: Option<String>,
        /// Function body
        body: Vec<Statement>,
        /// Source location
        span: Span,
    },

    /// Block statement
    BlockStatement {
        /// Block body
        body: Vec<Statement>,
        /// Source location
        span: Span,
    },

    /// If statement
    IfStatement {
        /// Condition
        test: Expression,
        /// Consequent block
        consequent: Box<Statement>,
        /// Alternate block or chained `if`
        alternate: Option<Box<Statement>>,
        /// Source location
        span: Span,
    },

    /// While loop
    WhileStatement {
        /// Loop condition
        test: Expression,
        /// Loop body block
        body: Box<Statement>,
        /// Source location
        span: Span,
    },

    /// Return statement
    ReturnStatement {
        /// Return value
        argument: Option<Expression>,
        /// Source location
        span: Span,
    },

    /// Break statement
    BreakStatement {
        /// Source location
        span: Span,
    },

    /// Expression statement
    ExpressionStatement {
        /// The expression
        expression: Expression,
        /// Source location
        span: Span,
    },
}

impl Statement {
    /// Source location of the statement
    pub fn span(&self) -> Span {
        match self {
            Statement::LetDeclaration { span, .. }
            | Statement::ConstDeclaration { span, .. }
            | Statement::FunctionDeclaration { span, .. }
            | Statement::BlockStatement { span, .. }
            | Statement::IfStatement { span, .. }
            | Statement::WhileStatement { span, .. }
            | Statement::ReturnStatement { span, .. }
            | Statement::BreakStatement { span }
            | Statement::ExpressionStatement { span, .. } => *span,
        }
    }
}

/// A named parameter of a function or foreign code block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Optional type annotation
    pub type_annotation: Option<String>,
    /// Source location
    pub span: Span,
}

/// `key: value` entry of an object literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Property key (identifier or string key)
    pub key: String,
    /// Property value
    pub value: Expression,
    /// Source location
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Sub,
    /// *
    Mul,
    /// /
    Div,
    /// %
    Mod,
    /// ==
    Eq,
    /// !=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// &&
    And,
    /// ||
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    /// !
    Not,
    /// -
    Minus,
}

/// Corten Script expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expression {
    /// Identifier reference
    Identifier {
        /// Variable name
        name: String,
        /// Source location
        span: Span,
    },

    /// String or template literal
    StringLiteral {
        /// Literal value with escapes resolved
        value: String,
        /// Written with backticks
        template: bool,
        /// Source location
        span: Span,
    },

    /// Number literal
    NumberLiteral {
        /// Literal value
        value: f64,
        /// Source location
        span: Span,
    },

    /// `true` or `false`
    BooleanLiteral {
        /// Literal value
        value: bool,
        /// Source location
        span: Span,
    },

    /// Object literal
    ObjectLiteral {
        /// Properties in source order
        properties: Vec<Property>,
        /// Source location
        span: Span,
    },

    /// Array literal
    ArrayLiteral {
        /// Elements in source order
        elements: Vec<Expression>,
        /// Source location
        span: Span,
    },

    /// Function call
    CallExpression {
        /// Called expression
        callee: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
        /// Source location
        span: Span,
    },

    /// Property access (`object.property`)
    MemberExpression {
        /// Accessed object
        object: Box<Expression>,
        /// Property name
        property: String,
        /// Source location
        span: Span,
    },

    /// Index access (`object[index]`)
    IndexExpression {
        /// Indexed object
        object: Box<Expression>,
        /// Index expression
        index: Box<Expression>,
        /// Source location
        span: Span,
    },

    /// Assignment (`target = value`)
    AssignmentExpression {
        /// Identifier, member or index expression
        target: Box<Expression>,
        /// Assigned value
        value: Box<Expression>,
        /// Source location
        span: Span,
    },

    /// Binary operation
    BinaryExpression {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
        /// Source location
        span: Span,
    },

    /// Unary operation
    UnaryExpression {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        argument: Box<Expression>,
        /// Source location
        span: Span,
    },

    /// `embed(params) { raw body }`
    ForeignCodeBlock {
        /// Script values passed into the foreign code
        params: Vec<Parameter>,
        /// Text between the outer braces, byte for byte
        body: String,
        /// Location of `body` in the source
        body_span: Span,
        /// Source location
        span: Span,
    },

    /// `ai(arguments)`; evaluated by the runtime
    AIInvocationExpression {
        /// Arguments handed to the runtime
        arguments: Vec<Expression>,
        /// Source location
        span: Span,
    },
}

impl Expression {
    /// Source location of the expression
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier { span, .. }
            | Expression::StringLiteral { span, .. }
            | Expression::NumberLiteral { span, .. }
            | Expression::BooleanLiteral { span, .. }
            | Expression::ObjectLiteral { span, .. }
            | Expression::ArrayLiteral { span, .. }
            | Expression::CallExpression { span, .. }
            | Expression::MemberExpression { span, .. }
            | Expression::IndexExpression { span, .. }
            | Expression::AssignmentExpression { span, .. }
            | Expression::BinaryExpression { span, .. }
            | Expression::UnaryExpression { span, .. }
            | Expression::ForeignCodeBlock { span, .. }
            | Expression::AIInvocationExpression { span, .. } => *span,
        }
    }

    /// True for expressions that may appear left of `=`
    pub fn is_assignment_target(&self) -> bool {
        matches!(
            self,
            Expression::Identifier { .. }
                | Expression::MemberExpression { .. }
                | Expression::IndexExpression { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SourcePosition;

    fn span(start: usize, end: usize) -> Span {
        Span::new(
            SourcePosition::new(1, start as u32 + 1, start),
            SourcePosition::new(1, end as u32 + 1, end),
        )
    }

    #[test]
    fn test_statement_span() {
        let stmt = Statement::BreakStatement { span: span(0, 5) };
        assert_eq!(stmt.span(), span(0, 5));
    }

    #[test]
    fn test_assignment_targets() {
        let ident = Expression::Identifier {
            name: "x".to_string(),
            span: span(0, 1),
        };
        let literal = Expression::NumberLiteral {
            value: 1.0,
            span: span(0, 1),
        };
        assert!(ident.is_assignment_target());
        assert!(!literal.is_assignment_target());
    }

    #[test]
    fn test_declared_names() {
        let program = Program {
            body: vec![
                Statement::LetDeclaration {
                    name: "a".to_string(),
                    type_annotation: None,
                    init: None,
                    span: span(0, 5),
                },
                Statement::BreakStatement { span: span(6, 11) },
                Statement::FunctionDeclaration {
                    name: "f".to_string(),
                    params: vec![],
                    return_type: None,
                    body: vec![],
                    span: span(12, 30),
                },
            ],
            span: span(0, 30),
        };
        assert_eq!(program.declared_names(), vec!["a", "f"]);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let expr = Expression::BooleanLiteral {
            value: true,
            span: span(0, 4),
        };
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["kind"], "BooleanLiteral");
        assert_eq!(json["value"], true);
    }
}
