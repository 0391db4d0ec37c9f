//! Recursive descent parser for Corten Script
//!
//! The parser is fail-fast: the first structural problem is returned as a
//! [`ParseError`] and no partial tree is produced.

use crate::ast::*;
use crate::error::*;
use crate::lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
use core_types::{ParseError, SourcePosition, Span};
use tracing::{debug, instrument};

/// Default limit for [`ParserOptions::max_depth`].
///
/// Each nesting level costs several recursive-descent frames; this keeps the
/// deepest accepted input well inside a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Binary operator precedence levels, loosest first
const BINARY_LEVELS: &[&[(Punctuator, BinaryOperator)]] = &[
    &[(Punctuator::OrOr, BinaryOperator::Or)],
    &[(Punctuator::AndAnd, BinaryOperator::And)],
    &[
        (Punctuator::EqEq, BinaryOperator::Eq),
        (Punctuator::NotEq, BinaryOperator::NotEq),
    ],
    &[
        (Punctuator::Lt, BinaryOperator::Lt),
        (Punctuator::LtEq, BinaryOperator::LtEq),
        (Punctuator::Gt, BinaryOperator::Gt),
        (Punctuator::GtEq, BinaryOperator::GtEq),
    ],
    &[
        (Punctuator::Plus, BinaryOperator::Add),
        (Punctuator::Minus, BinaryOperator::Sub),
    ],
    &[
        (Punctuator::Star, BinaryOperator::Mul),
        (Punctuator::Slash, BinaryOperator::Div),
        (Punctuator::Percent, BinaryOperator::Mod),
    ],
];

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting of blocks, bracketed expressions, unary operands and
    /// assignment values before parsing fails
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse source text into a [`Program`] with default options
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with_options(source, ParserOptions::default())
}

/// Parse source text into a [`Program`]
#[instrument(level = "debug", skip(source), fields(bytes = source.len()))]
pub fn parse_with_options(source: &str, options: ParserOptions) -> Result<Program, ParseError> {
    let result = Parser::with_options(source, options).parse();
    match &result {
        Ok(program) => debug!(statements = program.body.len(), "parsed program"),
        Err(error) => debug!(%error, "parse failed"),
    }
    result
}

/// Corten Script parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    options: ParserOptions,
    /// Current nesting level
    depth: usize,
    /// End of the most recently consumed token
    last_end: SourcePosition,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Create a parser with explicit options
    pub fn with_options(source: &'a str, options: ParserOptions) -> Self {
        Self {
            lexer: Lexer::new(source),
            options,
            depth: 0,
            last_end: SourcePosition::START,
        }
    }

    /// Parse the source into a program
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();

        loop {
            self.skip_semicolons()?;
            if self.peek()?.is_eof() {
                break;
            }
            body.push(self.parse_statement()?);
        }

        let end = self.peek()?.position;
        Ok(Program {
            body,
            span: Span::new(SourcePosition::START, end),
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let token = self.peek()?.clone();

        match token.kind {
            TokenKind::Keyword(Keyword::Let) => self.parse_let_declaration(),
            TokenKind::Keyword(Keyword::Const) => self.parse_const_declaration(),
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break_statement(),
            TokenKind::Keyword(Keyword::Else) => Err(syntax_error(
                "'else' without preceding 'if'",
                token.position,
            )),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_brace_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_declaration(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let name = self.expect_binding_name("after 'let'")?.0;
        let type_annotation = self.parse_type_annotation()?;

        let init = if self.eat(Punctuator::Assign)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let span = self.span_from(start);
        self.consume_terminator()?;

        Ok(Statement::LetDeclaration {
            name,
            type_annotation,
            init,
            span,
        })
    }

    fn parse_const_declaration(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let name = self.expect_binding_name("after 'const'")?.0;
        let type_annotation = self.parse_type_annotation()?;

        if !self.eat(Punctuator::Assign)? {
            let position = self.peek()?.position;
            return Err(syntax_error(
                format!("Missing initializer in const declaration '{}'", name),
                position,
            ));
        }
        let init = self.parse_expression()?;

        let span = self.span_from(start);
        self.consume_terminator()?;

        Ok(Statement::ConstDeclaration {
            name,
            type_annotation,
            init,
            span,
        })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let name = self.expect_binding_name("after 'function'")?.0;

        self.expect(Punctuator::LParen, "to open parameter list")?;
        let params =
            self.parse_comma_list(Punctuator::RParen, "parameter list", |p| p.parse_parameter(true))?;
        let return_type = self.parse_type_annotation()?;

        if !self.check(Punctuator::LBrace)? {
            let token = self.peek()?.clone();
            return Err(unexpected_token("'{' to begin function body", &token));
        }
        let body = self.parse_block_body()?;

        Ok(Statement::FunctionDeclaration {
            name,
            params,
            return_type,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_parameter(&mut self, allow_type: bool) -> Result<Parameter, ParseError> {
        let (name, name_span) = self.expect_binding_name("in parameter list")?;
        let type_annotation = if allow_type {
            self.parse_type_annotation()?
        } else {
            None
        };

        Ok(Parameter {
            name,
            type_annotation,
            span: Span::new(name_span.start, self.last_end),
        })
    }

    fn parse_type_annotation(&mut self) -> Result<Option<String>, ParseError> {
        if !self.eat(Punctuator::Colon)? {
            return Ok(None);
        }

        let token = self.advance()?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(Some(name.clone())),
            _ => Err(unexpected_token("type name after ':'", &token)),
        }
    }

    /// `if` with any number of `else if` arms. The arms are read in a loop
    /// and folded into nested statements afterwards, so a long chain is
    /// neither nesting nor recursion.
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let test = self.parse_expression()?;
        let consequent = Box::new(self.parse_required_block("after if condition")?);

        let mut arms = Vec::new();
        let mut alternate = None;
        while self.peek()?.is_keyword(Keyword::Else) {
            self.advance()?;
            if !self.peek()?.is_keyword(Keyword::If) {
                alternate = Some(Box::new(self.parse_required_block("after 'else'")?));
                break;
            }
            let arm_start = self.advance()?.position;
            let arm_test = self.parse_expression()?;
            let arm_block = Box::new(self.parse_required_block("after if condition")?);
            arms.push((arm_start, arm_test, arm_block));
        }

        let end = self.last_end;
        while let Some((arm_start, arm_test, arm_block)) = arms.pop() {
            alternate = Some(Box::new(Statement::IfStatement {
                test: arm_test,
                consequent: arm_block,
                alternate,
                span: Span::new(arm_start, end),
            }));
        }

        Ok(Statement::IfStatement {
            test,
            consequent,
            alternate,
            span: Span::new(start, end),
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let test = self.parse_expression()?;
        let body = Box::new(self.parse_required_block("after while condition")?);

        Ok(Statement::WhileStatement {
            test,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;

        // The argument must start on the same line as `return`
        let bare = {
            let token = self.peek()?;
            token.newline_before
                || token.is_eof()
                || token.is_punctuator(Punctuator::RBrace)
                || token.is_punctuator(Punctuator::Semicolon)
        };
        let argument = if bare {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let span = self.span_from(start);
        self.consume_terminator()?;

        Ok(Statement::ReturnStatement { argument, span })
    }

    fn parse_break_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.advance()?.position;
        let span = self.span_from(start);
        self.consume_terminator()?;
        Ok(Statement::BreakStatement { span })
    }

    /// `{` at statement position: object literal if it opens with `key:`,
    /// block otherwise
    fn parse_brace_statement(&mut self) -> Result<Statement, ParseError> {
        if self.brace_opens_object()? {
            self.parse_expression_statement()
        } else {
            self.parse_block_statement()
        }
    }

    fn brace_opens_object(&mut self) -> Result<bool, ParseError> {
        let checkpoint = self.lexer.checkpoint();
        let result = self.scan_object_key();
        self.lexer.rewind(checkpoint);
        result
    }

    fn scan_object_key(&mut self) -> Result<bool, ParseError> {
        self.lexer.next_token()?; // {
        let key = self.lexer.next_token()?;
        if !is_property_key(&key) {
            return Ok(false);
        }
        Ok(self.lexer.next_token()?.is_punctuator(Punctuator::Colon))
    }

    fn parse_block_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.peek()?.position;
        let body = self.parse_block_body()?;
        Ok(Statement::BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_required_block(&mut self, context: &str) -> Result<Statement, ParseError> {
        if !self.check(Punctuator::LBrace)? {
            let token = self.peek()?.clone();
            return Err(unexpected_token(&format!("'{{' {}", context), &token));
        }
        self.parse_block_statement()
    }

    /// Parse `{ statement* }`
    fn parse_block_body(&mut self) -> Result<Vec<Statement>, ParseError> {
        let open = self.expect(Punctuator::LBrace, "to open block")?;
        self.nested(|p| p.parse_block_statements(open.position))
    }

    fn parse_block_statements(&mut self, open: SourcePosition) -> Result<Vec<Statement>, ParseError> {
        let mut body = Vec::new();

        loop {
            self.skip_semicolons()?;
            let token = self.peek()?;
            if token.is_punctuator(Punctuator::RBrace) {
                break;
            }
            if token.is_eof() {
                return Err(syntax_error(
                    format!(
                        "Expected '}}' to close the block opened at {}, found end of input",
                        open
                    ),
                    token.position,
                ));
            }
            body.push(self.parse_statement()?);
        }

        self.advance()?;
        Ok(body)
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.peek()?.position;
        let expression = self.parse_expression()?;
        let span = self.span_from(start);
        self.consume_terminator()?;
        Ok(Statement::ExpressionStatement { expression, span })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Result<Expression, ParseError> {
        let target = self.parse_binary_expression(0)?;
        if !self.check(Punctuator::Assign)? {
            return Ok(target);
        }

        if !target.is_assignment_target() {
            return Err(syntax_error("Invalid assignment target", target.span().start));
        }
        self.advance()?;
        let value = self.nested(Self::parse_expression)?;

        Ok(Expression::AssignmentExpression {
            span: target.span().to(value.span()),
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// Precedence climbing: only operators at `min_level` or tighter are
    /// consumed here, looser ones are left to the caller
    fn parse_binary_expression(&mut self, min_level: usize) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary_expression()?;

        while let Some((level, operator)) = self.peek_binary_operator(min_level)? {
            self.advance()?;
            let right = self.parse_binary_expression(level + 1)?;
            left = Expression::BinaryExpression {
                operator,
                span: left.span().to(right.span()),
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn peek_binary_operator(
        &mut self,
        min_level: usize,
    ) -> Result<Option<(usize, BinaryOperator)>, ParseError> {
        let token = self.peek()?;
        Ok(BINARY_LEVELS
            .iter()
            .enumerate()
            .skip(min_level)
            .find_map(|(level, operators)| {
                operators
                    .iter()
                    .find(|(p, _)| token.is_punctuator(*p))
                    .map(|(_, op)| (level, *op))
            }))
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, ParseError> {
        let operator = match self.peek()?.kind {
            TokenKind::Punctuator(Punctuator::Not) => Some(UnaryOperator::Not),
            TokenKind::Punctuator(Punctuator::Minus) => Some(UnaryOperator::Minus),
            _ => None,
        };
        let Some(operator) = operator else {
            return self.parse_postfix_expression();
        };
        let start = self.advance()?.position;

        let argument = self.nested(Self::parse_unary_expression)?;

        Ok(Expression::UnaryExpression {
            operator,
            span: Span::new(start, argument.span().end),
            argument: Box::new(argument),
        })
    }

    fn parse_postfix_expression(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.parse_primary_expression()?;

        loop {
            let (kind, same_line) = {
                let token = self.peek()?;
                (token.kind.clone(), !token.newline_before)
            };
            let start = expression.span().start;

            match kind {
                // A call or index on the next line starts a new statement instead
                TokenKind::Punctuator(Punctuator::LParen) if same_line => {
                    self.advance()?;
                    let arguments = self.nested(|p| {
                        p.parse_comma_list(Punctuator::RParen, "argument list", Self::parse_expression)
                    })?;
                    expression = Expression::CallExpression {
                        callee: Box::new(expression),
                        arguments,
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punctuator(Punctuator::LBracket) if same_line => {
                    self.advance()?;
                    let index = self.nested(Self::parse_expression)?;
                    self.expect(Punctuator::RBracket, "to close index expression")?;
                    expression = Expression::IndexExpression {
                        object: Box::new(expression),
                        index: Box::new(index),
                        span: self.span_from(start),
                    };
                }
                TokenKind::Punctuator(Punctuator::Dot) => {
                    self.advance()?;
                    let property = self.expect_property_name()?;
                    expression = Expression::MemberExpression {
                        object: Box::new(expression),
                        property,
                        span: self.span_from(start),
                    };
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    /// Bracketed forms nest, so they are dispatched from this small frame
    /// and leaf tokens are handled by [`Self::parse_atom`]
    fn parse_primary_expression(&mut self) -> Result<Expression, ParseError> {
        let opener = match self.peek()?.kind {
            TokenKind::Punctuator(
                p @ (Punctuator::LParen | Punctuator::LBracket | Punctuator::LBrace),
            ) => Some(p),
            _ => None,
        };
        let Some(opener) = opener else {
            return self.parse_atom();
        };
        let start = self.advance()?.position;

        match opener {
            Punctuator::LParen => self.nested(|p| p.parse_parenthesized_expression(start)),
            Punctuator::LBracket => {
                let elements = self.nested(|p| {
                    p.parse_comma_list(Punctuator::RBracket, "array literal", Self::parse_expression)
                })?;
                Ok(Expression::ArrayLiteral {
                    elements,
                    span: self.span_from(start),
                })
            }
            _ => {
                let properties = self.nested(|p| {
                    p.parse_comma_list(Punctuator::RBrace, "object literal", Self::parse_property)
                })?;
                Ok(Expression::ObjectLiteral {
                    properties,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        let token = self.advance()?;
        let position = token.position;
        let span = Span::new(token.position, token.end);

        match token.kind {
            TokenKind::Identifier(name) => Ok(Expression::Identifier { name, span }),
            TokenKind::String(value) => Ok(Expression::StringLiteral {
                value,
                template: false,
                span,
            }),
            TokenKind::Template(value) => Ok(Expression::StringLiteral {
                value,
                template: true,
                span,
            }),
            TokenKind::Number(value) => Ok(Expression::NumberLiteral { value, span }),
            TokenKind::Keyword(Keyword::True) => Ok(Expression::BooleanLiteral { value: true, span }),
            TokenKind::Keyword(Keyword::False) => Ok(Expression::BooleanLiteral {
                value: false,
                span,
            }),
            TokenKind::Keyword(keyword @ (Keyword::Embed | Keyword::Ai)) => {
                if !self.opens_argument_list()? {
                    return Ok(Expression::Identifier {
                        name: keyword.as_str().to_string(),
                        span,
                    });
                }
                if keyword == Keyword::Embed {
                    self.parse_foreign_code_block(position)
                } else {
                    self.parse_ai_invocation(position)
                }
            }
            TokenKind::Keyword(keyword) => Err(syntax_error(
                format!("Unexpected keyword '{}' in expression", keyword),
                position,
            )),
            TokenKind::Punctuator(punctuator) => Err(syntax_error(
                format!("Unexpected token '{}'", punctuator),
                position,
            )),
            TokenKind::ForeignBody(_) => Err(syntax_error("Unexpected foreign code", position)),
            TokenKind::EOF => Err(syntax_error("Unexpected end of input", position)),
        }
    }

    fn parse_parenthesized_expression(
        &mut self,
        start: SourcePosition,
    ) -> Result<Expression, ParseError> {
        if self.check(Punctuator::RParen)? {
            return Err(syntax_error("Empty parenthesized expression", start));
        }
        let expression = self.parse_expression()?;
        self.expect(Punctuator::RParen, "to close parenthesized expression")?;
        Ok(expression)
    }

    fn parse_property(&mut self) -> Result<Property, ParseError> {
        let token = self.advance()?;
        let key = match &token.kind {
            TokenKind::Identifier(name) | TokenKind::String(name) => name.clone(),
            TokenKind::Keyword(keyword) if keyword.is_contextual() => keyword.as_str().to_string(),
            _ => return Err(unexpected_token("property key", &token)),
        };

        self.expect(Punctuator::Colon, "after property key")?;
        let value = self.parse_expression()?;

        Ok(Property {
            key,
            value,
            span: self.span_from(token.position),
        })
    }

    /// `embed` has been consumed and `(` is next
    fn parse_foreign_code_block(&mut self, start: SourcePosition) -> Result<Expression, ParseError> {
        self.advance()?; // (
        let params = self.parse_comma_list(
            Punctuator::RParen,
            "foreign code parameter list",
            |p| p.parse_parameter(false),
        )?;

        // Nothing may be peeked past `{`: the body is raw text, not tokens
        let open = self.expect(Punctuator::LBrace, "to open foreign code block")?;
        let (body, body_start, close) = self.lexer.capture_foreign_body(open.position)?;
        self.last_end = close.end;

        Ok(Expression::ForeignCodeBlock {
            params,
            body,
            body_span: Span::new(body_start, close.position),
            span: Span::new(start, close.end),
        })
    }

    /// `ai` has been consumed and `(` is next
    fn parse_ai_invocation(&mut self, start: SourcePosition) -> Result<Expression, ParseError> {
        self.advance()?; // (
        let arguments = self.nested(|p| {
            p.parse_comma_list(Punctuator::RParen, "ai argument list", Self::parse_expression)
        })?;
        if arguments.is_empty() {
            return Err(syntax_error(
                "AI invocation requires at least one argument",
                start,
            ));
        }

        Ok(Expression::AIInvocationExpression {
            arguments,
            span: self.span_from(start),
        })
    }

    /// Parse items separated by commas up to `close`; the opening delimiter
    /// has been consumed. Leading, doubled and trailing commas are rejected.
    fn parse_comma_list<T>(
        &mut self,
        close: Punctuator,
        what: &str,
        mut parse_item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        if self.eat(close)? {
            return Ok(items);
        }

        loop {
            if self.check(Punctuator::Comma)? {
                let comma = self.advance()?;
                let message = if items.is_empty() {
                    format!("Unexpected ',' at start of {}", what)
                } else {
                    format!("Unexpected ',' in {}: missing item between commas", what)
                };
                return Err(syntax_error(message, comma.position));
            }

            items.push(parse_item(self)?);

            if self.check(Punctuator::Comma)? {
                let comma = self.advance()?;
                if self.check(close)? {
                    return Err(syntax_error(
                        format!("Trailing ',' in {}", what),
                        comma.position,
                    ));
                }
                continue;
            }

            self.expect(close, &format!("to close {}", what))?;
            return Ok(items);
        }
    }

    // Helper methods

    fn peek(&mut self) -> Result<&Token, ParseError> {
        self.lexer.peek_token()
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.lexer.next_token()?;
        self.last_end = token.end;
        Ok(token)
    }

    fn check(&mut self, p: Punctuator) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_punctuator(p))
    }

    fn eat(&mut self, p: Punctuator) -> Result<bool, ParseError> {
        if self.check(p)? {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, p: Punctuator, context: &str) -> Result<Token, ParseError> {
        let token = self.advance()?;
        if token.is_punctuator(p) {
            return Ok(token);
        }
        Err(unexpected_token(&format!("'{}' {}", p, context), &token))
    }

    /// `(` directly after a contextual keyword, on the same line
    fn opens_argument_list(&mut self) -> Result<bool, ParseError> {
        let token = self.peek()?;
        Ok(token.is_punctuator(Punctuator::LParen) && !token.newline_before)
    }

    fn expect_binding_name(&mut self, context: &str) -> Result<(String, Span), ParseError> {
        let token = self.advance()?;
        let span = Span::new(token.position, token.end);
        match &token.kind {
            TokenKind::Identifier(name) => Ok((name.clone(), span)),
            TokenKind::Keyword(keyword) if keyword.is_contextual() => {
                Ok((keyword.as_str().to_string(), span))
            }
            TokenKind::Keyword(keyword) => Err(syntax_error(
                format!(
                    "Expected identifier {}, found reserved keyword '{}'",
                    context, keyword
                ),
                token.position,
            )),
            _ => Err(unexpected_token(&format!("identifier {}", context), &token)),
        }
    }

    /// Any identifier or keyword may follow `.`
    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let token = self.advance()?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(name.clone()),
            TokenKind::Keyword(keyword) => Ok(keyword.as_str().to_string()),
            _ => Err(unexpected_token("property name after '.'", &token)),
        }
    }

    /// Statements end at `;`, a line break, `}` or end of input
    fn consume_terminator(&mut self) -> Result<(), ParseError> {
        let (semicolon, ended) = {
            let token = self.peek()?;
            (
                token.is_punctuator(Punctuator::Semicolon),
                token.newline_before || token.is_eof() || token.is_punctuator(Punctuator::RBrace),
            )
        };

        if semicolon {
            self.advance()?;
        } else if !ended {
            let token = self.peek()?.clone();
            return Err(unexpected_token("';' or line break after statement", &token));
        }
        Ok(())
    }

    fn skip_semicolons(&mut self) -> Result<(), ParseError> {
        while self.eat(Punctuator::Semicolon)? {}
        Ok(())
    }

    fn span_from(&self, start: SourcePosition) -> Span {
        Span::new(start, self.last_end)
    }

    /// Run `parse` one nesting level deeper
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.options.max_depth {
            let position = self.peek()?.position;
            return Err(nesting_limit(self.options.max_depth, position));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}

fn is_property_key(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Identifier(_) | TokenKind::String(_) => true,
        TokenKind::Keyword(keyword) => keyword.is_contextual(),
        _ => false,
    }
}
