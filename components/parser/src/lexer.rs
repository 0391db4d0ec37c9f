//! Corten Script lexer - tokenizes source code on demand
//!
//! The parser pulls tokens one at a time through [`Lexer::next_token`] and
//! [`Lexer::peek_token`]. Tokens are produced lazily so that the body of a
//! foreign code block can be captured verbatim with
//! [`Lexer::capture_foreign_body`] instead of being tokenized.

use core_types::{ErrorKind, ParseError, SourcePosition};
use std::fmt;

/// Corten Script keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// let keyword
    Let,
    /// const keyword
    Const,
    /// function keyword
    Function,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// return keyword
    Return,
    /// break keyword
    Break,
    /// true keyword
    True,
    /// false keyword
    False,
    /// embed keyword, introduces a foreign code block
    Embed,
    /// ai keyword, introduces an AI invocation
    Ai,
}

impl Keyword {
    /// Look up the keyword spelled by `word`
    pub fn from_word(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "embed" => Keyword::Embed,
            "ai" => Keyword::Ai,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Function => "function",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Embed => "embed",
            Keyword::Ai => "ai",
        }
    }

    /// Contextual keywords are plain identifiers unless followed by `(`
    pub fn is_contextual(&self) -> bool {
        matches!(self, Keyword::Embed | Keyword::Ai)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Comma
    Comma,
    /// Colon
    Colon,
    /// Semicolon
    Semicolon,
    /// Dot
    Dot,
    /// Assignment
    Assign,
    /// Equality
    EqEq,
    /// Inequality
    NotEq,
    /// Logical NOT
    Not,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Modulo
    Percent,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
}

impl Punctuator {
    /// Source spelling of the punctuator
    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Comma => ",",
            Punctuator::Colon => ":",
            Punctuator::Semicolon => ";",
            Punctuator::Dot => ".",
            Punctuator::Assign => "=",
            Punctuator::EqEq => "==",
            Punctuator::NotEq => "!=",
            Punctuator::Not => "!",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
        }
    }
}

impl fmt::Display for Punctuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind and payload of a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (variable name, type name, etc.)
    Identifier(String),
    /// Quoted string literal, escapes resolved
    String(String),
    /// Backtick template literal, escapes resolved
    Template(String),
    /// Number literal
    Number(f64),
    /// Keyword
    Keyword(Keyword),
    /// Punctuator/operator
    Punctuator(Punctuator),
    /// Verbatim body of a foreign code block (only produced by [`Lexer::tokenize`])
    ForeignBody(String),
    /// End of input
    EOF,
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// Raw source text of the token
    pub lexeme: String,
    /// Position of the first character
    pub position: SourcePosition,
    /// Position just past the last character
    pub end: SourcePosition,
    /// True if a line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    /// True if this token is the given punctuator
    pub fn is_punctuator(&self, p: Punctuator) -> bool {
        matches!(self.kind, TokenKind::Punctuator(x) if x == p)
    }

    /// True if this token is the given keyword
    pub fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(x) if x == k)
    }

    /// True if this token ends the input
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }

    /// Short human-readable description used in error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Template(_) => "template literal".to_string(),
            TokenKind::Number(_) => format!("number {}", self.lexeme),
            TokenKind::Keyword(k) => format!("keyword '{}'", k),
            TokenKind::Punctuator(p) => format!("'{}'", p),
            TokenKind::ForeignBody(_) => "foreign code".to_string(),
            TokenKind::EOF => "end of input".to_string(),
        }
    }
}

/// Saved lexer state for bounded lookahead
#[derive(Debug, Clone)]
pub struct Checkpoint {
    position: usize,
    offset: usize,
    line: u32,
    column: u32,
    peeked: Option<Token>,
}

/// Lexer for Corten Script source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    /// Index into `chars`
    position: usize,
    /// Byte offset matching `position`
    offset: usize,
    line: u32,
    column: u32,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            peeked: None,
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&mut self) -> Result<&Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Save the current state so it can be restored with [`Lexer::rewind`]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            offset: self.offset,
            line: self.line,
            column: self.column,
            peeked: self.peeked.clone(),
        }
    }

    /// Restore a state saved with [`Lexer::checkpoint`]
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.peeked = checkpoint.peeked;
    }

    /// Current position in the source
    pub fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.offset)
    }

    /// Tokenize the whole input, ending with an EOF token.
    ///
    /// The body of every `embed (..) { .. }` block is returned as a single
    /// [`TokenKind::ForeignBody`] token between its braces.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut state = EmbedState::Idle;

        loop {
            let token = self.next_token()?;
            let done = token.is_eof();
            state = state.advance(&token);
            let open = token.position;
            tokens.push(token);

            if state == EmbedState::BodyOpen {
                let (body, body_start, close) = self.capture_foreign_body(open)?;
                tokens.push(Token {
                    kind: TokenKind::ForeignBody(body.clone()),
                    lexeme: body,
                    position: body_start,
                    end: close.position,
                    newline_before: false,
                });
                tokens.push(close);
                state = EmbedState::Idle;
            }

            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Capture the raw body of a foreign code block.
    ///
    /// Must be called right after the opening `{` was consumed. Scans until
    /// the matching `}`; braces inside string and template literals and
    /// comments are not counted, and a backslash escapes the next character.
    /// Returns the verbatim body, its start position, and the closing brace
    /// token.
    pub fn capture_foreign_body(
        &mut self,
        open: SourcePosition,
    ) -> Result<(String, SourcePosition, Token), ParseError> {
        debug_assert!(self.peeked.is_none(), "foreign body captured after lookahead");
        self.peeked = None;

        let body_start = self.current_position();
        let mut depth = 1usize;

        while !self.is_at_end() {
            let ch = self.peek();
            match ch {
                '"' | '\'' => {
                    let start = self.current_position();
                    self.advance();
                    self.scan_string(ch, start)?;
                }
                '`' => {
                    let start = self.current_position();
                    self.advance();
                    self.scan_template(start)?;
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment()?,
                '\\' => {
                    self.advance();
                    if !self.is_at_end() {
                        self.advance();
                    }
                }
                '{' => {
                    depth += 1;
                    self.advance();
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = self.source[body_start.offset..self.offset].to_string();
                        let position = self.current_position();
                        self.advance();
                        let close = Token {
                            kind: TokenKind::Punctuator(Punctuator::RBrace),
                            lexeme: "}".to_string(),
                            position,
                            end: self.current_position(),
                            newline_before: position.line > body_start.line,
                        };
                        return Ok((body, body_start, close));
                    }
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }

        Err(ParseError::new(
            ErrorKind::Syntax,
            "Unterminated foreign code block",
            open,
        ))
    }

    fn scan_token(&mut self) -> Result<Token, ParseError> {
        let line_before = self.line;
        self.skip_whitespace_and_comments()?;
        let newline_before = self.line > line_before;

        let start = self.current_position();
        let start_index = self.position;

        if self.is_at_end() {
            return Ok(Token {
                kind: TokenKind::EOF,
                lexeme: String::new(),
                position: start,
                end: start,
                newline_before,
            });
        }

        let ch = self.advance();
        let kind = match ch {
            '(' => TokenKind::Punctuator(Punctuator::LParen),
            ')' => TokenKind::Punctuator(Punctuator::RParen),
            '{' => TokenKind::Punctuator(Punctuator::LBrace),
            '}' => TokenKind::Punctuator(Punctuator::RBrace),
            '[' => TokenKind::Punctuator(Punctuator::LBracket),
            ']' => TokenKind::Punctuator(Punctuator::RBracket),
            ',' => TokenKind::Punctuator(Punctuator::Comma),
            ':' => TokenKind::Punctuator(Punctuator::Colon),
            ';' => TokenKind::Punctuator(Punctuator::Semicolon),
            '.' => TokenKind::Punctuator(Punctuator::Dot),
            '+' => TokenKind::Punctuator(Punctuator::Plus),
            '-' => TokenKind::Punctuator(Punctuator::Minus),
            '*' => TokenKind::Punctuator(Punctuator::Star),
            '/' => TokenKind::Punctuator(Punctuator::Slash),
            '%' => TokenKind::Punctuator(Punctuator::Percent),

            '=' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::EqEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Assign)
                }
            }

            '!' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::NotEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Not)
                }
            }

            '<' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::LtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Lt)
                }
            }

            '>' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::GtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Gt)
                }
            }

            '&' if self.match_char('&') => TokenKind::Punctuator(Punctuator::AndAnd),
            '|' if self.match_char('|') => TokenKind::Punctuator(Punctuator::OrOr),

            '"' | '\'' => TokenKind::String(self.scan_string(ch, start)?),
            '`' => TokenKind::Template(self.scan_template(start)?),

            _ if ch.is_ascii_digit() => self.scan_number(start)?,
            _ if is_id_start(ch) => self.scan_identifier(start_index),

            _ => {
                return Err(ParseError::lex(
                    format!("Unexpected character '{}'", ch),
                    start,
                ))
            }
        };

        Ok(Token {
            kind,
            lexeme: self.source[start.offset..self.offset].to_string(),
            position: start,
            end: self.current_position(),
            newline_before,
        })
    }

    /// Scan a quoted string; the opening quote has been consumed
    fn scan_string(&mut self, quote: char, start: SourcePosition) -> Result<String, ParseError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                return Err(ParseError::lex("Unterminated string literal", start));
            }
            let ch = self.advance();
            if ch == quote {
                return Ok(value);
            }
            if ch == '\\' {
                if self.is_at_end() {
                    return Err(ParseError::lex("Unterminated string literal", start));
                }
                let escaped = self.advance();
                push_escape(&mut value, escaped);
            } else {
                value.push(ch);
            }
        }
    }

    /// Scan a template literal; the opening backtick has been consumed
    fn scan_template(&mut self, start: SourcePosition) -> Result<String, ParseError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(ParseError::lex("Unterminated template literal", start));
            }
            let ch = self.advance();
            match ch {
                '`' => return Ok(value),
                '\\' => {
                    if self.is_at_end() {
                        return Err(ParseError::lex("Unterminated template literal", start));
                    }
                    let escaped = self.advance();
                    push_escape(&mut value, escaped);
                }
                _ => value.push(ch),
            }
        }
    }

    fn scan_number(&mut self, start: SourcePosition) -> Result<TokenKind, ParseError> {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        // Fraction only when a digit follows the dot, so `1.foo` stays a member access
        if !self.is_at_end()
            && self.peek() == '.'
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = &self.source[start.offset..self.offset];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::lex(format!("Invalid number literal '{}'", text), start))
    }

    fn scan_identifier(&mut self, start_index: usize) -> TokenKind {
        while !self.is_at_end() && is_id_continue(self.peek()) {
            self.advance();
        }

        let word: String = self.chars[start_index..self.position].iter().collect();
        match Keyword::from_word(&word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(word),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        while !self.is_at_end() {
            match self.peek() {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(ParseError::lex("Unterminated block comment", start))
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars[self.position]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }
}

/// Tracks `embed ( names ) {` while tokenizing so the body can be captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmbedState {
    Idle,
    /// The next token is read as a name, so `embed` there is not a block
    Name,
    Keyword,
    Params,
    ParamsClosed,
    BodyOpen,
}

impl EmbedState {
    fn advance(self, token: &Token) -> EmbedState {
        let next = match (self, &token.kind) {
            (EmbedState::Keyword, TokenKind::Punctuator(Punctuator::LParen))
                if !token.newline_before =>
            {
                Some(EmbedState::Params)
            }
            (EmbedState::Params, TokenKind::Identifier(_))
            | (EmbedState::Params, TokenKind::Keyword(Keyword::Embed | Keyword::Ai))
            | (EmbedState::Params, TokenKind::Punctuator(Punctuator::Comma)) => {
                Some(EmbedState::Params)
            }
            (EmbedState::Params, TokenKind::Punctuator(Punctuator::RParen)) => {
                Some(EmbedState::ParamsClosed)
            }
            (EmbedState::ParamsClosed, TokenKind::Punctuator(Punctuator::LBrace)) => {
                Some(EmbedState::BodyOpen)
            }
            _ => None,
        };

        match next {
            Some(state) => state,
            None if token.is_punctuator(Punctuator::Dot)
                || token.is_keyword(Keyword::Function)
                || token.is_keyword(Keyword::Let)
                || token.is_keyword(Keyword::Const) =>
            {
                EmbedState::Name
            }
            // any other `embed` may open a new block
            None if token.is_keyword(Keyword::Embed) && self != EmbedState::Name => {
                EmbedState::Keyword
            }
            None => EmbedState::Idle,
        }
    }
}

fn push_escape(value: &mut String, escaped: char) {
    match escaped {
        'n' => value.push('\n'),
        't' => value.push('\t'),
        'r' => value.push('\r'),
        '0' => value.push('\0'),
        _ => value.push(escaped),
    }
}

fn is_id_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_id_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
