//! Recursive-descent grammar validator.
//!
//! Each grammar rule maps to one method on [`Validator`]. Rules consume tokens
//! strictly left to right, choosing alternatives with at most two tokens of
//! lookahead, and never backtrack. The first violation aborts validation.
//!
//! ```text
//! program       ::= stmts EOS
//! stmts         ::= stmt [stmts]
//! stmt          ::= assignment | if_then_else | while_loop
//!                 | call_stmt | pass EOLN | EOLN
//! assignment    ::= ['*'] IDENTIFIER '=' value EOLN
//! call_stmt     ::= function_call EOLN
//! while_loop    ::= while expr ':' EOLN body
//! if_then_else  ::= if expr ':' EOLN body [else]
//! else          ::= elif expr ':' EOLN body [else] | else ':' EOLN body
//! body          ::= '{' EOLN stmts '}' EOLN
//! value         ::= function_call | expr
//! function_call ::= IDENTIFIER '(' [element] ')'
//! expr          ::= unary_expr [op unary_expr]
//! unary_expr    ::= '*' IDENTIFIER | '&' IDENTIFIER
//!                 | ('+' | '-') (IDENTIFIER | INT_LITERAL | REAL_LITERAL)
//!                 | element
//! element       ::= IDENTIFIER | INT_LITERAL | REAL_LITERAL | STR_LITERAL
//!                 | True | False | None
//! ```

use tracing::trace;

use crate::lexer;
use crate::token::TokenKind;
use crate::token_queue::TokenQueue;

mod error;
pub mod graph;

pub use error::{GraphError, SyntaxError};

pub struct Validator<'q> {
    tokens: &'q mut TokenQueue,
}

impl<'q> Validator<'q> {
    pub fn new(tokens: &'q mut TokenQueue) -> Self {
        Self { tokens }
    }

    pub fn validate_program(mut self) -> Result<(), SyntaxError> {
        self.parse_stmts()?;
        self.expect(TokenKind::Eos, "$")
    }

    fn parse_stmts(&mut self) -> Result<(), SyntaxError> {
        self.parse_stmt()?;
        while self.continues_stmts() {
            self.parse_stmt()?;
        }
        Ok(())
    }

    fn continues_stmts(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::Asterisk
                | TokenKind::Identifier
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Pass
                | TokenKind::Eoln
        )
    }

    fn parse_stmt(&mut self) -> Result<(), SyntaxError> {
        match (self.current(), self.tokens.peek_next().kind) {
            (TokenKind::Pass, _) => {
                self.expect(TokenKind::Pass, "pass")?;
                self.expect_eoln()
            }
            (TokenKind::Eoln, _) => self.expect_eoln(),
            (TokenKind::If, _) => self.parse_if_then_else(),
            (TokenKind::While, _) => self.parse_while_loop(),
            (TokenKind::Asterisk, _) | (TokenKind::Identifier, TokenKind::Equal) => {
                self.parse_assignment()
            }
            (TokenKind::Identifier, TokenKind::LParen) => self.parse_call_stmt(),
            (TokenKind::Identifier, _) => Err(self.error("assignment or function call")),
            _ => Err(self.error("start of a statement")),
        }
    }

    fn parse_assignment(&mut self) -> Result<(), SyntaxError> {
        if self.current() == TokenKind::Asterisk {
            self.expect(TokenKind::Asterisk, "*")?;
        }
        self.expect(TokenKind::Identifier, "identifier")?;
        self.expect(TokenKind::Equal, "=")?;
        self.parse_value()?;
        self.expect_eoln()
    }

    fn parse_call_stmt(&mut self) -> Result<(), SyntaxError> {
        self.parse_function_call()?;
        self.expect_eoln()
    }

    fn parse_while_loop(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::While, "while")?;
        self.parse_expr()?;
        self.expect(TokenKind::Colon, ":")?;
        self.expect_eoln()?;
        self.parse_body()
    }

    fn parse_if_then_else(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::If, "if")?;
        self.parse_expr()?;
        self.expect(TokenKind::Colon, ":")?;
        self.expect_eoln()?;
        self.parse_body()?;
        self.parse_optional_else()
    }

    fn parse_optional_else(&mut self) -> Result<(), SyntaxError> {
        match self.current() {
            TokenKind::Elif => {
                self.expect(TokenKind::Elif, "elif")?;
                self.parse_expr()?;
                self.expect(TokenKind::Colon, ":")?;
                self.expect_eoln()?;
                self.parse_body()?;
                self.parse_optional_else()
            }
            TokenKind::Else => {
                self.expect(TokenKind::Else, "else")?;
                self.expect(TokenKind::Colon, ":")?;
                self.expect_eoln()?;
                self.parse_body()
            }
            _ => Ok(()),
        }
    }

    fn parse_body(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::LBrace, "{")?;
        self.expect_eoln()?;
        self.parse_stmts()?;
        self.expect(TokenKind::RBrace, "}")?;
        self.expect_eoln()
    }

    fn parse_value(&mut self) -> Result<(), SyntaxError> {
        if self.current() == TokenKind::Identifier
            && self.tokens.peek_next().kind == TokenKind::LParen
        {
            self.parse_function_call()
        } else {
            self.parse_expr()
        }
    }

    fn parse_function_call(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Identifier, "identifier")?;
        self.expect(TokenKind::LParen, "(")?;
        if self.current().is_element() {
            self.parse_element()?;
        }
        self.expect(TokenKind::RParen, ")")
    }

    fn parse_expr(&mut self) -> Result<(), SyntaxError> {
        self.parse_unary_expr()?;
        if self.current().is_binary_operator() {
            self.parse_op()?;
            self.parse_unary_expr()?;
        }
        Ok(())
    }

    fn parse_op(&mut self) -> Result<(), SyntaxError> {
        let kind = self.current();
        if kind.is_binary_operator() {
            self.expect(kind, kind.description())
        } else {
            Err(self.error("operator"))
        }
    }

    fn parse_unary_expr(&mut self) -> Result<(), SyntaxError> {
        match self.current() {
            kind @ (TokenKind::Asterisk | TokenKind::Ampersand) => {
                self.expect(kind, kind.description())?;
                self.expect(TokenKind::Identifier, "identifier")
            }
            kind @ (TokenKind::Plus | TokenKind::Minus) => {
                self.expect(kind, kind.description())?;
                match self.current() {
                    operand @ (TokenKind::Identifier
                    | TokenKind::IntLiteral
                    | TokenKind::RealLiteral) => self.expect(operand, operand.description()),
                    _ => Err(self.error("identifier or numeric literal")),
                }
            }
            kind if kind.is_element() => self.parse_element(),
            _ => Err(self.error("unary expression")),
        }
    }

    fn parse_element(&mut self) -> Result<(), SyntaxError> {
        let kind = self.current();
        if kind.is_element() {
            self.expect(kind, kind.description())
        } else {
            Err(self.error("element"))
        }
    }

    fn expect_eoln(&mut self) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Eoln, "EOLN")
    }

    /// Consumes the current token if it has the expected kind; otherwise
    /// leaves the queue untouched and reports what was found instead.
    fn expect(&mut self, kind: TokenKind, expecting: &str) -> Result<(), SyntaxError> {
        if self.current() != kind {
            return Err(self.error(expecting));
        }
        let token = self.tokens.dequeue();
        trace!(kind = ?token.kind, text = %token.text, span = %token.span, "matched");
        Ok(())
    }

    fn current(&self) -> TokenKind {
        self.tokens.peek().kind
    }

    fn error(&self, expecting: &str) -> SyntaxError {
        SyntaxError::new(expecting, self.tokens.peek())
    }
}

/// Checks `tokens` against the grammar. On success the queue has been
/// drained through the end-of-stream token.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn validate(tokens: &mut TokenQueue) -> Result<(), SyntaxError> {
    Validator::new(tokens).validate_program()
}

/// Scans and validates `input`, returning the full token sequence for graph
/// building when the program is well formed.
pub fn parse(input: &str) -> Result<TokenQueue, SyntaxError> {
    let mut tokens = TokenQueue::new(lexer::tokenize(input));
    let duplicate = tokens.duplicate();
    validate(&mut tokens)?;
    Ok(duplicate)
}
