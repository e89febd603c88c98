use std::collections::VecDeque;

use crate::token::{Span, Token, TokenKind};

/// FIFO of scanned tokens with two tokens of lookahead.
///
/// Once the stream is drained, `peek` and `peek_next` keep returning the
/// end-of-stream token so rules never have to special-case exhaustion.
#[derive(Debug, Clone)]
pub struct TokenQueue {
    tokens: VecDeque<Token>,
    eos: Token,
}

impl TokenQueue {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eos = tokens
            .iter()
            .rev()
            .find(|token| token.kind == TokenKind::Eos)
            .cloned()
            .unwrap_or_else(|| {
                let span = tokens.last().map(Token::span).unwrap_or(Span::new(1, 1));
                Token::new(TokenKind::Eos, "$", span)
            });
        Self {
            tokens: tokens.into(),
            eos,
        }
    }

    pub fn peek(&self) -> &Token {
        self.tokens.front().unwrap_or(&self.eos)
    }

    pub fn peek_next(&self) -> &Token {
        self.tokens.get(1).unwrap_or(&self.eos)
    }

    pub fn dequeue(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| self.eos.clone())
    }

    /// Independent copy of the tokens not yet dequeued.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
