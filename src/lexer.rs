use std::{iter::Peekable, str::CharIndices};

use crate::token::{Span, Token, TokenKind};

/// Character-level scanner.
///
/// Never fails: characters it cannot classify become `Unknown` tokens so the
/// grammar validator can report them with their position.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    eos_reached: bool,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            eos_reached: false,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> Token {
        if self.eos_reached {
            return Token::new(TokenKind::Eos, "$", self.span());
        }

        self.skip_whitespace_and_comments();

        let span = self.span();
        let (start, ch) = match self.chars.peek() {
            Some(&(idx, c)) => (idx, c),
            None => {
                self.eos_reached = true;
                return Token::new(TokenKind::Eos, "$", span);
            }
        };

        if ch.is_ascii_alphabetic() || ch == '_' {
            return self.read_word(start, span);
        }
        if ch.is_ascii_digit() {
            return self.read_number(start, span);
        }
        if ch == '"' || ch == '\'' {
            return self.read_string(ch, span);
        }

        self.advance_char();
        let kind = match ch {
            '\n' => return Token::new(TokenKind::Eoln, "EOLN", span),
            '$' => {
                self.eos_reached = true;
                return Token::new(TokenKind::Eos, "$", span);
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => {
                if self.eat('*') {
                    return Token::new(TokenKind::Power, "**", span);
                }
                TokenKind::Asterisk
            }
            '%' => TokenKind::Percent,
            '/' => TokenKind::Slash,
            '=' => {
                if self.eat('=') {
                    return Token::new(TokenKind::EqualEqual, "==", span);
                }
                TokenKind::Equal
            }
            '!' => {
                if self.eat('=') {
                    return Token::new(TokenKind::NotEqual, "!=", span);
                }
                TokenKind::Unknown
            }
            '<' => {
                if self.eat('=') {
                    return Token::new(TokenKind::LessEqual, "<=", span);
                }
                TokenKind::Less
            }
            '>' => {
                if self.eat('=') {
                    return Token::new(TokenKind::GreaterEqual, ">=", span);
                }
                TokenKind::Greater
            }
            '&' => TokenKind::Ampersand,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ':' => TokenKind::Colon,
            _ => TokenKind::Unknown,
        };
        Token::new(kind, ch.to_string(), span)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '#' {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance_char();
                }
            } else if c.is_whitespace() && c != '\n' {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self, start: usize, span: Span) -> Token {
        let mut end = start;
        while let Some(&(idx, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                end = idx + c.len_utf8();
                self.advance_char();
            } else {
                break;
            }
        }
        let text = &self.input[start..end];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, span)
    }

    fn read_number(&mut self, start: usize, span: Span) -> Token {
        let mut end = self.eat_digits(start);
        let mut kind = TokenKind::IntLiteral;

        if let Some(&(idx, '.')) = self.chars.peek() {
            self.advance_char();
            kind = TokenKind::RealLiteral;
            end = self.eat_digits(idx + 1);
        }

        if let Some(&(idx, 'e' | 'E')) = self.chars.peek() {
            // Only an exponent if digits follow, otherwise `e` starts an identifier.
            let rest = &self.input[idx + 1..];
            let sign_len = usize::from(rest.starts_with(['+', '-']));
            if rest[sign_len..].starts_with(|c: char| c.is_ascii_digit()) {
                self.advance_char();
                for _ in 0..sign_len {
                    self.advance_char();
                }
                kind = TokenKind::RealLiteral;
                end = self.eat_digits(idx + 1 + sign_len);
            }
        }

        Token::new(kind, &self.input[start..end], span)
    }

    fn eat_digits(&mut self, mut end: usize) -> usize {
        while let Some(&(idx, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                end = idx + 1;
                self.advance_char();
            } else {
                break;
            }
        }
        end
    }

    fn read_string(&mut self, quote: char, span: Span) -> Token {
        self.advance_char();
        let mut value = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == quote {
                self.advance_char();
                return Token::new(TokenKind::StrLiteral, value, span);
            }
            if c == '\n' {
                break;
            }
            value.push(c);
            self.advance_char();
        }
        let mut text = String::with_capacity(value.len() + 1);
        text.push(quote);
        text.push_str(&value);
        Token::new(TokenKind::Unknown, text, span)
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, c)) if c == expected) {
            self.advance_char();
            true
        } else {
            false
        }
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}

/// Scans the whole input. The result always ends with exactly one `Eos`.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eos = token.kind == TokenKind::Eos;
        tokens.push(token);
        if is_eos {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_simple_program() {
        let input = indoc! {"
            x = 5
            while x > 0 :
            {
              print(x)
            }
        "};
        let expected = vec![
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::IntLiteral,
            TokenKind::Eoln,
            TokenKind::While,
            TokenKind::Identifier,
            TokenKind::Greater,
            TokenKind::IntLiteral,
            TokenKind::Colon,
            TokenKind::Eoln,
            TokenKind::LBrace,
            TokenKind::Eoln,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::Eoln,
            TokenKind::RBrace,
            TokenKind::Eoln,
            TokenKind::Eos,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn scans_two_character_operators() {
        assert_eq!(
            kinds("** == != <= >= * = < >"),
            vec![
                TokenKind::Power,
                TokenKind::EqualEqual,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Asterisk,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eos,
            ]
        );
    }

    #[test]
    fn distinguishes_int_and_real_literals() {
        let tokens = tokenize("12 3.25 4. 1e3 2e");
        let summary = tokens
            .iter()
            .map(|token| (token.kind, token.text.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (TokenKind::IntLiteral, "12"),
                (TokenKind::RealLiteral, "3.25"),
                (TokenKind::RealLiteral, "4."),
                (TokenKind::RealLiteral, "1e3"),
                (TokenKind::IntLiteral, "2"),
                (TokenKind::Identifier, "e"),
                (TokenKind::Eos, "$"),
            ]
        );
    }

    #[test]
    fn string_literal_text_excludes_quotes() {
        let tokens = tokenize("s = 'hi there'\nt = \"x\"\n");
        assert_eq!(tokens[2].kind, TokenKind::StrLiteral);
        assert_eq!(tokens[2].text, "hi there");
        assert_eq!(tokens[6].text, "x");
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("True true None none"),
            vec![
                TokenKind::True,
                TokenKind::Identifier,
                TokenKind::None,
                TokenKind::Identifier,
                TokenKind::Eos,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = tokenize("x = 1\n  y = 2\n");
        assert_eq!(tokens[0].span, Span::new(1, 1));
        assert_eq!(tokens[2].span, Span::new(1, 5));
        assert_eq!(tokens[4].span, Span::new(2, 3));
        assert_eq!(tokens[6].span, Span::new(2, 7));
    }

    #[test]
    fn unknown_characters_become_tokens() {
        let tokens = tokenize("x = 1 @ 2\n");
        assert_eq!(tokens[3].kind, TokenKind::Unknown);
        assert_eq!(tokens[3].text, "@");
        assert_eq!(tokens[3].span, Span::new(1, 7));
    }

    #[test]
    fn unterminated_string_is_unknown() {
        let tokens = tokenize("x = 'abc\n");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].text, "'abc");
        assert_eq!(tokens[3].kind, TokenKind::Eoln);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("pass # nothing here\n"),
            vec![TokenKind::Pass, TokenKind::Eoln, TokenKind::Eos]
        );
    }

    #[test]
    fn dollar_ends_the_stream() {
        let tokens = tokenize("pass\n$\nthis is ignored\n");
        assert_eq!(
            tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![TokenKind::Pass, TokenKind::Eoln, TokenKind::Eos]
        );
    }
}
