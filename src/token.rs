use std::fmt;

/// Source position of a token, both components 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    RealLiteral,
    StrLiteral,

    // Keywords
    If,
    Elif,
    Else,
    While,
    Pass,
    True,
    False,
    None,
    Is,
    In,

    // Operators
    Plus,         // +
    Minus,        // -
    Asterisk,     // *
    Power,        // **
    Percent,      // %
    Slash,        // /
    EqualEqual,   // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Equal,        // =
    Ampersand,    // &

    // Delimiters
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Colon,  // :

    // Structural
    Eoln,
    Eos,
    Unknown,
}

impl TokenKind {
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "if" => Self::If,
            "elif" => Self::Elif,
            "else" => Self::Else,
            "while" => Self::While,
            "pass" => Self::Pass,
            "True" => Self::True,
            "False" => Self::False,
            "None" => Self::None,
            "is" => Self::Is,
            "in" => Self::In,
            _ => return None,
        };
        Some(kind)
    }

    /// Name used for this kind in "expecting ..." diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::IntLiteral => "int literal",
            Self::RealLiteral => "real literal",
            Self::StrLiteral => "string literal",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::Pass => "pass",
            Self::True => "True",
            Self::False => "False",
            Self::None => "None",
            Self::Is => "is",
            Self::In => "in",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Asterisk => "*",
            Self::Power => "**",
            Self::Percent => "%",
            Self::Slash => "/",
            Self::EqualEqual => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
            Self::Ampersand => "&",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Colon => ":",
            Self::Eoln => "EOLN",
            Self::Eos => "$",
            Self::Unknown => "unknown",
        }
    }

    /// True for the tokens that can stand alone as an operand.
    pub fn is_element(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntLiteral
                | Self::RealLiteral
                | Self::StrLiteral
                | Self::True
                | Self::False
                | Self::None
        )
    }

    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Minus
                | Self::Asterisk
                | Self::Power
                | Self::Percent
                | Self::Slash
                | Self::EqualEqual
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
                | Self::Is
                | Self::In
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
