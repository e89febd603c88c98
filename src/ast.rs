//! Program graph: statements live in one flat arena and refer to their
//! successors by index, so the back-edge from a loop body to its header is
//! just another `StmtId`.

#[derive(Debug, PartialEq, Clone)]
pub enum Element {
    Identifier(String),
    IntLiteral(String),
    RealLiteral(String),
    StrLiteral(String),
    True,
    False,
    None,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Deref,
    AddressOf,
}

/// An element with an optional prefix operator, e.g. `-x` or `*p`.
#[derive(Debug, PartialEq, Clone)]
pub struct Operand {
    pub unary: Option<UnaryOperator>,
    pub element: Element,
}

impl Operand {
    pub fn plain(element: Element) -> Self {
        Self {
            unary: None,
            element,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Pow,
    Mod,
    Div,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Is,
    In,
}

impl BinaryOperator {
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessEqual
                | Self::GreaterThan
                | Self::GreaterEqual
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Pow => "**",
            Self::Mod => "%",
            Self::Div => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterEqual => ">=",
            Self::Is => "is",
            Self::In => "in",
        }
    }
}

/// `lhs` alone, or `lhs op rhs`. The grammar admits at most one operator.
#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub lhs: Operand,
    pub binary: Option<(BinaryOperator, Operand)>,
}

impl Expression {
    pub fn unary(lhs: Operand) -> Self {
        Self { lhs, binary: None }
    }

    pub fn binary(lhs: Operand, op: BinaryOperator, rhs: Operand) -> Self {
        Self {
            lhs,
            binary: Some((op, rhs)),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub parameter: Option<Element>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum AssignValue {
    Expr(Expression),
    Call(FunctionCall),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct StmtId(pub usize);

#[derive(Debug, PartialEq, Clone)]
pub enum StatementKind {
    Assignment {
        target: String,
        is_deref: bool,
        value: AssignValue,
    },
    FunctionCall(FunctionCall),
    WhileLoop {
        condition: Expression,
        body: StmtId,
    },
    IfThenElse {
        condition: Expression,
        then_body: StmtId,
        else_body: Option<StmtId>,
    },
    Pass,
}

impl StatementKind {
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::Assignment { .. } => "assignment",
            StatementKind::FunctionCall(_) => "function call",
            StatementKind::WhileLoop { .. } => "while loop",
            StatementKind::IfThenElse { .. } => "if/elif/else",
            StatementKind::Pass => "pass",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
    pub next: Option<StmtId>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub entry: Option<StmtId>,
}

impl Program {
    pub fn statement(&self, id: StmtId) -> Option<&Statement> {
        self.statements.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
