//! Builds the program graph from a token sequence that already passed
//! validation.
//!
//! Statements are first read into a small tree and then lowered into the
//! [`Program`] arena, where every statement knows its successor:
//! the last statement of a loop body links back to the loop header, and the
//! last statement of each conditional branch links to whatever follows the
//! whole conditional.

use tracing::debug;

use crate::ast::{
    AssignValue, BinaryOperator, Element, Expression, FunctionCall, Operand, Program, Statement,
    StatementKind, StmtId, UnaryOperator,
};
use crate::token::{Token, TokenKind};
use crate::token_queue::TokenQueue;

use super::GraphError;

enum Node {
    Simple {
        line: usize,
        kind: StatementKind,
    },
    While {
        line: usize,
        condition: Expression,
        body: Vec<Node>,
    },
    If {
        line: usize,
        condition: Expression,
        then_body: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
}

impl Node {
    fn line(&self) -> usize {
        match self {
            Node::Simple { line, .. } | Node::While { line, .. } | Node::If { line, .. } => *line,
        }
    }
}

struct GraphBuilder {
    tokens: TokenQueue,
    statements: Vec<Statement>,
}

impl GraphBuilder {
    fn read_block(&mut self, terminator: TokenKind) -> Result<Vec<Node>, GraphError> {
        let mut nodes = Vec::new();
        while self.tokens.peek().kind != terminator {
            if self.tokens.peek().kind == TokenKind::Eos {
                return Err(GraphError::unexpected(
                    terminator.description(),
                    self.tokens.peek(),
                ));
            }
            if let Some(node) = self.read_statement()? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn read_statement(&mut self) -> Result<Option<Node>, GraphError> {
        let line = self.tokens.peek().span.line;
        let node = match self.tokens.peek().kind {
            TokenKind::Eoln => {
                self.tokens.dequeue();
                return Ok(None);
            }
            TokenKind::Pass => {
                self.tokens.dequeue();
                self.expect(TokenKind::Eoln)?;
                Node::Simple {
                    line,
                    kind: StatementKind::Pass,
                }
            }
            TokenKind::While => {
                self.tokens.dequeue();
                let condition = self.read_header()?;
                let body = self.read_body()?;
                Node::While {
                    line,
                    condition,
                    body,
                }
            }
            TokenKind::If | TokenKind::Elif => self.read_conditional(line)?,
            TokenKind::Asterisk => self.read_assignment(line)?,
            TokenKind::Identifier if self.tokens.peek_next().kind == TokenKind::Equal => {
                self.read_assignment(line)?
            }
            TokenKind::Identifier => {
                let call = self.read_function_call()?;
                self.expect(TokenKind::Eoln)?;
                Node::Simple {
                    line,
                    kind: StatementKind::FunctionCall(call),
                }
            }
            _ => return Err(GraphError::unexpected("statement", self.tokens.peek())),
        };
        Ok(Some(node))
    }

    /// Reads `if`/`elif` through the end of its else chain. An `elif` becomes
    /// a conditional nested as the sole statement of the else branch.
    fn read_conditional(&mut self, line: usize) -> Result<Node, GraphError> {
        self.tokens.dequeue();
        let condition = self.read_header()?;
        let then_body = self.read_body()?;
        let else_body = match self.tokens.peek().kind {
            TokenKind::Elif => {
                let line = self.tokens.peek().span.line;
                Some(vec![self.read_conditional(line)?])
            }
            TokenKind::Else => {
                self.tokens.dequeue();
                self.expect(TokenKind::Colon)?;
                self.expect(TokenKind::Eoln)?;
                Some(self.read_body()?)
            }
            _ => None,
        };
        Ok(Node::If {
            line,
            condition,
            then_body,
            else_body,
        })
    }

    fn read_header(&mut self) -> Result<Expression, GraphError> {
        let condition = self.read_expression()?;
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Eoln)?;
        Ok(condition)
    }

    fn read_body(&mut self) -> Result<Vec<Node>, GraphError> {
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Eoln)?;
        let body = self.read_block(TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Eoln)?;
        Ok(body)
    }

    fn read_assignment(&mut self, line: usize) -> Result<Node, GraphError> {
        let is_deref = self.tokens.peek().kind == TokenKind::Asterisk;
        if is_deref {
            self.tokens.dequeue();
        }
        let target = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Equal)?;
        let value = if self.tokens.peek().kind == TokenKind::Identifier
            && self.tokens.peek_next().kind == TokenKind::LParen
        {
            AssignValue::Call(self.read_function_call()?)
        } else {
            AssignValue::Expr(self.read_expression()?)
        };
        self.expect(TokenKind::Eoln)?;
        Ok(Node::Simple {
            line,
            kind: StatementKind::Assignment {
                target,
                is_deref,
                value,
            },
        })
    }

    fn read_function_call(&mut self) -> Result<FunctionCall, GraphError> {
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::LParen)?;
        let parameter = if self.tokens.peek().kind.is_element() {
            let token = self.tokens.dequeue();
            Some(element_from(&token)?)
        } else {
            None
        };
        self.expect(TokenKind::RParen)?;
        Ok(FunctionCall { name, parameter })
    }

    fn read_expression(&mut self) -> Result<Expression, GraphError> {
        let lhs = self.read_operand()?;
        let kind = self.tokens.peek().kind;
        if !kind.is_binary_operator() {
            return Ok(Expression::unary(lhs));
        }
        let token = self.tokens.dequeue();
        let op = binary_operator_from(&token)?;
        let rhs = self.read_operand()?;
        Ok(Expression::binary(lhs, op, rhs))
    }

    fn read_operand(&mut self) -> Result<Operand, GraphError> {
        let token = self.tokens.dequeue();
        let unary = match token.kind {
            TokenKind::Plus => UnaryOperator::Plus,
            TokenKind::Minus => UnaryOperator::Minus,
            TokenKind::Asterisk => UnaryOperator::Deref,
            TokenKind::Ampersand => UnaryOperator::AddressOf,
            _ => return Ok(Operand::plain(element_from(&token)?)),
        };

        let operand = self.tokens.dequeue();
        // A sign on a numeric literal is part of the literal.
        match (unary, operand.kind) {
            (UnaryOperator::Plus, TokenKind::IntLiteral) => {
                Ok(Operand::plain(Element::IntLiteral(operand.text)))
            }
            (UnaryOperator::Plus, TokenKind::RealLiteral) => {
                Ok(Operand::plain(Element::RealLiteral(operand.text)))
            }
            (UnaryOperator::Minus, TokenKind::IntLiteral) => Ok(Operand::plain(
                Element::IntLiteral(format!("-{}", operand.text)),
            )),
            (UnaryOperator::Minus, TokenKind::RealLiteral) => Ok(Operand::plain(
                Element::RealLiteral(format!("-{}", operand.text)),
            )),
            (_, TokenKind::Identifier) => Ok(Operand {
                unary: Some(unary),
                element: Element::Identifier(operand.text),
            }),
            _ => Err(GraphError::unexpected("identifier", &operand)),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, GraphError> {
        if self.tokens.peek().kind == kind {
            Ok(self.tokens.dequeue())
        } else {
            Err(GraphError::unexpected(kind.description(), self.tokens.peek()))
        }
    }

    /// Lowers `block` into the arena with `after` as the successor of its
    /// last statement. Returns the block's entry, or `after` when empty.
    fn lower_block(&mut self, block: Vec<Node>, after: Option<StmtId>) -> Option<StmtId> {
        let ids = block
            .iter()
            .map(|node| self.reserve(node.line()))
            .collect::<Vec<_>>();

        for (index, node) in block.into_iter().enumerate() {
            let id = ids[index];
            let next = ids.get(index + 1).copied().or(after);
            let kind = match node {
                Node::Simple { kind, .. } => kind,
                Node::While {
                    line,
                    condition,
                    body,
                } => {
                    let body = match self.lower_block(body, Some(id)) {
                        Some(entry) if entry != id => entry,
                        _ => self.push(line, StatementKind::Pass, Some(id)),
                    };
                    StatementKind::WhileLoop { condition, body }
                }
                Node::If {
                    line,
                    condition,
                    then_body,
                    else_body,
                } => {
                    let then_body = match self.lower_block(then_body, next) {
                        Some(entry) if Some(entry) != next => entry,
                        _ => self.push(line, StatementKind::Pass, next),
                    };
                    let else_body = else_body.and_then(|body| self.lower_block(body, next));
                    StatementKind::IfThenElse {
                        condition,
                        then_body,
                        else_body,
                    }
                }
            };
            let statement = &mut self.statements[id.0];
            statement.kind = kind;
            statement.next = next;
        }

        ids.first().copied().or(after)
    }

    fn reserve(&mut self, line: usize) -> StmtId {
        self.push(line, StatementKind::Pass, None)
    }

    fn push(&mut self, line: usize, kind: StatementKind, next: Option<StmtId>) -> StmtId {
        let id = StmtId(self.statements.len());
        self.statements.push(Statement { line, kind, next });
        id
    }
}

fn element_from(token: &Token) -> Result<Element, GraphError> {
    let element = match token.kind {
        TokenKind::Identifier => Element::Identifier(token.text.clone()),
        TokenKind::IntLiteral => Element::IntLiteral(token.text.clone()),
        TokenKind::RealLiteral => Element::RealLiteral(token.text.clone()),
        TokenKind::StrLiteral => Element::StrLiteral(token.text.clone()),
        TokenKind::True => Element::True,
        TokenKind::False => Element::False,
        TokenKind::None => Element::None,
        _ => return Err(GraphError::unexpected("element", token)),
    };
    Ok(element)
}

fn binary_operator_from(token: &Token) -> Result<BinaryOperator, GraphError> {
    let op = match token.kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Asterisk => BinaryOperator::Mul,
        TokenKind::Power => BinaryOperator::Pow,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::EqualEqual => BinaryOperator::Equal,
        TokenKind::NotEqual => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::LessThan,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::GreaterThan,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Is => BinaryOperator::Is,
        TokenKind::In => BinaryOperator::In,
        _ => return Err(GraphError::unexpected("operator", token)),
    };
    Ok(op)
}

/// Builds the program graph from a validated token queue.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build(tokens: TokenQueue) -> Result<Program, GraphError> {
    let mut builder = GraphBuilder {
        tokens,
        statements: Vec::new(),
    };
    let block = builder.read_block(TokenKind::Eos)?;
    let entry = builder.lower_block(block, None);
    debug!(statements = builder.statements.len(), "program graph built");
    Ok(Program {
        statements: builder.statements,
        entry,
    })
}
