use super::ast::{BinaryOp, Expr, FieldPath, Literal};
use super::error::ParseError;
use super::lexer::{Token, TokenKind};

/// Recursive-descent parser over a token slice.
///
/// Each grammar production has its own method; precedence follows from the
/// order in which they call each other:
///
/// ```text
/// expression  := or_expr
/// or_expr     := and_expr ( OR and_expr )*
/// and_expr    := not_expr ( AND not_expr )*
/// not_expr    := NOT not_expr | comparison
/// comparison  := primary ( (EQUALS | CONTAINS) primary )?
/// primary     := IDENTIFIER | STRING | NUMBER | '(' expression ')'
/// ```
///
/// `comparison` does not chain: in `a = b = c` the second `=` is left
/// unconsumed and reported as an unexpected token.
///
/// Tree depth is capped at [`MAX_DEPTH`]. Each `(`, `not` and each extra
/// `and`/`or` in a chain counts as one level.
struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
    eof: Token,
}

/// Deepest expression tree the parser will build
pub const MAX_DEPTH: usize = 256;

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        // Callers may hand us a stream without the trailing Eof
        let end = tokens.last().map_or(0, |t| t.position);
        Self {
            tokens,
            position: 0,
            depth: 0,
            eof: Token {
                kind: TokenKind::Eof,
                position: end,
            },
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            found: token.kind.clone(),
            position: token.position,
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        let token = self.current();
        if token.kind != expected {
            return Err(ParseError::Expected {
                expected,
                found: token.kind.clone(),
                position: token.position,
            });
        }
        self.advance();
        Ok(())
    }

    /// Enter one more level of nesting at the current token
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_DEPTH,
                position: self.current().position,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_or()?;
        if self.current().kind != TokenKind::Eof {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let mut left = self.parse_and()?;
        while self.current().kind == TokenKind::Or {
            self.descend()?;
            self.advance();
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let mut left = self.parse_not()?;
        while self.current().kind == TokenKind::And {
            self.descend()?;
            self.advance();
            let right = self.parse_not()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.current().kind == TokenKind::Not {
            self.descend()?;
            self.advance();
            let operand = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::not(operand));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;

        let op = match self.current().kind {
            TokenKind::Equals => BinaryOp::Equals,
            TokenKind::Contains => BinaryOp::Contains,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_right_operand()?;
        Ok(Expr::binary(op, left, right))
    }

    /// Right side of `=` / `contains`: a bare word means its own text.
    fn parse_right_operand(&mut self) -> Result<Expr, ParseError> {
        if let TokenKind::Identifier(word) = &self.current().kind {
            let literal = Expr::Literal(Literal::String(word.clone()));
            self.advance();
            return Ok(literal);
        }

        Ok(match self.parse_primary()? {
            Expr::Field(path) => Expr::Literal(Literal::String(path.to_string())),
            other => other,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        let position = token.position;

        let expr = match &token.kind {
            TokenKind::LParen => {
                self.descend()?;
                self.advance();
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                return Ok(inner);
            }
            TokenKind::String(s) => Expr::Literal(Literal::String(s.clone())),
            TokenKind::Number(n) => Expr::Literal(Literal::Number(*n)),
            TokenKind::Identifier(name) => match FieldPath::parse(name) {
                Some(path) => Expr::Field(path),
                None => {
                    return Err(ParseError::InvalidFieldPath {
                        path: name.clone(),
                        position,
                    });
                }
            },
            _ => return Err(self.unexpected()),
        };

        self.advance();
        Ok(expr)
    }
}

/// Build an AST from a token stream produced by [`tokenize`](super::tokenize)
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}
