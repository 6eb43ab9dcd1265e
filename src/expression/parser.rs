use crate::expression::expr::{
    Expr,
    Function
};
use crate::expression::expressionerror::ExpressionError;
use crate::expression::lexer::{
    tokenize,
    Spanned,
    Token
};

// Grammar, lowest to highest binding:
//
//   sum     := product (("+" | "-") product)*
//   product := unary (("*" | "/") unary)*
//   unary   := ("-" | "+") unary | power
//   power   := primary ("**" unary)?
//   primary := number | name | name "(" sum ")" | "(" sum ")"
//
// Putting `unary` on the right of `**` makes power right-associative and
// lets `x**-1` through, while `-x**2` still reads as `-(x**2)`.
//
// Every operand and every chained operator counts one level towards
// MAX_DEPTH, so the tree handed back is never deeper than that and the
// recursive eval, Display and drop on it stay within the stack.

pub const MAX_DEPTH: usize = 256;

pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(spanned) => Err(unexpected(spanned))
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize
}

fn unexpected(spanned: &Spanned) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        token: spanned.token.to_string(),
        position: spanned.position,
    }
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|s| &s.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), ExpressionError> {
        match self.next() {
            Some(spanned) if &spanned.token == token => Ok(()),
            Some(spanned) => Err(unexpected(&spanned)),
            None => Err(ExpressionError::UnexpectedEnd)
        }
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let position = self
                .peek()
                .or_else(|| self.tokens.last())
                .map_or(0, |s| s.position);
            return Err(ExpressionError::TooDeep { limit: MAX_DEPTH, position });
        }
        Ok(())
    }

    fn sum(&mut self) -> Result<Expr, ExpressionError> {
        let depth = self.depth;
        let mut lhs = self.product()?;
        loop {
            if self.eat(&Token::Plus) {
                self.descend()?;
                lhs = lhs + self.product()?;
            } else if self.eat(&Token::Minus) {
                self.descend()?;
                lhs = lhs - self.product()?;
            } else {
                self.depth = depth;
                return Ok(lhs);
            }
        }
    }

    fn product(&mut self) -> Result<Expr, ExpressionError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                self.descend()?;
                lhs = lhs * self.unary()?;
            } else if self.eat(&Token::Slash) {
                self.descend()?;
                lhs = lhs / self.unary()?;
            } else {
                self.depth = depth;
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        self.descend()?;
        let expr = if self.eat(&Token::Minus) {
            -self.unary()?
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.primary()?;
        if self.eat(&Token::Power) {
            let exponent = self.unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let spanned = self.next().ok_or(ExpressionError::UnexpectedEnd)?;
        match spanned.token {
            Token::Number(value) => Ok(Expr::Const(value)),
            Token::LeftParen => {
                let inner = self.sum()?;
                self.expect(&Token::RightParen)?;
                Ok(inner)
            }
            Token::Identifier(name) => self.name(name),
            _ => Err(unexpected(&spanned))
        }
    }

    fn name(&mut self, name: String) -> Result<Expr, ExpressionError> {
        let is_call = self.peek().map(|s| &s.token) == Some(&Token::LeftParen);
        if is_call {
            let function = Function::from_name(&name)
                .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
            self.pos += 1;
            let arg = self.sum()?;
            self.expect(&Token::RightParen)?;
            return Ok(Expr::call(function, arg));
        }

        match name.as_str() {
            "x" => Ok(Expr::Var),
            "pi" => Ok(Expr::pi()),
            "E" | "e" => Ok(Expr::e()),
            _ if Function::from_name(&name).is_some() => match self.peek() {
                Some(spanned) => Err(unexpected(spanned)),
                None => Err(ExpressionError::UnexpectedEnd)
            },
            _ => Err(ExpressionError::UnknownSymbol(name))
        }
    }
}
