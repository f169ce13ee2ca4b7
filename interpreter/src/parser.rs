use ahash::AHashMap;
use botka_core::{Literal, Span, Token, Type};

use crate::ast::{Expr, INTERACTIVE};
use crate::error::Error;
use crate::limits::MAX_NESTING;

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,

    // Forms and groupings currently open, bounded by `max_nesting`
    depth: usize,
    max_nesting: usize,

    // Functions defined so far in this parse, name to declared parameter count
    functions: AHashMap<String, usize>,
}

// Helper alias for shorter return types
type ParserResult = Result<Expr, Vec<Error>>;
type BodyResult = Result<Vec<Expr>, Error>;
type ExprResult = Result<Expr, Error>;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
            max_nesting: MAX_NESTING,
            functions: AHashMap::new(),
        }
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parses the whole token sequence as a top-level form. Every malformed form is reported, but
    /// a single one fails the whole parse.
    pub fn parse(&mut self) -> ParserResult {
        if self.tokens.is_empty() {
            return Err(vec![Self::no_tokens()]);
        }

        let mut exprs = Vec::new();
        let mut errs = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            self.depth = 0;
            let res = if self.check(Type::LeftParen) {
                self.form_item()
            } else {
                Err(Error::parser_error(
                    self.peek(),
                    "expected '(' to start a form",
                ))
            };

            match res {
                Ok(expr) => exprs.push(expr),
                Err(err) => {
                    errs.push(err);
                    self.synchronize(start);
                }
            }
        }

        if errs.is_empty() {
            Ok(Expr::form(exprs))
        } else {
            Err(errs)
        }
    }

    /// Parses the tokens with the infix arithmetic grammar, e.g. `1 + 2 * 3 >= 7`.
    pub fn parse_expression(&mut self) -> ParserResult {
        if self.tokens.is_empty() {
            return Err(vec![Self::no_tokens()]);
        }

        self.depth = 0;
        let expr = self.equality().map_err(|err| vec![err])?;
        if !self.is_at_end() {
            return Err(vec![Error::parser_error(
                self.peek(),
                "expected end of expression",
            )]);
        }

        Ok(expr)
    }

    /// Declared parameter count of a function defined earlier in this parse.
    pub fn defined_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    fn no_tokens() -> Error {
        let eof = Token::new(Type::Eof, String::new(), 0, Span::default(), 0, Literal::Nil);
        Error::parser_error(&eof, "expected at least one token")
    }

    // Decides on the token right after '(' what kind of form follows
    fn form_item(&mut self) -> ExprResult {
        let next = self.peek_at(1);
        match next.ty {
            Type::Defun => self.defun(),
            Type::Identifier => self.call(),
            ty if ty.is_arithmetic() => self.call(),
            _ => Err(Error::parser_error(
                next,
                "not implemented: a form has to start with 'defun' or an operator name",
            )),
        }
    }

    fn body(&mut self) -> BodyResult {
        let mut exprs = Vec::new();
        while self.check(Type::LeftParen) {
            exprs.push(self.form_item()?);
        }
        Ok(exprs)
    }

    // Runs `parse` one level deeper, the recursion of every nested production goes through here
    fn nested(&mut self, parse: fn(&mut Self) -> ExprResult) -> ExprResult {
        if self.depth >= self.max_nesting {
            return Err(Error::parser_error(
                self.peek(),
                &format!(
                    "nesting too deep, at most {} levels are allowed",
                    self.max_nesting
                ),
            ));
        }

        self.depth += 1;
        let res = parse(self);
        self.depth -= 1;
        res
    }

    fn defun(&mut self) -> ExprResult {
        self.nested(Self::defun_form)
    }

    fn defun_form(&mut self) -> ExprResult {
        self.consume(Type::LeftParen, "expected '('")?;
        self.consume(Type::Defun, "expected 'defun'")?;
        let name = self
            .consume(Type::Identifier, "expected function name after 'defun'")?
            .clone();
        self.consume(Type::LeftParen, "expected '(' before parameters")?;

        let mut params: Vec<Token> = Vec::new();
        while self.match_one(Type::Identifier) {
            let param = self.previous();
            if param.lexeme == INTERACTIVE && !params.is_empty() {
                return Err(Error::parser_error(
                    param,
                    "interactive has to be the very first element of the form",
                ));
            }
            params.push(param.clone());
        }

        self.consume(Type::RightParen, "expected ')' after parameters")?;
        let body = self.body()?;
        self.consume(Type::RightParen, "expected ')' after function body")?;

        self.functions.insert(name.lexeme.clone(), params.len());
        Ok(Expr::defun(name, params, body))
    }

    fn call(&mut self) -> ExprResult {
        self.nested(Self::call_form)
    }

    fn call_form(&mut self) -> ExprResult {
        self.consume(Type::LeftParen, "expected '('")?;
        let operator = if self.check(Type::Identifier) || self.peek().ty.is_arithmetic() {
            self.advance().clone()
        } else {
            return Err(Error::parser_error(self.peek(), "expected an identifier"));
        };

        let mut args = Vec::new();
        while !self.check(Type::RightParen) && !self.is_at_end() {
            args.push(self.primary()?);
        }

        self.consume(Type::RightParen, "expected ')' after arguments")?;
        Ok(Expr::call(operator, args))
    }

    fn primary(&mut self) -> ExprResult {
        if self.match_one(Type::True) {
            Ok(Expr::literal(true))
        } else if self.match_one(Type::False) {
            Ok(Expr::literal(false))
        } else if self.match_one(Type::Nil) {
            Ok(Expr::nil())
        } else if self.match_either(&[Type::Number, Type::Integer, Type::String]) {
            Ok(Expr::literal(self.previous().value.clone()))
        } else if self.check(Type::LeftParen) {
            self.call()
        } else if self.match_one(Type::Identifier) {
            Ok(Expr::identifier(self.previous().clone()))
        } else if self.match_one(Type::Symbol) {
            Ok(Expr::symbol(self.previous().clone()))
        } else {
            Err(Error::parser_error(self.peek(), "expected expression"))
        }
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;
        while self.match_either(&[Type::BangEqual, Type::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.term()?;
        while self.match_either(&[
            Type::Greater,
            Type::GreaterEqual,
            Type::Less,
            Type::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;
        while self.match_either(&[Type::Plus, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;
        while self.match_either(&[Type::Slash, Type::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if self.match_either(&[Type::Bang, Type::Minus]) {
            let operator = self.previous().clone();
            Ok(Expr::unary(operator, self.nested(Self::unary)?))
        } else {
            self.atom()
        }
    }

    fn atom(&mut self) -> ExprResult {
        if self.check(Type::LeftParen) {
            self.nested(Self::grouping)
        } else {
            self.primary()
        }
    }

    fn grouping(&mut self) -> ExprResult {
        self.consume(Type::LeftParen, "expected '('")?;
        let expr = self.equality()?;
        self.consume(Type::RightParen, "expected ')' after expression")?;
        Ok(Expr::grouping(expr))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.peek().ty == Type::Eof
    }

    fn check(&self, ty: Type) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().ty == ty
        }
    }

    fn consume(&mut self, ty: Type, msg: &str) -> Result<&Token, Error> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(Error::parser_error(self.peek(), msg))
        }
    }

    // Skips the form that failed to parse, so the next top-level form can be parsed on its own
    fn synchronize(&mut self, start: usize) {
        self.current = start;

        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.advance().ty {
                Type::LeftParen => depth += 1,
                Type::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }

            if depth == 0 {
                return;
            }
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    // Looking past the end keeps returning the last token, which is the eof for scanned input
    fn peek_at(&self, distance: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + distance).min(last)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn match_either(&mut self, types: &[Type]) -> bool {
        for ty in types {
            if self.match_one(*ty) {
                // Already skipped in the `match_one`, just return result
                return true;
            }
        }

        false
    }

    fn match_one(&mut self, ty: Type) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }
}
