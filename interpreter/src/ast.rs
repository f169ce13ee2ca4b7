use botka_core::{Literal, Token, Type};

// Tokens are cloned into the nodes during parsing, the tree owns everything it refers to and
// outlives the interpreter evaluating it.

pub const INTERACTIVE: &str = "interactive";

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Literal,
    },
    Identifier {
        name: Token,
    },
    Symbol {
        name: Token,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Call {
        operator: Token,
        args: Vec<Expr>,
    },
    Defun(Defun),
    Form {
        exprs: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Defun {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Expr>,
}

impl Defun {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Arguments of the leading `(interactive ...)` declaration, if the body starts with one.
    pub fn interactive(&self) -> Option<&[Expr]> {
        match self.body.first() {
            Some(Expr::Call { operator, args }) if operator.lexeme == INTERACTIVE => Some(args),
            _ => None,
        }
    }

    /// Statements evaluated when the function is called, without the interactive declaration.
    pub fn statements(&self) -> &[Expr] {
        match self.interactive() {
            Some(_) => &self.body[1..],
            None => &self.body,
        }
    }
}

impl Expr {
    pub fn literal<T>(value: T) -> Self
    where
        Literal: From<T>,
    {
        Expr::Literal {
            value: Literal::from(value),
        }
    }

    pub fn nil() -> Self {
        Expr::Literal {
            value: Literal::Nil,
        }
    }

    pub fn identifier(name: Token) -> Self {
        Expr::Identifier { name }
    }

    pub fn symbol(name: Token) -> Self {
        debug_assert_eq!(name.ty, Type::Symbol);
        Expr::Symbol { name }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn grouping(expression: Expr) -> Self {
        Expr::Grouping {
            expression: Box::new(expression),
        }
    }

    pub fn call(operator: Token, args: Vec<Expr>) -> Self {
        Expr::Call { operator, args }
    }

    pub fn defun(name: Token, params: Vec<Token>, body: Vec<Expr>) -> Self {
        Expr::Defun(Defun { name, params, body })
    }

    pub fn form(exprs: Vec<Expr>) -> Self {
        Expr::Form { exprs }
    }
}
