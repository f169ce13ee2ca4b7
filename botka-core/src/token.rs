use std::fmt::{Display, Formatter};
use std::ops::Range;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    SemiColon,
    Slash,
    Star,

    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    Identifier,
    Symbol,
    String,
    Number,
    Integer,

    Defun,
    And,
    Class,
    Else,
    False,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl Type {
    /// Operators that can stand in the head position of a call, e.g. `(+ 1 2)`.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Type::Plus | Type::Minus | Type::Star | Type::Slash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Int(i64),
    Bool(bool),
    Nil,
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(String::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Num(value)
    }
}

macro_rules! impl_from_int_for_literal {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Literal {
                    Literal::Int(n as i64)
                }
            }
        )*
    }
}

impl_from_int_for_literal!(u8 i8 u16 i16 u32 i32 i64);

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Str(val) => write!(f, "{}", val),
            Literal::Num(val) => write!(f, "{:?}", val),
            Literal::Int(val) => write!(f, "{}", val),
            Literal::Bool(true) => write!(f, "t"),
            Literal::Bool(false) => write!(f, "f"),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

/// Zero based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Position { line, col }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    /// inclusive, points at the last character of the token
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub const fn at(line: usize, col: usize) -> Self {
        Span::new(Position::new(line, col), Position::new(line, col))
    }

    pub const fn cols(line: usize, start_col: usize, end_col: usize) -> Self {
        Span::new(Position::new(line, start_col), Position::new(line, end_col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenIndex(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: Type,
    pub lexeme: String,
    pub offset: usize,
    pub span: Span,
    pub idx: TokenIndex,
    pub value: Literal,
}

impl Token {
    pub fn new(
        ty: Type,
        lexeme: String,
        offset: usize,
        span: Span,
        idx: usize,
        value: Literal,
    ) -> Self {
        Token {
            ty,
            lexeme,
            offset,
            span,
            idx: TokenIndex(idx),
            value,
        }
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn col(&self) -> usize {
        self.span.start.col
    }

    /// Byte range of the lexeme in the scanned source.
    pub fn source_range(&self) -> Range<usize> {
        self.offset..self.offset + self.lexeme.len()
    }

    /// Name of a quoted symbol without its leading quote.
    pub fn symbol_name(&self) -> &str {
        self.lexeme.strip_prefix('\'').unwrap_or(&self.lexeme)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.ty {
            Type::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
