use phf::{phf_map, Map};

use crate::error::Error;
use crate::token::{Literal, Position, Span, Token, Type};

pub struct Scanner;

impl Scanner {
    const KEYWORDS: Map<&'static str, Type> = phf_map! {
        "defun" => Type::Defun,
        "t" => Type::True,
        "true" => Type::True,
        "f" => Type::False,
        "false" => Type::False,
        "nil" => Type::Nil,
        "and" => Type::And,
        "class" => Type::Class,
        "else" => Type::Else,
        "for" => Type::For,
        "if" => Type::If,
        "or" => Type::Or,
        "print" => Type::Print,
        "return" => Type::Return,
        "super" => Type::Super,
        "this" => Type::This,
        "var" => Type::Var,
        "while" => Type::While,
    };

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Scanner
    }

    pub fn scan_tokens<'a>(&mut self, src: &'a str) -> TokenStream<'a> {
        TokenStream::new(src)
    }
}

/// Scans the whole source eagerly, returning every token together with every error met on the way.
pub fn scan(src: &str) -> (Vec<Token>, Vec<Error>) {
    let mut stream = Scanner::new().scan_tokens(src);
    let tokens = stream.by_ref().collect();
    (tokens, stream.into_errors())
}

pub struct TokenStream<'a> {
    src: &'a str,

    // Byte offsets at which every line starts, the first line always starts at 0
    line_starts: Vec<usize>,

    // `start` and `current` are byte offsets to the start and end of the token being scanned
    start: usize,
    current: usize,

    // This represents a token's index in the token stream
    index: usize,

    // This flag is set to `true` if the eof is reached and the eof token has been emitted.
    // This is required because the iterator needs to distinguish between when eof is reached but
    // the token is not emitted, and eof is reached and token has been emitted.
    eof: bool,

    // Scanning goes on after an error, the caller decides what to do with them
    errors: Vec<Error>,
}

impl<'a> TokenStream<'a> {
    pub fn new(src: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        TokenStream {
            src,
            line_starts,
            start: 0,
            current: 0,
            index: 0,
            eof: false,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    fn scan_token(&mut self) -> Result<Option<Token>, Error> {
        let c = self.advance();

        let token = match c {
            '(' => Some(self.make_token(Type::LeftParen)),
            ')' => Some(self.make_token(Type::RightParen)),
            '{' => Some(self.make_token(Type::LeftBrace)),
            '}' => Some(self.make_token(Type::RightBrace)),
            ',' => Some(self.make_token(Type::Comma)),
            '-' => Some(self.make_token(Type::Minus)),
            '+' => Some(self.make_token(Type::Plus)),
            ';' => Some(self.make_token(Type::SemiColon)),
            '*' => Some(self.make_token(Type::Star)),
            '/' => Some(self.make_token(Type::Slash)),

            '.' => {
                if self.peek().is_ascii_digit() {
                    Some(self.number()?)
                } else {
                    Some(self.make_token(Type::Dot))
                }
            }

            '!' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::BangEqual))
                } else {
                    Some(self.make_token(Type::Bang))
                }
            }

            '=' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::EqualEqual))
                } else {
                    Some(self.make_token(Type::Equal))
                }
            }

            '<' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::LessEqual))
                } else {
                    Some(self.make_token(Type::Less))
                }
            }

            '>' => {
                if self.match_char('=') {
                    Some(self.make_token(Type::GreaterEqual))
                } else {
                    Some(self.make_token(Type::Greater))
                }
            }

            '"' => Some(self.string()?),

            // White spaces, do nothing. Lines are tracked through `line_starts`.
            ' ' | '\t' | '\r' | '\n' => None,

            _ => {
                if c.is_ascii_digit() {
                    Some(self.number()?)
                } else if is_identifier_start(c) {
                    Some(self.identifier())
                } else {
                    return Err(Error::UnexpectedCharacter {
                        ch: c,
                        pos: self.position_at(self.start),
                    });
                }
            }
        };

        Ok(token)
    }

    fn string(&mut self) -> Result<Token, Error> {
        while self.peek() != '"' && !self.is_at_end() {
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::UnterminatedString {
                pos: self.position_at(self.start),
            });
        }

        // consume the closing "
        self.advance();
        Ok(self.make_token_with_val(
            Type::String,
            Literal::from(&self.src[self.start + 1..self.current - 1]),
        ))
    }

    fn number(&mut self) -> Result<Token, Error> {
        // A leading '.' has already been consumed when the literal is written like `.5`
        let mut is_float = &self.src[self.start..self.current] == ".";

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if !is_float && self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            is_float = true;

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let src = self.src;
        let text = &src[self.start..self.current];
        let out_of_range = || Error::NumberOutOfRange {
            lexeme: String::from(text),
            pos: self.position_at(self.start),
        };

        let (ty, value) = if is_float {
            let value = format!("0{}", text)
                .parse::<f64>()
                .map_err(|_| out_of_range())?;
            (Type::Number, Literal::Num(value))
        } else {
            let value = text.parse::<i64>().map_err(|_| out_of_range())?;
            (Type::Integer, Literal::Int(value))
        };

        Ok(self.make_token_with_val(ty, value))
    }

    fn identifier(&mut self) -> Token {
        while !self.is_at_end() && is_identifier_char(self.peek()) {
            self.advance();
        }

        let src = self.src;
        let text = &src[self.start..self.current];
        if text.starts_with('\'') {
            return self.make_token(Type::Symbol);
        }

        match Scanner::KEYWORDS.get(text) {
            None => self.make_token(Type::Identifier),
            Some(ty @ Type::True) | Some(ty @ Type::False) => {
                let val = Literal::Bool(*ty == Type::True);
                self.make_token_with_val(*ty, val)
            }
            Some(keyword) => self.make_token(*keyword),
        }
    }

    fn peek(&self) -> char {
        self.src[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.src[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let res = self.peek();
        self.current += res.len_utf8();
        res
    }

    fn match_char(&mut self, c: char) -> bool {
        if self.is_at_end() || self.peek() != c {
            false
        } else {
            self.current += c.len_utf8();
            true
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.src.len()
    }

    fn position_at(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let col = self.src[self.line_starts[line]..offset].chars().count();
        Position::new(line, col)
    }

    fn make_token(&mut self, ty: Type) -> Token {
        self.make_token_with_val(ty, Literal::Nil)
    }

    fn make_token_with_val(&mut self, ty: Type, val: Literal) -> Token {
        let lexeme = match ty {
            Type::Eof => String::new(),
            _ => String::from(&self.src[self.start..self.current]),
        };

        let start = self.position_at(self.start);
        let end = match lexeme.char_indices().last() {
            Some((last, _)) => self.position_at(self.start + last),
            None => start,
        };

        let token = Token::new(ty, lexeme, self.start, Span::new(start, end), self.index, val);
        self.index += 1;
        token
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.current;

            match self.scan_token() {
                Ok(None) => continue,
                Ok(Some(token)) => return Some(token),
                Err(err) => self.errors.push(err),
            }
        }

        self.eof = true;
        self.start = self.current;
        Some(self.make_token(Type::Eof))
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '_' | '\'' | '?' | ':' | '|' | '&' | '%' | '$' | '@' | '^' | '~'
        )
}

fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '{' | '}' | '"' | ',' | ';')
}
