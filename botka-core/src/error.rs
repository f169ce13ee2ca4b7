use thiserror::Error;

use crate::token::Position;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("[{pos}] Unterminated string")]
    UnterminatedString { pos: Position },

    #[error("[{pos}] Unexpected character: `{ch}`")]
    UnexpectedCharacter { ch: char, pos: Position },

    #[error("[{pos}] Number literal `{lexeme}` is out of range")]
    NumberOutOfRange { lexeme: String, pos: Position },
}

impl Error {
    pub fn position(&self) -> Position {
        match self {
            Error::UnterminatedString { pos } => *pos,
            Error::UnexpectedCharacter { pos, .. } => *pos,
            Error::NumberOutOfRange { pos, .. } => *pos,
        }
    }

    pub fn line(&self) -> usize {
        self.position().line
    }
}
