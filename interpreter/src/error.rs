use botka_core::Token;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("[{line}:{col}] parser error at {at}: {msg}")]
    ParserError {
        token: Token,

        // line, col and at are copied from token, this is required because thiserror doesn't
        // support field access, e.g {token.line:?}, in error strings
        line: usize,
        col: usize,
        at: String,
        msg: String,
    },

    #[error("{msg}")]
    RuntimeError {
        token: Token,
        kind: RuntimeErrorKind,
        msg: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    NotCallable,
    UndefinedReference,
    MissingContext,
    ArityMismatch,
    DivisionByZero,
    UnknownOperator,
    InvalidOperand,
    Overflow,
    StackOverflow,
}

impl Error {
    pub(crate) fn parser_error(token: &Token, msg: &str) -> Self {
        Error::ParserError {
            token: token.clone(),
            line: token.line(),
            col: token.col(),
            at: token.to_string(),
            msg: String::from(msg),
        }
    }

    pub(crate) fn runtime_error(token: &Token, kind: RuntimeErrorKind, msg: &str) -> Self {
        Error::RuntimeError {
            token: token.clone(),
            kind,
            msg: String::from(msg),
        }
    }

    /// Kind of a runtime error, `None` for parser errors.
    pub fn kind(&self) -> Option<RuntimeErrorKind> {
        match self {
            Error::RuntimeError { kind, .. } => Some(*kind),
            Error::ParserError { .. } => None,
        }
    }
}

pub type ScriptResult<T> = Result<T, Error>;
