use std::fmt::Display;

use log::{debug, trace};

pub mod ast;
pub mod context;
mod env;
pub mod error;
pub mod interpreter;
pub mod limits;
pub mod parser;
pub mod printer;
pub mod value;

pub use context::{ExtraContext, CURRENT_MESSAGE_CONTEXT, REFERENCED_MESSAGE};
pub use error::{Error, RuntimeErrorKind, ScriptResult};
pub use interpreter::Interpreter;
pub use limits::Config;
pub use parser::Parser;
pub use value::Value;

/// Outcome of running a script, ready to be shown to whoever invoked it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl InterpreterResult {
    fn success(stdout: String) -> Self {
        InterpreterResult {
            success: true,
            stdout,
            stderr: String::new(),
        }
    }

    fn failure(stderr: String) -> Self {
        InterpreterResult {
            success: false,
            stdout: String::new(),
            stderr,
        }
    }
}

pub fn interpret_source(source: &str, extra: &ExtraContext) -> InterpreterResult {
    interpret_source_with_config(source, extra, Config::default())
}

/// Scans, parses and evaluates `source`. The first stage that fails decides `stderr`, nothing
/// written before a runtime error is surfaced.
pub fn interpret_source_with_config(
    source: &str,
    extra: &ExtraContext,
    config: Config,
) -> InterpreterResult {
    trace!("scanning {} byte(s) of source", source.len());
    let (tokens, errors) = botka_core::scan(source);
    if !errors.is_empty() {
        debug!("scanning failed with {} error(s)", errors.len());
        return InterpreterResult::failure(format!("Scanner exception: {}", join(&errors)));
    }

    trace!("parsing {} token(s)", tokens.len());
    let mut parser = Parser::new(&tokens).with_max_nesting(config.max_nesting);
    let expr = match parser.parse() {
        Ok(expr) => expr,
        Err(errors) => {
            debug!("parsing failed with {} error(s)", errors.len());
            return InterpreterResult::failure(format!("Parser exception: {}", join(&errors)));
        }
    };

    trace!("interpreting with {:?}", config);
    let mut interpreter = Interpreter::with_config(extra, config);
    match interpreter.interpret(&expr) {
        Ok(value) => {
            let stdout = interpreter.into_stdout();
            if !stdout.is_empty() {
                InterpreterResult::success(stdout)
            } else if value.is_nil() {
                InterpreterResult::success(String::new())
            } else {
                InterpreterResult::success(value.to_string())
            }
        }
        Err(err) => InterpreterResult::failure(format!("Interpreter exception: {}", err)),
    }
}

fn join<T: Display>(errors: &[T]) -> String {
    errors
        .iter()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use crate::{
        interpret_source, interpret_source_with_config, Config, ExtraContext, InterpreterResult,
        CURRENT_MESSAGE_CONTEXT, REFERENCED_MESSAGE,
    };

    fn ok(stdout: &str) -> InterpreterResult {
        InterpreterResult {
            success: true,
            stdout: String::from(stdout),
            stderr: String::new(),
        }
    }

    fn failed(stderr: &str) -> InterpreterResult {
        InterpreterResult {
            success: false,
            stdout: String::new(),
            stderr: String::from(stderr),
        }
    }

    const SPOILER: &str = "(defun spoiler(text)\n  (interactive)\n  (message \"||\" text \"||\"))\n(call 'spoiler)";

    #[test]
    fn test_final_value_is_printed() {
        let extra = ExtraContext::new();
        assert_eq!(interpret_source("(+ 2 2 2)", &extra), ok("6"));
        assert_eq!(interpret_source("(/ 1 2)", &extra), ok("0.5"));
        assert_eq!(interpret_source("", &extra), ok(""));
        assert_eq!(interpret_source("(defun f () (+ 1))", &extra), ok(""));
    }

    #[test]
    fn test_output_wins_over_value() {
        let extra = ExtraContext::new();
        assert_eq!(
            interpret_source("(message \"2 2\") (+ 1 1)", &extra),
            ok("2 2")
        );
    }

    #[test]
    fn test_spoiler() {
        let extra = ExtraContext::new().with(CURRENT_MESSAGE_CONTEXT, "secret");
        assert_eq!(interpret_source(SPOILER, &extra), ok("||secret||"));

        let referenced = SPOILER.replace("(interactive)", "(interactive \"r\")");
        let extra = ExtraContext::new().with(REFERENCED_MESSAGE, "quoted");
        assert_eq!(interpret_source(&referenced, &extra), ok("||quoted||"));

        assert_eq!(
            interpret_source(&referenced, &ExtraContext::new()),
            failed("Interpreter exception: (interactive \"r\") was specified but no referenced message found")
        );
    }

    #[test]
    fn test_scanner_errors() {
        assert_eq!(
            interpret_source("(message \"a) #", &ExtraContext::new()),
            failed("Scanner exception: [0:9] Unterminated string")
        );
        assert_eq!(
            interpret_source("(message #) (message [)", &ExtraContext::new()),
            failed("Scanner exception: [0:9] Unexpected character: `#`; [0:21] Unexpected character: `[`")
        );
    }

    #[test]
    fn test_parser_errors() {
        assert_eq!(
            interpret_source("(1) (message {)", &ExtraContext::new()),
            failed("Parser exception: [0:1] parser error at '1': not implemented: a form has to start with 'defun' or an operator name; [0:13] parser error at '{': expected expression")
        );
    }

    #[test]
    fn test_no_partial_output_on_failure() {
        assert_eq!(
            interpret_source("(message \"partial\") (/ 1 0)", &ExtraContext::new()),
            failed("Interpreter exception: division by zero")
        );
    }

    #[test]
    fn test_configured_call_depth() {
        let src = "(defun spin () (spin)) (spin)";
        let config = Config::default().with_max_call_depth(8);

        assert_eq!(
            interpret_source_with_config(src, &ExtraContext::new(), config),
            failed("Interpreter exception: Stack overflow.")
        );
    }

    #[test]
    fn test_deeply_nested_source_fails_cleanly() {
        let src = format!("{}1{}", "(+ ".repeat(200), ")".repeat(200));
        let result = interpret_source(&src, &ExtraContext::new());

        assert!(!result.success);
        assert!(result.stderr.starts_with("Parser exception: "));
        assert!(result.stderr.ends_with("nesting too deep, at most 128 levels are allowed"));

        let config = Config::default().with_max_nesting(250);
        assert_eq!(
            interpret_source_with_config(&src, &ExtraContext::new(), config),
            ok("1")
        );
    }
}
