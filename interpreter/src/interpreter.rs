use std::cmp::Ordering;

use ahash::AHashMap;
use botka_core::{Literal, Token, Type};
use log::debug;

use crate::ast::{Defun, Expr, INTERACTIVE};
use crate::context::ExtraContext;
use crate::env::{CallStack, Frame};
use crate::error::{Error, RuntimeErrorKind, ScriptResult};
use crate::limits::Config;
use crate::value::Value;

const INTERACTIVE_BINDING: &str = "_m";

pub struct Interpreter<'a> {
    stdout: String,
    functions: AHashMap<&'a str, &'a Defun>,
    stack: CallStack<'a>,
    extra: &'a ExtraContext,
    config: Config,
}

impl<'a> Interpreter<'a> {
    pub fn new(extra: &'a ExtraContext) -> Self {
        Self::with_config(extra, Config::default())
    }

    pub fn with_config(extra: &'a ExtraContext, config: Config) -> Self {
        Interpreter {
            stdout: String::new(),
            functions: AHashMap::new(),
            stack: CallStack::new(),
            extra,
            config,
        }
    }

    /// Evaluates a tree produced by the parser. Output of `message` calls is collected and can be
    /// read with [`Interpreter::stdout`] afterwards.
    pub fn interpret(&mut self, expr: &'a Expr) -> ScriptResult<Value> {
        self.evaluate(expr)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn into_stdout(self) -> String {
        self.stdout
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn evaluate(&mut self, expr: &'a Expr) -> ScriptResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(Value::from(value)),
            Expr::Identifier { name } => self.lookup(name),
            Expr::Symbol { name } => Ok(Value::symbol(name.symbol_name())),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.binary(left, operator, right),
            Expr::Unary { operator, right } => self.unary(operator, right),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Call { operator, args } => self.call(operator, args),
            Expr::Defun(defun) => {
                self.define(defun);
                Ok(Value::Nil)
            }
            Expr::Form { exprs } => self.form(exprs),
        }
    }

    fn form(&mut self, exprs: &'a [Expr]) -> ScriptResult<Value> {
        let mut last = Value::Nil;
        for expr in exprs {
            let value = self.evaluate(expr)?;
            if !value.is_nil() {
                last = value;
            }
        }
        Ok(last)
    }

    fn define(&mut self, defun: &'a Defun) {
        debug!(
            "defining function '{}' with {} parameter(s)",
            defun.name.lexeme,
            defun.arity()
        );
        self.functions.insert(&defun.name.lexeme, defun);
    }

    fn lookup(&self, name: &Token) -> ScriptResult<Value> {
        if let Some(value) = self.stack.get(&name.lexeme) {
            Ok(value)
        } else if self.is_defined(&name.lexeme) {
            Ok(Value::function(&name.lexeme))
        } else {
            Err(Error::runtime_error(
                name,
                RuntimeErrorKind::UndefinedReference,
                &format!("undefined reference to '{}'", name.lexeme),
            ))
        }
    }

    fn call(&mut self, operator: &'a Token, args: &'a [Expr]) -> ScriptResult<Value> {
        if operator.ty.is_arithmetic() {
            return self.fold(operator, args);
        }

        match operator.lexeme.as_str() {
            "message" => self.message(args),
            INTERACTIVE => self.interactive(operator, args),
            "call" => self.call_indirect(operator, args),
            name => match self.functions.get(name).copied() {
                Some(defun) => self.invoke(operator, defun, args),
                None => Err(Error::runtime_error(
                    operator,
                    RuntimeErrorKind::UnknownOperator,
                    &format!("unknown operator '{}'", name),
                )),
            },
        }
    }

    // Variadic arithmetic, `(op a b c)` is `((a op b) op c)`. `+` starts from zero, the others
    // from their first argument.
    fn fold(&mut self, operator: &Token, args: &'a [Expr]) -> ScriptResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        let mut values = values.into_iter();
        let mut acc = match operator.ty {
            Type::Plus => Value::Int(0),
            _ => match values.next() {
                Some(first) if as_number(&first).is_some() => first,
                Some(first) => {
                    return Err(Error::runtime_error(
                        operator,
                        RuntimeErrorKind::InvalidOperand,
                        &format!(
                            "operand of '{}' must be a number, got {}",
                            operator.lexeme,
                            first.type_name()
                        ),
                    ))
                }
                None => {
                    return Err(Error::runtime_error(
                        operator,
                        RuntimeErrorKind::ArityMismatch,
                        &format!("'{}' needs at least one argument", operator.lexeme),
                    ))
                }
            },
        };

        for value in values {
            acc = self.arithmetic(operator, acc, value)?;
        }

        Ok(acc)
    }

    fn arithmetic(&self, operator: &Token, lhs: Value, rhs: Value) -> ScriptResult<Value> {
        if let (Value::Int(lhs), Value::Int(rhs)) = (&lhs, &rhs) {
            let (lhs, rhs) = (*lhs, *rhs);
            let checked = match operator.ty {
                Type::Plus => lhs.checked_add(rhs),
                Type::Minus => lhs.checked_sub(rhs),
                Type::Star => lhs.checked_mul(rhs),
                Type::Slash if rhs == 0 => return Err(Self::division_by_zero(operator)),
                Type::Slash => return Ok(Value::Num(lhs as f64 / rhs as f64)),
                _ => return Err(Self::invalid_operator(operator)),
            };

            return checked.map(Value::Int).ok_or_else(|| {
                Error::runtime_error(
                    operator,
                    RuntimeErrorKind::Overflow,
                    &format!("integer overflow in '{} {} {}'", lhs, operator.lexeme, rhs),
                )
            });
        }

        let (lhs, rhs) = match (as_number(&lhs), as_number(&rhs)) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            _ => {
                return Err(Error::runtime_error(
                    operator,
                    RuntimeErrorKind::InvalidOperand,
                    &format!(
                        "operands of '{}' must be numbers, got {} and {}",
                        operator.lexeme,
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                ))
            }
        };

        match operator.ty {
            Type::Plus => Ok(Value::Num(lhs + rhs)),
            Type::Minus => Ok(Value::Num(lhs - rhs)),
            Type::Star => Ok(Value::Num(lhs * rhs)),
            Type::Slash if rhs == 0.0 => Err(Self::division_by_zero(operator)),
            Type::Slash => Ok(Value::Num(lhs / rhs)),
            _ => Err(Self::invalid_operator(operator)),
        }
    }

    fn message(&mut self, args: &'a [Expr]) -> ScriptResult<Value> {
        for arg in args {
            let value = self.evaluate(arg)?;
            self.stdout.push_str(&value.to_string());
        }
        Ok(Value::Nil)
    }

    // A standalone `(interactive "m")` inside a function body binds the requested context to `_m`
    fn interactive(&mut self, operator: &Token, args: &[Expr]) -> ScriptResult<Value> {
        if self.stack.depth() == 0 {
            return Err(Error::runtime_error(
                operator,
                RuntimeErrorKind::MissingContext,
                "interactive can only be used inside a function body",
            ));
        }

        let mut modes = Vec::with_capacity(args.len());
        for arg in args {
            modes.push(string_literal(operator, arg)?);
        }
        if modes.is_empty() {
            modes.push("m");
        }

        for code in modes.iter().flat_map(|mode| mode.chars()) {
            let context = match code {
                'm' => self.extra.current_message(),
                'r' => self.extra.referenced_message(),
                _ => continue,
            };

            match context {
                Some(context) => self.stack.define(INTERACTIVE_BINDING, Value::from(context)),
                None => {
                    return Err(Error::runtime_error(
                        operator,
                        RuntimeErrorKind::MissingContext,
                        "not called in Discord context",
                    ))
                }
            }
        }

        Ok(Value::Nil)
    }

    fn call_indirect(&mut self, operator: &Token, args: &'a [Expr]) -> ScriptResult<Value> {
        let (target, rest) = args.split_first().ok_or_else(|| {
            Error::runtime_error(
                operator,
                RuntimeErrorKind::ArityMismatch,
                "'call' needs the function to call as its first argument",
            )
        })?;

        let callee = self.evaluate(target)?;
        let defun = callee
            .callee_name()
            .and_then(|name| self.functions.get(name).copied());

        match defun {
            Some(defun) => self.invoke(operator, defun, rest),
            None => Err(Error::runtime_error(
                operator,
                RuntimeErrorKind::NotCallable,
                &format!("{} is not callable", callee),
            )),
        }
    }

    fn invoke(&mut self, token: &Token, defun: &'a Defun, args: &'a [Expr]) -> ScriptResult<Value> {
        if self.stack.depth() >= self.config.max_call_depth {
            return Err(Error::runtime_error(
                token,
                RuntimeErrorKind::StackOverflow,
                "Stack overflow.",
            ));
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        let frame = self.bind(token, defun, values)?;
        debug!(
            "calling '{}' at depth {}",
            defun.name.lexeme,
            self.stack.depth() + 1
        );

        self.stack.push(frame);
        let res = self.body(defun.statements());
        self.stack.pop();
        res
    }

    fn bind(&self, token: &Token, defun: &'a Defun, values: Vec<Value>) -> ScriptResult<Frame<'a>> {
        let mut frame = Frame::new();

        if values.len() == defun.arity() {
            for (param, value) in defun.params.iter().zip(values) {
                frame.define(&param.lexeme, value);
            }
            return Ok(frame);
        }

        let arity_mismatch = || {
            Error::runtime_error(
                token,
                RuntimeErrorKind::ArityMismatch,
                &format!(
                    "param count is off (got {}, expected {})",
                    values.len(),
                    defun.arity()
                ),
            )
        };

        let declaration = defun.interactive().ok_or_else(arity_mismatch)?;
        let first = defun.params.first().ok_or_else(arity_mismatch)?;

        let mode = match declaration.first() {
            None => "m",
            Some(arg) => string_literal(token, arg)?,
        };

        let context = match mode {
            "m" => self.extra.current_message().ok_or_else(|| {
                Error::runtime_error(
                    token,
                    RuntimeErrorKind::MissingContext,
                    "not called in Discord context",
                )
            })?,
            "r" => self.extra.referenced_message().ok_or_else(|| {
                Error::runtime_error(
                    token,
                    RuntimeErrorKind::MissingContext,
                    "(interactive \"r\") was specified but no referenced message found",
                )
            })?,
            other => {
                return Err(Error::runtime_error(
                    token,
                    RuntimeErrorKind::InvalidOperand,
                    &format!("unknown interactive mode \"{}\"", other),
                ))
            }
        };

        frame.define(&first.lexeme, Value::from(context));
        Ok(frame)
    }

    fn body(&mut self, statements: &'a [Expr]) -> ScriptResult<Value> {
        let mut value = Value::Nil;
        for statement in statements {
            value = self.evaluate(statement)?;
        }
        Ok(value)
    }

    fn binary(&mut self, left: &'a Expr, operator: &Token, right: &'a Expr) -> ScriptResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.ty {
            Type::Plus => match (left, right) {
                (Value::Str(left), Value::Str(right)) => {
                    Ok(Value::from(String::from(left.as_str()) + right.as_str()))
                }
                (left, right) => self.arithmetic(operator, left, right),
            },
            Type::Minus | Type::Star | Type::Slash => self.arithmetic(operator, left, right),
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                let ordering = compare(operator, &left, &right)?;
                let result = ordering.map_or(false, |ordering| match operator.ty {
                    Type::Greater => ordering == Ordering::Greater,
                    Type::GreaterEqual => ordering != Ordering::Less,
                    Type::Less => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                });
                Ok(Value::Bool(result))
            }
            Type::EqualEqual => Ok(Value::Bool(left == right)),
            Type::BangEqual => Ok(Value::Bool(left != right)),
            _ => Err(Self::invalid_operator(operator)),
        }
    }

    fn unary(&mut self, operator: &Token, right: &'a Expr) -> ScriptResult<Value> {
        let right = self.evaluate(right)?;
        match (operator.ty, right) {
            (Type::Minus, Value::Int(val)) => val.checked_neg().map(Value::Int).ok_or_else(|| {
                Error::runtime_error(
                    operator,
                    RuntimeErrorKind::Overflow,
                    &format!("integer overflow in '-{}'", val),
                )
            }),
            (Type::Minus, Value::Num(val)) => Ok(Value::Num(-val)),
            (Type::Bang, val) => Ok(Value::Bool(!val.is_truthy())),
            (_, val) => Err(Error::runtime_error(
                operator,
                RuntimeErrorKind::InvalidOperand,
                &format!(
                    "invalid operand for unary '{}': {}",
                    operator.lexeme,
                    val.type_name()
                ),
            )),
        }
    }

    fn division_by_zero(operator: &Token) -> Error {
        Error::runtime_error(
            operator,
            RuntimeErrorKind::DivisionByZero,
            "division by zero",
        )
    }

    fn invalid_operator(operator: &Token) -> Error {
        Error::runtime_error(
            operator,
            RuntimeErrorKind::UnknownOperator,
            &format!("invalid operator '{}'", operator.lexeme),
        )
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(val) => Some(*val as f64),
        Value::Num(val) => Some(*val),
        _ => None,
    }
}

fn compare(operator: &Token, lhs: &Value, rhs: &Value) -> ScriptResult<Option<Ordering>> {
    match (lhs, rhs) {
        (Value::Int(lhs), Value::Int(rhs)) => Ok(Some(lhs.cmp(rhs))),
        (Value::Str(lhs), Value::Str(rhs)) => Ok(Some(lhs.cmp(rhs))),
        _ => match (as_number(lhs), as_number(rhs)) {
            (Some(lhs), Some(rhs)) => Ok(lhs.partial_cmp(&rhs)),
            _ => Err(Error::runtime_error(
                operator,
                RuntimeErrorKind::InvalidOperand,
                &format!(
                    "operands of '{}' must be either strings or numbers, got {} and {}",
                    operator.lexeme,
                    lhs.type_name(),
                    rhs.type_name()
                ),
            )),
        },
    }
}

fn string_literal<'e>(operator: &Token, expr: &'e Expr) -> ScriptResult<&'e str> {
    match expr {
        Expr::Literal {
            value: Literal::Str(val),
        } => Ok(val.as_str()),
        _ => Err(Error::runtime_error(
            operator,
            RuntimeErrorKind::InvalidOperand,
            "interactive only takes string literals",
        )),
    }
}
