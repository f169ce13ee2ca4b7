use std::fmt::{Display, Formatter};
use std::rc::Rc;

use botka_core::Literal;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Num(f64),
    Str(Rc<String>),
    Bool(bool),
    Nil,

    // Quoted name, stored without the leading quote
    Symbol(Rc<str>),

    // Reference to a defined function by its name
    Function(Rc<str>),
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Rc::from(name))
    }

    pub fn function(name: &str) -> Self {
        Value::Function(Rc::from(name))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Name of the function this value refers to, for symbols and function references.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) | Value::Function(name) => Some(&**name),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Num(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
        }
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        match value {
            Literal::Str(val) => Value::Str(Rc::new(val)),
            Literal::Num(val) => Value::Num(val),
            Literal::Int(val) => Value::Int(val),
            Literal::Bool(val) => Value::Bool(val),
            Literal::Nil => Value::Nil,
        }
    }
}

impl From<&Literal> for Value {
    fn from(value: &Literal) -> Self {
        Value::from(value.clone())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => lhs == rhs,
            (Value::Num(lhs), Value::Num(rhs)) => lhs == rhs,
            (Value::Int(lhs), Value::Num(rhs)) | (Value::Num(rhs), Value::Int(lhs)) => {
                *lhs as f64 == *rhs
            }
            (Value::Str(lhs), Value::Str(rhs)) => lhs == rhs,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Symbol(lhs), Value::Symbol(rhs)) => lhs == rhs,
            (Value::Function(lhs), Value::Function(rhs)) => lhs == rhs,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::new(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::new(String::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

macro_rules! impl_from_int_for_value {
    ( $( $t:ident )* ) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Value {
                    Value::Int(n as i64)
                }
            }
        )*
    }
}

impl_from_int_for_value!(u8 i8 u16 i16 u32 i32 i64);

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(val) => write!(f, "{}", val),
            // Debug formatting keeps the fractional part, e.g. 2.0 instead of 2
            Value::Num(val) => {
                let repr = format!("{:?}", val);
                match repr.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{}e+{}", mantissa, exp)
                    }
                    _ => write!(f, "{}", repr),
                }
            }
            Value::Str(val) => write!(f, "{}", val),
            Value::Bool(true) => write!(f, "t"),
            Value::Bool(false) => write!(f, "f"),
            Value::Nil => write!(f, "nil"),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Function(name) => write!(f, "<fn {}>", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use botka_core::Literal;

    use crate::value::Value;

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(2.0).to_string(), "2.0");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(1e20).to_string(), "1e+20");
        assert_eq!(Value::from(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Value::from(1e-7).to_string(), "1e-7");
        assert_eq!(Value::from("a b").to_string(), "a b");
        assert_eq!(Value::from(true).to_string(), "t");
        assert_eq!(Value::from(false).to_string(), "f");
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::symbol("spoiler").to_string(), "spoiler");
        assert_eq!(Value::function("spoiler").to_string(), "<fn spoiler>");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::from(2), Value::from(2.0));
        assert_eq!(Value::from(2.0), Value::from(2));
        assert_ne!(Value::from(2), Value::from("2"));
        assert_ne!(Value::symbol("f"), Value::function("f"));
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::from(false));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(0).is_truthy());
        assert!(Value::from("").is_truthy());
        assert!(Value::symbol("x").is_truthy());
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from(Literal::Int(3)), Value::Int(3));
        assert_eq!(Value::from(Literal::Num(1.5)), Value::Num(1.5));
        assert_eq!(Value::from(Literal::from("x")), Value::from("x"));
        assert_eq!(Value::from(&Literal::Nil), Value::Nil);
    }

    #[test]
    fn test_callee_name() {
        assert_eq!(Value::symbol("f").callee_name(), Some("f"));
        assert_eq!(Value::function("g").callee_name(), Some("g"));
        assert_eq!(Value::from("f").callee_name(), None);
    }
}
