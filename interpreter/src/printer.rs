use std::fmt::{Display, Formatter};

use botka_core::Literal;

use crate::ast::{Defun, Expr};

/// Renders a tree back into parenthesised prefix notation. Arithmetic-dialect nodes are printed
/// in prefix form too, with groupings spelled out as `(group ...)`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value } => match value {
                Literal::Str(val) => format!("\"{}\"", val),
                _ => value.to_string(),
            },
            Expr::Identifier { name } | Expr::Symbol { name } => name.lexeme.clone(),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, [left.as_ref(), right.as_ref()]),
            Expr::Unary { operator, right } => {
                self.parenthesize(&operator.lexeme, [right.as_ref()])
            }
            Expr::Grouping { expression } => self.parenthesize("group", [expression.as_ref()]),
            Expr::Call { operator, args } => self.parenthesize(&operator.lexeme, args),
            Expr::Defun(defun) => self.defun(defun),
            Expr::Form { exprs } => exprs
                .iter()
                .map(|expr| self.print(expr))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn defun(&self, defun: &Defun) -> String {
        let params: Vec<&str> = defun.params.iter().map(|p| p.lexeme.as_str()).collect();
        let head = format!("defun {} ({})", defun.name.lexeme, params.join(" "));
        self.parenthesize(&head, &defun.body)
    }

    fn parenthesize<'e>(&self, name: &str, exprs: impl IntoIterator<Item = &'e Expr>) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print(expr));
        }
        out.push(')');
        out
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", AstPrinter.print(self))
    }
}
