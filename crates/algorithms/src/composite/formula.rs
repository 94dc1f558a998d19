//! Arithmetic band formulas
//!
//! A small recursive-descent parser over `+ - * /`, unary signs,
//! parentheses, numeric constants and band identifiers:
//!
//! - `"(nir - red) / (nir + red)"`
//! - `"2.5 * (nir - red) / (nir + 6 * red - 7.5 * blue + 1)"`
//!
//! Band names are resolved to slots at parse time, so evaluation only
//! indexes a slice.

use rasterforge_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Band(String),
    Op(char), // +, -, *, /
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    /// Slot in [`Formula::bands`]
    Band(usize),
    BinOp {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Neg(Box<Expr>),
}

fn tokenize(formula: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = formula.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '+' | '-' | '*' | '/' => {
                tokens.push(Token::Op(chars[i]));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num = num_str
                    .parse::<f64>()
                    .map_err(|_| Error::Formula(format!("invalid number '{num_str}'")))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Band(chars[start..i].iter().collect()));
            }
            c => {
                return Err(Error::Formula(format!(
                    "unexpected character '{c}' in formula"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    bands: Vec<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            bands: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn slot(&mut self, name: String) -> usize {
        match self.bands.iter().position(|b| *b == name) {
            Some(i) => i,
            None => {
                self.bands.push(name);
                self.bands.len() - 1
            }
        }
    }

    /// expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.advance();
            let right = self.parse_term()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// term = factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            let op = *op;
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// factor = number | band | '(' expr ')' | ('-' | '+') factor
    fn parse_factor(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Num(n)),
            Some(Token::Band(name)) => Ok(Expr::Band(self.slot(name))),
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(Error::Formula("expected closing parenthesis".into())),
                }
            }
            Some(Token::Op('-')) => Ok(Expr::Neg(Box::new(self.parse_factor()?))),
            Some(Token::Op('+')) => self.parse_factor(),
            Some(other) => Err(Error::Formula(format!("unexpected token {other:?}"))),
            None => Err(Error::Formula("unexpected end of formula".into())),
        }
    }
}

fn eval(expr: &Expr, values: &[f64]) -> f64 {
    match expr {
        Expr::Num(n) => *n,
        Expr::Band(slot) => values.get(*slot).copied().unwrap_or(f64::NAN),
        Expr::BinOp { op, left, right } => {
            let l = eval(left, values);
            let r = eval(right, values);
            match op {
                '+' => l + r,
                '-' => l - r,
                '*' => l * r,
                '/' => {
                    if r == 0.0 {
                        f64::NAN
                    } else {
                        l / r
                    }
                }
                _ => f64::NAN,
            }
        }
        Expr::Neg(inner) => -eval(inner, values),
    }
}

/// A parsed band formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
    bands: Vec<String>,
}

impl Formula {
    pub fn parse(formula: &str) -> Result<Self> {
        let mut parser = Parser::new(tokenize(formula)?);
        let expr = parser.parse_expr()?;
        if let Some(extra) = parser.peek() {
            return Err(Error::Formula(format!("unexpected trailing token {extra:?}")));
        }
        Ok(Self {
            source: formula.to_string(),
            expr,
            bands: parser.bands,
        })
    }

    /// Referenced band names, in order of first appearance
    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Evaluate with one value per entry of [`bands`](Self::bands).
    ///
    /// Division by zero yields NaN.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        eval(&self.expr, values)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_precedence_and_slots() {
        let f = Formula::parse("a + b * 2 - -a").unwrap();
        assert_eq!(f.bands(), ["a", "b"]);
        assert_relative_eq!(f.evaluate(&[1.0, 3.0]), 8.0);
    }

    #[test]
    fn test_parentheses() {
        let f = Formula::parse("(nir - red) / (nir + red)").unwrap();
        assert_relative_eq!(f.evaluate(&[0.8, 0.2]), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_division_by_zero_is_nan() {
        let f = Formula::parse("a / (b - b)").unwrap();
        assert!(f.evaluate(&[1.0, 4.0]).is_nan());
    }

    #[test]
    fn test_malformed_formulas() {
        for bad in ["(a - ", "a $ b", "1.2.3", "a b", ")", ""] {
            let err = Formula::parse(bad).unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_constant_expression() {
        let f: Formula = "5 * 2.5 + 10".parse().unwrap();
        assert!(f.bands().is_empty());
        assert_relative_eq!(f.evaluate(&[]), 22.5);
    }
}
