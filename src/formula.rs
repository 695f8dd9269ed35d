//! Arithmetic formulas for calculated columns.
//!
//! Supports expressions like:
//! - `[price] * [quantity]`
//! - `([total] - [discount]) / 2`
//! - `-[delta] % 7`
//!
//! Column references are written in square brackets and may contain spaces.
//! Operators are `+ - * / %` with the usual precedence, unary minus, and
//! parentheses. Evaluation is in `f64`, so division by zero yields an
//! infinity or NaN rather than an error.

/// A parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Number(f64),
    Column(String),
    Neg(Box<Formula>),
    Binary {
        op: BinaryOp,
        left: Box<Formula>,
        right: Box<Formula>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
        }
    }
}

impl Formula {
    /// Evaluate with `lookup` resolving column references.
    pub fn eval<F>(&self, lookup: &F) -> f64
    where
        F: Fn(&str) -> f64,
    {
        match self {
            Formula::Number(n) => *n,
            Formula::Column(name) => lookup(name),
            Formula::Neg(inner) => -inner.eval(lookup),
            Formula::Binary { op, left, right } => op.apply(left.eval(lookup), right.eval(lookup)),
        }
    }

    /// Referenced column names in first-appearance order, without repeats.
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            Formula::Number(_) => {}
            Formula::Column(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Formula::Neg(inner) => inner.collect_columns(out),
            Formula::Binary { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
        }
    }
}

/// Token types for the lexer
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Column(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Eof,
}

/// Lexer for tokenizing formula strings
struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, String> {
        let mut num_str = String::new();
        let mut seen_dot = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.advance();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                num_str.push(c);
                self.advance();
            } else {
                break;
            }
        }

        num_str
            .parse()
            .map(Token::Number)
            .map_err(|_| format!("Invalid number: {}", num_str))
    }

    fn read_column(&mut self) -> Result<Token, String> {
        self.advance(); // consume '['
        let mut name = String::new();

        while let Some(c) = self.advance() {
            if c == ']' {
                return Ok(Token::Column(name));
            }
            name.push(c);
        }

        Err(format!("Unterminated column reference: [{}", name))
    }

    fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match c {
            '[' => self.read_column(),
            _ if c.is_ascii_digit() || c == '.' => self.read_number(),
            _ => Err(format!("Unexpected character: {}", c)),
        }
    }
}

/// Recursive-descent parser over the token stream
struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    fn new(input: &str) -> Result<Self, String> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn advance(&mut self) -> Result<(), String> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        if &self.current == expected {
            self.advance()
        } else {
            Err(format!("Expected {:?}, got {:?}", expected, self.current))
        }
    }

    /// Sums and differences (lowest precedence)
    fn parse_additive(&mut self) -> Result<Formula, String> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Formula::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Formula, String> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Formula::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Formula, String> {
        match self.current {
            Token::Minus => {
                self.advance()?;
                Ok(Formula::Neg(Box::new(self.parse_unary()?)))
            }
            Token::Plus => {
                self.advance()?;
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Formula, String> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(Formula::Number(n))
            }
            Token::Column(name) => {
                self.advance()?;
                Ok(Formula::Column(name))
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_additive()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(format!("Expected a number, column or '(', got {:?}", other)),
        }
    }
}

/// Parse a formula string.
pub fn parse_formula(input: &str) -> Result<Formula, String> {
    let mut parser = Parser::new(input)?;
    let formula = parser.parse_additive()?;

    if parser.current != Token::Eof {
        return Err(format!("Unexpected token after formula: {:?}", parser.current));
    }

    Ok(formula)
}
