//! Wilkinson formula parser
//!
//! The right-hand side of a formula is tokenized on the operators
//! `+ * / : ( )`, converted to postfix with an operator-precedence stack
//! (`+` < `*` < `/` < `:`, left associative) and evaluated into a flat list of
//! interaction names:
//!
//! - `x + y`: both lists
//! - `x : y`: every term of `x` paired with every term of `y`
//! - `x * y`: `x + y + x:y`
//! - `x / y`: `x + x:y`
//!
//! Identifiers are runs of letters, digits, `_` and `.`; `0` and `1` are
//! ordinary identifiers at this stage.

use super::{FormulaError, FormulaResult};

/// Binary formula operators, in increasing precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Cross,
    Nest,
    Interact,
}

impl Op {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Op::Add),
            '*' => Some(Op::Cross),
            '/' => Some(Op::Nest),
            ':' => Some(Op::Interact),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Cross => '*',
            Op::Nest => '/',
            Op::Interact => ':',
        }
    }

    fn priority(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Op(Op),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

/// Formula right-hand side parser
///
/// Positions in errors are character offsets into the whitespace-free
/// right-hand side.
pub struct FormulaParser;

impl FormulaParser {
    /// Expand `rhs` into the interaction names it denotes, in evaluation order
    ///
    /// `"a*b"` gives `["a", "b", "a:b"]`. Duplicates are kept.
    pub fn reduce(rhs: &str) -> FormulaResult<Vec<String>> {
        let tokens = Self::tokenize(rhs)?;
        if tokens.is_empty() {
            return Err(FormulaError::syntax(0, "Empty right-hand side"));
        }
        let postfix = Self::to_postfix(tokens)?;
        Self::eval_postfix(&postfix)
    }

    fn tokenize(rhs: &str) -> FormulaResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut ident = String::new();
        let mut ident_start = 0;

        for (position, c) in rhs.chars().filter(|c| !c.is_whitespace()).enumerate() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                if ident.is_empty() {
                    ident_start = position;
                }
                ident.push(c);
                continue;
            }

            let kind = match c {
                '(' => TokenKind::Open,
                ')' => TokenKind::Close,
                _ => match Op::from_char(c) {
                    Some(op) => TokenKind::Op(op),
                    None => {
                        return Err(FormulaError::syntax(
                            position,
                            format!("Unexpected character '{}'", c),
                        ));
                    }
                },
            };

            if !ident.is_empty() {
                tokens.push(Token {
                    kind: TokenKind::Ident(std::mem::take(&mut ident)),
                    position: ident_start,
                });
            }
            tokens.push(Token { kind, position });
        }

        if !ident.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Ident(ident),
                position: ident_start,
            });
        }

        Ok(tokens)
    }

    /// Shunting-yard conversion; operators of equal or higher priority on the
    /// stack are emitted before a new one is pushed
    fn to_postfix(tokens: Vec<Token>) -> FormulaResult<Vec<Token>> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut stack: Vec<Token> = Vec::new();

        for token in tokens {
            match token.kind {
                TokenKind::Ident(_) => output.push(token),
                TokenKind::Open => stack.push(token),
                TokenKind::Op(op) => {
                    while let Some(top_op) = Self::top_operator(&stack) {
                        if op.priority() > top_op.priority() {
                            break;
                        }
                        output.extend(stack.pop());
                    }
                    stack.push(token);
                }
                TokenKind::Close => loop {
                    match stack.pop() {
                        Some(Token {
                            kind: TokenKind::Open,
                            ..
                        }) => break,
                        Some(op) => output.push(op),
                        None => {
                            return Err(FormulaError::syntax(token.position, "Unmatched ')'"));
                        }
                    }
                },
            }
        }

        while let Some(token) = stack.pop() {
            if token.kind == TokenKind::Open {
                return Err(FormulaError::syntax(token.position, "Unmatched '('"));
            }
            output.push(token);
        }

        Ok(output)
    }

    fn top_operator(stack: &[Token]) -> Option<Op> {
        match stack.last()?.kind {
            TokenKind::Op(op) => Some(op),
            _ => None,
        }
    }

    fn eval_postfix(postfix: &[Token]) -> FormulaResult<Vec<String>> {
        let mut stack: Vec<Vec<String>> = Vec::new();

        for token in postfix {
            match &token.kind {
                TokenKind::Ident(name) => stack.push(vec![name.clone()]),
                TokenKind::Op(op) => {
                    let (x, y) = match (stack.pop(), stack.pop()) {
                        (Some(y), Some(x)) => (x, y),
                        _ => {
                            return Err(FormulaError::syntax(
                                token.position,
                                format!("Operator '{}' is missing an operand", op.symbol()),
                            ));
                        }
                    };
                    stack.push(Self::apply(*op, x, y));
                }
                TokenKind::Open | TokenKind::Close => {
                    return Err(FormulaError::syntax(token.position, "Unbalanced parentheses"));
                }
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(terms), true) => Ok(terms),
            (Some(_), false) => {
                let position = postfix.last().map_or(0, |t| t.position);
                Err(FormulaError::syntax(position, "Missing operator between terms"))
            }
            (None, _) => Err(FormulaError::syntax(0, "Empty term")),
        }
    }

    fn apply(op: Op, x: Vec<String>, y: Vec<String>) -> Vec<String> {
        match op {
            Op::Add => [x, y].concat(),
            Op::Interact => Self::interact(&x, &y),
            Op::Cross => {
                let xy = Self::interact(&x, &y);
                [x, y, xy].concat()
            }
            Op::Nest => {
                let xy = Self::interact(&x, &y);
                [x, xy].concat()
            }
        }
    }

    fn interact(x: &[String], y: &[String]) -> Vec<String> {
        x.iter()
            .flat_map(|a| y.iter().map(move |b| format!("{}:{}", a, b)))
            .collect()
    }
}
