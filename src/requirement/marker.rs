//! PEP 508 environment marker parsing and evaluation.
//!
//! Markers gate a requirement on properties of the target environment:
//! `numpy>=1.16.0; python_version < "3.8"` only applies when the target
//! python is older than 3.8. The grammar is boolean combinations of
//! comparisons between marker variables and quoted strings, using
//! `==`, `!=`, `<`, `<=`, `>`, `>=`, `in`, `not in`, combined with
//! `and` / `or` and parentheses (`and` binds tighter than `or`).
//!
//! Evaluation happens against a [`MarkerEnvironment`] describing the target
//! interpreter and platform. Values that look like dotted releases compare
//! numerically (so `"3.7" < "3.10"`); everything else compares lexically.
//! A marker that references a variable the environment does not define is a
//! configuration error ([`MinpinError::MarkerEnvMissing`]), not silently
//! false.

use crate::core::MinpinError;
use crate::version::PyVersion;
use std::cmp::Ordering;
use std::fmt;

/// The target environment a marker is evaluated against.
///
/// Holds the interpreter version pair plus platform identifiers. The platform
/// defaults to the host the tool runs on and can be overridden with
/// [`with_platform`](Self::with_platform) to resolve dependencies for a
/// different OS (e.g. computing Windows minimums from a Linux CI box).
///
/// # Examples
///
/// ```rust
/// use minpin_cli::requirement::MarkerEnvironment;
///
/// let env = MarkerEnvironment::new("3.10", "3.10.1").with_platform("win32");
/// assert_eq!(env.get("python_version"), Some("3.10"));
/// assert_eq!(env.get("platform_system"), Some("Windows"));
/// assert_eq!(env.get("platform_machine"), None);
/// ```
#[derive(Debug, Clone)]
pub struct MarkerEnvironment {
    python_version: String,
    python_full_version: String,
    sys_platform: String,
    platform_system: String,
    os_name: String,
}

impl MarkerEnvironment {
    /// Create an environment for the given python version pair on the host
    /// platform.
    ///
    /// # Arguments
    ///
    /// * `python_version` - "major.minor" (e.g. "3.10")
    /// * `python_full_version` - "major.minor.patch" (e.g. "3.10.1")
    pub fn new(python_version: &str, python_full_version: &str) -> Self {
        let sys_platform = if cfg!(windows) {
            "win32"
        } else if cfg!(target_os = "macos") {
            "darwin"
        } else {
            "linux"
        };
        Self {
            python_version: python_version.to_string(),
            python_full_version: python_full_version.to_string(),
            sys_platform: String::new(),
            platform_system: String::new(),
            os_name: String::new(),
        }
        .with_platform(sys_platform)
    }

    /// Override the platform identifiers from a `sys.platform`-style string
    /// ("linux", "win32", "darwin"). `platform_system` and `os_name` are
    /// derived from it.
    #[must_use]
    pub fn with_platform(mut self, sys_platform: &str) -> Self {
        let (platform_system, os_name) = match sys_platform {
            "win32" => ("Windows", "nt"),
            "darwin" => ("Darwin", "posix"),
            "linux" => ("Linux", "posix"),
            other => {
                tracing::debug!("unrecognized sys_platform '{other}', assuming posix");
                ("", "posix")
            }
        };
        self.platform_system = if platform_system.is_empty() {
            // Capitalize unknown platforms the way `platform.system()` tends to.
            let mut chars = sys_platform.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        } else {
            platform_system.to_string()
        };
        self.sys_platform = sys_platform.to_string();
        self.os_name = os_name.to_string();
        self
    }

    /// Look up a marker variable. Returns `None` for variables outside the
    /// supplied environment (callers turn that into
    /// [`MinpinError::MarkerEnvMissing`]).
    pub fn get(&self, variable: &str) -> Option<&str> {
        match variable {
            "python_version" => Some(&self.python_version),
            "python_full_version" => Some(&self.python_full_version),
            "sys_platform" => Some(&self.sys_platform),
            "platform_system" => Some(&self.platform_system),
            "os_name" => Some(&self.os_name),
            _ => None,
        }
    }
}

/// Comparison operators allowed inside a marker expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl fmt::Display for MarkerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
        };
        write!(f, "{rendered}")
    }
}

/// One side of a marker comparison: a marker variable or a quoted literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOperand {
    /// A marker variable such as `python_version`
    Variable(String),
    /// A quoted string literal such as `"3.8"`
    Literal(String),
}

/// A parsed marker expression tree.
///
/// `and` binds tighter than `or`; parentheses group explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerExpr {
    /// Disjunction of two subexpressions
    Or(Box<MarkerExpr>, Box<MarkerExpr>),
    /// Conjunction of two subexpressions
    And(Box<MarkerExpr>, Box<MarkerExpr>),
    /// A single comparison
    Compare {
        lhs: MarkerOperand,
        op: MarkerOp,
        rhs: MarkerOperand,
    },
}

impl MarkerExpr {
    /// Parse a marker expression (the text after `;` in a requirement).
    ///
    /// # Errors
    ///
    /// Returns [`MinpinError::MarkerParse`] when the text does not follow the
    /// marker grammar.
    pub fn parse(text: &str) -> Result<Self, MinpinError> {
        let tokens = tokenize(text).map_err(|reason| MinpinError::MarkerParse {
            marker: text.to_string(),
            reason,
        })?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or().map_err(|reason| MinpinError::MarkerParse {
            marker: text.to_string(),
            reason,
        })?;
        if parser.pos != parser.tokens.len() {
            return Err(MinpinError::MarkerParse {
                marker: text.to_string(),
                reason: format!("unexpected trailing token at position {}", parser.pos),
            });
        }
        Ok(expr)
    }

    /// Evaluate the expression against a target environment.
    ///
    /// # Errors
    ///
    /// Returns [`MinpinError::MarkerEnvMissing`] when the expression
    /// references a variable the environment does not define.
    pub fn evaluate(&self, env: &MarkerEnvironment) -> Result<bool, MinpinError> {
        match self {
            Self::Or(lhs, rhs) => Ok(lhs.evaluate(env)? || rhs.evaluate(env)?),
            Self::And(lhs, rhs) => Ok(lhs.evaluate(env)? && rhs.evaluate(env)?),
            Self::Compare { lhs, op, rhs } => {
                let left = resolve(lhs, env)?;
                let right = resolve(rhs, env)?;
                Ok(compare(left, *op, right))
            }
        }
    }
}

fn resolve<'a>(
    operand: &'a MarkerOperand,
    env: &'a MarkerEnvironment,
) -> Result<&'a str, MinpinError> {
    match operand {
        MarkerOperand::Literal(value) => Ok(value),
        MarkerOperand::Variable(name) => {
            env.get(name).ok_or_else(|| MinpinError::MarkerEnvMissing {
                variable: name.clone(),
            })
        }
    }
}

/// Compare two marker values. Ordering and equality operators compare as
/// dotted releases when both sides parse as one (so `"3.7" < "3.10"` holds),
/// falling back to lexical comparison otherwise. `in` / `not in` are
/// substring containment, matching the reference marker semantics.
fn compare(left: &str, op: MarkerOp, right: &str) -> bool {
    match op {
        MarkerOp::In => right.contains(left),
        MarkerOp::NotIn => !right.contains(left),
        _ => {
            let ordering = match (left.parse::<PyVersion>(), right.parse::<PyVersion>()) {
                (Ok(lv), Ok(rv)) => lv.cmp(&rv),
                _ => left.cmp(right),
            };
            match op {
                MarkerOp::Eq => ordering == Ordering::Equal,
                MarkerOp::Ne => ordering != Ordering::Equal,
                MarkerOp::Lt => ordering == Ordering::Less,
                MarkerOp::Le => ordering != Ordering::Greater,
                MarkerOp::Gt => ordering == Ordering::Greater,
                MarkerOp::Ge => ordering != Ordering::Less,
                MarkerOp::In | MarkerOp::NotIn => unreachable!(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Op(MarkerOp),
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end] != quote {
                    end += 1;
                }
                if end == chars.len() {
                    return Err("unterminated string literal".to_string());
                }
                tokens.push(Token::Str(chars[start..end].iter().collect()));
                i = end + 1;
            }
            '<' | '>' | '=' | '!' => {
                let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
                let (op, len) = match two.as_str() {
                    "==" => (MarkerOp::Eq, 2),
                    "!=" => (MarkerOp::Ne, 2),
                    "<=" => (MarkerOp::Le, 2),
                    ">=" => (MarkerOp::Ge, 2),
                    _ if c == '<' => (MarkerOp::Lt, 1),
                    _ if c == '>' => (MarkerOp::Gt, 1),
                    _ => return Err(format!("invalid operator at '{two}'")),
                };
                tokens.push(Token::Op(op));
                i += len;
            }
            c if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                // Legacy dotted forms (os.name, sys.platform) normalize to
                // the underscore variables.
                tokens.push(Token::Ident(word.replace('.', "_")));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> Result<MarkerExpr, String> {
        let mut expr = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Ident(word)) if word == "or") {
            self.pos += 1;
            let rhs = self.parse_and()?;
            expr = MarkerExpr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<MarkerExpr, String> {
        let mut expr = self.parse_atom()?;
        while matches!(self.peek(), Some(Token::Ident(word)) if word == "and") {
            self.pos += 1;
            let rhs = self.parse_atom()?;
            expr = MarkerExpr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<MarkerExpr, String> {
        if matches!(self.peek(), Some(Token::LParen)) {
            self.pos += 1;
            let expr = self.parse_or()?;
            match self.peek() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    Ok(expr)
                }
                _ => Err("expected closing parenthesis".to_string()),
            }
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<MarkerExpr, String> {
        let lhs = self.parse_operand()?;
        let op = self.parse_op()?;
        let rhs = self.parse_operand()?;
        Ok(MarkerExpr::Compare { lhs, op, rhs })
    }

    fn parse_operand(&mut self) -> Result<MarkerOperand, String> {
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(MarkerOperand::Variable(name))
            }
            Some(Token::Str(value)) => {
                self.pos += 1;
                Ok(MarkerOperand::Literal(value))
            }
            other => Err(format!("expected variable or string literal, found {other:?}")),
        }
    }

    fn parse_op(&mut self) -> Result<MarkerOp, String> {
        match self.peek().cloned() {
            Some(Token::Op(op)) => {
                self.pos += 1;
                Ok(op)
            }
            Some(Token::Ident(word)) if word == "in" => {
                self.pos += 1;
                Ok(MarkerOp::In)
            }
            Some(Token::Ident(word)) if word == "not" => {
                self.pos += 1;
                match self.peek() {
                    Some(Token::Ident(next)) if next == "in" => {
                        self.pos += 1;
                        Ok(MarkerOp::NotIn)
                    }
                    _ => Err("expected 'in' after 'not'".to_string()),
                }
            }
            other => Err(format!("expected comparison operator, found {other:?}")),
        }
    }
}
