// crates/form-logic/src/dsl.rs
// ============================================================================
// Module: Form Logic DSL Parser
// Description: Author-facing text syntax for form logic trees.
// Purpose: Turn boolean expressions over field identifiers into validated
//          `LogicNode<K>` trees.
// Dependencies: crate::{error, node, serde_support}
// ============================================================================

//! ## Overview
//!
//! The DSL lets a form's validity rule live in configuration instead of
//! code. DSL input is untrusted: size, nesting, and the resulting tree
//! structure are all bounded.
//!
//! ### Grammar (informal)
//! - **Identifiers**: `email`, `alt_phone`, `billing.zip` (resolved by an
//!   [`IdentifierResolver`])
//! - **Infix**: `a && b`, `a || b`, `a and b`, `a or b` (`&&` binds tighter)
//! - **Functions**: `and(a, b)`, `all(a, b)`, `or(a, b)`, `any(a, b)`
//! - **Parentheses**: `( ... )` for explicit grouping
//!
//! ### Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use form_logic::LogicNode;
//! use form_logic::dsl::parse_tree;
//!
//! let mut fields = HashMap::new();
//! fields.insert("email".to_string(), "email");
//! fields.insert("phone".to_string(), "phone");
//! fields.insert("alt_phone".to_string(), "alt_phone");
//!
//! let tree: LogicNode<&str> = parse_tree("email && (phone || alt_phone)", &fields).unwrap();
//! assert_eq!(tree.leaf_count(), 3);
//! ```

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use crate::error::TreeError;
use crate::node::LogicNode;
use crate::serde_support::TreeValidator;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed DSL input size in bytes.
pub const MAX_DSL_INPUT_BYTES: usize = 64 * 1024;
/// Maximum supported nesting depth for DSL expressions.
pub const MAX_DSL_NESTING: usize = 32;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Errors that can occur while parsing or validating a DSL expression.
///
/// # Invariants
/// - None. Variants capture structured parse and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the nesting limit.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Nesting depth when the error occurred.
        actual_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Identifier was not known to the resolver.
    UnknownIdentifier {
        /// The unresolved identifier.
        name: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Function name was not recognized.
    UnknownFunction {
        /// The unknown function name.
        name: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// The parsed tree violated structural limits.
    InvalidTree(TreeError),
    /// Unexpected trailing input after a complete expression.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "input exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                actual_depth,
                position,
            } => write!(
                f,
                "input nesting exceeds limit: depth {actual_depth} (max {max_depth}) at {position}"
            ),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "unexpected token `{found}` at {position}, expected {expected}")
            }
            Self::UnknownIdentifier {
                name,
                position,
            } => {
                write!(f, "unknown field `{name}` at {position}")
            }
            Self::UnknownFunction {
                name,
                position,
            } => {
                write!(f, "unknown function `{name}` at {position}")
            }
            Self::InvalidTree(err) => write!(f, "{err}"),
            Self::TrailingInput {
                position,
            } => {
                write!(f, "unexpected trailing input at {position}")
            }
        }
    }
}

impl std::error::Error for DslError {}

/// Resolves DSL identifiers to the caller's identifier type `K`.
pub trait IdentifierResolver<K> {
    /// Returns the identifier for `name`, or `None` if unknown.
    fn resolve(&self, name: &str) -> Option<K>;
}

impl<K: Clone, S: BuildHasher> IdentifierResolver<K> for HashMap<String, K, S> {
    fn resolve(&self, name: &str) -> Option<K> {
        self.get(name).cloned()
    }
}

impl<K: Clone> IdentifierResolver<K> for BTreeMap<String, K> {
    fn resolve(&self, name: &str) -> Option<K> {
        self.get(name).cloned()
    }
}

impl<K, F> IdentifierResolver<K> for F
where
    F: Fn(&str) -> Option<K>,
{
    fn resolve(&self, name: &str) -> Option<K> {
        (self)(name)
    }
}

/// Parses a DSL expression into a tree validated with default limits.
///
/// # Errors
/// Returns [`DslError`] for syntax issues, unknown identifiers, trailing
/// input, or structural validation failures.
pub fn parse_tree<K, R>(input: &str, resolver: &R) -> Result<LogicNode<K>, DslError>
where
    R: IdentifierResolver<K> + ?Sized,
{
    parse_tree_with(input, resolver, &TreeValidator::default())
}

/// Parses a DSL expression into a tree validated by `validator`.
///
/// # Errors
/// Returns [`DslError`] for syntax issues, unknown identifiers, trailing
/// input, or structural validation failures.
pub fn parse_tree_with<K, R>(
    input: &str,
    resolver: &R,
    validator: &TreeValidator,
) -> Result<LogicNode<K>, DslError>
where
    R: IdentifierResolver<K> + ?Sized,
{
    if input.len() > MAX_DSL_INPUT_BYTES {
        return Err(DslError::InputTooLarge {
            max_bytes: MAX_DSL_INPUT_BYTES,
            actual_bytes: input.len(),
        });
    }
    let tokens = Lexer::new(input).lex()?;

    let mut parser = Parser::new(tokens, resolver);
    let tree = parser.parse_expression()?;
    parser.expect_eof()?;

    validator.validate(&tree).map_err(DslError::InvalidTree)?;
    Ok(tree)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from the DSL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier token.
    Ident(&'a str),
    /// Logical AND operator.
    And,
    /// Logical OR operator.
    Or,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Comma separator.
    Comma,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone, Copy)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for the form logic DSL.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, DslError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while let Some(&ch) = bytes.get(self.offset) {
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                }
                b'(' => tokens.push(self.single(Token::LParen)),
                b')' => tokens.push(self.single(Token::RParen)),
                b',' => tokens.push(self.single(Token::Comma)),
                b'&' => tokens.push(self.double(bytes, b'&', Token::And, "&&")?),
                b'|' => tokens.push(self.double(bytes, b'|', Token::Or, "||")?),
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    let start = self.offset;
                    while let Some(&b) = bytes.get(self.offset) {
                        if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.') {
                            self.offset += 1;
                        } else {
                            break;
                        }
                    }
                    tokens.push(SpannedToken {
                        token: Self::keyword_or_ident(&self.input[start .. self.offset]),
                        position: start,
                    });
                }
                _ => {
                    let found = self.input[self.offset ..].chars().next().unwrap_or('?');
                    return Err(DslError::UnexpectedToken {
                        expected: "identifier or operator",
                        found: found.to_string(),
                        position: self.offset,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return Err(DslError::EmptyInput);
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Emits a one-byte token and advances past it.
    const fn single(&mut self, token: Token<'a>) -> SpannedToken<'a> {
        let spanned = SpannedToken {
            token,
            position: self.offset,
        };
        self.offset += 1;
        spanned
    }

    /// Emits a two-byte operator token, rejecting a lone first byte.
    fn double(
        &mut self,
        bytes: &[u8],
        second: u8,
        token: Token<'a>,
        expected: &'static str,
    ) -> Result<SpannedToken<'a>, DslError> {
        if bytes.get(self.offset + 1) != Some(&second) {
            return Err(DslError::UnexpectedToken {
                expected,
                found: char::from(second).to_string(),
                position: self.offset,
            });
        }
        let spanned = SpannedToken {
            token,
            position: self.offset,
        };
        self.offset += 2;
        Ok(spanned)
    }

    /// Maps a slice to a keyword token or identifier token.
    fn keyword_or_ident(slice: &'a str) -> Token<'a> {
        match slice {
            "and" => Token::And,
            "or" => Token::Or,
            _ => Token::Ident(slice),
        }
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser for the form logic DSL.
struct Parser<'input, 'resolver, K, R: ?Sized> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Resolver for identifiers.
    resolver: &'resolver R,
    /// Current nesting depth for bracketed or function expressions.
    nesting: usize,
    /// Marker for the identifier type.
    _marker: std::marker::PhantomData<K>,
}

impl<'input, 'resolver, K, R> Parser<'input, 'resolver, K, R>
where
    R: IdentifierResolver<K> + ?Sized,
{
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>, resolver: &'resolver R) -> Self {
        Self {
            tokens,
            index: 0,
            resolver,
            nesting: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<LogicNode<K>, DslError> {
        self.parse_or()
    }

    /// Parses OR chains.
    fn parse_or(&mut self) -> Result<LogicNode<K>, DslError> {
        let mut parts = vec![self.parse_and()?];
        while self.matches(Token::Or) {
            parts.push(self.parse_and()?);
        }
        Ok(Self::collapse(parts, LogicNode::or))
    }

    /// Parses AND chains.
    fn parse_and(&mut self) -> Result<LogicNode<K>, DslError> {
        let mut parts = vec![self.parse_primary()?];
        while self.matches(Token::And) {
            parts.push(self.parse_primary()?);
        }
        Ok(Self::collapse(parts, LogicNode::and))
    }

    /// Returns a lone operand unchanged, otherwise wraps the operands.
    fn collapse(
        mut parts: Vec<LogicNode<K>>,
        group: fn(Vec<LogicNode<K>>) -> LogicNode<K>,
    ) -> LogicNode<K> {
        if parts.len() == 1
            && let Some(only) = parts.pop()
        {
            return only;
        }
        group(parts)
    }

    /// Parses an identifier, function call, or parenthesized expression.
    fn parse_primary(&mut self) -> Result<LogicNode<K>, DslError> {
        let SpannedToken {
            token,
            position,
        } = self.current();
        match token {
            Token::Ident(name) => {
                self.advance();
                if self.matches(Token::LParen) {
                    self.parse_function(name, position)
                } else {
                    self.resolve_identifier(name, position)
                }
            }
            // `and(...)` / `or(...)` lex as operators; accept them in call position.
            Token::And | Token::Or if self.peek_is(Token::LParen) => {
                self.advance();
                self.advance();
                let name = if token == Token::And { "and" } else { "or" };
                self.parse_function(name, position)
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_expression()?;
                    parser.expect(Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            Token::And | Token::Or | Token::RParen | Token::Comma | Token::Eof => {
                Err(DslError::UnexpectedToken {
                    expected: "field or expression",
                    found: self.describe_current(),
                    position,
                })
            }
        }
    }

    /// Parses the arguments of a function call whose `(` was consumed.
    fn parse_function(&mut self, name: &str, position: usize) -> Result<LogicNode<K>, DslError> {
        self.with_nesting(position, |parser| match name {
            "all" | "and" => Ok(LogicNode::and(parser.parse_argument_list()?)),
            "any" | "or" => Ok(LogicNode::or(parser.parse_argument_list()?)),
            _ => Err(DslError::UnknownFunction {
                name: name.to_string(),
                position,
            }),
        })
    }

    /// Parses a comma-separated argument list up to the closing `)`.
    fn parse_argument_list(&mut self) -> Result<Vec<LogicNode<K>>, DslError> {
        let mut args = Vec::new();
        if self.matches(Token::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if self.matches(Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, "`)` after arguments")?;
            break;
        }
        Ok(args)
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, DslError>,
    ) -> Result<T, DslError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_DSL_NESTING {
            return Err(DslError::NestingTooDeep {
                max_depth: MAX_DSL_NESTING,
                actual_depth: next_depth,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Resolves an identifier into a leaf.
    fn resolve_identifier(&self, name: &str, position: usize) -> Result<LogicNode<K>, DslError> {
        self.resolver.resolve(name).map(LogicNode::Leaf).ok_or_else(|| {
            DslError::UnknownIdentifier {
                name: name.to_string(),
                position,
            }
        })
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: Token<'_>, expected: &'static str) -> Result<(), DslError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(DslError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), DslError> {
        if self.current().token == Token::Eof {
            Ok(())
        } else {
            Err(DslError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns true when the token after the current one has `kind`.
    fn peek_is(&self, kind: Token<'_>) -> bool {
        self.tokens.get(self.index + 1).is_some_and(|next| {
            std::mem::discriminant(&next.token) == std::mem::discriminant(&kind)
        })
    }

    /// Returns the current token.
    fn current(&self) -> SpannedToken<'input> {
        self.tokens.get(self.index).copied().unwrap_or(SpannedToken {
            token: Token::Eof,
            position: 0,
        })
    }

    /// Advances to the next token, stopping at end-of-input.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match self.current().token {
            Token::Ident(name) => name.to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
