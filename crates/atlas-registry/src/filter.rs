//! Filter expressions over resource fields.
//!
//! The grammar is a single comparison over string-valued fields:
//!
//! ```text
//! expr := field ("==" | "!=") quoted-string
//! ```
//!
//! The empty string is the match-all predicate. Filters compile eagerly
//! against the listed kind's registered field table, so a malformed filter
//! or an unregistered field surfaces as `InvalidArgument` even when the
//! collection is empty.

use atlas_core::error::{Error, Result};

/// Comparison operator of a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
}

/// A compiled filter predicate over one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Admits every resource (empty filter string).
    MatchAll,
    /// Compares a registered field against a literal.
    Compare {
        /// The registered field name.
        field: String,
        /// The comparison operator.
        op: Op,
        /// The quoted literal to compare against.
        literal: String,
    },
}

impl Filter {
    /// Compiles `expression` against the registered `fields` of a kind.
    pub fn compile(expression: &str, fields: &'static [&'static str]) -> Result<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Ok(Self::MatchAll);
        }

        let mut scanner = Scanner::new(trimmed);
        let field = scanner.identifier()?;
        let op = scanner.operator()?;
        let literal = scanner.quoted_literal()?;
        scanner.expect_end()?;

        if !fields.contains(&field.as_str()) {
            return Err(Error::invalid_argument(format!(
                "unknown filter field {field:?}"
            )));
        }

        Ok(Self::Compare { field, op, literal })
    }

    /// Evaluates the predicate against one resource's field lookup.
    pub fn matches<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            Self::MatchAll => true,
            Self::Compare { field, op, literal } => {
                let value = lookup(field).unwrap_or_default();
                match op {
                    Op::Equals => value == *literal,
                    Op::NotEquals => value != *literal,
                }
            }
        }
    }
}

/// Minimal cursor over the filter expression bytes.
struct Scanner<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    fn identifier(&mut self) -> Result<String> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(Error::invalid_argument(format!(
                "invalid filter {:?}: expected a field name",
                self.input
            )));
        }
        self.position += end;
        Ok(rest[..end].to_string())
    }

    fn operator(&mut self) -> Result<Op> {
        self.skip_whitespace();
        let rest = self.rest();
        if let Some(after) = rest.strip_prefix("==") {
            self.position = self.input.len() - after.len();
            return Ok(Op::Equals);
        }
        if let Some(after) = rest.strip_prefix("!=") {
            self.position = self.input.len() - after.len();
            return Ok(Op::NotEquals);
        }
        Err(Error::invalid_argument(format!(
            "invalid filter {:?}: expected \"==\" or \"!=\"",
            self.input
        )))
    }

    fn quoted_literal(&mut self) -> Result<String> {
        self.skip_whitespace();
        let rest = self.rest();
        let mut chars = rest.chars();
        let quote = match chars.next() {
            Some(q @ ('\'' | '"')) => q,
            _ => {
                return Err(Error::invalid_argument(format!(
                    "invalid filter {:?}: expected a quoted literal",
                    self.input
                )));
            }
        };
        let body = &rest[1..];
        let Some(end) = body.find(quote) else {
            return Err(Error::invalid_argument(format!(
                "invalid filter {:?}: unterminated literal",
                self.input
            )));
        };
        self.position += 1 + end + 1;
        Ok(body[..end].to_string())
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.rest().is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "invalid filter {:?}: unexpected trailing input",
                self.input
            )))
        }
    }
}
