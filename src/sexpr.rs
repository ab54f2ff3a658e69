use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::slice;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::parse::ParseError;
use crate::read::Reader;

lazy_static! {
    static ref RE_ATOM: Regex = Regex::new(r"^[^() ]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid atom {text:?}: atoms are non-empty and contain no spaces or parentheses")]
pub struct AtomError {
    pub text: String,
}

// The trait impls below walk the tree with an explicit work list instead of
// recursing: the reader accepts nesting far deeper than the call stack.
pub enum Expression {
    Atom(String),
    List(Vec<Expression>),
}

impl Expression {
    /// Builds an atom without checking its text. The reader never produces
    /// atoms holding spaces or parentheses; callers using this constructor
    /// are responsible for the same.
    pub fn atom<S: Into<String>>(text: S) -> Expression {
        Expression::Atom(text.into())
    }

    /// Builds an atom, rejecting text the reader could never have produced.
    pub fn try_atom<S: Into<String>>(text: S) -> Result<Expression, AtomError> {
        let text = text.into();
        if !RE_ATOM.is_match(&text) {
            return Err(AtomError { text });
        }
        Ok(Expression::Atom(text))
    }

    pub fn list<T>(items: T) -> Expression
    where
        T: IntoIterator<Item = Expression>,
    {
        Expression::List(items.into_iter().collect())
    }

    /// Reads `src` leniently. Never fails: malformed input yields whatever
    /// was assembled before the input ran out or a stray `)` was met, and
    /// empty input yields an empty list.
    ///
    /// A text block running up to the end of input is dropped, so `"foo"`
    /// reads as `()` while `"foo "` reads as `foo`.
    pub fn read(src: &str) -> Expression {
        crate::parse::parse(crate::lex::lex(src))
    }

    /// Reads `src` with [`Reader::strict`], reporting unbalanced
    /// parentheses and stray top-level expressions.
    pub fn try_read(src: &str) -> Result<Expression, ParseError> {
        Reader::strict().read(src)
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Expression::Atom(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Expression::List(_))
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Expression::Atom(s) => Some(s),
            Expression::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expression]> {
        match self {
            Expression::Atom(_) => None,
            Expression::List(items) => Some(items),
        }
    }

    /// Takes the children out of a list, handing atoms back unchanged.
    pub fn into_list(mut self) -> Result<Vec<Expression>, Expression> {
        if let Expression::List(items) = &mut self {
            return Ok(mem::take(items));
        }
        Err(self)
    }

    /// Nesting depth: 0 for atoms, one more than the deepest child for lists.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((expr, depth)) = pending.pop() {
            if let Expression::List(items) = expr {
                deepest = deepest.max(depth + 1);
                pending.extend(items.iter().map(|item| (item, depth + 1)));
            }
        }
        deepest
    }
}

enum Step<'a> {
    Node(&'a Expression),
    Text(&'static str),
}

impl Expression {
    fn render(&self, f: &mut fmt::Formatter, debug: bool) -> fmt::Result {
        let mut pending = vec![Step::Node(self)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Node(Expression::Atom(value)) if debug => write!(f, "Atom({:?})", value)?,
                Step::Node(Expression::Atom(value)) => f.write_str(value)?,
                Step::Node(Expression::List(items)) => {
                    f.write_str(if debug { "List([" } else { "(" })?;
                    pending.push(Step::Text(if debug { "])" } else { ")" }));
                    for (i, item) in items.iter().enumerate().rev() {
                        if !debug {
                            pending.push(Step::Text(" "));
                        } else if i + 1 < items.len() {
                            pending.push(Step::Text(", "));
                        }
                        pending.push(Step::Node(item));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Every list item is followed by a single space, so `(a (b))` renders as
/// `(a (b ) )`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, false)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, true)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Expression) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Expression::Atom(a), Expression::Atom(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Expression::List(a), Expression::List(b)) => {
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b.iter()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                Expression::Atom(value) => {
                    state.write_u8(0);
                    value.hash(state);
                }
                Expression::List(items) => {
                    state.write_u8(1);
                    items.len().hash(state);
                    pending.extend(items.iter().rev());
                }
            }
        }
    }
}

impl Clone for Expression {
    fn clone(&self) -> Expression {
        // Each frame pairs the children still to copy with the copies made so
        // far. The bottom frame holds just `self`.
        let mut stack = vec![(slice::from_ref(self).iter(), Vec::with_capacity(1))];
        while let Some((iter, built)) = stack.last_mut() {
            match iter.next() {
                Some(Expression::Atom(value)) => built.push(Expression::Atom(value.clone())),
                Some(Expression::List(items)) => {
                    stack.push((items.iter(), Vec::with_capacity(items.len())));
                }
                None => {
                    let mut done = mem::take(built);
                    stack.pop();
                    match stack.last_mut() {
                        Some((_, parent)) => parent.push(Expression::List(done)),
                        None => return done.pop().unwrap_or_else(|| Expression::List(Vec::new())),
                    }
                }
            }
        }
        Expression::List(Vec::new())
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = match self {
            Expression::List(items) if !items.is_empty() => mem::take(items),
            _ => return,
        };
        while let Some(mut expr) = pending.pop() {
            if let Expression::List(items) = &mut expr {
                pending.append(items);
            }
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::try_read(s)
    }
}

impl From<&str> for Expression {
    fn from(s: &str) -> Self {
        Expression::atom(s)
    }
}

impl From<String> for Expression {
    fn from(s: String) -> Self {
        Expression::Atom(s)
    }
}

impl From<Vec<Expression>> for Expression {
    fn from(items: Vec<Expression>) -> Self {
        Expression::List(items)
    }
}
