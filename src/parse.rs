use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::sexpr::Expression;
use crate::tokens::Token;
use crate::tokens::Tokens;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{offset}: sexpr error: unexpected ')'")]
    UnexpectedClose { offset: usize },
    #[error("{offset}: sexpr error: abrupt end of list")]
    UnclosedList { offset: usize },
    #[error("{offset}: sexpr error: expecting a single top-level expression")]
    MultipleTopLevel { offset: usize },
    #[error("{offset}: sexpr error: nesting deeper than {limit}")]
    TooDeep { offset: usize, limit: usize },
}

impl ParseError {
    /// Character offset in the source text the error points at.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedClose { offset }
            | ParseError::UnclosedList { offset }
            | ParseError::MultipleTopLevel { offset }
            | ParseError::TooDeep { offset, .. } => *offset,
        }
    }
}

// What the lenient parser has assembled at one nesting level. Only the top
// level can be `Empty` or `Bare`; every nested level starts out `Open`.
#[derive(Debug)]
enum Accumulator {
    Empty,
    Bare(Expression),
    Open(Vec<Expression>),
}

impl Accumulator {
    // Inside a list the node is appended, otherwise it takes the place of
    // whatever was held so far.
    fn append(&mut self, node: Expression) {
        if let Accumulator::Open(items) = self {
            items.push(node);
            return;
        }
        if let Accumulator::Bare(old) = self {
            debug!(discarded = %old, "top-level expression replaced");
        }
        *self = match node.into_list() {
            Ok(items) => Accumulator::Open(items),
            Err(atom) => Accumulator::Bare(atom),
        };
    }

    fn into_node(self) -> Option<Expression> {
        match self {
            Accumulator::Empty => None,
            Accumulator::Bare(node) => Some(node),
            Accumulator::Open(items) => Some(Expression::List(items)),
        }
    }
}

// Closes the innermost level and appends it to its parent.
fn close(cur: &mut Accumulator, parent: Accumulator) {
    if let Some(done) = mem::replace(cur, parent).into_node() {
        cur.append(done);
    }
}

/// Assembles tokens into a single expression without ever failing.
///
/// A `Close` with no matching `Open` ends parsing and the tokens after it are
/// ignored. Lists still open when the tokens run out are closed implicitly.
/// No tokens at all give an empty list.
///
/// Text outside any list replaces whatever the top level held before, so of
/// several bare top-level atoms the *last* one is returned: `a b ` reads as
/// `b`, not `a`. Once the top level holds a list, later top-level items are
/// appended to it instead: `(a) b ` reads as `(a b )`.
pub fn parse(mut toks: Tokens) -> Expression {
    let mut pending: Vec<Accumulator> = Vec::new();
    let mut cur = Accumulator::Empty;

    while let Some((tok, offset)) = toks.pop() {
        match tok {
            Token::Open => {
                let parent = mem::replace(&mut cur, Accumulator::Open(Vec::new()));
                pending.push(parent);
            }
            Token::Close => match pending.pop() {
                Some(parent) => close(&mut cur, parent),
                None => {
                    if !toks.is_empty() {
                        debug!(offset, dropped = toks.len(), "stray ')' ends input");
                    }
                    break;
                }
            },
            Token::TextBlock(text) => cur.append(Expression::Atom(text)),
        }
    }

    if !pending.is_empty() {
        debug!(unclosed = pending.len(), "input ended inside a list");
    }
    while let Some(parent) = pending.pop() {
        close(&mut cur, parent);
    }

    cur.into_node().unwrap_or_else(|| Expression::List(Vec::new()))
}

/// Assembles tokens into exactly one expression, rejecting unbalanced
/// parentheses, more than one top-level expression and nesting deeper than
/// `max_depth`. No tokens at all give an empty list.
pub fn parse_strict(mut toks: Tokens, max_depth: usize) -> Result<Expression, ParseError> {
    let mut root: Option<Expression> = None;
    let mut open: Vec<(usize, Vec<Expression>)> = Vec::new();

    while let Some((tok, offset)) = toks.pop() {
        let node = match tok {
            Token::Open => {
                if open.is_empty() && root.is_some() {
                    return Err(ParseError::MultipleTopLevel { offset });
                }
                if open.len() >= max_depth {
                    return Err(ParseError::TooDeep {
                        offset,
                        limit: max_depth,
                    });
                }
                open.push((offset, Vec::new()));
                continue;
            }
            Token::Close => match open.pop() {
                Some((_, items)) => Expression::List(items),
                None => return Err(ParseError::UnexpectedClose { offset }),
            },
            Token::TextBlock(text) => Expression::Atom(text),
        };
        match open.last_mut() {
            Some((_, items)) => items.push(node),
            None if root.is_some() => return Err(ParseError::MultipleTopLevel { offset }),
            None => root = Some(node),
        }
    }

    if let Some((offset, _)) = open.last() {
        return Err(ParseError::UnclosedList { offset: *offset });
    }
    Ok(root.unwrap_or_else(|| Expression::List(Vec::new())))
}
