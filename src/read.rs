use tracing::debug;

use crate::lex::{lex, lex_all};
use crate::parse::{parse, parse_strict, ParseError};
use crate::sexpr::Expression;

pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Reader configuration. [`Reader::new`] reproduces [`Expression::read`];
/// [`Reader::strict`] rejects malformed input instead of salvaging it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reader {
    flush_trailing_atom: bool,
    strict: bool,
    max_depth: usize,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    pub fn new() -> Reader {
        Reader {
            flush_trailing_atom: false,
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn strict() -> Reader {
        Reader {
            flush_trailing_atom: true,
            strict: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Whether text running up to the end of input becomes a final atom.
    pub fn flush_trailing_atom(mut self, flush: bool) -> Reader {
        self.flush_trailing_atom = flush;
        self
    }

    /// Maximum list nesting accepted in strict mode.
    pub fn max_depth(mut self, max_depth: usize) -> Reader {
        self.max_depth = max_depth;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Reads one expression. Never returns an error unless the reader is
    /// strict.
    pub fn read(&self, src: &str) -> Result<Expression, ParseError> {
        let toks = if self.flush_trailing_atom {
            lex_all(src)
        } else {
            lex(src)
        };
        if !self.strict {
            return Ok(parse(toks));
        }
        parse_strict(toks, self.max_depth).map_err(|e| {
            debug!(error = %e, "strict read failed");
            e
        })
    }
}
