#[derive(Debug, Eq, PartialEq, PartialOrd, Copy, Clone)]
pub enum Verbosity {
    Minimal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Unknown names fall back to `Minimal`.
    pub fn from_name(name: &str) -> Verbosity {
        match name {
            "verbose" => Verbosity::Verbose,
            "debug" => Verbosity::Debug,
            _ => Verbosity::Minimal,
        }
    }

    pub fn level(self) -> tracing::Level {
        match self {
            Verbosity::Minimal => tracing::Level::WARN,
            Verbosity::Verbose => tracing::Level::INFO,
            Verbosity::Debug => tracing::Level::DEBUG,
        }
    }
}

pub mod cli;
pub mod lex;
pub mod parse;
pub mod read;
pub mod sexpr;
pub mod tokens;

pub use parse::ParseError;
pub use read::Reader;
pub use sexpr::{AtomError, Expression};
